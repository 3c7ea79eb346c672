//! Rank-tracking job creation request and its validation.
//!
//! Requests that fail validation never reach the network.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Amazon ASINs are exactly ten alphanumeric characters.
pub const ASIN_LEN: usize = 10;

/// Maximum length of a search keyword.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Maximum number of runs a single request may schedule.
pub const MAX_RUN_COUNT: u32 = 50;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Body of `POST /api/amazon/search`.
///
/// Creates `count` rank-tracking jobs for one keyword/ASIN pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub product_name: String,
    #[serde(rename = "targetASIN")]
    pub target_asin: String,
    pub count: u32,
}

impl SearchRequest {
    pub fn new(product_name: impl Into<String>, target_asin: impl Into<String>, count: u32) -> Self {
        Self {
            product_name: product_name.into(),
            target_asin: target_asin.into(),
            count,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a search request before submission.
///
/// Rules:
/// - `productName` must be non-empty (after trimming) and within
///   `MAX_PRODUCT_NAME_LEN` characters.
/// - `targetASIN` must be exactly `ASIN_LEN` ASCII-alphanumeric
///   characters.
/// - `count` must be between 1 and `MAX_RUN_COUNT`.
pub fn validate_search_request(request: &SearchRequest) -> Result<(), CoreError> {
    if request.product_name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Product keyword must not be empty".to_string(),
        ));
    }
    if request.product_name.len() > MAX_PRODUCT_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Product keyword must not exceed {MAX_PRODUCT_NAME_LEN} characters"
        )));
    }
    validate_asin(&request.target_asin)?;
    if request.count == 0 {
        return Err(CoreError::Validation(
            "Run count must be at least 1".to_string(),
        ));
    }
    if request.count > MAX_RUN_COUNT {
        return Err(CoreError::Validation(format!(
            "Run count must not exceed {MAX_RUN_COUNT}"
        )));
    }
    Ok(())
}

/// Validate an ASIN: exactly [`ASIN_LEN`] ASCII-alphanumeric characters.
pub fn validate_asin(asin: &str) -> Result<(), CoreError> {
    if asin.len() != ASIN_LEN || !asin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::Validation(format!(
            "\"{asin}\" is not a valid ASIN (expected {ASIN_LEN} alphanumeric characters)"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_well_formed_request() {
        let request = SearchRequest::new("dish drying mat", "B0GLH9JBDP", 3);
        assert!(validate_search_request(&request).is_ok());
    }

    #[test]
    fn rejects_empty_and_whitespace_keywords() {
        for keyword in ["", "   "] {
            let request = SearchRequest::new(keyword, "B0GLH9JBDP", 1);
            assert!(validate_search_request(&request).is_err());
        }
    }

    #[test]
    fn rejects_oversized_keywords() {
        let request = SearchRequest::new("k".repeat(MAX_PRODUCT_NAME_LEN + 1), "B0GLH9JBDP", 1);
        assert!(validate_search_request(&request).is_err());
    }

    #[test]
    fn rejects_malformed_asins() {
        for asin in ["", "B0GLH9JBD", "B0GLH9JBDPX", "B0GLH9JBD!"] {
            assert!(validate_asin(asin).is_err(), "{asin:?} should be rejected");
        }
    }

    #[test]
    fn rejects_out_of_range_run_counts() {
        let zero = SearchRequest::new("mat", "B0GLH9JBDP", 0);
        assert!(validate_search_request(&zero).is_err());

        let too_many = SearchRequest::new("mat", "B0GLH9JBDP", MAX_RUN_COUNT + 1);
        assert!(validate_search_request(&too_many).is_err());
    }

    #[test]
    fn serializes_with_backend_field_names() {
        let request = SearchRequest::new("gaming mouse", "B08XYZ1234", 2);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["productName"], "gaming mouse");
        assert_eq!(value["targetASIN"], "B08XYZ1234");
        assert_eq!(value["count"], 2);
    }
}
