//! Places search models.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Text-search hit before details are fetched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaceCandidate {
    pub place_id: Option<String>,
    pub location: Option<Coordinates>,
}

/// Details returned by the provider for one place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub formatted_phone_number: Option<String>,
    pub weekday_text: Option<Vec<String>>,
    pub photo_reference: Option<String>,
    pub price_level: Option<i32>,
}

/// A search result. Absent values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlaceResult {
    pub name: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub phone_number: Option<String>,
    pub opening_hours: Option<Vec<String>>,
    pub photo_url: Option<String>,
    pub price_level: Option<i32>,
    /// Miles from the geocoded search origin.
    pub distance: Option<f64>,
}

/// Places search request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchRequest {
    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub location: String,

    #[serde(default, alias = "business-type")]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub business_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_accepts_hyphenated_alias() {
        let request: SearchRequest = serde_json::from_value(serde_json::json!({
            "location": "NYC",
            "business-type": "cafe"
        }))
        .unwrap();
        assert_eq!(request.business_type, "cafe");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_search_request_requires_both_fields() {
        let request: SearchRequest =
            serde_json::from_value(serde_json::json!({ "location": "NYC" })).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("business_type"));
    }

    #[test]
    fn test_place_result_serializes_nulls() {
        let result = PlaceResult {
            name: Some("Cafe".to_string()),
            address: None,
            rating: None,
            phone_number: None,
            opening_hours: None,
            photo_url: None,
            price_level: None,
            distance: Some(1.5),
        };
        let json = serde_json::to_value(result).unwrap();
        assert!(json["photo_url"].is_null());
        assert!(json["address"].is_null());
        assert_eq!(json["distance"], 1.5);
    }
}
