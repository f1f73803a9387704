//! Places search: geocode the origin, text-search nearby businesses and
//! enrich each hit with details and a great-circle distance.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use shared::geo::haversine_miles;

use crate::models::{Coordinates, PlaceCandidate, PlaceDetails, PlaceResult};

/// Maximum number of text-search hits that are enriched and returned.
pub const MAX_PLACE_RESULTS: usize = 10;

#[derive(Debug, Error)]
pub enum PlacesError {
    /// The location could not be geocoded.
    #[error("Invalid location")]
    InvalidLocation,

    /// Transport or decoding failure talking to the provider.
    #[error("Places provider unavailable: {0}")]
    Upstream(String),
}

/// A places/geocoding provider.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Resolves free-form text to coordinates. `None` when nothing matched.
    async fn geocode(&self, location: &str) -> Result<Option<Coordinates>, PlacesError>;

    /// Free-text search, in provider relevance order.
    async fn text_search(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlacesError>;

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError>;

    /// Public URL of a photo, given the provider's photo reference.
    fn photo_url(&self, photo_reference: &str) -> String;
}

/// Finds `business_type` places near `location`.
///
/// Results keep provider order. Candidates without a place id are skipped.
pub async fn search_places<P>(
    provider: &P,
    location: &str,
    business_type: &str,
) -> Result<Vec<PlaceResult>, PlacesError>
where
    P: PlacesProvider + ?Sized,
{
    let origin = provider
        .geocode(location)
        .await?
        .ok_or(PlacesError::InvalidLocation)?;

    let query = format!("{} in {}", business_type, location);
    let candidates = provider.text_search(&query).await?;
    debug!(query = %query, candidates = candidates.len(), "Text search complete");

    let mut results = Vec::with_capacity(candidates.len().min(MAX_PLACE_RESULTS));
    for candidate in candidates.into_iter().take(MAX_PLACE_RESULTS) {
        let Some(place_id) = candidate.place_id.as_deref() else {
            continue;
        };
        let details = provider.details(place_id).await?;

        let distance = candidate
            .location
            .map(|to| haversine_miles(origin.lat, origin.lng, to.lat, to.lng));
        let photo_url = details
            .photo_reference
            .as_deref()
            .map(|r| provider.photo_url(r));

        results.push(PlaceResult {
            name: details.name,
            address: details.formatted_address,
            rating: details.rating,
            phone_number: details.formatted_phone_number,
            opening_hours: details.weekday_text,
            photo_url,
            price_level: details.price_level,
            distance,
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeProvider {
        origin: Option<Coordinates>,
        candidates: Vec<PlaceCandidate>,
        details: HashMap<String, PlaceDetails>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PlacesProvider for FakeProvider {
        async fn geocode(&self, _location: &str) -> Result<Option<Coordinates>, PlacesError> {
            Ok(self.origin)
        }

        async fn text_search(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlacesError> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.candidates.clone())
        }

        async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
            self.details
                .get(place_id)
                .cloned()
                .ok_or_else(|| PlacesError::Upstream(format!("unknown {}", place_id)))
        }

        fn photo_url(&self, photo_reference: &str) -> String {
            format!("https://photos.test/{}", photo_reference)
        }
    }

    fn candidate(id: &str, lat: f64, lng: f64) -> PlaceCandidate {
        PlaceCandidate {
            place_id: Some(id.to_string()),
            location: Some(Coordinates { lat, lng }),
        }
    }

    fn named(name: &str) -> PlaceDetails {
        PlaceDetails {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_location() {
        let provider = FakeProvider::default();
        let err = search_places(&provider, "Nowhere", "cafe").await.unwrap_err();
        assert!(matches!(err, PlacesError::InvalidLocation));
    }

    #[tokio::test]
    async fn test_results_keep_provider_order_with_distance() {
        let origin = Coordinates { lat: 40.7128, lng: -74.0060 };
        let mut details = HashMap::new();
        details.insert("far".to_string(), named("Far Cafe"));
        details.insert(
            "near".to_string(),
            PlaceDetails {
                name: Some("Near Cafe".to_string()),
                photo_reference: Some("ref-1".to_string()),
                weekday_text: Some(vec!["Monday: 8AM-5PM".to_string()]),
                ..Default::default()
            },
        );
        let provider = FakeProvider {
            origin: Some(origin),
            candidates: vec![candidate("far", 40.80, -73.95), candidate("near", 40.713, -74.006)],
            details,
            ..Default::default()
        };

        let results = search_places(&provider, "NYC", "cafe").await.unwrap();
        assert_eq!(provider.queries.lock().unwrap().as_slice(), ["cafe in NYC"]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name.as_deref(), Some("Far Cafe"));
        assert_eq!(results[1].name.as_deref(), Some("Near Cafe"));

        let expected = haversine_miles(origin.lat, origin.lng, 40.80, -73.95);
        assert!((results[0].distance.unwrap() - expected).abs() < 1e-9);
        assert!(results[1].distance.unwrap() < results[0].distance.unwrap());

        assert!(results[0].photo_url.is_none());
        assert_eq!(results[1].photo_url.as_deref(), Some("https://photos.test/ref-1"));
        assert_eq!(results[1].opening_hours.as_ref().map(|h| h.len()), Some(1));
    }

    #[tokio::test]
    async fn test_skips_candidates_without_place_id_and_caps_results() {
        let mut candidates = vec![PlaceCandidate {
            place_id: None,
            location: None,
        }];
        let mut details = HashMap::new();
        for i in 0..15 {
            let id = format!("p{}", i);
            details.insert(id.clone(), named(&id));
            candidates.push(PlaceCandidate {
                place_id: Some(id),
                location: None,
            });
        }
        let provider = FakeProvider {
            origin: Some(Coordinates { lat: 0.0, lng: 0.0 }),
            candidates,
            details,
            ..Default::default()
        };

        let results = search_places(&provider, "X", "bar").await.unwrap();
        // The id-less candidate counts against the cap.
        assert_eq!(results.len(), MAX_PLACE_RESULTS - 1);
        assert_eq!(results[0].name.as_deref(), Some("p0"));
        assert!(results.iter().all(|r| r.distance.is_none()));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let provider = FakeProvider {
            origin: Some(Coordinates { lat: 0.0, lng: 0.0 }),
            candidates: vec![candidate("missing", 0.0, 0.0)],
            ..Default::default()
        };
        let err = search_places(&provider, "X", "bar").await.unwrap_err();
        assert!(matches!(err, PlacesError::Upstream(_)));
    }
}
