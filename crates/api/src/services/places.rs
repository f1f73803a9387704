//! Google Maps web-service client backing [`PlacesProvider`].

use std::time::Duration;

use async_trait::async_trait;
use domain::models::{Coordinates, PlaceCandidate, PlaceDetails};
use domain::services::{PlacesError, PlacesProvider};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::PlacesConfig;

const DETAIL_FIELDS: &str =
    "name,formatted_address,rating,formatted_phone_number,opening_hours,photos,price_level";
const PHOTO_MAX_WIDTH: u32 = 400;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinates,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    results: Vec<TextSearchResult>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResult {
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    result: Option<DetailsResult>,
}

#[derive(Debug, Default, Deserialize)]
struct DetailsResult {
    name: Option<String>,
    formatted_address: Option<String>,
    rating: Option<f64>,
    formatted_phone_number: Option<String>,
    opening_hours: Option<OpeningHours>,
    #[serde(default)]
    photos: Vec<Photo>,
    price_level: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    weekday_text: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(default)]
    photo_reference: Option<String>,
}

impl From<DetailsResult> for PlaceDetails {
    fn from(d: DetailsResult) -> Self {
        Self {
            name: d.name,
            formatted_address: d.formatted_address,
            rating: d.rating,
            formatted_phone_number: d.formatted_phone_number,
            weekday_text: d.opening_hours.and_then(|h| h.weekday_text),
            photo_reference: d.photos.into_iter().next().and_then(|p| p.photo_reference),
            price_level: d.price_level,
        }
    }
}

/// Geocoding and Places API client.
#[derive(Clone)]
pub struct GooglePlacesClient {
    config: PlacesConfig,
    http_client: Client,
}

impl GooglePlacesClient {
    pub fn new(config: PlacesConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            config,
            http_client,
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let base = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        Url::parse_with_params(
            &base,
            params
                .iter()
                .copied()
                .chain(std::iter::once(("key", self.config.api_key.as_str()))),
        )
        .map_err(|e| PlacesError::Upstream(format!("invalid URL: {}", e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, PlacesError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PlacesError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(status = %status, "Places API request failed");
            return Err(PlacesError::Upstream(format!("places API returned {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| PlacesError::Upstream(e.to_string()))
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn geocode(&self, location: &str) -> Result<Option<Coordinates>, PlacesError> {
        let url = self.endpoint("geocode/json", &[("address", location)])?;
        let body: GeocodeResponse = self.get_json(url).await?;

        if body.status != "OK" {
            tracing::debug!(status = %body.status, location = %location, "Geocoding found nothing");
            return Ok(None);
        }
        Ok(body.results.into_iter().next().map(|r| r.geometry.location))
    }

    async fn text_search(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlacesError> {
        let url = self.endpoint("place/textsearch/json", &[("query", query)])?;
        let body: TextSearchResponse = self.get_json(url).await?;

        Ok(body
            .results
            .into_iter()
            .map(|r| PlaceCandidate {
                place_id: r.place_id,
                location: r.geometry.map(|g| g.location),
            })
            .collect())
    }

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let url = self.endpoint(
            "place/details/json",
            &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
        )?;
        let body: DetailsResponse = self.get_json(url).await?;
        Ok(body.result.unwrap_or_default().into())
    }

    fn photo_url(&self, photo_reference: &str) -> String {
        format!(
            "{}/place/photo?maxwidth={}&photoreference={}&key={}",
            self.config.base_url.trim_end_matches('/'),
            PHOTO_MAX_WIDTH,
            photo_reference,
            self.config.api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GooglePlacesClient {
        GooglePlacesClient::new(PlacesConfig {
            api_key: "k3y".to_string(),
            ..PlacesConfig::default()
        })
    }

    #[test]
    fn test_endpoint_appends_key_and_encodes() {
        let url = client()
            .endpoint("place/textsearch/json", &[("query", "cafe in New York")])
            .unwrap();
        assert_eq!(url.path(), "/maps/api/place/textsearch/json");
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            params,
            vec![
                ("query".to_string(), "cafe in New York".to_string()),
                ("key".to_string(), "k3y".to_string()),
            ]
        );
    }

    #[test]
    fn test_photo_url() {
        assert_eq!(
            client().photo_url("ref-9"),
            "https://maps.googleapis.com/maps/api/place/photo?maxwidth=400&photoreference=ref-9&key=k3y"
        );
    }

    #[test]
    fn test_details_conversion_takes_first_photo() {
        let raw: DetailsResponse = serde_json::from_value(serde_json::json!({
            "result": {
                "name": "Blue Bottle",
                "rating": 4.5,
                "opening_hours": { "weekday_text": ["Monday: 7AM-6PM"] },
                "photos": [{ "photo_reference": "first" }, { "photo_reference": "second" }],
                "price_level": 2
            }
        }))
        .unwrap();

        let details: PlaceDetails = raw.result.unwrap().into();
        assert_eq!(details.name.as_deref(), Some("Blue Bottle"));
        assert_eq!(details.photo_reference.as_deref(), Some("first"));
        assert_eq!(details.weekday_text.map(|w| w.len()), Some(1));
        assert_eq!(details.price_level, Some(2));
        assert!(details.formatted_address.is_none());
    }

    #[test]
    fn test_details_photo_without_reference() {
        let raw: DetailsResponse = serde_json::from_value(serde_json::json!({
            "result": {
                "name": "Cafe",
                "photos": [{ "height": 100, "width": 100 }]
            }
        }))
        .unwrap();

        let details: PlaceDetails = raw.result.unwrap().into();
        assert_eq!(details.name.as_deref(), Some("Cafe"));
        assert!(details.photo_reference.is_none());
    }

    #[test]
    fn test_geocode_zero_results_parses() {
        let raw: GeocodeResponse =
            serde_json::from_value(serde_json::json!({ "status": "ZERO_RESULTS", "results": [] }))
                .unwrap();
        assert_eq!(raw.status, "ZERO_RESULTS");
        assert!(raw.results.is_empty());
    }
}
