use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::config::ClientConfig;
use crate::client::error::GeocodeError;
use crate::client::geolocation::Coordinates;
use crate::shared::constants::COORDINATE_FALLBACK_PRECISION;

/// Geocoding JSON response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub status: String,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    pub formatted_address: Option<String>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Mapping provider behind the address resolver
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    async fn reverse(&self, at: Coordinates) -> Result<Vec<GeocodeResult>, GeocodeError>;

    async fn forward(&self, address: &str) -> Result<Vec<GeocodeResult>, GeocodeError>;
}

/// Google Maps geocoding over its JSON API
pub struct GoogleGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
    language: String,
}

impl GoogleGeocoder {
    pub fn new(config: &ClientConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder().timeout(config.geocode_timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.geocode_endpoint.clone(),
            api_key: config.maps_api_key.clone(),
            language: config.maps_language.clone(),
        })
    }

    async fn execute_request(
        &self,
        params: &[(&str, String)],
    ) -> Result<Vec<GeocodeResult>, GeocodeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(params)
            .query(&[("key", &self.api_key), ("language", &self.language)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Provider(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: GeocodeResponse = response.json().await?;
        match body.status.as_str() {
            "OK" => Ok(body.results),
            "ZERO_RESULTS" => Ok(Vec::new()),
            other => Err(GeocodeError::Provider(format!(
                "{}{}",
                other,
                body.error_message
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            ))),
        }
    }
}

#[async_trait]
impl GeocodingProvider for GoogleGeocoder {
    async fn reverse(&self, at: Coordinates) -> Result<Vec<GeocodeResult>, GeocodeError> {
        self.execute_request(&[("latlng", format!("{},{}", at.latitude, at.longitude))])
            .await
    }

    async fn forward(&self, address: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
        self.execute_request(&[("address", address.to_string())])
            .await
    }
}

/// `"<lat>, <lng>"` at the fallback precision
pub fn format_coordinates(at: Coordinates) -> String {
    format!(
        "{:.prec$}, {:.prec$}",
        at.latitude,
        at.longitude,
        prec = COORDINATE_FALLBACK_PRECISION
    )
}

/// Address component types, most specific level first
const ADDRESS_LEVELS: &[&[&str]] = &[
    &["route", "street_address", "premise"],
    &["neighborhood", "sublocality_level_2", "sublocality_level_1"],
    &["locality", "administrative_area_level_2"],
    &["administrative_area_level_1"],
];

/// Join the two most specific address levels present in `result`
///
/// Within a level the first listed type wins.
pub fn compose_address(result: &GeocodeResult) -> Option<String> {
    let parts: Vec<&str> = ADDRESS_LEVELS
        .iter()
        .filter_map(|types| {
            types.iter().find_map(|wanted| {
                result
                    .address_components
                    .iter()
                    .find(|c| c.types.iter().any(|t| t == wanted))
                    .map(|c| c.long_name.as_str())
                    .filter(|name| !name.trim().is_empty())
            })
        })
        .take(2)
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Coordinates to display text and back
pub struct AddressResolver {
    provider: Arc<dyn GeocodingProvider>,
    timeout: Duration,
}

impl AddressResolver {
    pub fn new(provider: Arc<dyn GeocodingProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Human-readable address; falls back to the formatted coordinates
    pub async fn reverse_geocode(&self, at: Coordinates) -> String {
        let results = match tokio::time::timeout(self.timeout, self.provider.reverse(at)).await {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => {
                warn!("Reverse geocoding failed: {}", e);
                Vec::new()
            }
            Err(_) => {
                warn!("Reverse geocoding timed out");
                Vec::new()
            }
        };

        results
            .first()
            .and_then(compose_address)
            .unwrap_or_else(|| format_coordinates(at))
    }

    /// First match for `address`, or `None` when nothing matches or the provider fails
    pub async fn forward_geocode(&self, address: &str) -> Option<Coordinates> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        let results = match tokio::time::timeout(self.timeout, self.provider.forward(address)).await
        {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => {
                warn!("Forward geocoding failed for '{}': {}", address, e);
                return None;
            }
            Err(_) => {
                warn!("Forward geocoding timed out for '{}'", address);
                return None;
            }
        };

        let found = results
            .into_iter()
            .find_map(|r| r.geometry)
            .map(|g| Coordinates::new(g.location.lat, g.location.lng))
            .filter(Coordinates::is_valid);
        debug!("Forward geocoded '{}' to {:?}", address, found);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn component(name: &str, types: &[&str]) -> AddressComponent {
        AddressComponent {
            long_name: name.to_string(),
            short_name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn result(components: Vec<AddressComponent>) -> GeocodeResult {
        GeocodeResult {
            address_components: components,
            ..Default::default()
        }
    }

    /// Provider with canned answers
    struct CannedProvider {
        reverse: Result<Vec<GeocodeResult>, String>,
        forward: Result<Vec<GeocodeResult>, String>,
    }

    #[async_trait]
    impl GeocodingProvider for CannedProvider {
        async fn reverse(&self, _at: Coordinates) -> Result<Vec<GeocodeResult>, GeocodeError> {
            self.reverse.clone().map_err(GeocodeError::Provider)
        }

        async fn forward(&self, _address: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
            self.forward.clone().map_err(GeocodeError::Provider)
        }
    }

    fn resolver(
        reverse: Result<Vec<GeocodeResult>, String>,
        forward: Result<Vec<GeocodeResult>, String>,
    ) -> AddressResolver {
        AddressResolver::new(
            Arc::new(CannedProvider { reverse, forward }),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_compose_street_and_neighborhood() {
        let r = result(vec![
            component("1-chōme", &["sublocality_level_2", "sublocality", "political"]),
            component("Shibuya", &["locality", "political"]),
            component("Center Gai", &["route"]),
            component("Tokyo", &["administrative_area_level_1", "political"]),
        ]);
        assert_eq!(compose_address(&r).as_deref(), Some("Center Gai, 1-chōme"));
    }

    #[test]
    fn test_compose_skips_missing_levels() {
        let r = result(vec![
            component("Kanagawa", &["administrative_area_level_1"]),
            component("Yokohama", &["locality"]),
        ]);
        assert_eq!(compose_address(&r).as_deref(), Some("Yokohama, Kanagawa"));

        let county_only = result(vec![component("Marin County", &["administrative_area_level_2"])]);
        assert_eq!(compose_address(&county_only).as_deref(), Some("Marin County"));

        assert_eq!(compose_address(&result(vec![])), None);
    }

    #[test]
    fn test_format_coordinates_fixed_precision() {
        assert_eq!(
            format_coordinates(Coordinates::new(35.0, 139.123456)),
            "35.0000, 139.1235"
        );
    }

    #[test]
    fn test_geocode_response_parses_provider_json() {
        let body: GeocodeResponse = serde_json::from_value(json!({
            "results": [{
                "address_components": [
                    { "long_name": "Market Street", "short_name": "Market St", "types": ["route"] }
                ],
                "formatted_address": "Market St, San Francisco, CA, USA",
                "geometry": { "location": { "lat": 37.79, "lng": -122.40 }, "location_type": "GEOMETRIC_CENTER" },
                "place_id": "abc"
            }],
            "status": "OK"
        }))
        .unwrap();

        assert_eq!(body.results.len(), 1);
        assert_eq!(compose_address(&body.results[0]).as_deref(), Some("Market Street"));
    }

    #[tokio::test]
    async fn test_reverse_geocode_never_fails() {
        let at = Coordinates::new(35.0, 139.0);
        let failing = resolver(Err("REQUEST_DENIED".to_string()), Ok(vec![]));
        assert_eq!(failing.reverse_geocode(at).await, "35.0000, 139.0000");

        let empty = resolver(Ok(vec![]), Ok(vec![]));
        assert_eq!(empty.reverse_geocode(at).await, "35.0000, 139.0000");

        let found = resolver(
            Ok(vec![result(vec![component("Ginza", &["neighborhood"])])]),
            Ok(vec![]),
        );
        assert_eq!(found.reverse_geocode(at).await, "Ginza");
    }

    #[tokio::test]
    async fn test_forward_geocode_first_result_or_none() {
        let hit = GeocodeResult {
            geometry: Some(Geometry {
                location: LatLng {
                    lat: 35.6586,
                    lng: 139.7454,
                },
            }),
            ..Default::default()
        };
        let found = resolver(Ok(vec![]), Ok(vec![hit]));
        assert_eq!(
            found.forward_geocode("Tokyo Tower").await,
            Some(Coordinates::new(35.6586, 139.7454))
        );

        let none = resolver(Ok(vec![]), Ok(vec![]));
        assert_eq!(none.forward_geocode("Nowhere Lane").await, None);

        let failing = resolver(Ok(vec![]), Err("OVER_QUERY_LIMIT".to_string()));
        assert_eq!(failing.forward_geocode("Tokyo Tower").await, None);
        assert_eq!(found.forward_geocode("   ").await, None);
    }
}
