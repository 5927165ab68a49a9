use std::env;
use std::time::Duration;

/// Settings for the reporting client and its map/geocoding provider
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the GaiGi API
    pub api_url: String,
    pub maps_api_key: String,
    pub geocode_endpoint: String,
    pub maps_language: String,
    pub http_timeout: Duration,
    pub geocode_timeout: Duration,
    pub device_location_timeout: Duration,
}

fn secs(name: &str, default: u64) -> Result<Duration, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| format!("{} must be a whole number of seconds", name)),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

impl ClientConfig {
    pub const DEFAULT_API_URL: &'static str = "http://127.0.0.1:3000";
    pub const DEFAULT_GEOCODE_ENDPOINT: &'static str =
        "https://maps.googleapis.com/maps/api/geocode/json";

    pub fn from_env() -> Result<Self, String> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        let maps_api_key = env::var("MAPS_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| "MAPS_API_KEY environment variable is required".to_string())?;

        Ok(Self {
            api_url: env::var("GAIGI_API_URL")
                .unwrap_or_else(|_| Self::DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            maps_api_key,
            geocode_endpoint: env::var("MAPS_GEOCODE_ENDPOINT")
                .unwrap_or_else(|_| Self::DEFAULT_GEOCODE_ENDPOINT.to_string()),
            maps_language: env::var("MAPS_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            http_timeout: secs("HTTP_TIMEOUT_SECS", 30)?,
            geocode_timeout: secs("GEOCODE_TIMEOUT_SECS", 10)?,
            device_location_timeout: secs("DEVICE_LOCATION_TIMEOUT_SECS", 10)?,
        })
    }
}
