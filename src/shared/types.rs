use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every endpoint on failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Build information served by `GET /version`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub version: String,
    pub hash: String,
    pub build_date: Option<String>,
}

impl VersionResponse {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
            build_date: option_env!("BUILD_DATE").map(str::to_string),
        }
    }

    /// `<version>-<short hash>`, e.g. `1.0.1-b187ea9`
    pub fn full_version(&self) -> String {
        let short: String = self.hash.chars().take(7).collect();
        format!("{}-{}", self.version, short)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_version_uses_short_hash() {
        let v = VersionResponse {
            version: "1.0.1".to_string(),
            hash: "b187ea989299d3d8a53ae389a4fb6e9fd18ff8b6".to_string(),
            build_date: None,
        };
        assert_eq!(v.full_version(), "1.0.1-b187ea9");
    }

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_value(ErrorResponse::new("Missing required fields")).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Missing required fields" }));
    }
}
