use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Where a sighting's coordinates came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum LocationSource {
    /// GPS tags embedded in the photo
    FromPhoto,
    /// Live device location at capture time
    FromDevice,
    /// Typed by the user (coordinates or a forward-geocoded address)
    Manual,
    #[default]
    Unset,
}

impl LocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSource::FromPhoto => "fromPhoto",
            LocationSource::FromDevice => "fromDevice",
            LocationSource::Manual => "manual",
            LocationSource::Unset => "unset",
        }
    }

    /// Only sensor-derived coordinates count as verified
    pub fn is_verified(&self) -> bool {
        matches!(self, LocationSource::FromPhoto | LocationSource::FromDevice)
    }
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fromPhoto" => Ok(LocationSource::FromPhoto),
            "fromDevice" => Ok(LocationSource::FromDevice),
            "manual" => Ok(LocationSource::Manual),
            "unset" => Ok(LocationSource::Unset),
            other => Err(format!("unknown location source '{}'", other)),
        }
    }
}
