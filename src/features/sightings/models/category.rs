use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Category of a reported sighting (current revision).
///
/// The first product revision used `person`, `animal` and `object`. Records
/// written then still carry those tags; they are translated when read
/// and never rewritten in storage. Database rows, JSON bodies and CLI
/// arguments all go through `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    People,
    Animals,
    Places,
    Vehicles,
    Trash,
    Bags,
    Objects,
}

/// Tags of the first revision, kept only for read-side translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyCategory {
    Person,
    Animal,
    Object,
}

impl LegacyCategory {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "person" => Some(Self::Person),
            "animal" => Some(Self::Animal),
            "object" => Some(Self::Object),
            _ => None,
        }
    }
}

impl From<LegacyCategory> for Category {
    fn from(legacy: LegacyCategory) -> Self {
        match legacy {
            LegacyCategory::Person => Category::People,
            LegacyCategory::Animal => Category::Animals,
            LegacyCategory::Object => Category::Objects,
        }
    }
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::People,
        Category::Animals,
        Category::Places,
        Category::Vehicles,
        Category::Trash,
        Category::Bags,
        Category::Objects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::People => "people",
            Category::Animals => "animals",
            Category::Places => "places",
            Category::Vehicles => "vehicles",
            Category::Trash => "trash",
            Category::Bags => "bags",
            Category::Objects => "objects",
        }
    }

    /// Synopsis stored alongside the category
    pub fn auto_label(&self) -> String {
        format!("Auto-detected: {}", self.as_str())
    }

    /// Badge colour used by the list and detail views
    pub fn badge_color(&self) -> &'static str {
        match self {
            Category::People => "red",
            Category::Animals => "yellow",
            Category::Places => "green",
            Category::Vehicles => "orange",
            Category::Trash => "brown",
            Category::Bags => "purple",
            Category::Objects => "blue",
        }
    }

    /// Marker icon used by the map view
    pub fn marker_icon_url(&self) -> String {
        format!(
            "http://maps.google.com/mapfiles/ms/icons/{}-dot.png",
            self.badge_color()
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        if let Some(category) = Category::ALL.iter().find(|c| c.as_str() == tag) {
            return Ok(*category);
        }
        LegacyCategory::from_tag(&tag)
            .map(Category::from)
            .ok_or(UnknownCategory(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}
