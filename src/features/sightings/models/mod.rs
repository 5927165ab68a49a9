mod category;
mod location_source;
mod sighting;

pub use category::{Category, LegacyCategory, UnknownCategory};
pub use location_source::LocationSource;
pub use sighting::{NewSighting, Sighting, SightingPatch, SightingRow};
