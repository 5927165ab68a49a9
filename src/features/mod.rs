pub mod analysis;
pub mod notifications;
pub mod sightings;
pub mod system;
pub mod uploads;
