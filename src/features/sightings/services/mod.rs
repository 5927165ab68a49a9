mod memory_sighting_store;
mod pg_sighting_store;
mod sighting_service;
mod sighting_store;

pub use memory_sighting_store::MemorySightingStore;
pub use pg_sighting_store::PgSightingStore;
pub use sighting_service::SightingService;
pub use sighting_store::SightingStore;
