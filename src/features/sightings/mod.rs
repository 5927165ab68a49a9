//! Report records: the store seam, its Postgres and in-memory backends, and
//! the public `/sightings` endpoints.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{MemorySightingStore, PgSightingStore, SightingService, SightingStore};
