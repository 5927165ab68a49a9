use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::sightings::handlers;
use crate::features::sightings::services::SightingService;

/// Create routes for the sightings feature (public, no auth)
pub fn routes(service: Arc<SightingService>) -> Router {
    Router::new()
        .route(
            "/sightings",
            get(handlers::list_sightings).post(handlers::create_sighting),
        )
        .route("/sightings/{id}", get(handlers::get_sighting))
        .with_state(service)
}
