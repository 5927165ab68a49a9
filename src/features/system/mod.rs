//! `/health` and `/version`

pub mod handlers;
pub mod routes;
