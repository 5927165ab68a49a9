//! `POST /analyze-image`: label detection mapped to a suggested category.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{AnalysisService, GoogleVisionDetector, LabelDetector};
