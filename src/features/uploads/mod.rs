//! `POST /upload`: stores the original image and a derived thumbnail.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::UploadService;
