mod thumbnail;
mod upload_service;

pub use thumbnail::{fit_within, make_thumbnail, Thumbnail};
pub use upload_service::{UploadKeys, UploadService};
