//! Object storage for uploaded images
//!
//! `ObjectStorage` is the seam the upload feature writes through. The S3
//! implementation talks to MinIO or any S3-compatible service; the memory
//! implementation keeps objects in-process for development and tests.

mod memory_storage;
mod s3_storage;
mod sigv4;

use async_trait::async_trait;

use crate::core::error::AppError;

pub use memory_storage::{MemoryObjectStorage, StoredObject};
pub use s3_storage::S3ObjectStorage;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `key` and return the URL clients read it from
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, AppError>;
}
