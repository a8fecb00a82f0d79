//! Storage module for uploaded documents
//!
//! Provides the `DocumentStorage` seam plus two backends: a local upload
//! directory and a MinIO/S3-compatible bucket.

mod local_storage;
mod minio_client;

pub use local_storage::LocalStorage;
pub use minio_client::MinIOClient;

use async_trait::async_trait;

use crate::core::error::AppError;

/// Write-once storage for document bytes with delete-by-reference
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Store `data` under `key` and return the storage path to record on the document
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, AppError>;

    /// Delete the object previously returned by [`DocumentStorage::put`]
    async fn delete(&self, path: &str) -> Result<(), AppError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
