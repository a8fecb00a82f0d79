//! Local filesystem storage backend
//!
//! Documents are written below a single upload directory. The directory is
//! created once during start-up through [`LocalStorage::ensure_upload_dir`].

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use super::DocumentStorage;
use crate::core::error::AppError;

/// Stores documents as plain files below `root`
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_upload_dir(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create upload directory '{}': {}",
                self.root.display(),
                e
            ))
        })?;

        info!("Upload directory ready: {}", self.root.display());
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative key to a path below the root, rejecting traversal
    fn resolve_key(&self, key: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_plain {
            return Err(AppError::Storage(format!("Invalid storage key '{}'", key)));
        }

        Ok(self.root.join(relative))
    }

    /// Accept only paths that were handed out by this backend
    fn owned_path(&self, path: &str) -> Result<PathBuf, AppError> {
        let candidate = PathBuf::from(path);
        let escapes = candidate
            .components()
            .any(|c| matches!(c, Component::ParentDir));

        if escapes || !candidate.starts_with(&self.root) {
            return Err(AppError::Storage(format!(
                "Path '{}' is outside the upload directory",
                path
            )));
        }

        Ok(candidate)
    }
}

#[async_trait]
impl DocumentStorage for LocalStorage {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<String, AppError> {
        let path = self.resolve_key(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        tokio::fs::write(&path, &data).await.map_err(|e| {
            AppError::Storage(format!("Failed to write file '{}': {}", path.display(), e))
        })?;

        debug!("Wrote {} bytes to '{}'", data.len(), path.display());
        Ok(path.to_string_lossy().into_owned())
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        let path = self.owned_path(path)?;

        tokio::fs::remove_file(&path).await.map_err(|e| {
            AppError::Storage(format!("Failed to delete file '{}': {}", path.display(), e))
        })?;

        debug!("Deleted file '{}'", path.display());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_storage() -> LocalStorage {
        LocalStorage::new(std::env::temp_dir().join(format!("uploads-test-{}", Uuid::new_v4())))
    }

    #[tokio::test]
    async fn test_put_then_delete() {
        let storage = temp_storage();
        storage.ensure_upload_dir().await.unwrap();

        let path = storage
            .put("documents/passport.pdf", b"%PDF-1.4".to_vec(), "application/pdf")
            .await
            .unwrap();

        assert!(path.starts_with(storage.root().to_string_lossy().as_ref()));
        assert!(tokio::fs::try_exists(&path).await.unwrap());
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.4");

        storage.delete(&path).await.unwrap();
        assert!(!tokio::fs::try_exists(&path).await.unwrap());

        tokio::fs::remove_dir_all(storage.root()).await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_upload_dir_is_idempotent() {
        let storage = temp_storage();
        storage.ensure_upload_dir().await.unwrap();
        storage.ensure_upload_dir().await.unwrap();
        assert!(storage.root().is_dir());

        tokio::fs::remove_dir_all(storage.root()).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_traversal_keys() {
        let storage = temp_storage();

        assert!(storage
            .put("../escape.pdf", vec![1], "application/pdf")
            .await
            .is_err());
        assert!(storage
            .put("/etc/passwd", vec![1], "application/pdf")
            .await
            .is_err());
        assert!(storage.put("", vec![1], "application/pdf").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_refuses_foreign_paths() {
        let storage = temp_storage();
        assert!(storage.delete("/tmp/some-other-file").await.is_err());

        let sneaky = format!("{}/../outside.pdf", storage.root().display());
        assert!(storage.delete(&sneaky).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_file_errors() {
        let storage = temp_storage();
        storage.ensure_upload_dir().await.unwrap();

        let missing = storage.root().join("missing.pdf");
        assert!(storage.delete(&missing.to_string_lossy()).await.is_err());

        tokio::fs::remove_dir_all(storage.root()).await.unwrap();
    }
}
