//! Tracks document bytes written during one submission and removes them
//! unless the submission commits.

use futures::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, warn};

use crate::modules::storage::DocumentStorage;

/// Shared list of written paths, cloned into each in-flight write
#[derive(Clone, Default)]
pub struct UploadTracker {
    paths: Arc<Mutex<Vec<String>>>,
}

impl UploadTracker {
    /// Record a path as soon as its bytes are in storage
    pub fn track(&self, path: String) {
        self.lock().push(path);
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        // A panicked writer cannot leave the list half-updated
        self.paths.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Scoped set of storage paths written by the current request
///
/// Call [`UploadGuard::commit`] once the candidate is persisted, or
/// [`UploadGuard::release`] on failure. A guard dropped without either
/// (for example when the request future is cancelled mid-write) schedules
/// the deletion of every path tracked so far on the running Tokio runtime.
pub struct UploadGuard {
    storage: Arc<dyn DocumentStorage>,
    tracker: UploadTracker,
    settled: bool,
}

impl UploadGuard {
    pub fn new(storage: Arc<dyn DocumentStorage>) -> Self {
        Self {
            storage,
            tracker: UploadTracker::default(),
            settled: false,
        }
    }

    /// Handle for writes running concurrently with this guard
    pub fn tracker(&self) -> UploadTracker {
        self.tracker.clone()
    }

    pub fn track(&self, path: String) {
        self.tracker.track(path);
    }

    pub fn tracked_count(&self) -> usize {
        self.tracker.count()
    }

    /// Keep every tracked file
    pub fn commit(mut self) {
        self.settled = true;
        debug!("Committed {} uploaded document(s)", self.tracker.count());
    }

    /// Delete every tracked file, returning how many deletions failed
    pub async fn release(mut self) -> usize {
        self.settled = true;
        let paths = self.tracker.take();
        delete_all(Arc::clone(&self.storage), paths).await
    }
}

impl Drop for UploadGuard {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let paths = self.tracker.take();
        if paths.is_empty() {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let storage = Arc::clone(&self.storage);
                handle.spawn(async move {
                    delete_all(storage, paths).await;
                });
            }
            Err(_) => warn!(
                "Upload guard dropped outside a runtime; {} file(s) left in storage: {:?}",
                paths.len(),
                paths
            ),
        }
    }
}

/// Best-effort deletion; failures are logged and counted, never returned
async fn delete_all(storage: Arc<dyn DocumentStorage>, paths: Vec<String>) -> usize {
    if paths.is_empty() {
        return 0;
    }

    let results = join_all(paths.iter().map(|path| storage.delete(path))).await;

    let mut failures = 0;
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(()) => debug!("Removed uploaded file '{}'", path),
            Err(e) => {
                failures += 1;
                error!("Failed to delete file {}: {}", path, e);
            }
        }
    }

    failures
}
