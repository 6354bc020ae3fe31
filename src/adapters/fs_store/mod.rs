// Filesystem store adapter - Flat, name-addressed output directory

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::errors::ProcessError;
use crate::domain::model::RequestContext;
use crate::domain::rules::{is_safe_filename, DOCUMENT_SUFFIX};
use crate::ports::{StoragePort, StoredFile};

/// Output directory on the local filesystem
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open the store, creating the directory if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ProcessError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            ProcessError::Storage(format!("Failed to create directory {}: {}", root.display(), e))
        })?;
        Ok(Self { root })
    }
}

#[async_trait]
impl StoragePort for FsStore {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn put(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, ProcessError> {
        if !is_safe_filename(name) {
            return Err(ProcessError::InvalidRequest(format!("Invalid file name: {}", name)));
        }
        let path = self.path_for(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ProcessError::Storage(format!("Failed to write {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), size = bytes.len(), "Stored file");
        Ok(path)
    }

    async fn open(&self, name: &str) -> Result<StoredFile, ProcessError> {
        if !is_safe_filename(name) {
            return Err(ProcessError::NotFound(name.to_string()));
        }
        let path = self.path_for(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(StoredFile {
                name: name.to_string(),
                bytes,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ProcessError::NotFound(name.to_string())),
            Err(e) => Err(ProcessError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn discard(&self, path: &Path) {
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "Removed file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), "Could not remove file: {}", e),
        }
    }

    fn discard_namespace(&self, context: &RequestContext) {
        let prefix = context.namespaced("");
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(root = %self.root.display(), "Could not list output directory: {}", e);
                return;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(&prefix) && !name.ends_with(DOCUMENT_SUFFIX) {
                self.discard(&entry.path());
            }
        }
    }
}
