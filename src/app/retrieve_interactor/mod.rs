// Retrieve interactor - Serves previously produced documents by name

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::errors::ProcessError;
use crate::domain::rules::DOCUMENT_SUFFIX;
use crate::ports::{StoragePort, StoredFile};

/// Interactor for the file retrieval use case
pub struct RetrieveInteractor {
    storage: Arc<dyn StoragePort>,
}

impl RetrieveInteractor {
    pub fn new(storage: Arc<dyn StoragePort>) -> Self {
        Self { storage }
    }

    /// Fetch a finished document, `ProcessError::NotFound` when it is
    /// absent or the name is not a document name. Cookie bundles and
    /// in-flight media share the directory and are never served.
    pub async fn retrieve(&self, name: &str) -> Result<StoredFile, ProcessError> {
        if !name.ends_with(DOCUMENT_SUFFIX) {
            warn!(name, "Refusing to serve non-document file");
            return Err(ProcessError::NotFound(name.to_string()));
        }

        match self.storage.open(name).await {
            Ok(file) => {
                debug!(name, size = file.bytes.len(), "Serving stored file");
                Ok(file)
            }
            Err(e) => {
                warn!(name, "Retrieval failed: {}", e);
                Err(e)
            }
        }
    }
}
