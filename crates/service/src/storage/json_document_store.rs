use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use models::Document;
use tokio::fs;
use tracing::{debug, warn};

use super::DocumentStore;
use crate::errors::ServiceError;

/// JSON file-backed document store.
///
/// Every `load` re-reads the file; every `persist` rewrites it through a
/// temporary sibling and a rename, so readers never observe a partial write.
#[derive(Clone, Debug)]
pub struct JsonDocumentStore {
    file_path: PathBuf,
}

impl JsonDocumentStore {
    /// Initialize the store from a path. Creates the file with an empty document if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }

        let store = Self { file_path };
        if fs::metadata(&store.file_path).await.is_err() {
            store.write(&Document::default()).await?;
        }
        Ok(Arc::new(store))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("document"));
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }

    async fn write(&self, doc: &Document) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(doc).map_err(ServiceError::storage)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, data).await.map_err(ServiceError::storage)?;
        fs::rename(&tmp, &self.file_path).await.map_err(ServiceError::storage)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonDocumentStore {
    async fn load(&self) -> Result<Document, ServiceError> {
        let bytes = fs::read(&self.file_path).await.map_err(ServiceError::storage)?;
        let doc: Document = serde_json::from_slice(&bytes).map_err(ServiceError::storage)?;
        if let Err(e) = doc.check_integrity() {
            warn!(path = %self.file_path.display(), error = %e, "document on disk violates integrity");
        }
        Ok(doc)
    }

    async fn persist(&self, doc: &Document) -> Result<(), ServiceError> {
        self.write(doc).await?;
        debug!(
            path = %self.file_path.display(),
            users = doc.users.len(),
            groups = doc.groups.len(),
            "document persisted"
        );
        Ok(())
    }
}
