use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use models::Document;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::errors::ServiceError;

/// In-memory document store. Counts persists so callers can tell whether a
/// request wrote anything.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    doc: RwLock<Document>,
    persists: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new(doc: Document) -> Self {
        Self { doc: RwLock::new(doc), persists: AtomicUsize::new(0) }
    }

    pub async fn snapshot(&self) -> Document {
        self.doc.read().await.clone()
    }

    pub fn persist_count(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn load(&self) -> Result<Document, ServiceError> {
        Ok(self.doc.read().await.clone())
    }

    async fn persist(&self, doc: &Document) -> Result<(), ServiceError> {
        *self.doc.write().await = doc.clone();
        self.persists.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
