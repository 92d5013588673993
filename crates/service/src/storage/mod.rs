//! Storage abstractions for service layer
//!
//! The whole directory is one `Document`; a store only knows how to load it
//! and how to write it back in one piece.

pub mod json_document_store;
pub mod memory_store;

use async_trait::async_trait;
use models::Document;

use crate::errors::ServiceError;

pub use json_document_store::JsonDocumentStore;
pub use memory_store::MemoryDocumentStore;

/// Trait abstraction for the document store.
/// Implementations can be file-backed or in-memory.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self) -> Result<Document, ServiceError>;
    async fn persist(&self, doc: &Document) -> Result<(), ServiceError>;
}
