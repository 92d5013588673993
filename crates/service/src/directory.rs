use std::sync::Arc;

use models::{Document, User};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{errors::ServiceError, groups, storage::DocumentStore, users};

/// Request-level entry point over a [`DocumentStore`].
///
/// Each call loads the document fresh. Mutations hold a lock across
/// load → mutate → persist and only persist when the mutation succeeded.
pub struct Directory {
    store: Arc<dyn DocumentStore>,
    write_lock: Mutex<()>,
}

impl Directory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store, write_lock: Mutex::new(()) }
    }

    /// Load the document and run a read-only operation. Nothing is persisted.
    pub async fn read<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&Document) -> Result<R, ServiceError> + Send,
    {
        let doc = self.store.load().await?;
        f(&doc)
    }

    /// Load, mutate and persist the document as one serialized unit.
    pub async fn update<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Document) -> Result<R, ServiceError> + Send,
        R: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.store.load().await?;
        let out = f(&mut doc)?;
        self.store.persist(&doc).await?;
        Ok(out)
    }

    pub async fn get_user(&self, userid: &str) -> Result<User, ServiceError> {
        self.read(|doc| users::get(doc, userid)).await
    }

    pub async fn create_user(&self, body: &Value) -> Result<User, ServiceError> {
        let user = self
            .update(|doc| users::create(doc, body))
            .await
            .inspect_err(|e| debug!(error = %e, "user create rejected"))?;
        info!(userid = %user.userid, groups = ?user.groups, "user created");
        Ok(user)
    }

    pub async fn delete_user(&self, userid: &str) -> Result<(), ServiceError> {
        self.update(|doc| users::delete(doc, userid))
            .await
            .inspect_err(|e| debug!(%userid, error = %e, "user delete rejected"))?;
        info!(%userid, "user deleted");
        Ok(())
    }

    pub async fn replace_user(&self, userid: &str, body: &Value) -> Result<User, ServiceError> {
        let user = self
            .update(|doc| users::replace(doc, userid, body))
            .await
            .inspect_err(|e| debug!(%userid, error = %e, "user replace rejected"))?;
        info!(%userid, new_userid = %user.userid, "user replaced");
        Ok(user)
    }

    pub async fn group_members(&self, name: &str) -> Result<Vec<String>, ServiceError> {
        self.read(|doc| groups::get(doc, name)).await
    }

    pub async fn create_group(&self, name: Option<&str>) -> Result<(), ServiceError> {
        self.update(|doc| groups::create(doc, name))
            .await
            .inspect_err(|e| debug!(group = ?name, error = %e, "group create rejected"))?;
        info!(group = ?name, "group created");
        Ok(())
    }

    pub async fn delete_group(&self, name: &str) -> Result<(), ServiceError> {
        let touched = self
            .update(|doc| groups::delete(doc, name))
            .await
            .inspect_err(|e| debug!(group = %name, error = %e, "group delete rejected"))?;
        info!(group = %name, users_updated = touched, "group deleted");
        Ok(())
    }

    pub async fn replace_membership(&self, name: &str, body: Option<&Value>) -> Result<(), ServiceError> {
        let joined = self
            .update(|doc| groups::replace_membership(doc, name, body))
            .await
            .inspect_err(|e| debug!(group = %name, error = %e, "membership update rejected"))?;
        info!(group = %name, joined = ?joined, "group membership updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDocumentStore;
    use crate::test_support::{seed_document, user_body};
    use serde_json::json;

    fn directory() -> (Arc<MemoryDocumentStore>, Directory) {
        let store = Arc::new(MemoryDocumentStore::new(seed_document()));
        let dir = Directory::new(store.clone());
        (store, dir)
    }

    #[tokio::test]
    async fn reads_do_not_persist() -> Result<(), anyhow::Error> {
        let (store, dir) = directory();
        assert_eq!(dir.get_user("jsmith").await?.last_name, "Smith");
        assert_eq!(dir.group_members("users").await?, vec!["jsmith"]);
        assert_eq!(store.persist_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_does_not_persist() -> Result<(), anyhow::Error> {
        let (store, dir) = directory();
        let err = dir.create_user(&user_body("mcollins", &["users", "moon"])).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(store.persist_count(), 0);
        assert_eq!(store.snapshot().await, seed_document());
        Ok(())
    }

    #[tokio::test]
    async fn membership_then_group_delete() -> Result<(), anyhow::Error> {
        let (store, dir) = directory();
        dir.create_group(Some("moon")).await?;
        dir.replace_membership("moon", Some(&json!(["jsmith"]))).await?;
        assert!(dir.get_user("jsmith").await?.is_member_of("moon"));

        dir.delete_group("admins").await?;
        assert_eq!(dir.get_user("jsmith").await?.groups, vec!["users", "moon"]);
        assert_eq!(store.persist_count(), 3);
        assert!(store.snapshot().await.check_integrity().is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_are_serialized() -> Result<(), anyhow::Error> {
        let (store, dir) = directory();
        let dir = Arc::new(dir);
        let mut tasks = Vec::new();
        for i in 0..16 {
            let dir = dir.clone();
            tasks.push(tokio::spawn(async move {
                dir.create_user(&user_body(&format!("user{i}"), &["users"])).await
            }));
        }
        for t in tasks {
            t.await??;
        }
        let doc = store.snapshot().await;
        assert_eq!(doc.users.len(), 17);
        assert!(doc.check_integrity().is_ok());
        Ok(())
    }
}
