mod firestore;
mod memory;

use anyhow::{Result, anyhow};
use std::future::Future;
use types::UserSession;
use types::document::{Document, FieldValue, Fields};

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// Schemaless storage of documents grouped into named collections.
///
/// Ids are assigned by the store on `create`. `update` merges the given
/// fields into an existing document and fails if it does not exist.
pub trait DocumentStore {
    fn list_all(&self, collection: &str) -> impl Future<Output = Result<Vec<Document>>> + Send;

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> impl Future<Output = Result<Vec<Document>>> + Send;

    fn get_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Document>>> + Send;

    fn create(
        &self,
        collection: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<String>> + Send;

    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<()>> + Send;

    fn delete(&self, collection: &str, id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// The store selected by configuration.
#[derive(Clone)]
pub enum Store {
    Firestore(FirestoreStore),
    Memory(MemoryStore),
    /// Configuration is missing; every call fails with a readable message.
    Unavailable,
}

impl Store {
    /// A handle that issues requests on behalf of the session's user.
    pub fn authorized(&self, session: &UserSession) -> Store {
        match self {
            Store::Firestore(store) => Store::Firestore(store.with_token(session.id_token.clone())),
            other => other.clone(),
        }
    }
}

fn unavailable() -> anyhow::Error {
    anyhow!(types::BACKEND_UNAVAILABLE)
}

impl DocumentStore for Store {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>> {
        match self {
            Store::Firestore(store) => store.list_all(collection).await,
            Store::Memory(store) => store.list_all(collection).await,
            Store::Unavailable => Err(unavailable()),
        }
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Vec<Document>> {
        match self {
            Store::Firestore(store) => store.query_by_field(collection, field, value).await,
            Store::Memory(store) => store.query_by_field(collection, field, value).await,
            Store::Unavailable => Err(unavailable()),
        }
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        match self {
            Store::Firestore(store) => store.get_by_id(collection, id).await,
            Store::Memory(store) => store.get_by_id(collection, id).await,
            Store::Unavailable => Err(unavailable()),
        }
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<String> {
        match self {
            Store::Firestore(store) => store.create(collection, fields).await,
            Store::Memory(store) => store.create(collection, fields).await,
            Store::Unavailable => Err(unavailable()),
        }
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        match self {
            Store::Firestore(store) => store.update(collection, id, fields).await,
            Store::Memory(store) => store.update(collection, id, fields).await,
            Store::Unavailable => Err(unavailable()),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        match self {
            Store::Firestore(store) => store.delete(collection, id).await,
            Store::Memory(store) => store.delete(collection, id).await,
            Store::Unavailable => Err(unavailable()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_store_reports_configuration() {
        let err = Store::Unavailable.list_all("users").await.unwrap_err();
        assert_eq!(err.to_string(), types::BACKEND_UNAVAILABLE);

        let err = Store::Unavailable.delete("users", "u1").await.unwrap_err();
        assert!(types::Error::from(err).is_backend_unavailable());
    }
}
