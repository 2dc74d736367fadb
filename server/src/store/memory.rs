use anyhow::{Result, bail};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use types::document::{Document, FieldValue, Fields};
use uuid::Uuid;

use super::DocumentStore;

/// In-process store used for local development and tests. Documents keep
/// their insertion order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .into_iter()
            .flatten()
            .filter(|doc| doc.get(field) == Some(value))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<String> {
        let id = Uuid::now_v7().simple().to_string();

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), fields));

        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
        else {
            bail!("document {collection}/{id} does not exist");
        };

        doc.fields.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.retain(|doc| doc.id != id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> Fields {
        Fields::from([("email".to_string(), FieldValue::from(email))])
    }

    #[tokio::test]
    async fn test_create_then_list_keeps_order() {
        let store = MemoryStore::new();
        let first = store.create("users", user("a@example.com")).await.unwrap();
        let second = store.create("users", user("b@example.com")).await.unwrap();
        assert_ne!(first, second);

        let ids: Vec<_> = store
            .list_all("users")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![first, second]);
        assert!(store.list_all("roles").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_matches_exact_value() {
        let store = MemoryStore::new();
        store.create("users", user("a@example.com")).await.unwrap();
        store.create("users", user("b@example.com")).await.unwrap();

        let found = store
            .query_by_field("users", "email", &FieldValue::from("b@example.com"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_str("email"), Some("b@example.com"));

        let none = store
            .query_by_field("users", "email", &FieldValue::from("B@example.com"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        let id = store.create("users", user("a@example.com")).await.unwrap();

        store
            .update(
                "users",
                &id,
                Fields::from([("displayName".to_string(), FieldValue::from("Ana"))]),
            )
            .await
            .unwrap();

        let doc = store.get_by_id("users", &id).await.unwrap().unwrap();
        assert_eq!(doc.get_str("email"), Some("a@example.com"));
        assert_eq!(doc.get_str("displayName"), Some("Ana"));
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = MemoryStore::new();
        assert!(store.update("users", "nope", Fields::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_removes_document() {
        let store = MemoryStore::new();
        let id = store.create("users", user("a@example.com")).await.unwrap();
        store.delete("users", &id).await.unwrap();
        assert_eq!(store.get_by_id("users", &id).await.unwrap(), None);
        // deleting again is not an error
        store.delete("users", &id).await.unwrap();
    }
}
