use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{generate_id, Document, DocumentStore, Fields, Filter, StoreError};

type Collection = BTreeMap<String, Fields>;

/// In-process document store backed by nested maps
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document {
                id: id.to_string(),
                fields: fields.clone(),
            }))
    }

    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|(_, fields)| filter.matches(fields))
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect())
    }

    async fn put(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Fields,
    ) -> Result<String, StoreError> {
        let id = id.map(String::from).unwrap_or_else(generate_id);
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        existing.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn append_to_array_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        entry: Value,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        append_entry(existing, field, entry)
    }

    async fn update_and_append(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        field: &str,
        entry: Value,
    ) -> Result<(), StoreError> {
        // Single write lock so readers never observe half of the write
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        existing.extend(fields);
        append_entry(existing, field, entry)
    }
}

fn append_entry(fields: &mut Fields, field: &str, entry: Value) -> Result<(), StoreError> {
    let slot = fields
        .entry(field.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    }

    match slot {
        Value::Array(items) => {
            items.push(entry);
            Ok(())
        }
        _ => Err(StoreError::InvalidDocument(format!(
            "field '{}' is not an array",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_put_generates_id_and_get_returns_document() {
        let store = MemoryDocumentStore::new();
        let id = store
            .put("reports", None, fields(json!({"title": "Broken pipe"})))
            .await
            .unwrap();

        assert!(!id.is_empty());
        let doc = store.get("reports", &id).await.unwrap().unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.fields.get("title"), Some(&json!("Broken pipe")));
    }

    #[tokio::test]
    async fn test_put_with_id_overwrites() {
        let store = MemoryDocumentStore::new();
        store
            .put("users", Some("+15550001"), fields(json!({"name": "A", "role": "citizen"})))
            .await
            .unwrap();
        store
            .put("users", Some("+15550001"), fields(json!({"name": "B"})))
            .await
            .unwrap();

        let doc = store.get("users", "+15550001").await.unwrap().unwrap();
        assert_eq!(doc.fields.get("name"), Some(&json!("B")));
        assert!(doc.fields.get("role").is_none());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryDocumentStore::new();
        let id = store
            .put("reports", None, fields(json!({"title": "Old", "status": "pending"})))
            .await
            .unwrap();

        store
            .update("reports", &id, fields(json!({"title": "New"})))
            .await
            .unwrap();

        let doc = store.get("reports", &id).await.unwrap().unwrap();
        assert_eq!(doc.fields.get("title"), Some(&json!("New")));
        assert_eq!(doc.fields.get("status"), Some(&json!("pending")));
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let store = MemoryDocumentStore::new();
        let result = store.update("reports", "missing", Fields::new()).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryDocumentStore::new();
        let id = store.put("reports", None, Fields::new()).await.unwrap();

        store.delete("reports", &id).await.unwrap();
        store.delete("reports", &id).await.unwrap();
        assert!(store.get("reports", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_creates_and_extends_array() {
        let store = MemoryDocumentStore::new();
        let id = store.put("reports", None, Fields::new()).await.unwrap();

        store
            .append_to_array_field("reports", &id, "timeline", json!({"note": "one"}))
            .await
            .unwrap();
        store
            .append_to_array_field("reports", &id, "timeline", json!({"note": "two"}))
            .await
            .unwrap();

        let doc = store.get("reports", &id).await.unwrap().unwrap();
        assert_eq!(
            doc.fields.get("timeline"),
            Some(&json!([{"note": "one"}, {"note": "two"}]))
        );
    }

    #[tokio::test]
    async fn test_append_to_non_array_fails() {
        let store = MemoryDocumentStore::new();
        let id = store
            .put("reports", None, fields(json!({"timeline": "oops"})))
            .await
            .unwrap();

        let result = store
            .append_to_array_field("reports", &id, "timeline", json!({}))
            .await;
        assert!(matches!(result, Err(StoreError::InvalidDocument(_))));
    }

    #[tokio::test]
    async fn test_query_filters_by_equality() {
        let store = MemoryDocumentStore::new();
        store
            .put("notifications", None, fields(json!({"userId": "u1", "read": false})))
            .await
            .unwrap();
        store
            .put("notifications", None, fields(json!({"userId": "u1", "read": true})))
            .await
            .unwrap();
        store
            .put("notifications", None, fields(json!({"userId": "u2", "read": false})))
            .await
            .unwrap();

        let unread = store
            .query(
                "notifications",
                &Filter::new().eq("userId", "u1").eq("read", false),
            )
            .await
            .unwrap();
        assert_eq!(unread.len(), 1);

        let none = store
            .query("departments", &Filter::new())
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_append_applies_both() {
        let store = MemoryDocumentStore::new();
        let id = store
            .put("reports", None, fields(json!({"status": "pending", "timeline": []})))
            .await
            .unwrap();

        store
            .update_and_append(
                "reports",
                &id,
                fields(json!({"status": "assigned"})),
                "timeline",
                json!({"status": "assigned"}),
            )
            .await
            .unwrap();

        let doc = store.get("reports", &id).await.unwrap().unwrap();
        assert_eq!(doc.fields.get("status"), Some(&json!("assigned")));
        assert_eq!(doc.fields.get("timeline"), Some(&json!([{"status": "assigned"}])));
    }
}
