//! Document store module
//!
//! Abstract collection/document storage used by every feature service.
//! Documents are flat JSON objects addressed by `(collection, id)`.

mod memory_store;
mod postgres_store;

pub use memory_store::MemoryDocumentStore;
pub use postgres_store::PostgresDocumentStore;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Top-level fields of a document
pub type Fields = Map<String, Value>;

/// Collection names
pub mod collections {
    pub const REPORTS: &str = "reports";
    pub const DEPARTMENTS: &str = "departments";
    pub const USERS: &str = "users";
    pub const NOTIFICATIONS: &str = "notifications";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

/// A stored document: its id plus its fields (the id is never stored inside the fields)
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Decode into a typed model. The document id is injected as the `id` field.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// Encode a typed model into document fields, dropping any `id` field
pub fn encode<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Conjunction of field equality clauses
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.clauses.push((field.to_string(), value.into()));
        self
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    /// Whether a document's fields satisfy every clause
    pub fn matches(&self, fields: &Fields) -> bool {
        self.clauses
            .iter()
            .all(|(field, value)| fields.get(field) == Some(value))
    }

    /// The clauses as a JSON object, suitable for JSONB containment
    pub fn as_object(&self) -> Fields {
        self.clauses.iter().cloned().collect()
    }
}

/// Remote document store contract
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Fetch every document in the collection matching the filter
    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    /// Write a whole document, generating an id when none is given.
    /// Overwrites any existing document with the same id.
    async fn put(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Fields,
    ) -> Result<String, StoreError>;

    /// Merge top-level fields into an existing document
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Remove a document. Removing a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Append one entry to an array field, creating the array if absent
    async fn append_to_array_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        entry: Value,
    ) -> Result<(), StoreError>;

    /// Merge fields and append to an array field as one logical write
    async fn update_and_append(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        field: &str,
        entry: Value,
    ) -> Result<(), StoreError> {
        self.update(collection, id, fields).await?;
        self.append_to_array_field(collection, id, field, entry)
            .await
    }
}

/// Generate a new opaque document id
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Union of `field == value` queries over several values, without duplicate ids
pub async fn query_any_of(
    store: &dyn DocumentStore,
    collection: &str,
    field: &str,
    values: &[&str],
) -> Result<Vec<Document>, StoreError> {
    let filters: Vec<Filter> = values
        .iter()
        .map(|value| Filter::new().eq(field, *value))
        .collect();
    let batches =
        futures::future::try_join_all(filters.iter().map(|f| store.query(collection, f))).await?;

    let mut seen = std::collections::HashSet::new();
    Ok(batches
        .into_iter()
        .flatten()
        .filter(|doc| seen.insert(doc.id.clone()))
        .collect())
}
