use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{generate_id, Document, DocumentStore, Fields, Filter, StoreError};

/// Document store on a single PostgreSQL JSONB table.
///
/// Schema (see `migrations/`):
/// `documents(collection TEXT, id TEXT, data JSONB, created_at, updated_at)`
/// with `(collection, id)` as primary key.
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_document((id, data): (String, Json<Fields>)) -> Document {
    Document { id, fields: data.0 }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, (String, Json<Fields>)>(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get document {}/{}: {:?}", collection, id, e);
            StoreError::Database(e)
        })?;

        Ok(row.map(into_document))
    }

    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        // Top-level scalar equality is exactly JSONB containment
        let rows = sqlx::query_as::<_, (String, Json<Fields>)>(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1 AND data @> $2
            ORDER BY created_at
            "#,
        )
        .bind(collection)
        .bind(Json(filter.as_object()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to query collection {}: {:?}", collection, e);
            StoreError::Database(e)
        })?;

        Ok(rows.into_iter().map(into_document).collect())
    }

    async fn put(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Fields,
    ) -> Result<String, StoreError> {
        let id = id.map(String::from).unwrap_or_else(generate_id);

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(Json(&fields))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to put document in {}: {:?}", collection, e);
            StoreError::Database(e)
        })?;

        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&fields))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update document {}/{}: {:?}", collection, id, e);
            StoreError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete document {}/{}: {:?}", collection, id, e);
            StoreError::Database(e)
        })?;

        Ok(())
    }

    async fn append_to_array_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        entry: Value,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = jsonb_set(
                    data,
                    ARRAY[$3::text],
                    COALESCE(NULLIF(data -> $3::text, 'null'::jsonb), '[]'::jsonb)
                        || jsonb_build_array($4::jsonb)
                ),
                updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(Json(&entry))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to append to {}/{}.{}: {:?}",
                collection,
                id,
                field,
                e
            );
            StoreError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }

    async fn update_and_append(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        field: &str,
        entry: Value,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = jsonb_set(
                    data || $3,
                    ARRAY[$4::text],
                    COALESCE(NULLIF(data -> $4::text, 'null'::jsonb), '[]'::jsonb)
                        || jsonb_build_array($5::jsonb)
                ),
                updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&fields))
        .bind(field)
        .bind(Json(&entry))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update document {}/{}: {:?}", collection, id, e);
            StoreError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }
}
