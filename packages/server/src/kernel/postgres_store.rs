//! PostgreSQL-backed document store.
//!
//! All collections share one `documents` table keyed by `(collection, id)`.
//! Document bodies are JSONB; field filters and ordering use `#>` / `#>>` path
//! operators, and conditional writes compare the `version` column.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::documents::{
    Document, DocumentQuery, FilterValue, SortDirection, StoreError, WriteResult,
};
use super::traits::BaseDocumentStore;

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    data: Value,
    version: i64,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            data: row.data,
            version: row.version,
            update_time: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct WriteRow {
    id: String,
    version: i64,
    updated_at: DateTime<Utc>,
}

impl From<WriteRow> for WriteResult {
    fn from(row: WriteRow) -> Self {
        WriteResult {
            id: row.id,
            version: row.version,
            update_time: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool and run pending migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")
    }
}

#[async_trait]
impl BaseDocumentStore for PostgresDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data, version, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn insert(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<WriteResult, StoreError> {
        let row = sqlx::query_as::<_, WriteRow>(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO NOTHING
            RETURNING id, version, updated_at
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(data)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WriteResult::from)
            .ok_or_else(|| StoreError::conflict(collection, id))
    }

    async fn compare_and_swap(
        &self,
        collection: &str,
        id: &str,
        expected_version: i64,
        data: Value,
    ) -> Result<WriteResult, StoreError> {
        let row = sqlx::query_as::<_, WriteRow>(
            r#"
            UPDATE documents
            SET data = $4,
                version = version + 1,
                updated_at = NOW()
            WHERE collection = $1 AND id = $2 AND version = $3
            RETURNING id, version, updated_at
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(expected_version)
        .bind(data)
        .fetch_optional(&self.pool)
        .await?;

        debug!(collection, id, expected_version, won = row.is_some(), "compare-and-swap document");
        row.map(WriteResult::from)
            .ok_or_else(|| StoreError::conflict(collection, id))
    }

    async fn query(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, data, version, updated_at FROM documents WHERE collection = ",
        );
        builder.push_bind(collection.to_string());

        for filter in &query.filters {
            // Typed extraction: a filter never matches a field of another JSON type
            match &filter.value {
                FilterValue::Number(value) => {
                    builder
                        .push(" AND (CASE WHEN jsonb_typeof(data #> ")
                        .push_bind(filter.path_segments())
                        .push(") = 'number' THEN (data #>> ")
                        .push_bind(filter.path_segments())
                        .push(")::float8 END) ")
                        .push(filter.op.as_sql())
                        .push(" ")
                        .push_bind(*value);
                }
                FilterValue::Text(value) => {
                    builder
                        .push(" AND (CASE WHEN jsonb_typeof(data #> ")
                        .push_bind(filter.path_segments())
                        .push(") = 'string' THEN (data #>> ")
                        .push_bind(filter.path_segments())
                        .push(") END) ")
                        .push(filter.op.as_sql())
                        .push(" ")
                        .push_bind(value.clone());
                }
            }
        }

        if let Some(order) = &query.order_by {
            let direction = match order.direction {
                SortDirection::Ascending => " ASC NULLS FIRST",
                SortDirection::Descending => " DESC NULLS LAST",
            };
            builder
                .push(" ORDER BY data #> ")
                .push_bind(order.path_segments())
                .push(direction)
                .push(", id ASC");
        } else {
            builder.push(" ORDER BY id ASC");
        }

        let rows = builder
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!(collection, matched = rows.len(), "query documents");
        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
