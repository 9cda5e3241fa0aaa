//! Data access
//!
//! Every call checks out one pooled connection, runs one query and hands the
//! connection back when the guard drops, whether the query succeeded or not.

use sqlx::{Column, Executor, PgPool, Statement};

use crate::error::{DataError, DataResult};
use crate::models::{StopRecord, Table};

/// "Run a query, get rows back" over the stop records table.
#[axum::async_trait]
pub trait StopStore: Send + Sync {
    /// Execute literal SQL and return whatever columns it produces.
    async fn run(&self, sql: &str) -> DataResult<Table>;

    /// First `limit` stop records in import order.
    async fn list_stops(&self, limit: i64) -> DataResult<Vec<StopRecord>>;

    /// The full historical dataset in import order.
    async fn load_dataset(&self) -> DataResult<Vec<StopRecord>>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[axum::async_trait]
impl StopStore for PgStore {
    async fn run(&self, sql: &str) -> DataResult<Table> {
        let mut conn = self.pool.acquire().await.map_err(DataError::connection)?;
        let rows = sqlx::query(sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(DataError::query)?;
        if !rows.is_empty() {
            return Ok(Table::from_pg_rows(&rows));
        }

        // No rows to read names from; the prepared statement still knows them
        let columns = match (&mut *conn).prepare(sql).await {
            Ok(statement) => statement.columns().iter().map(|c| c.name().to_string()).collect(),
            Err(err) => {
                tracing::warn!("Could not describe empty result columns: {}", err);
                Vec::new()
            }
        };
        Ok(Table::new(columns, Vec::new()))
    }

    async fn list_stops(&self, limit: i64) -> DataResult<Vec<StopRecord>> {
        let mut conn = self.pool.acquire().await.map_err(DataError::connection)?;
        StopRecord::list(&mut *conn, limit).await.map_err(DataError::query)
    }

    async fn load_dataset(&self) -> DataResult<Vec<StopRecord>> {
        let mut conn = self.pool.acquire().await.map_err(DataError::connection)?;
        StopRecord::load_all(&mut *conn).await.map_err(DataError::query)
    }
}

/// A result that degraded to empty instead of failing the request.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub data: T,
    pub error: Option<String>,
}

impl<T: Default> Fetched<T> {
    /// Log the failure and keep rendering with an empty value.
    pub fn from_result(result: DataResult<T>, what: &str) -> Self {
        match result {
            Ok(data) => Self { data, error: None },
            Err(err) => {
                tracing::error!("Failed to load {}: {}", what, err);
                Self { data: T::default(), error: Some(err.to_string()) }
            }
        }
    }
}

pub async fn fetch_or_empty(store: &dyn StopStore, sql: &str) -> Fetched<Table> {
    Fetched::from_result(store.run(sql).await, "query result")
}

pub async fn dataset_or_empty(store: &dyn StopStore) -> Fetched<Vec<StopRecord>> {
    Fetched::from_result(store.load_dataset().await, "historical dataset")
}

pub async fn stops_or_empty(store: &dyn StopStore, limit: i64) -> Fetched<Vec<StopRecord>> {
    Fetched::from_result(store.list_stops(limit).await, "police logs")
}
