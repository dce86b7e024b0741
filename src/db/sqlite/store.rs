//! SQLite-backed register store.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use tokio::time::timeout;

use crate::db::error::{DbError, DbResult};
use crate::db::query::QueryPlan;

/// Default per-statement time budget.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// One row of `PRAGMA table_info`.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub name: String,
    pub col_type: String,
    pub notnull: bool,
    pub primary_key: bool,
}

/// Pool-backed SQLite store.
///
/// Every statement runs under one time budget; exceeding it surfaces
/// as [`DbError::Timeout`] rather than hanging the session.
pub struct SqliteStore {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl SqliteStore {
    /// Open a register database at `path`, creating it if missing.
    pub async fn open<P: AsRef<Path>>(path: P, query_timeout: Duration) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;
        Ok(Self {
            pool,
            query_timeout,
        })
    }

    /// In-memory store for tests. A single pooled connection keeps the
    /// database alive for the store's lifetime.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::new().in_memory(true).foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;
        Ok(Self {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        })
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> DbResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Connectivity check backing the health endpoint.
    pub async fn probe(&self) -> DbResult<()> {
        let _: i64 = self
            .bounded(sqlx::query_scalar("SELECT 1").fetch_one(&self.pool))
            .await?;
        Ok(())
    }

    /// Execute a plan: result rows plus the paired unpaged count, each
    /// under the store's time budget.
    pub async fn fetch_page(&self, plan: &QueryPlan) -> DbResult<(Vec<SqliteRow>, i64)> {
        let mut query = sqlx::query(&plan.query);
        for value in &plan.params {
            query = query.bind(value);
        }
        let rows = self.bounded(query.fetch_all(&self.pool)).await?;

        let mut count = sqlx::query_scalar::<_, i64>(&plan.count_query);
        for value in &plan.params {
            count = count.bind(value);
        }
        let total = self.bounded(count.fetch_one(&self.pool)).await?;

        Ok((rows, total))
    }

    /// Column metadata straight from SQLite. `table` is a catalog
    /// static; this is the one place an identifier is embedded into
    /// SQL text, after allow-list resolution.
    pub async fn table_info(&self, table: &'static str) -> DbResult<Vec<TableColumn>> {
        let sql = format!("PRAGMA table_info({})", table);
        let rows = self.bounded(sqlx::query(&sql).fetch_all(&self.pool)).await?;
        Ok(rows
            .iter()
            .map(|row| TableColumn {
                name: row.get("name"),
                col_type: row.get("type"),
                notnull: row.get::<i64, _>("notnull") != 0,
                primary_key: row.get::<i64, _>("pk") != 0,
            })
            .collect())
    }

    /// Direct pool access for tests and fixtures.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, waiting for in-flight statements.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn bounded<T, F>(&self, fut: F) -> DbResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(DbError::from),
            Err(_) => Err(DbError::Timeout {
                seconds: self.query_timeout.as_secs(),
            }),
        }
    }
}
