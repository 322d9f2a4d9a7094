//! `SQLite` connection pool setup and migration runner.

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use inventory_app::ports::HealthProbe;
use inventory_domain::error::InventoryError;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::StorageError;
use crate::retry::{RetryPolicy, retry};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the `SQLite` storage adapter.
#[derive(Debug, Clone)]
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:inventory.db` or `sqlite::memory:`).
    pub database_url: String,
    /// Upper bound on pooled connections. Ignored for in-memory databases.
    pub max_connections: u32,
    /// Applied to connecting, acquiring and opening transactions.
    pub retry: RetryPolicy,
}

impl Config {
    /// Configuration with default pool size and retry policy.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 5,
            retry: RetryPolicy::default(),
        }
    }

    /// Build a [`Database`] from this configuration.
    ///
    /// Creates the connection pool, creates the database file if missing,
    /// and runs all pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or migrations fail.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::initialize(self).await
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Holds the `SQLite` connection pool and provides access to it.
///
/// Cheap to clone; every repository keeps its own handle.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    retry: RetryPolicy,
}

impl Database {
    /// Connect to the database and run migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or migrations fail.
    async fn initialize(config: Config) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        // Every connection to `:memory:` opens its own empty database, so the
        // pool must keep exactly one alive for the lifetime of the process.
        let pool_options = if is_in_memory(&config.database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = retry(&config.retry, "connect to database", || {
            pool_options.clone().connect_with(options.clone())
        })
        .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(url = %config.database_url, "database ready");

        Ok(Self {
            pool,
            retry: config.retry,
        })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check a connection out of the pool, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] once the retry policy is exhausted.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, StorageError> {
        let pool = &self.pool;
        Ok(retry(&self.retry, "acquire connection", move || pool.acquire()).await?)
    }

    /// Open a transaction, retrying transient failures.
    ///
    /// Dropping the returned transaction without committing rolls it back.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] once the retry policy is exhausted.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, StorageError> {
        let pool = &self.pool;
        Ok(retry(&self.retry, "begin transaction", move || pool.begin()).await?)
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl HealthProbe for Database {
    fn name(&self) -> &'static str {
        "database"
    }

    fn description(&self) -> &'static str {
        "SQLite datastore answers a trivial query"
    }

    fn check(&self) -> impl Future<Output = Result<(), InventoryError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query("SELECT 1")
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(())
        }
    }
}
