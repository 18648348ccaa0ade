// ABOUTME: SQLite-backed purchase ledger
// ABOUTME: Stores the same records as the flat file in an insert-only table

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use lispbook_core::{format_timestamp, parse_timestamp, TokenRecord};

use super::PurchaseLedger;
use crate::StorageResult;

pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Open (creating if needed) a ledger database at `path`
    pub async fn open(path: &Path) -> StorageResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the table if it is missing
    pub async fn from_pool(pool: SqlitePool) -> StorageResult<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS purchase_tokens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                token TEXT NOT NULL,
                issued_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl PurchaseLedger for SqliteLedger {
    async fn issue(&self, token: &str, issued_at: DateTime<Utc>) -> StorageResult<TokenRecord> {
        let record = TokenRecord::new(token, issued_at);

        // Stored in ledger format so second precision matches the file backend
        sqlx::query("INSERT INTO purchase_tokens (token, issued_at) VALUES (?, ?)")
            .bind(&record.token)
            .bind(format_timestamp(record.issued_at))
            .execute(&self.pool)
            .await?;

        debug!("Inserted purchase token into ledger table");
        Ok(record)
    }

    async fn records(&self) -> StorageResult<Vec<TokenRecord>> {
        let rows: Vec<(i64, String, String)> =
            sqlx::query_as("SELECT id, issued_at, token FROM purchase_tokens ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        let records = rows
            .into_iter()
            .filter_map(|(id, issued_at, token)| match parse_timestamp(&issued_at) {
                Ok(issued_at) => Some(TokenRecord::new(token, issued_at)),
                Err(e) => {
                    warn!(row = id, error = %e, "Skipping ledger row with bad timestamp");
                    None
                }
            })
            .collect();

        Ok(records)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
