// SQLite store: append-only readings log plus a single-row averages snapshot slot.
// Uses sqlx for async + connection pooling. The snapshot is kept as JSON in the
// same record shape consumers read (last24HourAverages, ..., lastUpdated).

use crate::models::{Reading, Snapshot};
use crate::store::{ReadingSource, SnapshotStore};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::{instrument, warn};

pub struct ReadingsRepo {
    pool: SqlitePool,
}

impl ReadingsRepo {
    pub async fn connect(path: &str, max_pool_size: u32) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS readings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                temperature TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS averages_snapshot (id INTEGER PRIMARY KEY CHECK (id = 1), data TEXT NOT NULL)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Appends one reading; returns its auto-assigned key.
    #[instrument(skip(self, reading), fields(repo = "readings", operation = "append_reading"))]
    pub async fn append_reading(&self, reading: &Reading) -> anyhow::Result<i64> {
        let r = sqlx::query("INSERT INTO readings (timestamp, temperature) VALUES ($1, $2)")
            .bind(&reading.timestamp)
            .bind(&reading.value)
            .execute(&self.pool)
            .await?;
        Ok(r.last_insert_rowid())
    }

    pub async fn count_readings(&self) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM readings")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}

impl ReadingSource for ReadingsRepo {
    #[instrument(skip(self), fields(repo = "readings", operation = "read_all_readings"))]
    async fn read_all_readings(&self) -> anyhow::Result<Vec<Reading>> {
        let rows = sqlx::query("SELECT timestamp, temperature FROM readings")
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(Reading {
                timestamp: row.try_get("timestamp")?,
                value: row.try_get("temperature")?,
            });
        }
        Ok(out)
    }
}

impl SnapshotStore for ReadingsRepo {
    #[instrument(skip(self), fields(repo = "readings", operation = "read_snapshot"))]
    async fn read_snapshot(&self) -> anyhow::Result<Option<Snapshot>> {
        let row = sqlx::query("SELECT data FROM averages_snapshot WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let data: String = row.try_get("data")?;
        // An undecodable record is no usable snapshot: the next resolve recomputes and overwrites it.
        match serde_json::from_str(&data) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(error = %e, "stored averages snapshot unreadable; treating as absent");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, snapshot), fields(repo = "readings", operation = "write_snapshot", last_updated = snapshot.last_updated))]
    async fn write_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        let data = serde_json::to_string(snapshot)?;
        sqlx::query("INSERT OR REPLACE INTO averages_snapshot (id, data) VALUES (1, $1)")
            .bind(&data)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
