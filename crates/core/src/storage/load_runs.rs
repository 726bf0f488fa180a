use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Success,
    Error,
}

impl LoadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Appends one audit row to `sales_load_runs`.
pub async fn record_load_run(
    pool: &SqlitePool,
    source_path: &str,
    mirror_table: &str,
    row_count: u64,
    status: LoadStatus,
    error: Option<&str>,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let loaded_at: DateTime<Utc> = Utc::now();

    sqlx::query(
        "INSERT INTO sales_load_runs (id, loaded_at, source_path, mirror_table, row_count, status, error) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .persistent(false)
    .bind(id)
    .bind(loaded_at)
    .bind(source_path)
    .bind(mirror_table)
    .bind(row_count as i64)
    .bind(status.as_str())
    .bind(error)
    .execute(pool)
    .await
    .context("insert sales_load_runs failed")?;

    Ok(id)
}
