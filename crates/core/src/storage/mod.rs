pub mod load_runs;
pub mod mirror;

use crate::domain::sales::SalesTable;
use anyhow::Context;
use load_runs::LoadStatus;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid DATABASE_URL: {database_url}"))?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .context("connect DATABASE_URL failed")
}

pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("sqlx migrations failed")?;
    Ok(())
}

/// Replaces the mirror table with `table` and records the outcome in `sales_load_runs`.
/// Expects `migrate` to have run.
pub async fn mirror_sales(
    pool: &SqlitePool,
    source_path: &str,
    mirror_table: &str,
    table: &SalesTable,
) -> anyhow::Result<u64> {
    match mirror::replace_sales_table(pool, mirror_table, table.records()).await {
        Ok(rows) => {
            let run_id = load_runs::record_load_run(
                pool,
                source_path,
                mirror_table,
                rows,
                LoadStatus::Success,
                None,
            )
            .await?;
            tracing::info!(%run_id, rows, mirror_table, "sales mirror replaced");
            Ok(rows)
        }
        Err(err) => {
            let detail = format!("{err:#}");
            if let Err(e) = load_runs::record_load_run(
                pool,
                source_path,
                mirror_table,
                0,
                LoadStatus::Error,
                Some(&detail),
            )
            .await
            {
                tracing::warn!(error = %e, "failed to record sales load run");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // One connection: every new connection to `sqlite::memory:` is a fresh database.
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}
