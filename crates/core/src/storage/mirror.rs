use crate::domain::sales::OrderLine;
use anyhow::Context;
use sqlx::SqlitePool;

const DEFAULT_BATCH: usize = 200;
// SQLite caps bound parameters per statement; 11 columns per row.
const MAX_BATCH: usize = 2_000;

/// Rejects anything but a plain identifier; the name is interpolated into DDL.
pub fn validate_table_name(name: &str) -> anyhow::Result<()> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    anyhow::ensure!(valid, "invalid mirror table name '{name}'");
    anyhow::ensure!(
        !name.to_ascii_lowercase().starts_with("sqlite_") && name != "sales_load_runs",
        "mirror table name '{name}' is reserved"
    );
    Ok(())
}

/// Drops and recreates `table`, then inserts every record, in one transaction.
/// Readers never observe a half-written mirror.
pub async fn replace_sales_table(
    pool: &SqlitePool,
    table: &str,
    records: &[OrderLine],
) -> anyhow::Result<u64> {
    validate_table_name(table)?;

    let chunk_size: usize = std::env::var("MIRROR_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_BATCH);
    anyhow::ensure!(
        (1..=MAX_BATCH).contains(&chunk_size),
        "MIRROR_BATCH_SIZE must be 1..={MAX_BATCH} (got {chunk_size})"
    );

    let mut tx = pool.begin().await.context("begin transaction failed")?;

    let drop_sql = format!("DROP TABLE IF EXISTS \"{table}\"");
    sqlx::query(&drop_sql)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("drop table {table} failed"))?;

    let create_sql = format!(
        "CREATE TABLE \"{table}\" (\
           order_id INTEGER NOT NULL, \
           order_date TEXT NOT NULL, \
           order_time TEXT NOT NULL, \
           pizza_name TEXT NOT NULL, \
           pizza_category TEXT NOT NULL, \
           pizza_size TEXT, \
           quantity INTEGER NOT NULL, \
           unit_price REAL, \
           total_price REAL NOT NULL, \
           day_of_week TEXT NOT NULL, \
           hour INTEGER NOT NULL)"
    );
    sqlx::query(&create_sql)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("create table {table} failed"))?;

    let mut affected: u64 = 0;
    for (batch_idx, chunk) in records.chunks(chunk_size).enumerate() {
        let t0 = std::time::Instant::now();
        let mut qb = sqlx::QueryBuilder::new(format!(
            "INSERT INTO \"{table}\" (order_id, order_date, order_time, pizza_name, pizza_category, \
             pizza_size, quantity, unit_price, total_price, day_of_week, hour) "
        ));
        qb.push_values(chunk, |mut b, r| {
            b.push_bind(r.order_id)
                .push_bind(r.order_date)
                .push_bind(r.order_time)
                .push_bind(r.pizza_name.as_str())
                .push_bind(r.pizza_category.as_str())
                .push_bind(r.pizza_size.as_deref())
                .push_bind(r.quantity)
                .push_bind(r.unit_price)
                .push_bind(r.total_price)
                .push_bind(r.day_name())
                .push_bind(i64::from(r.hour()));
        });

        let res = qb
            .build()
            .persistent(false)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("batch insert into {table} failed"))?;
        affected += res.rows_affected();

        tracing::debug!(
            table,
            batch_idx,
            batch_size = chunk.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "mirror batch insert"
        );
    }

    tx.commit().await.context("commit transaction failed")?;
    Ok(affected)
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> anyhow::Result<i64> {
    validate_table_name(table)?;
    let sql = format!("SELECT COUNT(*) FROM \"{table}\"");
    let count: i64 = sqlx::query_scalar(&sql)
        .fetch_one(pool)
        .await
        .with_context(|| format!("count rows in {table} failed"))?;
    Ok(count)
}
