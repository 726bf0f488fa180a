use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pizza_core::analytics::{build_report, ReportOptions};
use pizza_core::domain::sales::{CategoryFilter, SalesTable};

mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "pizza_worker")]
struct Args {
    /// Sales spreadsheet (.xlsx/.xls/.ods) or CSV export. Defaults to PIZZA_SALES_PATH.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Workbook sheet name. Defaults to PIZZA_SALES_SHEET.
    #[arg(long)]
    sheet: Option<String>,

    /// Pizza category for the filtered charts; repeat for several. Omit for all.
    #[arg(long = "category")]
    categories: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Do everything except writing to the database.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = pizza_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let source = args
        .source
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.sales_path));
    let sheet = args.sheet.as_deref().unwrap_or(&settings.sales_sheet);

    let table = match pizza_core::ingest::load_sales(&source, sheet) {
        Ok(table) => table,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(path = %source.display(), error = %err, "sales load failed");
            return Err(err);
        }
    };

    if args.dry_run {
        tracing::info!(dry_run = true, records = table.len(), "skipping sales mirror");
    } else {
        let source_path = source.display().to_string();
        match mirror(&settings, &source_path, &table).await {
            Ok(Some(rows)) => tracing::info!(rows, "sales mirror done"),
            Ok(None) => tracing::info!("DATABASE_URL not set; sales mirror disabled"),
            Err(err) => {
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(error = %err, "sales mirror failed");
                return Err(err);
            }
        }
    }

    let filter = CategoryFilter::from_selection(&args.categories);
    let report = build_report(&table, &filter, &ReportOptions::from_env())?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("serialize report failed")?;
            println!("{json}");
        }
        OutputFormat::Text => print!("{}", render::render_text(&report)),
    }

    Ok(())
}

/// Mirrors `table` into `DATABASE_URL`. Returns `None` when no database is configured.
async fn mirror(
    settings: &pizza_core::config::Settings,
    source_path: &str,
    table: &SalesTable,
) -> anyhow::Result<Option<u64>> {
    let Some(db_url) = settings.database_url.as_deref() else {
        return Ok(None);
    };

    let pool = pizza_core::storage::connect(db_url).await?;
    pizza_core::storage::migrate(&pool).await?;
    let rows =
        pizza_core::storage::mirror_sales(&pool, source_path, &settings.mirror_table, table).await;
    pool.close().await;
    rows.map(Some)
}

fn init_sentry(settings: &pizza_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
