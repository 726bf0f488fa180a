use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pizza_core::analytics::{build_report, kpi::compute_kpis, ReportOptions};
use pizza_core::domain::report::{DashboardReport, Kpis};
use pizza_core::domain::sales::{CategoryFilter, SalesTable};

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = pizza_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    // Without the sales table there is nothing to render.
    let table = pizza_core::ingest::load_sales(Path::new(&settings.sales_path), &settings.sales_sheet)
        .map_err(|e| {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, path = %settings.sales_path, "sales load failed");
            e
        })?;

    match settings.require_database_url() {
        Ok(db_url) => {
            if let Err(e) = mirror(db_url, &settings, &table).await {
                sentry_anyhow::capture_anyhow(&e);
                tracing::error!(error = %e, "sales mirror failed; serving dashboard without it");
            }
        }
        Err(_) => tracing::info!("DATABASE_URL not set; sales mirror disabled"),
    }

    let state = AppState {
        table: Arc::new(table),
        options: ReportOptions::from_env(),
    };

    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8501);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "dashboard listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn mirror(
    db_url: &str,
    settings: &pizza_core::config::Settings,
    table: &SalesTable,
) -> anyhow::Result<()> {
    let pool = pizza_core::storage::connect(db_url).await?;
    pizza_core::storage::migrate(&pool).await?;
    pizza_core::storage::mirror_sales(&pool, &settings.sales_path, &settings.mirror_table, table)
        .await?;
    pool.close().await;
    Ok(())
}

/// The sales table is loaded once and shared read-only by every request.
#[derive(Debug, Clone)]
struct AppState {
    table: Arc<SalesTable>,
    options: ReportOptions,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/healthz", get(healthz))
        .route("/api/kpis", get(get_kpis))
        .route("/api/categories", get(get_categories))
        .route("/api/dashboard", get(get_dashboard))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn dashboard_page() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

async fn get_kpis(State(state): State<AppState>) -> Json<Kpis> {
    Json(compute_kpis(state.table.records()))
}

async fn get_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.table.categories())
}

/// Repeated `categories` keys, one per selected category. No key selects all;
/// a single empty value selects none.
fn category_filter(params: &[(String, String)]) -> CategoryFilter {
    CategoryFilter::from_selection(
        params
            .iter()
            .filter(|(key, _)| key == "categories")
            .map(|(_, value)| value),
    )
}

async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<DashboardReport>, StatusCode> {
    let filter = category_filter(&params);
    let report = build_report(&state.table, &filter, &state.options).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "dashboard report failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(report))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
