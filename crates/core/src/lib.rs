pub mod analytics;
pub mod domain;
pub mod ingest;
pub mod storage;
pub mod time;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_SALES_PATH: &str = "Data Model Pizza Sales.xlsx";
    pub const DEFAULT_SALES_SHEET: &str = "pizza_sales";
    pub const DEFAULT_MIRROR_TABLE: &str = "pizza_sales";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sales_path: String,
        pub sales_sheet: String,
        pub database_url: Option<String>,
        pub mirror_table: String,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                sales_path: non_empty_var("PIZZA_SALES_PATH")
                    .unwrap_or_else(|| DEFAULT_SALES_PATH.to_string()),
                sales_sheet: non_empty_var("PIZZA_SALES_SHEET")
                    .unwrap_or_else(|| DEFAULT_SALES_SHEET.to_string()),
                database_url: non_empty_var("DATABASE_URL"),
                mirror_table: non_empty_var("PIZZA_SALES_TABLE")
                    .unwrap_or_else(|| DEFAULT_MIRROR_TABLE.to_string()),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
