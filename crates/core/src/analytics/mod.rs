pub mod forecast;
pub mod kpi;
pub mod summary;
pub mod utilization;

use crate::domain::report::DashboardReport;
use crate::domain::sales::{CategoryFilter, SalesTable};
use anyhow::Result;
use utilization::UtilizationOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_n: usize,
    pub utilization: UtilizationOptions,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: summary::TOP_N,
            utilization: UtilizationOptions::default(),
        }
    }
}

impl ReportOptions {
    pub fn from_env() -> Self {
        Self {
            utilization: UtilizationOptions::from_env(),
            ..Self::default()
        }
    }
}

/// KPIs, forecast and utilization always cover the whole table; the ranked and
/// per-day/per-hour groupings honour `filter`.
pub fn build_report(
    table: &SalesTable,
    filter: &CategoryFilter,
    opts: &ReportOptions,
) -> Result<DashboardReport> {
    let records = table.records();
    let filtered = table.filter(filter);

    let months = summary::monthly_revenue(records);
    let forecast = forecast::forecast_monthly_revenue(&months)?;
    let utilization = utilization::seating_utilization(records, opts.utilization)?;

    let report = DashboardReport {
        generated_at: chrono::Utc::now(),
        record_count: table.len(),
        kpis: kpi::compute_kpis(records),
        categories: table.categories(),
        selected_categories: filter.selected(table),
        top_by_revenue: summary::top_pizzas_by_revenue(filtered.clone(), opts.top_n),
        top_by_quantity: summary::top_pizzas_by_quantity(filtered.clone(), opts.top_n),
        orders_by_day: summary::orders_by_day(filtered.clone()),
        hourly_sales: summary::hourly_sales(filtered),
        forecast,
        utilization,
    };

    tracing::debug!(
        records = report.record_count,
        selected = report.selected_categories.len(),
        "dashboard report built"
    );

    Ok(report)
}
