use pizza_core::domain::report::DashboardReport;
use std::fmt::Write;

fn money(v: Option<f64>) -> String {
    v.map(|v| format!("${v:.2}")).unwrap_or_else(|| "n/a".to_string())
}

/// Plain-text rendition of the dashboard for terminals and cron logs.
pub fn render_text(report: &DashboardReport) -> String {
    let mut out = String::new();
    let k = &report.kpis;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Pizza Sales Report ({} records)", report.record_count);
    let _ = writeln!(out, "  Total Revenue      {}", money(Some(k.total_revenue)));
    let _ = writeln!(out, "  Avg Order Value    {}", money(k.avg_order_value));
    let _ = writeln!(out, "  Total Pizzas Sold  {}", k.total_pizzas_sold);
    let _ = writeln!(out, "  Total Orders       {}", k.total_orders);
    let _ = writeln!(
        out,
        "  Avg Pizzas / Order {}",
        k.avg_pizzas_per_order
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "n/a".to_string())
    );
    let _ = writeln!(out, "Categories: {}", report.selected_categories.join(", "));

    let _ = writeln!(out, "\nTop pizzas by revenue");
    for (i, p) in report.top_by_revenue.iter().enumerate() {
        let _ = writeln!(out, "  {}. {:<32} {}", i + 1, p.pizza_name, money(Some(p.total_price)));
    }

    let _ = writeln!(out, "\nTop pizzas by quantity");
    for (i, p) in report.top_by_quantity.iter().enumerate() {
        let _ = writeln!(out, "  {}. {:<32} {}", i + 1, p.pizza_name, p.quantity);
    }

    let _ = writeln!(out, "\nOrders by day");
    for d in &report.orders_by_day {
        let _ = writeln!(out, "  {:<10} {}", d.day_of_week, d.orders);
    }

    let _ = writeln!(out, "\nPizzas sold by hour");
    for h in &report.hourly_sales {
        let _ = writeln!(out, "  {:02}:00 {}", h.hour, h.quantity);
    }

    let _ = writeln!(out, "\nMonthly revenue (actual / fitted)");
    for p in &report.forecast {
        let _ = writeln!(out, "  {} {:>12.2} {:>12.2}", p.month, p.actual, p.fitted);
    }

    let u = &report.utilization;
    let _ = writeln!(
        out,
        "\nMax hourly utilization ({} seats, {} pizzas/table): {}",
        u.seating_capacity,
        u.pizzas_per_table,
        u.max_utilization_pct
            .map(|v| format!("{v:.2}%"))
            .unwrap_or_else(|| "n/a".to_string())
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use pizza_core::analytics::{build_report, ReportOptions};
    use pizza_core::domain::sales::{CategoryFilter, OrderLine, SalesTable};

    #[test]
    fn renders_kpis_and_sections() {
        let table = SalesTable::new(vec![OrderLine {
            order_id: 1,
            order_date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            order_time: NaiveTime::from_hms_opt(11, 38, 36).unwrap(),
            pizza_name: "hawaiian".to_string(),
            pizza_category: "Classic".to_string(),
            pizza_size: None,
            quantity: 2,
            unit_price: None,
            total_price: 26.5,
        }]);
        let report = build_report(&table, &CategoryFilter::All, &ReportOptions::default()).unwrap();
        let text = render_text(&report);

        assert!(text.contains("Total Revenue      $26.50"));
        assert!(text.contains("Avg Pizzas / Order 2.00"));
        assert!(text.contains("1. hawaiian"));
        assert!(text.contains("Thursday   1"));
        assert!(text.contains("11:00 2"));
    }

    #[test]
    fn empty_report_prints_na() {
        let report =
            build_report(&SalesTable::default(), &CategoryFilter::All, &ReportOptions::default())
                .unwrap();
        let text = render_text(&report);
        assert!(text.contains("Avg Order Value    n/a"));
        assert!(text.contains("Max hourly utilization (60 seats, 2 pizzas/table): n/a"));
    }
}
