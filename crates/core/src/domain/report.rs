use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scalar KPIs over the unfiltered table. Averages are `None` when their
/// denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_revenue: f64,
    pub avg_order_value: Option<f64>,
    pub total_pizzas_sold: i64,
    pub total_orders: usize,
    pub avg_pizzas_per_order: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PizzaRevenue {
    pub pizza_name: String,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaQuantity {
    pub pizza_name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOrders {
    pub day_of_week: String,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourSales {
    pub hour: u32,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRevenue {
    pub month: String,
    pub revenue: f64,
}

/// Actual vs in-sample fitted revenue for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: String,
    pub actual: f64,
    pub fitted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationCell {
    pub day_of_week: String,
    pub hour: u32,
    pub orders: usize,
    pub utilization_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatingUtilization {
    pub seating_capacity: u32,
    pub pizzas_per_table: u32,
    pub max_utilization_pct: Option<f64>,
    pub cells: Vec<UtilizationCell>,
}

/// Everything one dashboard render needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    pub kpis: Kpis,
    pub categories: Vec<String>,
    pub selected_categories: Vec<String>,
    pub top_by_revenue: Vec<PizzaRevenue>,
    pub top_by_quantity: Vec<PizzaQuantity>,
    pub orders_by_day: Vec<DayOrders>,
    pub hourly_sales: Vec<HourSales>,
    pub forecast: Vec<ForecastPoint>,
    pub utilization: SeatingUtilization,
}
