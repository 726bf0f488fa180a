use crate::domain::report::Kpis;
use crate::domain::sales::OrderLine;
use std::collections::HashSet;

/// Full-table KPIs. `avg_order_value` is the mean `total_price` per line item, which is
/// what the sales dashboard has always reported under that label.
pub fn compute_kpis(records: &[OrderLine]) -> Kpis {
    let total_revenue: f64 = records.iter().map(|r| r.total_price).sum();
    let total_pizzas_sold: i64 = records.iter().map(|r| r.quantity).sum();
    let total_orders = records
        .iter()
        .map(|r| r.order_id)
        .collect::<HashSet<_>>()
        .len();

    let avg_order_value = (!records.is_empty()).then(|| total_revenue / records.len() as f64);
    let avg_pizzas_per_order =
        (total_orders > 0).then(|| total_pizzas_sold as f64 / total_orders as f64);

    Kpis {
        total_revenue,
        avg_order_value,
        total_pizzas_sold,
        total_orders,
        avg_pizzas_per_order,
    }
}
