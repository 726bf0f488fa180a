use crate::domain::report::{SeatingUtilization, UtilizationCell};
use crate::domain::sales::OrderLine;
use crate::time::calendar::{self, WEEK};
use anyhow::ensure;
use std::collections::{BTreeMap, HashSet};

pub const DEFAULT_SEATING_CAPACITY: u32 = 60;
pub const DEFAULT_PIZZAS_PER_TABLE: u32 = 2;

/// Assumptions behind the seating heuristic. Nothing here is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtilizationOptions {
    pub seating_capacity: u32,
    pub pizzas_per_table: u32,
}

impl Default for UtilizationOptions {
    fn default() -> Self {
        Self {
            seating_capacity: DEFAULT_SEATING_CAPACITY,
            pizzas_per_table: DEFAULT_PIZZAS_PER_TABLE,
        }
    }
}

impl UtilizationOptions {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`. A capacity below 1 is ignored and the default kept.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut out = Self::default();

        if let Some(n) = lookup("SEATING_CAPACITY").and_then(|s| s.trim().parse::<u32>().ok()) {
            if n >= 1 {
                out.seating_capacity = n;
            } else {
                tracing::warn!(value = n, "SEATING_CAPACITY must be >= 1; keeping default");
            }
        }

        if let Some(n) = lookup("PIZZAS_PER_TABLE").and_then(|s| s.trim().parse::<u32>().ok()) {
            out.pizzas_per_table = n;
        }

        out
    }

    pub fn utilization_pct(&self, orders: usize) -> f64 {
        (orders as f64 * self.pizzas_per_table as f64) / self.seating_capacity as f64 * 100.0
    }
}

/// Estimated seat usage per (weekday, hour) slot that has orders, Monday first then by hour.
pub fn seating_utilization<'a, I>(
    lines: I,
    opts: UtilizationOptions,
) -> anyhow::Result<SeatingUtilization>
where
    I: IntoIterator<Item = &'a OrderLine>,
{
    ensure!(
        opts.seating_capacity >= 1,
        "SEATING_CAPACITY must be >= 1 (got {})",
        opts.seating_capacity
    );

    let mut slots: BTreeMap<(u32, u32), HashSet<i64>> = BTreeMap::new();
    for l in lines {
        let day = l.day_of_week().num_days_from_monday();
        slots.entry((day, l.hour())).or_default().insert(l.order_id);
    }

    let cells: Vec<UtilizationCell> = slots
        .into_iter()
        .map(|((day, hour), orders)| UtilizationCell {
            day_of_week: calendar::day_name(WEEK[day as usize]).to_string(),
            hour,
            orders: orders.len(),
            utilization_pct: opts.utilization_pct(orders.len()),
        })
        .collect();

    let max_utilization_pct = cells
        .iter()
        .map(|c| c.utilization_pct)
        .max_by(f64::total_cmp);

    Ok(SeatingUtilization {
        seating_capacity: opts.seating_capacity,
        pizzas_per_table: opts.pizzas_per_table,
        max_utilization_pct,
        cells,
    })
}
