use crate::time::calendar;
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// One pizza line item of one order. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: i64,
    pub order_date: NaiveDate,
    pub order_time: NaiveTime,
    pub pizza_name: String,
    pub pizza_category: String,
    pub pizza_size: Option<String>,
    pub quantity: i64,
    pub unit_price: Option<f64>,
    pub total_price: f64,
}

impl OrderLine {
    pub fn day_of_week(&self) -> Weekday {
        self.order_date.weekday()
    }

    pub fn day_name(&self) -> &'static str {
        calendar::day_name(self.day_of_week())
    }

    pub fn hour(&self) -> u32 {
        self.order_time.hour()
    }

    pub fn month(&self) -> String {
        calendar::month_label(self.order_date)
    }
}

/// The loaded sales table, held read-only for the lifetime of a dashboard session.
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    records: Vec<OrderLine>,
}

impl SalesTable {
    pub fn new(records: Vec<OrderLine>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[OrderLine] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for r in &self.records {
            if seen.insert(r.pizza_category.as_str()) {
                out.push(r.pizza_category.clone());
            }
        }
        out
    }

    pub fn filter<'a>(
        &'a self,
        filter: &'a CategoryFilter,
    ) -> impl Iterator<Item = &'a OrderLine> + Clone + 'a {
        self.records
            .iter()
            .filter(move |r| filter.matches(&r.pizza_category))
    }
}

/// Category multi-select. `All` is the dashboard default; an empty `Only` set selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl CategoryFilter {
    pub fn only<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(categories.into_iter().map(Into::into).collect())
    }

    /// Builds a filter from repeated selection values (`?categories=a&categories=b`).
    /// No values selects everything; blank values are dropped, so a lone blank selects nothing.
    pub fn from_selection<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return Self::All;
        }
        Self::only(
            values
                .map(|v| v.as_ref().trim().to_string())
                .filter(|v| !v.is_empty()),
        )
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(category),
        }
    }

    /// Selected categories, in table order for `All`.
    pub fn selected(&self, table: &SalesTable) -> Vec<String> {
        match self {
            Self::All => table.categories(),
            Self::Only(set) => table
                .categories()
                .into_iter()
                .filter(|c| set.contains(c))
                .collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn line(
        order_id: i64,
        date: (i32, u32, u32),
        time: (u32, u32, u32),
        pizza_name: &str,
        pizza_category: &str,
        quantity: i64,
        total_price: f64,
    ) -> OrderLine {
        OrderLine {
            order_id,
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            order_time: NaiveTime::from_hms_opt(time.0, time.1, time.2).unwrap(),
            pizza_name: pizza_name.to_string(),
            pizza_category: pizza_category.to_string(),
            pizza_size: None,
            quantity,
            unit_price: None,
            total_price,
        }
    }

    /// Small table spanning three categories, two weekdays and two months.
    pub fn sample_table() -> SalesTable {
        SalesTable::new(vec![
            // 2015-01-05 is a Monday.
            line(1, (2015, 1, 5), (11, 38, 36), "hawaiian", "Classic", 1, 13.25),
            line(1, (2015, 1, 5), (11, 38, 36), "veggie_veg", "Veggie", 2, 32.00),
            line(2, (2015, 1, 5), (12, 5, 0), "hawaiian", "Classic", 1, 13.25),
            line(3, (2015, 1, 7), (18, 30, 0), "thai_ckn", "Chicken", 3, 62.25),
            line(4, (2015, 2, 4), (18, 45, 10), "veggie_veg", "Veggie", 1, 16.00),
        ])
    }
}
