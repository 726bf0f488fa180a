use crate::domain::report::{DayOrders, HourSales, MonthRevenue, PizzaQuantity, PizzaRevenue};
use crate::domain::sales::OrderLine;
use crate::time::calendar::{self, WEEK};
use chrono::Datelike;
use std::collections::{BTreeMap, HashMap, HashSet};

pub const TOP_N: usize = 5;

/// Highest-revenue pizzas, descending. Equal revenue is ordered by pizza name.
pub fn top_pizzas_by_revenue<'a, I>(lines: I, limit: usize) -> Vec<PizzaRevenue>
where
    I: IntoIterator<Item = &'a OrderLine>,
{
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for l in lines {
        *totals.entry(l.pizza_name.as_str()).or_default() += l.total_price;
    }

    let mut ranked: Vec<_> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);
    ranked
        .into_iter()
        .map(|(name, total_price)| PizzaRevenue {
            pizza_name: name.to_string(),
            total_price,
        })
        .collect()
}

/// Most-sold pizzas by quantity, descending. Equal quantity is ordered by pizza name.
pub fn top_pizzas_by_quantity<'a, I>(lines: I, limit: usize) -> Vec<PizzaQuantity>
where
    I: IntoIterator<Item = &'a OrderLine>,
{
    let mut totals: HashMap<&str, i64> = HashMap::new();
    for l in lines {
        *totals.entry(l.pizza_name.as_str()).or_default() += l.quantity;
    }

    let mut ranked: Vec<_> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);
    ranked
        .into_iter()
        .map(|(name, quantity)| PizzaQuantity {
            pizza_name: name.to_string(),
            quantity,
        })
        .collect()
}

/// Distinct orders per weekday. Always seven entries, Monday first.
pub fn orders_by_day<'a, I>(lines: I) -> Vec<DayOrders>
where
    I: IntoIterator<Item = &'a OrderLine>,
{
    let mut per_day: [HashSet<i64>; 7] = Default::default();
    for l in lines {
        per_day[l.day_of_week().num_days_from_monday() as usize].insert(l.order_id);
    }

    WEEK.iter()
        .map(|day| DayOrders {
            day_of_week: calendar::day_name(*day).to_string(),
            orders: per_day[day.num_days_from_monday() as usize].len(),
        })
        .collect()
}

/// Pizzas sold per hour of day, for hours that have sales, ascending.
pub fn hourly_sales<'a, I>(lines: I) -> Vec<HourSales>
where
    I: IntoIterator<Item = &'a OrderLine>,
{
    let mut per_hour: BTreeMap<u32, i64> = BTreeMap::new();
    for l in lines {
        *per_hour.entry(l.hour()).or_default() += l.quantity;
    }

    per_hour
        .into_iter()
        .map(|(hour, quantity)| HourSales { hour, quantity })
        .collect()
}

/// Revenue per calendar month present in the data, chronological.
pub fn monthly_revenue<'a, I>(lines: I) -> Vec<MonthRevenue>
where
    I: IntoIterator<Item = &'a OrderLine>,
{
    // (year, month) keys sort chronologically.
    let mut per_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for l in lines {
        let key = (l.order_date.year(), l.order_date.month());
        *per_month.entry(key).or_default() += l.total_price;
    }

    per_month
        .into_iter()
        .map(|((year, month), revenue)| MonthRevenue {
            month: format!("{year:04}-{month:02}"),
            revenue,
        })
        .collect()
}
