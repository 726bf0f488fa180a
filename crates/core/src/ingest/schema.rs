use crate::domain::sales::OrderLine;
use crate::ingest::cells::{self, Cell};
use crate::ingest::error::LoadError;

pub const ORDER_ID: &str = "order_id";
pub const ORDER_DATE: &str = "order_date";
pub const ORDER_TIME: &str = "order_time";
pub const PIZZA_NAME: &str = "pizza_name";
pub const PIZZA_CATEGORY: &str = "pizza_category";
pub const PIZZA_SIZE: &str = "pizza_size";
pub const QUANTITY: &str = "quantity";
pub const UNIT_PRICE: &str = "unit_price";
pub const TOTAL_PRICE: &str = "total_price";

pub const REQUIRED_COLUMNS: [&str; 7] = [
    ORDER_ID,
    ORDER_DATE,
    ORDER_TIME,
    PIZZA_NAME,
    PIZZA_CATEGORY,
    QUANTITY,
    TOTAL_PRICE,
];

/// Header positions for the fixed record schema, resolved once per sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    order_id: usize,
    order_date: usize,
    order_time: usize,
    pizza_name: usize,
    pizza_category: usize,
    quantity: usize,
    total_price: usize,
    pizza_size: Option<usize>,
    unit_price: Option<usize>,
}

impl ColumnIndex {
    /// Matches header cells case-insensitively after trimming. Fails on the first
    /// required column that is absent, in `REQUIRED_COLUMNS` order.
    pub fn resolve<I, S>(headers: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: Vec<String> = headers
            .into_iter()
            .map(|h| h.as_ref().trim().to_ascii_lowercase())
            .collect();

        if normalized.iter().all(|h| h.is_empty()) {
            return Err(LoadError::missing_header("header row is empty"));
        }

        let find = |name: &str| normalized.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or_else(|| LoadError::missing_column(name));

        Ok(Self {
            order_id: require(ORDER_ID)?,
            order_date: require(ORDER_DATE)?,
            order_time: require(ORDER_TIME)?,
            pizza_name: require(PIZZA_NAME)?,
            pizza_category: require(PIZZA_CATEGORY)?,
            quantity: require(QUANTITY)?,
            total_price: require(TOTAL_PRICE)?,
            pizza_size: find(PIZZA_SIZE),
            unit_price: find(UNIT_PRICE),
        })
    }

    /// Builds one record from a data row. `row` is the 1-based spreadsheet row used in
    /// diagnostics. Returns `Ok(None)` for fully blank rows.
    pub fn parse_row(&self, row: usize, values: &[Cell<'_>]) -> Result<Option<OrderLine>, LoadError> {
        if values.iter().all(Cell::is_blank) {
            return Ok(None);
        }

        let order_id = cells::parse_integer(required(values, self.order_id, ORDER_ID, row)?)
            .map_err(invalid(ORDER_ID, row))?;
        let order_date = cells::parse_date(required(values, self.order_date, ORDER_DATE, row)?)
            .map_err(invalid(ORDER_DATE, row))?;
        let order_time = cells::parse_time(required(values, self.order_time, ORDER_TIME, row)?)
            .map_err(invalid(ORDER_TIME, row))?;
        let pizza_name = cells::parse_text(required(values, self.pizza_name, PIZZA_NAME, row)?)
            .map_err(invalid(PIZZA_NAME, row))?;
        let pizza_category =
            cells::parse_text(required(values, self.pizza_category, PIZZA_CATEGORY, row)?)
                .map_err(invalid(PIZZA_CATEGORY, row))?;
        let quantity = cells::parse_integer(required(values, self.quantity, QUANTITY, row)?)
            .map_err(invalid(QUANTITY, row))?;
        if quantity < 0 {
            return Err(LoadError::invalid_cell(
                QUANTITY,
                row,
                format!("quantity must be >= 0 (got {quantity})"),
            ));
        }
        let total_price = cells::parse_number(required(values, self.total_price, TOTAL_PRICE, row)?)
            .map_err(invalid(TOTAL_PRICE, row))?;

        let pizza_size = optional(values, self.pizza_size)
            .map(|c| cells::parse_text(c).map_err(invalid(PIZZA_SIZE, row)))
            .transpose()?;
        let unit_price = optional(values, self.unit_price)
            .map(|c| cells::parse_number(c).map_err(invalid(UNIT_PRICE, row)))
            .transpose()?;

        Ok(Some(OrderLine {
            order_id,
            order_date,
            order_time,
            pizza_name,
            pizza_category,
            pizza_size,
            quantity,
            unit_price,
            total_price,
        }))
    }
}

fn required<'c, 'a>(
    cells: &'c [Cell<'a>],
    idx: usize,
    column: &'static str,
    row: usize,
) -> Result<&'c Cell<'a>, LoadError> {
    match cells.get(idx) {
        Some(c) if !c.is_blank() => Ok(c),
        _ => Err(LoadError::invalid_cell(column, row, "value is missing")),
    }
}

fn optional<'c, 'a>(cells: &'c [Cell<'a>], idx: Option<usize>) -> Option<&'c Cell<'a>> {
    idx.and_then(|i| cells.get(i)).filter(|c| !c.is_blank())
}

fn invalid(column: &'static str, row: usize) -> impl Fn(String) -> LoadError {
    move |detail| LoadError::invalid_cell(column, row, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::error::LoadErrorKind;
    use chrono::{NaiveDate, NaiveTime};

    const HEADER: [&str; 9] = [
        "pizza_id",
        "Order_ID",
        "pizza_name",
        "quantity",
        "order_date",
        "order_time",
        "unit_price",
        "total_price",
        " pizza_category ",
    ];

    fn row_of<'a>(values: &[&'a str]) -> Vec<Cell<'a>> {
        values.iter().map(|v| Cell::from_text(*v)).collect()
    }

    #[test]
    fn resolves_headers_in_any_order_and_case() {
        let index = ColumnIndex::resolve(HEADER).unwrap();
        let row = row_of(&[
            "1", "7", "hawaiian_m", "2", "2015-01-01", "11:38:36", "13.25", "26.50", "Classic",
        ]);
        let line = index.parse_row(2, &row).unwrap().unwrap();
        assert_eq!(line.order_id, 7);
        assert_eq!(line.pizza_name, "hawaiian_m");
        assert_eq!(line.pizza_category, "Classic");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price, Some(13.25));
        assert_eq!(line.total_price, 26.5);
        assert_eq!(line.pizza_size, None);
        assert_eq!(line.order_date, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        assert_eq!(line.order_time, NaiveTime::from_hms_opt(11, 38, 36).unwrap());
    }

    #[test]
    fn missing_required_column_is_named() {
        let err = ColumnIndex::resolve(["order_id", "order_date", "pizza_name"]).unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::MissingColumn);
        assert_eq!(err.column, Some(ORDER_TIME));
        assert!(err.to_string().contains("order_time"));
    }

    #[test]
    fn empty_header_is_rejected() {
        let err = ColumnIndex::resolve(["", " "]).unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::MissingHeader);
    }

    #[test]
    fn invalid_cell_reports_column_and_row() {
        let index = ColumnIndex::resolve(HEADER).unwrap();
        let row = row_of(&[
            "1", "7", "hawaiian_m", "2", "2015-01-01", "11h38", "13.25", "26.50", "Classic",
        ]);
        let err = index.parse_row(14, &row).unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::InvalidCell);
        assert_eq!(err.column, Some(ORDER_TIME));
        assert_eq!(err.row, Some(14));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let index = ColumnIndex::resolve(HEADER).unwrap();
        let row = row_of(&[
            "1", "7", "hawaiian_m", "-1", "2015-01-01", "11:38:36", "13.25", "26.50", "Classic",
        ]);
        let err = index.parse_row(3, &row).unwrap_err();
        assert_eq!(err.column, Some(QUANTITY));
    }

    #[test]
    fn blank_rows_are_skipped_and_short_rows_fail() {
        let index = ColumnIndex::resolve(HEADER).unwrap();
        assert!(index.parse_row(5, &row_of(&["", " ", ""])).unwrap().is_none());

        let err = index.parse_row(6, &row_of(&["1", "7"])).unwrap_err();
        assert_eq!(err.column, Some(ORDER_DATE));
    }
}
