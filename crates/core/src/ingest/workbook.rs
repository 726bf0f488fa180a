use crate::domain::sales::OrderLine;
use crate::ingest::cells::Cell;
use crate::ingest::error::LoadError;
use crate::ingest::schema::ColumnIndex;
use crate::ingest::SalesSource;
use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::borrow::Cow;
use std::path::PathBuf;

/// Reads one named sheet of an Excel/ODS workbook.
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    path: PathBuf,
    sheet: String,
}

impl WorkbookSource {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
        }
    }
}

impl SalesSource for WorkbookSource {
    fn source_name(&self) -> &'static str {
        "workbook"
    }

    fn load(&self) -> Result<Vec<OrderLine>> {
        let mut workbook = open_workbook_auto(&self.path)
            .with_context(|| format!("failed to open workbook {}", self.path.display()))?;

        let sheet_names = workbook.sheet_names();
        anyhow::ensure!(
            sheet_names.iter().any(|s| s == &self.sheet),
            "sheet '{}' not found in {} (available: {})",
            self.sheet,
            self.path.display(),
            sheet_names.join(", ")
        );

        let range = workbook
            .worksheet_range(&self.sheet)
            .with_context(|| format!("failed to read sheet '{}'", self.sheet))?;

        // 1-based spreadsheet row of the header; the used range may not start at A1.
        let header_row = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);
        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| LoadError::missing_header(format!("sheet '{}' is empty", self.sheet)))?;
        let index = ColumnIndex::resolve(header.iter().map(|c| c.to_string()))?;

        let mut out = Vec::with_capacity(range.height().saturating_sub(1));
        for (offset, row) in rows.enumerate() {
            let values: Vec<Cell<'_>> = row.iter().map(to_cell).collect();
            if let Some(line) = index.parse_row(header_row + offset + 1, &values)? {
                out.push(line);
            }
        }

        Ok(out)
    }
}

fn to_cell(data: &Data) -> Cell<'_> {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(Cow::Borrowed(s)),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::Bool(b) => Cell::Text(Cow::Owned(b.to_string())),
        Data::Error(e) => Cell::Text(Cow::Owned(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::error::LoadErrorKind;
    use crate::ingest::schema::QUANTITY;
    use chrono::{NaiveDate, NaiveTime};
    use rust_xlsxwriter::{Format, Workbook};
    use tempfile::NamedTempFile;

    const HEADER: [&str; 9] = [
        "order_id",
        "order_date",
        "order_time",
        "pizza_name",
        "pizza_category",
        "pizza_size",
        "quantity",
        "unit_price",
        "total_price",
    ];

    /// 0-based row of the header; the used range starts two rows below A1.
    const HEADER_ROW: u32 = 2;

    // 2015-01-01 and 11:38:36 as Excel serials.
    const NEW_YEAR: f64 = 42005.0;
    const LUNCH: f64 = (11.0 * 3600.0 + 38.0 * 60.0 + 36.0) / 86_400.0;

    /// Writes a `pizza_sales` sheet (plus an unrelated first sheet) with date and
    /// time cells stored as formatted serials, the way Excel saves them.
    fn write_workbook(quantity: &str) -> NamedTempFile {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let date = Format::new().set_num_format("yyyy-mm-dd");
        let time = Format::new().set_num_format("hh:mm:ss");

        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("notes").unwrap();
        let sheet = workbook.add_worksheet().set_name("pizza_sales").unwrap();
        for (col, name) in HEADER.iter().enumerate() {
            sheet.write_string(HEADER_ROW, col as u16, *name).unwrap();
        }

        let first = HEADER_ROW + 1;
        sheet.write_number(first, 0, 1.0).unwrap();
        sheet.write_number_with_format(first, 1, NEW_YEAR, &date).unwrap();
        sheet.write_number_with_format(first, 2, LUNCH, &time).unwrap();
        sheet.write_string(first, 3, "hawaiian_m").unwrap();
        sheet.write_string(first, 4, "Classic").unwrap();
        sheet.write_string(first, 5, "M").unwrap();
        sheet.write_number(first, 6, 1.0).unwrap();
        sheet.write_number(first, 7, 13.25).unwrap();
        sheet.write_number(first, 8, 13.25).unwrap();

        let second = first + 1;
        sheet.write_number(second, 0, 2.0).unwrap();
        sheet.write_number_with_format(second, 1, NEW_YEAR + 1.0, &date).unwrap();
        sheet.write_number_with_format(second, 2, 0.75, &time).unwrap();
        sheet.write_string(second, 3, "thai_ckn_l").unwrap();
        sheet.write_string(second, 4, "Chicken").unwrap();
        sheet.write_string(second, 5, "L").unwrap();
        sheet.write_string(second, 6, quantity).unwrap();
        sheet.write_number(second, 7, 20.75).unwrap();
        sheet.write_number(second, 8, 41.5).unwrap();

        workbook.save(file.path()).unwrap();
        file
    }

    #[test]
    fn maps_calamine_cells() {
        assert_eq!(to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(to_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(to_cell(&Data::Float(13.25)), Cell::Number(13.25));
        assert_eq!(
            to_cell(&Data::String("Classic".to_string())),
            Cell::Text(Cow::Borrowed("Classic"))
        );
    }

    #[test]
    fn missing_file_fails_with_path() {
        let source = WorkbookSource::new("/nonexistent/pizza_sales.xlsx", "pizza_sales");
        let err = source.load().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/pizza_sales.xlsx"));
    }

    #[test]
    fn reads_formatted_dates_and_times() {
        let file = write_workbook("2");
        let lines = WorkbookSource::new(file.path(), "pizza_sales").load().unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].order_id, 1);
        assert_eq!(lines[0].order_date, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        assert_eq!(lines[0].order_time, NaiveTime::from_hms_opt(11, 38, 36).unwrap());
        assert_eq!(lines[0].pizza_size.as_deref(), Some("M"));
        assert_eq!(lines[0].unit_price, Some(13.25));

        assert_eq!(lines[1].order_date, NaiveDate::from_ymd_opt(2015, 1, 2).unwrap());
        assert_eq!(lines[1].order_time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(lines[1].pizza_category, "Chicken");
        assert_eq!(lines[1].quantity, 2);
        assert_eq!(lines[1].total_price, 41.5);

        let table = crate::ingest::load_sales(file.path(), "pizza_sales").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn missing_sheet_lists_available_sheets() {
        let file = write_workbook("2");
        let err = WorkbookSource::new(file.path(), "x").load().unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("sheet 'x' not found"), "{msg}");
        assert!(msg.contains("notes, pizza_sales"), "{msg}");
    }

    #[test]
    fn bad_cell_reports_spreadsheet_row() {
        let file = write_workbook("two");
        let err = WorkbookSource::new(file.path(), "pizza_sales").load().unwrap_err();
        let load = err.downcast_ref::<LoadError>().unwrap();

        assert_eq!(load.kind, LoadErrorKind::InvalidCell);
        assert_eq!(load.column, Some(QUANTITY));
        // Header on row 3, so the second data row is spreadsheet row 5.
        assert_eq!(load.row, Some(HEADER_ROW as usize + 3));
    }
}
