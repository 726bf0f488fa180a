use crate::domain::sales::OrderLine;
use crate::ingest::cells::Cell;
use crate::ingest::schema::ColumnIndex;
use crate::ingest::SalesSource;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Reads a comma-separated export of the sales sheet. The first line is the header.
#[derive(Debug, Clone)]
pub struct DelimitedSource {
    path: PathBuf,
}

impl DelimitedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SalesSource for DelimitedSource {
    fn source_name(&self) -> &'static str {
        "csv"
    }

    fn load(&self) -> Result<Vec<OrderLine>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("failed to read header of {}", self.path.display()))?
            .clone();
        let index = ColumnIndex::resolve(headers.iter())?;

        let mut out = Vec::new();
        for (offset, record) in reader.records().enumerate() {
            // Header is line 1.
            let row = offset + 2;
            let record = record.with_context(|| format!("malformed CSV record at row {row}"))?;
            let values: Vec<Cell<'_>> = record.iter().map(Cell::from_text).collect();
            if let Some(line) = index.parse_row(row, &values)? {
                out.push(line);
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::error::{LoadError, LoadErrorKind};
    use std::io::Write;

    fn write_csv(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_kaggle_style_export() {
        let file = write_csv(
            "pizza_id,order_id,pizza_name_id,quantity,order_date,order_time,unit_price,total_price,pizza_size,pizza_category,pizza_ingredients,pizza_name\n\
             1,1,hawaiian_m,1,1/1/2015,11:38:36,13.25,13.25,M,Classic,\"Sliced Ham, Pineapple, Mozzarella Cheese\",The Hawaiian Pizza\n\
             2,2,classic_dlx_m,1,1/1/2015,11:57:40,16,16,M,Classic,\"Pepperoni, Mushrooms\",The Classic Deluxe Pizza\n\
             ,,,,,,,,,,,\n\
             3,2,five_cheese_l,2,1/2/2015,11:57:40,18.5,37,L,Veggie,\"Mozzarella Cheese\",The Five Cheese Pizza\n",
        );

        let lines = DelimitedSource::new(file.path()).load().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].pizza_name, "The Hawaiian Pizza");
        assert_eq!(lines[0].pizza_size.as_deref(), Some("M"));
        assert_eq!(lines[2].quantity, 2);
        assert_eq!(lines[2].total_price, 37.0);
        assert_eq!(lines[2].day_name(), "Friday");
    }

    #[test]
    fn missing_column_surfaces_load_error() {
        let file = write_csv("order_id,order_date,pizza_name\n1,2015-01-01,x\n");
        let err = DelimitedSource::new(file.path()).load().unwrap_err();
        let diag = err.downcast_ref::<LoadError>().unwrap();
        assert_eq!(diag.kind, LoadErrorKind::MissingColumn);
        assert_eq!(diag.column, Some("order_time"));
    }

    #[test]
    fn bad_time_reports_row() {
        let file = write_csv(
            "order_id,order_date,order_time,pizza_name,pizza_category,quantity,total_price\n\
             1,2015-01-01,11:38:36,a,Classic,1,10\n\
             2,2015-01-01,noon,b,Classic,1,10\n",
        );
        let err = DelimitedSource::new(file.path()).load().unwrap_err();
        let diag = err.downcast_ref::<LoadError>().unwrap();
        assert_eq!(diag.column, Some("order_time"));
        assert_eq!(diag.row, Some(3));
    }

    #[test]
    fn header_only_file_is_empty_table() {
        let file = write_csv(
            "order_id,order_date,order_time,pizza_name,pizza_category,quantity,total_price\n",
        );
        let lines = DelimitedSource::new(file.path()).load().unwrap();
        assert!(lines.is_empty());
    }
}
