pub mod cells;
pub mod delimited;
pub mod error;
pub mod schema;
pub mod workbook;

use crate::domain::sales::{OrderLine, SalesTable};
use anyhow::Result;
use std::path::Path;

pub use delimited::DelimitedSource;
pub use error::{LoadError, LoadErrorKind};
pub use workbook::WorkbookSource;

pub trait SalesSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    fn load(&self) -> Result<Vec<OrderLine>>;
}

/// Picks a source implementation from the file extension.
pub fn open_source(path: &Path, sheet: &str) -> Result<Box<dyn SalesSource>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => Ok(Box::new(DelimitedSource::new(path))),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Box::new(WorkbookSource::new(path, sheet))),
        other => anyhow::bail!(
            "unsupported sales source extension '{other}' for {}",
            path.display()
        ),
    }
}

pub fn load_sales(path: &Path, sheet: &str) -> Result<SalesTable> {
    let source = open_source(path, sheet)?;
    let t0 = std::time::Instant::now();
    let records = source.load()?;

    tracing::info!(
        source = source.source_name(),
        path = %path.display(),
        sheet,
        records = records.len(),
        elapsed_ms = t0.elapsed().as_millis(),
        "sales table loaded"
    );

    Ok(SalesTable::new(records))
}
