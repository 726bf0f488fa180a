use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    MissingHeader,
    MissingColumn,
    InvalidCell,
}

/// Load-time schema diagnostics. Recover it from an `anyhow::Error` with `downcast_ref`.
#[derive(Debug, Clone)]
pub struct LoadError {
    pub kind: LoadErrorKind,
    pub column: Option<&'static str>,
    pub row: Option<usize>,
    pub detail: String,
}

impl LoadError {
    pub fn missing_header(detail: impl Into<String>) -> Self {
        Self {
            kind: LoadErrorKind::MissingHeader,
            column: None,
            row: None,
            detail: detail.into(),
        }
    }

    pub fn missing_column(column: &'static str) -> Self {
        Self {
            kind: LoadErrorKind::MissingColumn,
            column: Some(column),
            row: None,
            detail: format!("required column '{column}' not found in header"),
        }
    }

    pub fn invalid_cell(column: &'static str, row: usize, detail: impl Into<String>) -> Self {
        Self {
            kind: LoadErrorKind::InvalidCell,
            column: Some(column),
            row: Some(row),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sales load error ({:?}", self.kind)?;
        if let Some(column) = self.column {
            write!(f, ", column={column}")?;
        }
        if let Some(row) = self.row {
            write!(f, ", row={row}")?;
        }
        write!(f, "): {}", self.detail)
    }
}

impl std::error::Error for LoadError {}
