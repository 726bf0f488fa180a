use crate::time::calendar;
use chrono::{NaiveDate, NaiveTime};
use std::borrow::Cow;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];
const TIME_FORMAT: &str = "%H:%M:%S";

/// A single spreadsheet cell, normalised across workbook and CSV sources.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Empty,
    Text(Cow<'a, str>),
    Number(f64),
}

impl<'a> Cell<'a> {
    /// CSV fields are always text; blank fields become `Empty`.
    pub fn from_text(s: &'a str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(Cow::Borrowed(s))
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    fn describe(&self) -> String {
        match self {
            Cell::Empty => "<empty>".to_string(),
            Cell::Text(s) => format!("'{s}'"),
            Cell::Number(n) => n.to_string(),
        }
    }
}

pub fn parse_text(cell: &Cell<'_>) -> Result<String, String> {
    match cell {
        Cell::Text(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Cell::Number(n) => Ok(n.to_string()),
        other => Err(format!("expected text, got {}", other.describe())),
    }
}

pub fn parse_integer(cell: &Cell<'_>) -> Result<i64, String> {
    match cell {
        Cell::Number(n) if n.is_finite() && n.fract() == 0.0 => Ok(*n as i64),
        Cell::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .or_else(|_| match s.parse::<f64>() {
                    Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
                    _ => Err(()),
                })
                .map_err(|_| format!("expected an integer, got '{s}'"))
        }
        other => Err(format!("expected an integer, got {}", other.describe())),
    }
}

pub fn parse_number(cell: &Cell<'_>) -> Result<f64, String> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => {
            let s = s.trim().trim_start_matches('$').replace(',', "");
            s.parse::<f64>()
                .map_err(|_| format!("expected a number, got {}", cell.describe()))?
        }
        Cell::Empty => return Err("expected a number, got <empty>".to_string()),
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("number must be finite (got {value})"))
    }
}

/// Accepts Excel date serials and `YYYY-MM-DD`, `MM/DD/YYYY` or `DD-MM-YYYY`
/// strings. A trailing time part (after a space or `T`) is ignored.
pub fn parse_date(cell: &Cell<'_>) -> Result<NaiveDate, String> {
    match cell {
        Cell::Number(n) => calendar::excel_serial_to_datetime(*n)
            .map(|dt| dt.date())
            .ok_or_else(|| format!("invalid date serial {n}")),
        Cell::Text(s) => {
            let s = s.trim();
            let date_part = s.split([' ', 'T']).next().unwrap_or(s);
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
                .ok_or_else(|| format!("unparsable date '{s}'"))
        }
        Cell::Empty => Err("expected a date, got <empty>".to_string()),
    }
}

/// Accepts Excel time serials (fraction of a day) and `HH:MM:SS` strings only.
pub fn parse_time(cell: &Cell<'_>) -> Result<NaiveTime, String> {
    match cell {
        Cell::Number(n) => {
            calendar::excel_serial_to_time(*n).ok_or_else(|| format!("invalid time serial {n}"))
        }
        Cell::Text(s) => {
            let s = s.trim();
            NaiveTime::parse_from_str(s, TIME_FORMAT)
                .map_err(|_| format!("unparsable time '{s}', expected HH:MM:SS"))
        }
        Cell::Empty => Err("expected a time, got <empty>".to_string()),
    }
}
