use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Display order for every per-weekday series.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Year-month bucket label, e.g. `2015-03`.
pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Converts an Excel serial (days since 1899-12-30, fractional part = time of day)
/// into a naive datetime. Serials in the 1900 leap-year bug range are not special-cased.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc();
    // Round to the nearest second; Excel stores times as binary fractions.
    let secs = ((serial - days) * SECONDS_PER_DAY).round() as i64;
    epoch
        .checked_add_signed(Duration::days(days as i64))?
        .checked_add_signed(Duration::seconds(secs))
}

/// Time-of-day part of an Excel serial. Whole days are discarded, so both
/// `0.5` and `42005.5` map to 12:00:00.
pub fn excel_serial_to_time(serial: f64) -> Option<NaiveTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let secs = (serial.fract() * SECONDS_PER_DAY).round() as u32;
    // 23:59:59.6 rounds up to a full day.
    NaiveTime::from_num_seconds_from_midnight_opt(secs % 86_400, 0)
}
