use chrono::NaiveDate;

/// Parse a time-series column header like `"1/22/20"` (M/D/YY) into a date.
/// Two-digit years are taken as 20YY; four-digit years pass through.
pub fn parse_header_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let mut parts = s.split('/');
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let year_str = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let year: i32 = match year_str.len() {
        2 => 2000 + year_str.parse::<i32>().ok()?,
        4 => year_str.parse().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse an ISO `YYYY-MM-DD` date as posted by the date picker. A trailing
/// time part (`2021-01-04T00:00:00`) is ignored.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day_part = s.split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}
