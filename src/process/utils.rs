/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Blank cells become `None`.
pub fn non_empty(raw: &str) -> Option<&str> {
    let s = clean_str(raw);
    (!s.is_empty()).then_some(s)
}

/// Largest accepted count. Keeps `confirmed - deaths - recovered` and
/// per-date sums inside `i64`.
pub const MAX_COUNT: i64 = i64::MAX >> 2;

/// Parse a cumulative count. Integers, or floats with no fractional part
/// (`"12.0"`), in `0..=MAX_COUNT` are accepted.
pub fn parse_count(raw: &str) -> Option<i64> {
    let s = non_empty(raw)?;
    let v = match s.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let f = s.parse::<f64>().ok()?;
            if !(f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_COUNT as f64) {
                return None;
            }
            f as i64
        }
    };
    (0..=MAX_COUNT).contains(&v).then_some(v)
}

/// Parse a latitude/longitude cell. `Ok(None)` for a blank cell, `Err(())`
/// for anything that is present but not a finite number.
pub(crate) fn parse_coordinate(raw: &str) -> Result<Option<f64>, ()> {
    match non_empty(raw) {
        None => Ok(None),
        Some(s) => match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(()),
        },
    }
}
