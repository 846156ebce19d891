//! Hover-text number formatting.

/// Rendered in hover text where a value is undefined.
pub const MISSING: &str = "n/a";

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `1234567` → `"1,234,567"`.
pub fn thousands(v: i64) -> String {
    let digits = v.unsigned_abs().to_string();
    let grouped = group_digits(&digits);
    if v < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Round to 0 decimals, then group: `12345.6` → `"12,346"`.
pub fn thousands_f64(v: f64) -> String {
    if !v.is_finite() {
        return MISSING.to_string();
    }
    let rounded = format!("{v:.0}");
    match rounded.strip_prefix('-') {
        Some(digits) => format!("-{}", group_digits(digits)),
        None => group_digits(&rounded),
    }
}

pub fn opt_thousands(v: Option<i64>) -> String {
    v.map(thousands).unwrap_or_else(|| MISSING.to_string())
}

pub fn opt_thousands_f64(v: Option<f64>) -> String {
    v.map(thousands_f64).unwrap_or_else(|| MISSING.to_string())
}
