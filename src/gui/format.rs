//! Number formatting for metric cards and tables.

/// Integer with comma thousands separators: `1234567` -> `"1,234,567"`.
pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Currency rounded to whole units: `59040.4` -> `"$59,040 MXN"`.
pub fn currency(value: f64) -> String {
    format!("${} MXN", thousands(value.round() as i64))
}

/// Fraction shown as a percentage with two decimals.
pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
