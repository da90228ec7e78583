//! Number formatting for metric cards and chart axes.

/// `1234567` → `"1,234,567"`.
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

/// Whole currency units with a `$` prefix: `$1,234`, `$-50`.
pub fn currency(value: i64) -> String {
    format!("${}", thousands(value))
}

/// Currency rounded half-to-even to whole units.
pub fn currency_rounded(value: f64) -> String {
    currency(value.round_ties_even() as i64)
}

/// One decimal place with a percent sign.
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}
