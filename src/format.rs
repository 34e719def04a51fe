// ---------------------------------------------------------------------------
// Currency rendering for result tables
// ---------------------------------------------------------------------------

/// Whole-dollar amount with thousands separators, e.g. `$1,500`.
///
/// Cents are truncated, not rounded.
pub fn format_currency(amount: f64) -> String {
    format_dollars(amount.trunc() as i64)
}

pub fn format_dollars(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}${grouped}")
}
