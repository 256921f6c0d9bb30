//! Defensive coercion of stored counter values.

use serde_json::Value;

/// Read a stored JSON value as a visit count.
///
/// Absent, null, and junk all coerce to `0` so a poisoned slot recovers on
/// the next visit instead of wedging the widget. Numeric strings keep their
/// leading integer part, matching how historically stored values were
/// parsed. Counts are non-negative, so negative and non-integral numbers
/// also read as `0`.
pub fn coerce_count(value: Option<&Value>) -> u64 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => leading_int(s),
        Some(_) => 0,
    }
}

/// Leading-integer parse: optional sign, decimal digits, junk suffix
/// ignored. Negative, empty, and overflowing runs read as `0`.
fn leading_int(s: &str) -> u64 {
    let t = s.trim_start();
    let (negative, digits) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t.strip_prefix('+').unwrap_or(t)),
    };
    if negative {
        return 0;
    }
    let run: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    run.parse().unwrap_or(0)
}
