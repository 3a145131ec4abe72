//! # JSON Value Helpers
//!
//! Deep equality, message rendering and numeric helpers over
//! `serde_json::Value`, shared by every node kind.
//!
//! Numbers compare by their `f64` value so that `27` and `27.0` are the
//! same value whether they arrive from a schema literal, a YAML document
//! or arithmetic.

use serde_json::Value;

/// Deep structural equality with numeric comparison by value.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Whether any two entries of `values` are deeply equal.
pub fn has_duplicates(values: &[Value]) -> bool {
    values
        .iter()
        .enumerate()
        .any(|(i, a)| values[i + 1..].iter().any(|b| values_equal(a, b)))
}

/// Render a value for a finding message or an option label.
///
/// Strings are rendered bare, numbers without a trailing `.0`, everything
/// else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => display_number(f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Render a list of values as `a, b, c`.
pub fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(display_value)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render an `f64` the way a schema author wrote it (`10`, not `10.0`).
pub fn display_number(n: f64) -> String {
    format!("{n}")
}

/// Number of digits after the decimal point in the shortest rendering of `n`.
pub fn decimal_places(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let rendered = format!("{n}");
    match rendered.split_once('.') {
        Some((_, fraction)) => fraction.len() as u32,
        None => 0,
    }
}

/// Whether `value` is an exact multiple of `divisor`.
///
/// Both operands are scaled by `10^max(decimals(value), decimals(divisor))`
/// and rounded to integers before taking the remainder, so `0.3` is a
/// multiple of `0.1`.
pub fn is_multiple_of(value: f64, divisor: f64) -> bool {
    let places = decimal_places(value).max(decimal_places(divisor));
    let multiplier = 10f64.powi(places as i32);
    let scaled_divisor = (divisor * multiplier).round();
    if scaled_divisor == 0.0 {
        return false;
    }
    (value * multiplier).round() % scaled_divisor == 0.0
}
