use crate::value::{Point, Value};
use std::cmp::Ordering;

/// Total canonical comparator used by key stores, predicates and order
/// verification.
///
/// Ordering rules:
/// 1. Category rank
/// 2. Category-specific comparison for values of the same category
///
/// Numbers compare by numeric value across `Int` and `Float`; NaN sorts
/// after every other number.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => cmp_float(*a, *b),
        (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, *b),
        (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, *a).reverse(),
        (Value::Point(a), Value::Point(b)) => cmp_point(a, b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        _ => left.category().rank().cmp(&right.category().rank()),
    }
}

// Positive and negative zero are the same key; NaN is last.
fn cmp_float(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn cmp_int_float(int: i64, float: f64) -> Ordering {
    if float.is_nan() {
        return Ordering::Less;
    }

    match (int as f64).partial_cmp(&float) {
        Some(Ordering::Equal) | None => {
            // Float is integral here; settle precision loss exactly.
            let truncated = float as i128;
            i128::from(int).cmp(&truncated).then_with(|| {
                if float.fract() > 0.0 {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
        }
        Some(ordering) => ordering,
    }
}

fn cmp_point(a: &Point, b: &Point) -> Ordering {
    a.crs
        .cmp(&b.crs)
        .then_with(|| cmp_float(a.x, b.x))
        .then_with(|| cmp_float(a.y, b.y))
}
