use crate::value::{Point, Value, ValueCategory, canonical_cmp};
use proptest::prelude::*;
use std::cmp::Ordering;

#[test]
fn category_is_fixed_by_variant() {
    assert_eq!(Value::from(1).category(), ValueCategory::Number);
    assert_eq!(Value::from(1.5).category(), ValueCategory::Number);
    assert_eq!(
        Value::from(Point::cartesian(1.0, 2.0)).category(),
        ValueCategory::Geometry
    );
    assert_eq!(Value::from("a").category(), ValueCategory::Text);
    assert_eq!(Value::from(true).category(), ValueCategory::Boolean);
}

#[test]
fn int_and_float_compare_numerically() {
    assert_eq!(Value::Int(1), Value::Float(1.0));
    assert!(Value::Int(1) < Value::Float(1.5));
    assert!(Value::Float(-0.5) < Value::Int(0));
    assert_eq!(Value::Float(0.0), Value::Float(-0.0));
}

#[test]
fn large_ints_do_not_collapse_onto_nearby_floats() {
    let big = i64::MAX;
    #[expect(clippy::cast_precision_loss)]
    let rounded = big as f64;

    assert_eq!(
        canonical_cmp(&Value::Int(big), &Value::Float(rounded)),
        Ordering::Less
    );
}

#[test]
fn nan_sorts_after_every_number() {
    let nan = Value::Float(f64::NAN);

    assert!(Value::Float(f64::INFINITY) < nan);
    assert!(Value::Int(i64::MAX) < nan);
    assert_eq!(nan, Value::Float(f64::NAN));
}

#[test]
fn categories_never_interleave() {
    let mut values = vec![
        Value::from(3),
        Value::from("b"),
        Value::from(false),
        Value::from(Point::wgs84(1.0, 1.0)),
        Value::from(-1.0),
        Value::from("a"),
    ];
    values.sort();

    let categories: Vec<_> = values.iter().map(Value::category).collect();
    assert_eq!(
        categories,
        vec![
            ValueCategory::Geometry,
            ValueCategory::Text,
            ValueCategory::Text,
            ValueCategory::Boolean,
            ValueCategory::Number,
            ValueCategory::Number,
        ]
    );
}

#[test]
fn points_in_different_crs_are_distinct() {
    assert_ne!(
        Value::from(Point::cartesian(1.0, 1.0)),
        Value::from(Point::wgs84(1.0, 1.0))
    );
}

fn number() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<f64>().prop_map(Value::Float),
    ]
}

proptest! {
    #[test]
    fn canonical_cmp_is_antisymmetric(a in number(), b in number()) {
        prop_assert_eq!(canonical_cmp(&a, &b), canonical_cmp(&b, &a).reverse());
    }

    #[test]
    fn canonical_cmp_is_transitive(a in number(), b in number(), c in number()) {
        let mut sorted = [a, b, c];
        sorted.sort();
        prop_assert_ne!(canonical_cmp(&sorted[0], &sorted[2]), Ordering::Greater);
    }
}
