//! Module: index::selector
//! Responsibility: the single category-to-slot mapping of a fused index.
//! Does not own: slot lifecycle or query execution.
//! Boundary: write routing and read fan-out both call into this module;
//! no other module may embed category-to-slot logic.

use crate::{
    index::{IndexPredicate, Slot},
    value::{Value, ValueCategory},
};

///
/// SlotSelection
///
/// Slots a query has to visit.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotSelection {
    One(Slot),
    All,
}

/// Physical slot owning values of `category`.
///
/// Changing this mapping changes the layout of every fused index.
#[must_use]
pub const fn slot_for(category: ValueCategory) -> Slot {
    match category {
        ValueCategory::Number => Slot::Number,
        ValueCategory::Geometry => Slot::Spatial,
        ValueCategory::Text | ValueCategory::Boolean => Slot::Generic,
    }
}

/// Physical slot owning one index key.
///
/// Composite keys always live in the generic slot; single-value keys follow
/// their value's category.
#[must_use]
pub const fn slot_for_values(values: &[Value]) -> Slot {
    match values {
        [value] => slot_for(value.category()),
        _ => Slot::Generic,
    }
}

/// Slots a query over `predicates` must fan out to.
#[must_use]
pub fn select_slots(predicates: &[IndexPredicate]) -> SlotSelection {
    match predicates {
        [predicate] => predicate
            .category()
            .map_or(SlotSelection::All, |category| {
                SlotSelection::One(slot_for(category))
            }),
        [] => SlotSelection::All,
        _ => SlotSelection::One(Slot::Generic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{index::PropertyKeyId, value::Point};
    use std::ops::Bound;

    const PROP: PropertyKeyId = PropertyKeyId(0);

    #[test]
    fn every_category_maps_to_exactly_one_slot() {
        for category in ValueCategory::ALL {
            let expected = match category {
                ValueCategory::Number => Slot::Number,
                ValueCategory::Geometry => Slot::Spatial,
                ValueCategory::Text | ValueCategory::Boolean => Slot::Generic,
            };

            assert_eq!(slot_for(category), expected, "category {category}");
        }
    }

    #[test]
    fn every_slot_is_reachable() {
        for slot in Slot::ALL {
            assert!(
                ValueCategory::ALL.iter().any(|c| slot_for(*c) == slot),
                "slot {slot} has no category"
            );
        }
    }

    #[test]
    fn single_values_route_by_category() {
        assert_eq!(slot_for_values(&[Value::from(1)]), Slot::Number);
        assert_eq!(slot_for_values(&[Value::from(2.5)]), Slot::Number);
        assert_eq!(
            slot_for_values(&[Value::from(Point::cartesian(0.0, 0.0))]),
            Slot::Spatial
        );
        assert_eq!(slot_for_values(&[Value::from("x")]), Slot::Generic);
        assert_eq!(slot_for_values(&[Value::from(true)]), Slot::Generic);
    }

    #[test]
    fn composite_values_route_to_generic() {
        assert_eq!(
            slot_for_values(&[Value::from(1), Value::from(2)]),
            Slot::Generic
        );
        assert_eq!(slot_for_values(&[]), Slot::Generic);
    }

    #[test]
    fn queries_select_slots_by_predicate_category() {
        assert_eq!(
            select_slots(&[IndexPredicate::exact(PROP, 5)]),
            SlotSelection::One(Slot::Number)
        );
        assert_eq!(
            select_slots(&[IndexPredicate::number_range(
                PROP,
                Bound::Included(Value::from(0)),
                Bound::Unbounded,
            )]),
            SlotSelection::One(Slot::Number)
        );
        assert_eq!(
            select_slots(&[IndexPredicate::string_prefix(PROP, "ab")]),
            SlotSelection::One(Slot::Generic)
        );
        assert_eq!(
            select_slots(&[IndexPredicate::geometry_range(
                PROP,
                Point::cartesian(0.0, 0.0),
                Point::cartesian(1.0, 1.0),
            )]),
            SlotSelection::One(Slot::Spatial)
        );
        assert_eq!(
            select_slots(&[IndexPredicate::exists(PROP)]),
            SlotSelection::All
        );
        assert_eq!(
            select_slots(&[
                IndexPredicate::exact(PROP, 1),
                IndexPredicate::exact(PropertyKeyId(1), 2),
            ]),
            SlotSelection::One(Slot::Generic)
        );
    }
}
