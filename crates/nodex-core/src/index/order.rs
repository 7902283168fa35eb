//! Module: index::order
//! Responsibility: result-order vocabulary and the static order capability
//! table per value category.
//! Does not own: producing ordered output (physical progressors do that).

use crate::{
    error::{IndexError, QueryError},
    index::IndexPredicate,
    value::ValueCategory,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// IndexOrder
///
/// Requested order of query results. `None` makes no ordering promise and
/// is accepted for every category.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum IndexOrder {
    #[default]
    #[display("none")]
    None,
    #[display("ascending")]
    Ascending,
    #[display("descending")]
    Descending,
}

impl IndexOrder {
    /// Whether two consecutive keys respect this order.
    #[must_use]
    pub fn permits<T: Ord + ?Sized>(self, previous: &T, next: &T) -> bool {
        match self {
            Self::None => true,
            Self::Ascending => previous.cmp(next) != Ordering::Greater,
            Self::Descending => previous.cmp(next) != Ordering::Less,
        }
    }
}

///
/// OrderCapability
///
/// Result orders a category's index guarantees beyond `None`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OrderCapability(&'static [IndexOrder]);

impl OrderCapability {
    const BOTH: Self = Self(&[IndexOrder::Ascending, IndexOrder::Descending]);
    const UNORDERED: Self = Self(&[]);

    #[must_use]
    pub fn supports(self, order: IndexOrder) -> bool {
        order == IndexOrder::None || self.0.contains(&order)
    }

    /// Supported orders, excluding the implicit `None`.
    pub fn iter(self) -> impl Iterator<Item = IndexOrder> {
        self.0.iter().copied()
    }

    #[must_use]
    pub const fn is_unordered(self) -> bool {
        self.0.is_empty()
    }
}

/// Static capability table. Callers consult it before requesting an order.
#[must_use]
pub const fn order_capability(category: ValueCategory) -> OrderCapability {
    match category {
        ValueCategory::Number => OrderCapability::BOTH,
        ValueCategory::Boolean | ValueCategory::Geometry | ValueCategory::Text => {
            OrderCapability::UNORDERED
        }
    }
}

/// Reject `order` unless the queried category supports it.
///
/// The category of a composite query is the category of its leading
/// predicate. Predicates without a category (existence) cannot be ordered.
pub fn validate_order(order: IndexOrder, predicates: &[IndexPredicate]) -> Result<(), IndexError> {
    if order == IndexOrder::None {
        return Ok(());
    }

    let Some(category) = predicates.first().and_then(IndexPredicate::category) else {
        return Err(IndexError::query(QueryError::UnorderableQuery { order }));
    };

    if order_capability(category).supports(order) {
        Ok(())
    } else {
        Err(IndexError::query(QueryError::UnsupportedOrder {
            category,
            order,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::PropertyKeyId;

    #[test]
    fn numbers_support_both_directions() {
        let capability = order_capability(ValueCategory::Number);

        assert_eq!(
            capability.iter().collect::<Vec<_>>(),
            vec![IndexOrder::Ascending, IndexOrder::Descending]
        );
        assert!(capability.supports(IndexOrder::None));
    }

    #[test]
    fn unordered_categories_only_accept_none() {
        for category in [
            ValueCategory::Boolean,
            ValueCategory::Geometry,
            ValueCategory::Text,
        ] {
            let capability = order_capability(category);

            assert!(capability.is_unordered());
            assert!(capability.supports(IndexOrder::None));
            assert!(!capability.supports(IndexOrder::Ascending));
            assert!(!capability.supports(IndexOrder::Descending));
        }
    }

    #[test]
    fn validate_order_rejects_unsupported_order() {
        let err = validate_order(
            IndexOrder::Ascending,
            &[IndexPredicate::string_prefix(PropertyKeyId(0), "a")],
        )
        .expect_err("text is unordered");

        assert_eq!(
            err.query_detail(),
            Some(&QueryError::UnsupportedOrder {
                category: ValueCategory::Text,
                order: IndexOrder::Ascending,
            })
        );
    }

    #[test]
    fn validate_order_rejects_ordered_exists() {
        let err = validate_order(
            IndexOrder::Descending,
            &[IndexPredicate::exists(PropertyKeyId(0))],
        )
        .expect_err("exists has no category");

        assert_eq!(
            err.query_detail(),
            Some(&QueryError::UnorderableQuery {
                order: IndexOrder::Descending
            })
        );
    }

    #[test]
    fn permits_checks_direction() {
        assert!(IndexOrder::Ascending.permits(&1, &1));
        assert!(IndexOrder::Ascending.permits(&1, &2));
        assert!(!IndexOrder::Ascending.permits(&2, &1));
        assert!(IndexOrder::Descending.permits(&2, &1));
        assert!(!IndexOrder::Descending.permits(&1, &2));
        assert!(IndexOrder::None.permits(&2, &1));
    }
}
