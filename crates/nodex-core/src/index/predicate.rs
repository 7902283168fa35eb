use crate::{
    index::PropertyKeyId,
    value::{Point, Value, ValueCategory},
};
use std::ops::Bound;

///
/// IndexPredicate
///
/// One typed constraint over a single indexed property. A query carries one
/// predicate per key property, in key order.
///

#[derive(Clone, Debug, PartialEq)]
pub enum IndexPredicate {
    Exact {
        property: PropertyKeyId,
        value: Value,
    },

    /// Interval over one ordered category. Bound values always belong to
    /// `category`; values of other categories never match.
    Range {
        property: PropertyKeyId,
        category: ValueCategory,
        lower: Bound<Value>,
        upper: Bound<Value>,
    },

    /// Axis-aligned bounding box, inclusive on every edge.
    GeometryRange {
        property: PropertyKeyId,
        lower: Point,
        upper: Point,
    },

    Exists {
        property: PropertyKeyId,
    },

    StringPrefix {
        property: PropertyKeyId,
        prefix: String,
    },

    StringContains {
        property: PropertyKeyId,
        needle: String,
    },

    StringSuffix {
        property: PropertyKeyId,
        suffix: String,
    },
}

impl IndexPredicate {
    pub fn exact(property: PropertyKeyId, value: impl Into<Value>) -> Self {
        Self::Exact {
            property,
            value: value.into(),
        }
    }

    #[must_use]
    pub const fn number_range(
        property: PropertyKeyId,
        lower: Bound<Value>,
        upper: Bound<Value>,
    ) -> Self {
        Self::Range {
            property,
            category: ValueCategory::Number,
            lower,
            upper,
        }
    }

    /// Numeric interval with explicit inclusivity flags.
    #[must_use]
    pub fn number_between(
        property: PropertyKeyId,
        from: impl Into<Value>,
        from_inclusive: bool,
        to: impl Into<Value>,
        to_inclusive: bool,
    ) -> Self {
        Self::number_range(
            property,
            bound(from.into(), from_inclusive),
            bound(to.into(), to_inclusive),
        )
    }

    #[must_use]
    pub const fn text_range(
        property: PropertyKeyId,
        lower: Bound<Value>,
        upper: Bound<Value>,
    ) -> Self {
        Self::Range {
            property,
            category: ValueCategory::Text,
            lower,
            upper,
        }
    }

    #[must_use]
    pub const fn geometry_range(property: PropertyKeyId, lower: Point, upper: Point) -> Self {
        Self::GeometryRange {
            property,
            lower,
            upper,
        }
    }

    #[must_use]
    pub const fn exists(property: PropertyKeyId) -> Self {
        Self::Exists { property }
    }

    pub fn string_prefix(property: PropertyKeyId, prefix: impl Into<String>) -> Self {
        Self::StringPrefix {
            property,
            prefix: prefix.into(),
        }
    }

    pub fn string_contains(property: PropertyKeyId, needle: impl Into<String>) -> Self {
        Self::StringContains {
            property,
            needle: needle.into(),
        }
    }

    pub fn string_suffix(property: PropertyKeyId, suffix: impl Into<String>) -> Self {
        Self::StringSuffix {
            property,
            suffix: suffix.into(),
        }
    }

    #[must_use]
    pub const fn property(&self) -> PropertyKeyId {
        match self {
            Self::Exact { property, .. }
            | Self::Range { property, .. }
            | Self::GeometryRange { property, .. }
            | Self::Exists { property }
            | Self::StringPrefix { property, .. }
            | Self::StringContains { property, .. }
            | Self::StringSuffix { property, .. } => *property,
        }
    }

    /// Category of the values this predicate can match, or `None` when it
    /// matches every category.
    #[must_use]
    pub const fn category(&self) -> Option<ValueCategory> {
        match self {
            Self::Exact { value, .. } => Some(value.category()),
            Self::Range { category, .. } => Some(*category),
            Self::GeometryRange { .. } => Some(ValueCategory::Geometry),
            Self::Exists { .. } => None,
            Self::StringPrefix { .. } | Self::StringContains { .. } | Self::StringSuffix { .. } => {
                Some(ValueCategory::Text)
            }
        }
    }

    /// Category of the first range bound outside the range's own category.
    #[must_use]
    pub fn mismatched_bound(&self) -> Option<ValueCategory> {
        let Self::Range {
            category,
            lower,
            upper,
            ..
        } = self
        else {
            return None;
        };

        [lower.as_ref(), upper.as_ref()]
            .into_iter()
            .filter_map(bound_value)
            .map(Value::category)
            .find(|found| found != category)
    }

    /// Lower seek bound for an ordered scan, when the predicate has one.
    #[must_use]
    pub fn seek_lower(&self) -> Bound<&Value> {
        match self {
            Self::Exact { value, .. } => Bound::Included(value),
            Self::Range { lower, .. } => lower.as_ref(),
            _ => Bound::Unbounded,
        }
    }

    /// Upper seek bound for an ordered scan, when the predicate has one.
    #[must_use]
    pub fn seek_upper(&self) -> Bound<&Value> {
        match self {
            Self::Exact { value, .. } => Bound::Included(value),
            Self::Range { upper, .. } => upper.as_ref(),
            _ => Bound::Unbounded,
        }
    }

    #[must_use]
    pub fn accepts_value(&self, value: &Value) -> bool {
        match self {
            Self::Exact { value: expected, .. } => expected == value,
            Self::Range {
                category,
                lower,
                upper,
                ..
            } => {
                value.category() == *category
                    && above_lower(lower.as_ref(), value)
                    && below_upper(upper.as_ref(), value)
            }
            Self::GeometryRange { lower, upper, .. } => value.as_point().is_some_and(|point| {
                point.crs == lower.crs
                    && point.crs == upper.crs
                    && (lower.x..=upper.x).contains(&point.x)
                    && (lower.y..=upper.y).contains(&point.y)
            }),
            Self::Exists { .. } => true,
            Self::StringPrefix { prefix, .. } => {
                value.as_text().is_some_and(|text| text.starts_with(prefix.as_str()))
            }
            Self::StringContains { needle, .. } => {
                value.as_text().is_some_and(|text| text.contains(needle.as_str()))
            }
            Self::StringSuffix { suffix, .. } => {
                value.as_text().is_some_and(|text| text.ends_with(suffix.as_str()))
            }
        }
    }
}

fn bound(value: Value, inclusive: bool) -> Bound<Value> {
    if inclusive {
        Bound::Included(value)
    } else {
        Bound::Excluded(value)
    }
}

const fn bound_value(bound: Bound<&Value>) -> Option<&Value> {
    match bound {
        Bound::Included(value) | Bound::Excluded(value) => Some(value),
        Bound::Unbounded => None,
    }
}

fn above_lower(lower: Bound<&Value>, value: &Value) -> bool {
    match lower {
        Bound::Included(bound) => value >= bound,
        Bound::Excluded(bound) => value > bound,
        Bound::Unbounded => true,
    }
}

fn below_upper(upper: Bound<&Value>, value: &Value) -> bool {
    match upper {
        Bound::Included(bound) => value <= bound,
        Bound::Excluded(bound) => value < bound,
        Bound::Unbounded => true,
    }
}
