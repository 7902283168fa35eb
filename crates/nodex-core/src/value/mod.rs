mod category;
mod compare;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

// re-exports
pub use category::ValueCategory;
pub use compare::canonical_cmp;

///
/// Crs
///
/// Coordinate reference system of a spatial point. Points in different
/// reference systems never compare as equal and never share a bounding box.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Crs {
    Cartesian,
    Wgs84,
}

///
/// Point
///

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Point {
    pub crs: Crs,
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn cartesian(x: f64, y: f64) -> Self {
        Self {
            crs: Crs::Cartesian,
            x,
            y,
        }
    }

    #[must_use]
    pub const fn wgs84(longitude: f64, latitude: f64) -> Self {
        Self {
            crs: Crs::Wgs84,
            x: longitude,
            y: latitude,
        }
    }
}

///
/// Value
///
/// One indexable property value. The variant fixes the value's
/// [`ValueCategory`] for its whole lifetime.
///
/// Equality and ordering follow [`canonical_cmp`], so `Int(1)` and
/// `Float(1.0)` are the same index key.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum Value {
    Bool(bool),
    Float(f64),
    Int(i64),
    Point(Point),
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn category(&self) -> ValueCategory {
        match self {
            Self::Bool(_) => ValueCategory::Boolean,
            Self::Float(_) | Self::Int(_) => ValueCategory::Number,
            Self::Point(_) => ValueCategory::Geometry,
            Self::Text(_) => ValueCategory::Text,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_point(&self) -> Option<&Point> {
        match self {
            Self::Point(point) => Some(point),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        canonical_cmp(self, other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        canonical_cmp(self, other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Point(p) => write!(f, "point({:?}, {}, {})", p.crs, p.x, p.y),
            Self::Text(v) => write!(f, "'{v}'"),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Bool,
    f32 => Float,
    f64 => Float,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    Point => Point,
    String => Text,
    &str => Text,
}
