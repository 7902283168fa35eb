//! Value category classification.
//!
//! Categories are the unit of index routing and of order capability.
//! Slot assignment itself lives in `index::selector`, never here.

use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// ValueCategory
///
/// Coarse value classification shared by routing and ordering decisions.
/// Values of one category share one total order.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum ValueCategory {
    #[display("boolean")]
    Boolean,
    #[display("geometry")]
    Geometry,
    #[display("number")]
    Number,
    #[display("text")]
    Text,
}

impl ValueCategory {
    pub const ALL: [Self; 4] = [Self::Boolean, Self::Geometry, Self::Number, Self::Text];

    /// Stable rank used for cross-category ordering.
    ///
    /// Rank order is part of deterministic full-scan output and must stay
    /// fixed for existing stores.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Geometry => 0,
            Self::Text => 1,
            Self::Boolean => 2,
            Self::Number => 3,
        }
    }
}
