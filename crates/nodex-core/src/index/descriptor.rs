use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};

/// Entity reference stored in index entries (node or relationship id).
pub type EntityId = u64;

///
/// IndexId
///

#[derive(
    Clone, Copy, Debug, Deref, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct IndexId(pub u64);

///
/// PropertyKeyId
///

#[derive(
    Clone, Copy, Debug, Deref, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct PropertyKeyId(pub u32);

///
/// IndexDescriptor
///
/// Identity and key shape of one logical index. The key arity is the
/// number of indexed properties; every update and every query must supply
/// exactly that many values or predicates.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexDescriptor {
    pub id: IndexId,
    pub properties: Vec<PropertyKeyId>,
}

impl IndexDescriptor {
    #[must_use]
    pub const fn new(id: IndexId, properties: Vec<PropertyKeyId>) -> Self {
        Self { id, properties }
    }

    /// Single-property index descriptor.
    #[must_use]
    pub fn single(id: u64, property: u32) -> Self {
        Self::new(IndexId(id), vec![PropertyKeyId(property)])
    }

    #[must_use]
    pub const fn arity(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub const fn is_composite(&self) -> bool {
        self.properties.len() > 1
    }
}
