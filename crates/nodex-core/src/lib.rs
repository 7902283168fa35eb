//! Core indexing layer for Nodex: typed property values, physical index
//! accessors, the fusion layer that composes them into one logical index,
//! and the ordered pull-based query protocol.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod index;
pub mod obs;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Maximum number of properties a single index key may span.
///
/// Composite keys wider than this are rejected by the configuration layer
/// and by every physical accessor.
pub const MAX_INDEX_FIELDS: usize = 4;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or test helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        index::{
            AllEntriesReader, DropAction, EntityId, IndexAccessor, IndexClient, IndexDescriptor,
            IndexEntryUpdate, IndexId, IndexOrder, IndexPredicate, IndexProgressor, IndexReader,
            IndexReaderExt, IndexUpdater, MaxCount, PropertyKeyId, Slot, SlotMap,
        },
        value::{Value, ValueCategory},
    };
}
