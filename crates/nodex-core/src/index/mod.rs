//! Property indexes: physical accessor contracts, slot routing, the fused
//! logical accessor and the ordered query protocol.

mod accessor;
mod descriptor;
mod order;
mod predicate;
mod selector;
mod slot;
mod update;

pub mod fusion;
pub mod memory;
pub mod query;

pub use accessor::{
    AllEntriesReader, DropAction, IndexAccessor, IndexReader, IndexReaderExt, IndexUpdater,
    MaxCount, UpdateMode,
};
pub use descriptor::{EntityId, IndexDescriptor, IndexId, PropertyKeyId};
pub use order::{IndexOrder, OrderCapability, order_capability, validate_order};
pub use predicate::IndexPredicate;
pub use query::{IndexClient, IndexProgressor, IndexQuery};
pub use selector::{SlotSelection, select_slots, slot_for, slot_for_values};
pub use slot::{Slot, SlotMap};
pub use update::{IndexEntryUpdate, UpdateKind};
