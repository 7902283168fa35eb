//! Module: index::memory
//! Responsibility: a complete physical index held in an ordered set, used
//! as the default slot back-end and as a reference for accessor semantics.
//! Does not own: durability. `force` only clears the dirty flag and
//! `snapshot_files` is always empty.

mod reader;
mod updater;


pub use reader::{MemoryAllEntriesReader, MemoryIndexReader};
pub use updater::MemoryIndexUpdater;

use crate::{
    config::IndexConfig,
    error::IndexError,
    index::{
        AllEntriesReader, EntityId, IndexAccessor, IndexDescriptor, IndexReader, IndexUpdater,
        UpdateMode,
    },
    value::Value,
};
use std::{collections::BTreeSet, path::PathBuf};

///
/// IndexKey
///
/// One stored entry. Ordered by key values first, then entity id, so all
/// entities sharing a key value sit next to each other.
///

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) struct IndexKey {
    pub(crate) values: Vec<Value>,
    pub(crate) entity: EntityId,
}

impl IndexKey {
    pub(crate) const fn new(values: Vec<Value>, entity: EntityId) -> Self {
        Self { values, entity }
    }
}

///
/// AccessorState
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AccessorState {
    Open,
    Dropped,
    Closed,
}

///
/// MemoryIndexAccessor
///

#[derive(Debug)]
pub struct MemoryIndexAccessor {
    descriptor: IndexDescriptor,
    config: IndexConfig,
    entries: BTreeSet<IndexKey>,
    state: AccessorState,
    dirty: bool,
}

impl MemoryIndexAccessor {
    /// Open an empty index. The descriptor's key arity must fit the
    /// configured maximum.
    pub fn new(descriptor: IndexDescriptor, config: IndexConfig) -> Result<Self, IndexError> {
        config.validate()?;

        let arity = descriptor.arity();
        if arity == 0 || arity > config.max_key_arity {
            return Err(IndexError::accessor_invariant(format!(
                "index {} has key arity {arity}, expected 1..={}",
                descriptor.id, config.max_key_arity
            )));
        }

        Ok(Self {
            descriptor,
            config,
            entries: BTreeSet::new(),
            state: AccessorState::Open,
            dirty: false,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }

    fn ensure_open(&self, op: &str) -> Result<(), IndexError> {
        match self.state {
            AccessorState::Open => Ok(()),
            AccessorState::Dropped => Err(IndexError::accessor_invariant(format!(
                "{op} on dropped index {}",
                self.descriptor.id
            ))),
            AccessorState::Closed => Err(IndexError::accessor_invariant(format!(
                "{op} on closed index {}",
                self.descriptor.id
            ))),
        }
    }
}

impl IndexAccessor for MemoryIndexAccessor {
    fn descriptor(&self) -> &IndexDescriptor {
        &self.descriptor
    }

    fn drop_index(&mut self) -> Result<(), IndexError> {
        self.ensure_open("drop")?;

        self.entries.clear();
        self.dirty = false;
        self.state = AccessorState::Dropped;

        Ok(())
    }

    // Closing a dropped index is allowed; closing twice is not.
    fn close(&mut self) -> Result<(), IndexError> {
        if self.state == AccessorState::Closed {
            return Err(IndexError::accessor_invariant(format!(
                "index {} is already closed",
                self.descriptor.id
            )));
        }
        self.state = AccessorState::Closed;

        Ok(())
    }

    fn force(&mut self) -> Result<(), IndexError> {
        self.ensure_open("force")?;
        self.dirty = false;

        Ok(())
    }

    fn refresh(&mut self) -> Result<(), IndexError> {
        self.ensure_open("refresh")
    }

    fn new_updater(&mut self, mode: UpdateMode) -> Result<Box<dyn IndexUpdater + '_>, IndexError> {
        self.ensure_open("new_updater")?;

        Ok(Box::new(MemoryIndexUpdater::new(
            &self.descriptor,
            &mut self.entries,
            &mut self.dirty,
            mode,
        )))
    }

    fn new_reader(&self) -> Result<Box<dyn IndexReader + '_>, IndexError> {
        self.ensure_open("new_reader")?;

        Ok(Box::new(MemoryIndexReader::new(
            &self.descriptor,
            &self.entries,
            self.config.verify_order,
        )))
    }

    fn new_all_entries_reader(&self) -> Result<Box<dyn AllEntriesReader + '_>, IndexError> {
        self.ensure_open("new_all_entries_reader")?;

        Ok(Box::new(MemoryAllEntriesReader::new(&self.entries)))
    }

    fn snapshot_files(&self) -> Result<Vec<PathBuf>, IndexError> {
        self.ensure_open("snapshot_files")?;

        Ok(Vec::new())
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }
}
