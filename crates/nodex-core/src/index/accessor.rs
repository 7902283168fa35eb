//! Module: index::accessor
//! Responsibility: capability contracts every physical index implements,
//! and the fused accessor re-implements.
//! Does not own: persistence formats or slot routing.

use crate::{
    error::IndexError,
    index::{
        EntityId, IndexClient, IndexDescriptor, IndexEntryUpdate, IndexId, IndexOrder,
        IndexPredicate, IndexProgressor, IndexQuery,
    },
    value::Value,
};
use std::{iter::Sum, path::PathBuf};

///
/// MaxCount
///
/// Upper bound on the number of entries an [`AllEntriesReader`] yields.
/// A sum is only known when every contributor is known.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MaxCount {
    Known(u64),
    Unknown,
}

impl MaxCount {
    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }

    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Known(a), Self::Known(b)) => Self::Known(a.saturating_add(b)),
            _ => Self::Unknown,
        }
    }
}

impl Sum for MaxCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::Known(0), Self::combine)
    }
}

///
/// AllEntriesReader
///
/// Bounded, closable full scan over the entity ids of one index.
/// Closing is idempotent; iteration after close yields nothing.
///

pub trait AllEntriesReader: Iterator<Item = EntityId> {
    fn max_count(&self) -> MaxCount;

    fn close(&mut self) -> Result<(), IndexError>;
}

///
/// DropAction
///
/// Side effect run once an index's persisted data is fully destroyed.
/// Shared with the owner of the index; invoked, never consumed.
///

pub trait DropAction {
    fn drop_index(&self, index_id: IndexId);
}

impl<F: Fn(IndexId)> DropAction for F {
    fn drop_index(&self, index_id: IndexId) {
        self(index_id);
    }
}

///
/// UpdateMode
///
/// `Online` updates must describe the index exactly; `Recovery` updates may
/// be replayed over a partially applied state.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UpdateMode {
    #[default]
    Online,
    Recovery,
}

///
/// IndexUpdater
///

pub trait IndexUpdater {
    fn process(&mut self, update: &IndexEntryUpdate) -> Result<(), IndexError>;

    /// Flush pending work. Must be called exactly once.
    fn close(&mut self) -> Result<(), IndexError>;
}

///
/// IndexReader
///
/// Query-capable view of one index, valid until its accessor is closed.
///

pub trait IndexReader {
    fn descriptor(&self) -> &IndexDescriptor;

    /// Open a progressor over entries matching `predicates`, yielding in
    /// `order`. Unsupported orders and arity mismatches fail here, before
    /// any candidate is produced.
    fn progressor(
        &self,
        order: IndexOrder,
        predicates: &[IndexPredicate],
    ) -> Result<Box<dyn IndexProgressor + '_>, IndexError>;

    /// Number of entries indexing `entity` under exactly `values`.
    fn count_entity(&self, entity: EntityId, values: &[Value]) -> Result<u64, IndexError>;

    fn close(&mut self) -> Result<(), IndexError>;
}

///
/// IndexReaderExt
///
/// Client-driven querying on top of any [`IndexReader`].
///

pub trait IndexReaderExt: IndexReader {
    /// Start a query, initializing `client` with the active predicates.
    fn query<C: IndexClient>(
        &self,
        client: C,
        order: IndexOrder,
        predicates: &[IndexPredicate],
    ) -> Result<IndexQuery<'_, C>, IndexError> {
        let progressor = self.progressor(order, predicates)?;

        Ok(IndexQuery::start(
            self.descriptor(),
            progressor,
            client,
            predicates,
        ))
    }
}

impl<R: IndexReader + ?Sized> IndexReaderExt for R {}

///
/// IndexAccessor
///
/// Owner-side handle of one index. `drop_index` and `close` are single-shot:
/// callers invoke each at most once, and a physical accessor is free to
/// reject a second call.
///

pub trait IndexAccessor {
    fn descriptor(&self) -> &IndexDescriptor;

    /// Permanently destroy the persisted data of this index.
    fn drop_index(&mut self) -> Result<(), IndexError>;

    /// Release in-memory and file resources.
    fn close(&mut self) -> Result<(), IndexError>;

    /// Make every applied update durable.
    fn force(&mut self) -> Result<(), IndexError>;

    /// Make every applied update visible to new readers.
    fn refresh(&mut self) -> Result<(), IndexError>;

    fn new_updater(&mut self, mode: UpdateMode) -> Result<Box<dyn IndexUpdater + '_>, IndexError>;

    fn new_reader(&self) -> Result<Box<dyn IndexReader + '_>, IndexError>;

    fn new_all_entries_reader(&self) -> Result<Box<dyn AllEntriesReader + '_>, IndexError>;

    /// Files that make up a consistent snapshot of this index.
    fn snapshot_files(&self) -> Result<Vec<PathBuf>, IndexError>;

    /// Whether updates were applied since the last `force`.
    fn is_dirty(&self) -> bool;
}
