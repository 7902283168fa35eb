use crate::{
    error::IndexError,
    index::{
        AllEntriesReader, EntityId, IndexClient, IndexDescriptor, IndexOrder, IndexPredicate,
        IndexProgressor, IndexReader, MaxCount, memory::IndexKey, query::check_predicates,
        validate_order,
    },
    obs::sink::{IndexEvent, record},
    value::Value,
};
use std::{
    collections::{BTreeSet, btree_set},
    ops::Bound,
};

///
/// MemoryIndexReader
///

pub struct MemoryIndexReader<'a> {
    descriptor: &'a IndexDescriptor,
    entries: &'a BTreeSet<IndexKey>,
    verify_order: bool,
    closed: bool,
}

impl<'a> MemoryIndexReader<'a> {
    pub(crate) const fn new(
        descriptor: &'a IndexDescriptor,
        entries: &'a BTreeSet<IndexKey>,
        verify_order: bool,
    ) -> Self {
        Self {
            descriptor,
            entries,
            verify_order,
            closed: false,
        }
    }

    fn ensure_open(&self) -> Result<(), IndexError> {
        if self.closed {
            Err(IndexError::reader_invariant(format!(
                "reader of index {} is closed",
                self.descriptor.id
            )))
        } else {
            Ok(())
        }
    }
}

impl IndexReader for MemoryIndexReader<'_> {
    fn descriptor(&self) -> &IndexDescriptor {
        self.descriptor
    }

    fn progressor(
        &self,
        order: IndexOrder,
        predicates: &[IndexPredicate],
    ) -> Result<Box<dyn IndexProgressor + '_>, IndexError> {
        self.ensure_open()?;
        check_predicates(self.descriptor, predicates)?;
        validate_order(order, predicates)?;

        let (lower, upper) = seek_bounds(predicates);
        let cursor: Cursor<'_> = if range_is_empty(&lower, &upper) {
            Box::new(std::iter::empty())
        } else {
            let range = self.entries.range((lower, upper));
            match order {
                IndexOrder::Descending => Box::new(range.rev()),
                IndexOrder::None | IndexOrder::Ascending => Box::new(range),
            }
        };

        Ok(Box::new(MemoryProgressor {
            cursor,
            predicates: predicates.to_vec(),
            order,
            verify_order: self.verify_order,
            previous: None,
            accepted: 0,
            rejected: 0,
            closed: false,
        }))
    }

    fn count_entity(&self, entity: EntityId, values: &[Value]) -> Result<u64, IndexError> {
        self.ensure_open()?;
        if values.len() != self.descriptor.arity() {
            return Err(IndexError::reader_invariant(format!(
                "index {} expects {} key values, got {}",
                self.descriptor.id,
                self.descriptor.arity(),
                values.len()
            )));
        }

        let key = IndexKey::new(values.to_vec(), entity);

        Ok(u64::from(self.entries.contains(&key)))
    }

    fn close(&mut self) -> Result<(), IndexError> {
        self.ensure_open()?;
        self.closed = true;

        Ok(())
    }
}

type Cursor<'a> = Box<dyn Iterator<Item = &'a IndexKey> + 'a>;

///
/// MemoryProgressor
///
/// Walks a seeked range of the set, applying every predicate to the stored
/// key before the client sees it.
///

struct MemoryProgressor<'a> {
    cursor: Cursor<'a>,
    predicates: Vec<IndexPredicate>,
    order: IndexOrder,
    verify_order: bool,
    previous: Option<&'a IndexKey>,
    accepted: u64,
    rejected: u64,
    closed: bool,
}

impl MemoryProgressor<'_> {
    fn check_order(&self, key: &IndexKey) -> Result<(), IndexError> {
        let Some(previous) = self.previous else {
            return Ok(());
        };

        if self.verify_order && !self.order.permits(previous, key) {
            return Err(IndexError::reader_corruption(format!(
                "{} scan went backwards at entity {}",
                self.order, key.entity
            )));
        }

        Ok(())
    }
}

impl IndexProgressor for MemoryProgressor<'_> {
    fn next(&mut self, client: &mut dyn IndexClient) -> Result<bool, IndexError> {
        if self.closed {
            return Ok(false);
        }

        while let Some(key) = self.cursor.next() {
            self.check_order(key)?;
            self.previous = Some(key);

            if !matches_all(&self.predicates, &key.values) {
                continue;
            }

            let values: &[Value] = if client.needs_values() {
                &key.values
            } else {
                &[]
            };

            if client.accept_entity(key.entity, values) {
                self.accepted += 1;
                return Ok(true);
            }
            self.rejected += 1;
        }

        Ok(false)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.cursor = Box::new(std::iter::empty());

        record(IndexEvent::CandidatesScanned {
            accepted: self.accepted,
            rejected: self.rejected,
        });
    }
}

///
/// MemoryAllEntriesReader
///

pub struct MemoryAllEntriesReader<'a> {
    iter: btree_set::Iter<'a, IndexKey>,
    total: u64,
    yielded: u64,
    closed: bool,
}

impl<'a> MemoryAllEntriesReader<'a> {
    pub(crate) fn new(entries: &'a BTreeSet<IndexKey>) -> Self {
        Self {
            iter: entries.iter(),
            total: u64::try_from(entries.len()).unwrap_or(u64::MAX),
            yielded: 0,
            closed: false,
        }
    }
}

impl Iterator for MemoryAllEntriesReader<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        if self.closed {
            return None;
        }

        let entity = self.iter.next()?.entity;
        self.yielded += 1;

        Some(entity)
    }
}

impl AllEntriesReader for MemoryAllEntriesReader<'_> {
    fn max_count(&self) -> MaxCount {
        MaxCount::Known(self.total)
    }

    fn close(&mut self) -> Result<(), IndexError> {
        if !self.closed {
            self.closed = true;
            record(IndexEvent::EntriesScanned {
                entries: self.yielded,
            });
        }

        Ok(())
    }
}

fn matches_all(predicates: &[IndexPredicate], values: &[Value]) -> bool {
    predicates.len() == values.len()
        && predicates
            .iter()
            .zip(values)
            .all(|(predicate, value)| predicate.accepts_value(value))
}

/// Seek bounds for a scan. Only single-property keys are seeked; composite
/// keys are scanned in full and filtered.
fn seek_bounds(predicates: &[IndexPredicate]) -> (Bound<IndexKey>, Bound<IndexKey>) {
    let [predicate] = predicates else {
        return (Bound::Unbounded, Bound::Unbounded);
    };

    let lower = match predicate.seek_lower() {
        Bound::Included(value) => Bound::Included(IndexKey::new(vec![value.clone()], 0)),
        Bound::Excluded(value) => {
            Bound::Excluded(IndexKey::new(vec![value.clone()], EntityId::MAX))
        }
        Bound::Unbounded => Bound::Unbounded,
    };
    let upper = match predicate.seek_upper() {
        Bound::Included(value) => {
            Bound::Included(IndexKey::new(vec![value.clone()], EntityId::MAX))
        }
        Bound::Excluded(value) => Bound::Excluded(IndexKey::new(vec![value.clone()], 0)),
        Bound::Unbounded => Bound::Unbounded,
    };

    (lower, upper)
}

fn range_is_empty(lower: &Bound<IndexKey>, upper: &Bound<IndexKey>) -> bool {
    let (Some(lower_key), Some(upper_key)) = (bound_key(lower), bound_key(upper)) else {
        return false;
    };

    if lower_key < upper_key {
        return false;
    }
    if lower_key > upper_key {
        return true;
    }

    !matches!(lower, Bound::Included(_)) || !matches!(upper, Bound::Included(_))
}

const fn bound_key(bound: &Bound<IndexKey>) -> Option<&IndexKey> {
    match bound {
        Bound::Included(key) | Bound::Excluded(key) => Some(key),
        Bound::Unbounded => None,
    }
}
