//! Test-only accessor doubles with per-operation call counting and failure
//! injection.

use crate::{
    error::{ErrorClass, ErrorOrigin, IndexError},
    index::{
        AllEntriesReader, EntityId, IndexAccessor, IndexClient, IndexDescriptor,
        IndexEntryUpdate, IndexOrder, IndexPredicate, IndexProgressor, IndexReader, IndexUpdater,
        MaxCount, UpdateMode,
    },
    value::Value,
};
use std::{
    cell::RefCell,
    collections::{BTreeMap, VecDeque},
    path::PathBuf,
    rc::Rc,
};

///
/// Op
///
/// Observable operations on a fake slot.
///

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) enum Op {
    Drop,
    Close,
    Force,
    Refresh,
    OpenReader,
    OpenProgressor,
    Advance,
    CloseProgressor,
    CloseReader,
    OpenUpdater,
    Process,
    CloseUpdater,
    OpenAllEntries,
    CloseAllEntries,
}

///
/// Probe
///
/// Shared state between a fake slot and the test that owns it.
///

#[derive(Debug, Default)]
pub(crate) struct Probe {
    calls: RefCell<BTreeMap<Op, u32>>,
    failures: RefCell<BTreeMap<Op, IndexError>>,
    pub(crate) rows: RefCell<Vec<(EntityId, Vec<Value>)>>,
    pub(crate) entries: RefCell<Vec<EntityId>>,
    pub(crate) max_count: RefCell<Option<MaxCount>>,
    pub(crate) updates: RefCell<Vec<IndexEntryUpdate>>,
    pub(crate) files: RefCell<Vec<PathBuf>>,
}

impl Probe {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Make every later `op` fail with `err`.
    pub(crate) fn fail(&self, op: Op, err: IndexError) {
        self.failures.borrow_mut().insert(op, err);
    }

    pub(crate) fn calls(&self, op: Op) -> u32 {
        self.calls.borrow().get(&op).copied().unwrap_or(0)
    }

    pub(crate) fn with_entries(&self, entries: &[EntityId], max_count: MaxCount) {
        self.entries.replace(entries.to_vec());
        self.max_count.replace(Some(max_count));
    }

    pub(crate) fn with_rows(&self, rows: Vec<(EntityId, Vec<Value>)>) {
        self.rows.replace(rows);
    }

    fn hit(&self, op: Op) -> Result<(), IndexError> {
        *self.calls.borrow_mut().entry(op).or_default() += 1;

        match self.failures.borrow().get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Distinct injected failure, so tests can tell which slot's error surfaced.
pub(crate) fn injected(label: &str) -> IndexError {
    IndexError::new(
        ErrorClass::Io,
        ErrorOrigin::Accessor,
        format!("injected failure: {label}"),
    )
}

///
/// FakeAccessor
///

pub(crate) struct FakeAccessor {
    descriptor: IndexDescriptor,
    probe: Rc<Probe>,
}

impl FakeAccessor {
    pub(crate) fn boxed(descriptor: &IndexDescriptor, probe: &Rc<Probe>) -> Box<dyn IndexAccessor> {
        Box::new(Self {
            descriptor: descriptor.clone(),
            probe: Rc::clone(probe),
        })
    }
}

impl IndexAccessor for FakeAccessor {
    fn descriptor(&self) -> &IndexDescriptor {
        &self.descriptor
    }

    fn drop_index(&mut self) -> Result<(), IndexError> {
        self.probe.hit(Op::Drop)
    }

    fn close(&mut self) -> Result<(), IndexError> {
        self.probe.hit(Op::Close)
    }

    fn force(&mut self) -> Result<(), IndexError> {
        self.probe.hit(Op::Force)
    }

    fn refresh(&mut self) -> Result<(), IndexError> {
        self.probe.hit(Op::Refresh)
    }

    fn new_updater(&mut self, _: UpdateMode) -> Result<Box<dyn IndexUpdater + '_>, IndexError> {
        self.probe.hit(Op::OpenUpdater)?;

        Ok(Box::new(FakeUpdater {
            probe: Rc::clone(&self.probe),
        }))
    }

    fn new_reader(&self) -> Result<Box<dyn IndexReader + '_>, IndexError> {
        self.probe.hit(Op::OpenReader)?;

        Ok(Box::new(FakeReader {
            descriptor: &self.descriptor,
            probe: Rc::clone(&self.probe),
        }))
    }

    fn new_all_entries_reader(&self) -> Result<Box<dyn AllEntriesReader + '_>, IndexError> {
        self.probe.hit(Op::OpenAllEntries)?;

        let entries = self.probe.entries.borrow().clone();
        let max_count = self
            .probe
            .max_count
            .borrow()
            .unwrap_or(MaxCount::Known(entries.len() as u64));

        Ok(Box::new(FakeAllEntriesReader {
            entries: entries.into(),
            max_count,
            probe: Rc::clone(&self.probe),
        }))
    }

    fn snapshot_files(&self) -> Result<Vec<PathBuf>, IndexError> {
        Ok(self.probe.files.borrow().clone())
    }

    fn is_dirty(&self) -> bool {
        !self.probe.updates.borrow().is_empty()
    }
}

///
/// FakeReader
///
/// Serves the probe's rows verbatim, ignoring predicates and order.
///

pub(crate) struct FakeReader<'a> {
    descriptor: &'a IndexDescriptor,
    probe: Rc<Probe>,
}

impl IndexReader for FakeReader<'_> {
    fn descriptor(&self) -> &IndexDescriptor {
        self.descriptor
    }

    fn progressor(
        &self,
        _: IndexOrder,
        _: &[IndexPredicate],
    ) -> Result<Box<dyn IndexProgressor + '_>, IndexError> {
        self.probe.hit(Op::OpenProgressor)?;

        Ok(Box::new(VecProgressor::new(
            self.probe.rows.borrow().clone(),
            Some(Rc::clone(&self.probe)),
        )))
    }

    fn count_entity(&self, entity: EntityId, values: &[Value]) -> Result<u64, IndexError> {
        let hits = self
            .probe
            .rows
            .borrow()
            .iter()
            .filter(|(id, row)| *id == entity && row.as_slice() == values)
            .count();

        Ok(hits as u64)
    }

    fn close(&mut self) -> Result<(), IndexError> {
        self.probe.hit(Op::CloseReader)
    }
}

///
/// VecProgressor
///
/// Progressor over a fixed candidate list.
///

pub(crate) struct VecProgressor {
    rows: VecDeque<(EntityId, Vec<Value>)>,
    probe: Option<Rc<Probe>>,
    closed: bool,
}

impl VecProgressor {
    pub(crate) fn new(rows: Vec<(EntityId, Vec<Value>)>, probe: Option<Rc<Probe>>) -> Self {
        Self {
            rows: rows.into(),
            probe,
            closed: false,
        }
    }
}

impl IndexProgressor for VecProgressor {
    fn next(&mut self, client: &mut dyn IndexClient) -> Result<bool, IndexError> {
        if self.closed {
            return Ok(false);
        }
        if let Some(probe) = &self.probe {
            probe.hit(Op::Advance)?;
        }

        while let Some((entity, values)) = self.rows.pop_front() {
            let values: &[Value] = if client.needs_values() { &values } else { &[] };
            if client.accept_entity(entity, values) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Some(probe) = &self.probe {
                let _ = probe.hit(Op::CloseProgressor);
            }
        }
    }
}

///
/// FakeUpdater
///

pub(crate) struct FakeUpdater {
    probe: Rc<Probe>,
}

impl IndexUpdater for FakeUpdater {
    fn process(&mut self, update: &IndexEntryUpdate) -> Result<(), IndexError> {
        self.probe.hit(Op::Process)?;
        self.probe.updates.borrow_mut().push(update.clone());

        Ok(())
    }

    fn close(&mut self) -> Result<(), IndexError> {
        self.probe.hit(Op::CloseUpdater)
    }
}

///
/// FakeAllEntriesReader
///

pub(crate) struct FakeAllEntriesReader {
    entries: VecDeque<EntityId>,
    max_count: MaxCount,
    probe: Rc<Probe>,
}

impl Iterator for FakeAllEntriesReader {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        self.entries.pop_front()
    }
}

impl AllEntriesReader for FakeAllEntriesReader {
    fn max_count(&self) -> MaxCount {
        self.max_count
    }

    fn close(&mut self) -> Result<(), IndexError> {
        self.probe.hit(Op::CloseAllEntries)
    }
}
