use crate::{
    error::IndexError,
    index::{
        IndexDescriptor, IndexEntryUpdate, IndexUpdater, UpdateKind, UpdateMode,
        memory::IndexKey,
    },
    value::Value,
};
use std::collections::BTreeSet;

///
/// MemoryIndexUpdater
///
/// Applies entry updates directly to the backing set. In `Online` mode an
/// update must match the current contents exactly; in `Recovery` mode
/// duplicate adds and missing removals are tolerated.
///

pub struct MemoryIndexUpdater<'a> {
    descriptor: &'a IndexDescriptor,
    entries: &'a mut BTreeSet<IndexKey>,
    dirty: &'a mut bool,
    mode: UpdateMode,
    closed: bool,
}

impl<'a> MemoryIndexUpdater<'a> {
    pub(crate) const fn new(
        descriptor: &'a IndexDescriptor,
        entries: &'a mut BTreeSet<IndexKey>,
        dirty: &'a mut bool,
        mode: UpdateMode,
    ) -> Self {
        Self {
            descriptor,
            entries,
            dirty,
            mode,
            closed: false,
        }
    }

    fn insert(&mut self, update: &IndexEntryUpdate, values: &[Value]) -> Result<(), IndexError> {
        let inserted = self
            .entries
            .insert(IndexKey::new(values.to_vec(), update.entity));

        if !inserted && self.mode == UpdateMode::Online {
            return Err(self.occupied(update));
        }

        Ok(())
    }

    fn occupied(&self, update: &IndexEntryUpdate) -> IndexError {
        IndexError::updater_invariant(format!(
            "index {} already holds entity {} under this key",
            self.descriptor.id, update.entity
        ))
    }

    // A rejected change leaves the set untouched: the new key is checked
    // before the old one is removed.
    fn change(&mut self, update: &IndexEntryUpdate, before: &[Value]) -> Result<(), IndexError> {
        if self.mode == UpdateMode::Online && before != update.values.as_slice() {
            let after = IndexKey::new(update.values.clone(), update.entity);
            if self.entries.contains(&after) {
                return Err(self.occupied(update));
            }
        }

        self.remove(update, before)?;
        self.insert(update, &update.values)
    }

    fn remove(&mut self, update: &IndexEntryUpdate, values: &[Value]) -> Result<(), IndexError> {
        let removed = self
            .entries
            .remove(&IndexKey::new(values.to_vec(), update.entity));

        if !removed && self.mode == UpdateMode::Online {
            return Err(IndexError::updater_invariant(format!(
                "index {} holds no entry for entity {} under this key",
                self.descriptor.id, update.entity
            )));
        }

        Ok(())
    }
}

impl IndexUpdater for MemoryIndexUpdater<'_> {
    fn process(&mut self, update: &IndexEntryUpdate) -> Result<(), IndexError> {
        if self.closed {
            return Err(IndexError::updater_invariant("updater is closed"));
        }
        update.check_arity(self.descriptor)?;

        match update.kind {
            UpdateKind::Added => self.insert(update, &update.values)?,
            UpdateKind::Removed => self.remove(update, &update.values)?,
            UpdateKind::Changed => {
                let before = update.before_values().ok_or_else(|| {
                    IndexError::updater_invariant(format!(
                        "change for entity {} carries no previous key",
                        update.entity
                    ))
                })?;
                self.change(update, before)?;
            }
        }
        *self.dirty = true;

        Ok(())
    }

    fn close(&mut self) -> Result<(), IndexError> {
        if self.closed {
            return Err(IndexError::updater_invariant("updater closed twice"));
        }
        self.closed = true;

        Ok(())
    }
}
