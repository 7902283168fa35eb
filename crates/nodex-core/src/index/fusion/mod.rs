//! Module: index::fusion
//! Responsibility: one logical index composed of one physical accessor per
//! value category slot.
//! Does not own: the category-to-slot mapping (selector) or any storage.
//! Boundary: lifecycle operations fan out to every slot and surface at most
//! one failure; data operations are routed to the owning slot.

mod all_entries;
mod fan_out;
mod reader;
mod updater;


pub use all_entries::FusionAllEntriesReader;
pub use reader::{FusionIndexReader, UnionProgressor};
pub use updater::FusionIndexUpdater;

use crate::{
    config::IndexConfig,
    error::IndexError,
    index::{
        AllEntriesReader, DropAction, IndexAccessor, IndexDescriptor, IndexReader, IndexUpdater,
        Slot, SlotMap, UpdateMode, memory::MemoryIndexAccessor,
    },
    obs::sink::{IndexEvent, LifecycleOp, record},
};
use fan_out::{fan_out, open_each};
use std::{path::PathBuf, sync::Arc};

///
/// FusionIndexAccessor
///
/// Owns its slot accessors. `drop_index` runs the drop action exactly once,
/// and only when every slot dropped cleanly.
///

pub struct FusionIndexAccessor {
    descriptor: IndexDescriptor,
    slots: SlotMap<Box<dyn IndexAccessor>>,
    drop_action: Arc<dyn DropAction + Send + Sync>,
    config: IndexConfig,
}

impl FusionIndexAccessor {
    /// Compose slot accessors that all serve `descriptor`.
    pub fn new(
        descriptor: IndexDescriptor,
        slots: SlotMap<Box<dyn IndexAccessor>>,
        drop_action: Arc<dyn DropAction + Send + Sync>,
        config: IndexConfig,
    ) -> Result<Self, IndexError> {
        config.validate()?;

        if let Some((slot, _)) = slots
            .iter()
            .find(|(_, accessor)| accessor.descriptor() != &descriptor)
        {
            return Err(IndexError::accessor_invariant(format!(
                "{slot} slot does not serve index {}",
                descriptor.id
            )));
        }

        Ok(Self {
            descriptor,
            slots,
            drop_action,
            config,
        })
    }

    /// Fused index with an in-memory accessor in every slot.
    pub fn in_memory(
        descriptor: IndexDescriptor,
        config: IndexConfig,
        drop_action: Arc<dyn DropAction + Send + Sync>,
    ) -> Result<Self, IndexError> {
        let number = MemoryIndexAccessor::new(descriptor.clone(), config.clone())?;
        let spatial = MemoryIndexAccessor::new(descriptor.clone(), config.clone())?;
        let generic = MemoryIndexAccessor::new(descriptor.clone(), config.clone())?;
        let slots: SlotMap<Box<dyn IndexAccessor>> =
            SlotMap::new(Box::new(number), Box::new(spatial), Box::new(generic));

        Self::new(descriptor, slots, drop_action, config)
    }

    #[must_use]
    pub fn slot(&self, slot: Slot) -> &dyn IndexAccessor {
        &*self.slots[slot]
    }

    #[must_use]
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }
}

impl IndexAccessor for FusionIndexAccessor {
    fn descriptor(&self) -> &IndexDescriptor {
        &self.descriptor
    }

    fn drop_index(&mut self) -> Result<(), IndexError> {
        fan_out(
            LifecycleOp::Drop,
            self.config.failure_witness,
            self.slots.iter_mut(),
            |accessor| accessor.drop_index(),
        )?;

        self.drop_action.drop_index(self.descriptor.id);
        record(IndexEvent::DropActionInvoked {
            index_id: self.descriptor.id,
        });

        Ok(())
    }

    fn close(&mut self) -> Result<(), IndexError> {
        fan_out(
            LifecycleOp::Close,
            self.config.failure_witness,
            self.slots.iter_mut(),
            |accessor| accessor.close(),
        )
    }

    fn force(&mut self) -> Result<(), IndexError> {
        fan_out(
            LifecycleOp::Force,
            self.config.failure_witness,
            self.slots.iter_mut(),
            |accessor| accessor.force(),
        )
    }

    fn refresh(&mut self) -> Result<(), IndexError> {
        fan_out(
            LifecycleOp::Refresh,
            self.config.failure_witness,
            self.slots.iter_mut(),
            |accessor| accessor.refresh(),
        )
    }

    fn new_updater(&mut self, mode: UpdateMode) -> Result<Box<dyn IndexUpdater + '_>, IndexError> {
        let descriptor = &self.descriptor;
        let updaters = open_each(
            self.slots.each_mut(),
            |accessor| accessor.new_updater(mode),
            |mut updater| updater.close(),
        )?;

        Ok(Box::new(FusionIndexUpdater::new(
            descriptor,
            updaters,
            self.config.failure_witness,
        )))
    }

    fn new_reader(&self) -> Result<Box<dyn IndexReader + '_>, IndexError> {
        let readers = open_each(
            self.slots.each_ref(),
            |accessor| accessor.new_reader(),
            |mut reader| reader.close(),
        )?;

        Ok(Box::new(FusionIndexReader::new(
            &self.descriptor,
            readers,
            self.config.failure_witness,
        )))
    }

    fn new_all_entries_reader(&self) -> Result<Box<dyn AllEntriesReader + '_>, IndexError> {
        let readers = open_each(
            self.slots.each_ref(),
            |accessor| accessor.new_all_entries_reader(),
            |mut reader| reader.close(),
        )?;

        Ok(Box::new(FusionAllEntriesReader::new(
            readers,
            self.config.failure_witness,
        )))
    }

    fn snapshot_files(&self) -> Result<Vec<PathBuf>, IndexError> {
        let mut files = Vec::new();
        for (_, accessor) in self.slots.iter() {
            files.extend(accessor.snapshot_files()?);
        }

        Ok(files)
    }

    fn is_dirty(&self) -> bool {
        self.slots.iter().any(|(_, accessor)| accessor.is_dirty())
    }
}
