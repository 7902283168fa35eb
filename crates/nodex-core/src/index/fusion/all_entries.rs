use crate::{
    config::FailureWitness,
    error::IndexError,
    index::{AllEntriesReader, EntityId, MaxCount, Slot, SlotMap, fusion::fan_out::fan_out},
    obs::sink::LifecycleOp,
};

///
/// FusionAllEntriesReader
///
/// Concatenation of every slot's full scan, in slot order.
///

pub struct FusionAllEntriesReader<'a> {
    readers: SlotMap<Box<dyn AllEntriesReader + 'a>>,
    position: usize,
    witness: FailureWitness,
    closed: bool,
}

impl<'a> FusionAllEntriesReader<'a> {
    pub(crate) const fn new(
        readers: SlotMap<Box<dyn AllEntriesReader + 'a>>,
        witness: FailureWitness,
    ) -> Self {
        Self {
            readers,
            position: 0,
            witness,
            closed: false,
        }
    }
}

impl Iterator for FusionAllEntriesReader<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        if self.closed {
            return None;
        }

        while let Some(&slot) = Slot::ALL.get(self.position) {
            if let Some(entity) = self.readers[slot].next() {
                return Some(entity);
            }
            self.position += 1;
        }

        None
    }
}

impl AllEntriesReader for FusionAllEntriesReader<'_> {
    fn max_count(&self) -> MaxCount {
        self.readers.iter().map(|(_, reader)| reader.max_count()).sum()
    }

    fn close(&mut self) -> Result<(), IndexError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        fan_out(
            LifecycleOp::Release,
            self.witness,
            self.readers.iter_mut(),
            |reader| reader.close(),
        )
    }
}
