use crate::{
    config::FailureWitness,
    error::IndexError,
    index::{
        IndexDescriptor, IndexEntryUpdate, IndexUpdater, SlotMap, UpdateKind,
        fusion::fan_out::fan_out, slot_for_values,
    },
    obs::sink::LifecycleOp,
};

///
/// FusionIndexUpdater
///
/// Routes every update to the slot owning its key. A change that moves a
/// key across categories becomes a removal in the old slot and an addition
/// in the new one; if the addition fails, the old entry is restored.
///

pub struct FusionIndexUpdater<'a> {
    descriptor: &'a IndexDescriptor,
    updaters: SlotMap<Box<dyn IndexUpdater + 'a>>,
    witness: FailureWitness,
    closed: bool,
}

impl<'a> FusionIndexUpdater<'a> {
    pub(crate) const fn new(
        descriptor: &'a IndexDescriptor,
        updaters: SlotMap<Box<dyn IndexUpdater + 'a>>,
        witness: FailureWitness,
    ) -> Self {
        Self {
            descriptor,
            updaters,
            witness,
            closed: false,
        }
    }
}

impl IndexUpdater for FusionIndexUpdater<'_> {
    fn process(&mut self, update: &IndexEntryUpdate) -> Result<(), IndexError> {
        if self.closed {
            return Err(IndexError::updater_invariant("updater is closed"));
        }
        update.check_arity(self.descriptor)?;

        let to = slot_for_values(&update.values);
        if update.kind != UpdateKind::Changed {
            return self.updaters[to].process(update);
        }

        let before = update.before_values().ok_or_else(|| {
            IndexError::updater_invariant(format!(
                "change for entity {} carries no previous key",
                update.entity
            ))
        })?;
        let from = slot_for_values(before);

        if from == to {
            self.updaters[to].process(update)
        } else {
            self.updaters[from].process(&IndexEntryUpdate::remove(update.entity, before.to_vec()))?;

            // Put the old entry back so a rejected move leaves both slots as
            // they were. A failed restore surfaces instead of the add failure.
            match self.updaters[to]
                .process(&IndexEntryUpdate::add(update.entity, update.values.clone()))
            {
                Ok(()) => Ok(()),
                Err(err) => {
                    self.updaters[from]
                        .process(&IndexEntryUpdate::add(update.entity, before.to_vec()))?;
                    Err(err)
                }
            }
        }
    }

    fn close(&mut self) -> Result<(), IndexError> {
        if self.closed {
            return Err(IndexError::updater_invariant("updater closed twice"));
        }
        self.closed = true;

        fan_out(
            LifecycleOp::Release,
            self.witness,
            self.updaters.iter_mut(),
            |updater| updater.close(),
        )
    }
}
