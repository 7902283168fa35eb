use crate::{
    config::FailureWitness,
    error::{ErrorClass, ErrorOrigin, IndexError},
    index::{Slot, SlotMap},
    obs::sink::{IndexEvent, LifecycleOp, record},
};

///
/// FailureCollector
///
/// Keeps exactly one witness out of any number of slot failures.
///

#[derive(Debug)]
pub(crate) struct FailureCollector {
    witness: FailureWitness,
    failure: Option<IndexError>,
}

impl FailureCollector {
    pub(crate) const fn new(witness: FailureWitness) -> Self {
        Self {
            witness,
            failure: None,
        }
    }

    /// Note one slot's outcome; returns whether it failed.
    pub(crate) fn observe(&mut self, result: Result<(), IndexError>) -> bool {
        let Err(err) = result else {
            return false;
        };

        match self.witness {
            FailureWitness::FirstSlot => {
                if self.failure.is_none() {
                    self.failure = Some(err);
                }
            }
            FailureWitness::LastSlot => self.failure = Some(err),
        }

        true
    }

    pub(crate) fn finish(self) -> Result<(), IndexError> {
        self.failure.map_or(Ok(()), Err)
    }
}

/// Run `f` against every target in slot order, whatever earlier slots
/// returned, then surface one failure.
pub(crate) fn fan_out<T>(
    op: LifecycleOp,
    witness: FailureWitness,
    targets: impl IntoIterator<Item = (Slot, T)>,
    mut f: impl FnMut(T) -> Result<(), IndexError>,
) -> Result<(), IndexError> {
    let mut collector = FailureCollector::new(witness);

    for (slot, target) in targets {
        let failed = collector.observe(f(target));
        record(IndexEvent::LifecycleFanOut { op, slot, failed });
    }

    collector.finish()
}

/// Open one resource per slot. If any slot fails, the resources already
/// opened are released, in reverse order, before the error is returned.
pub(crate) fn open_each<A, T>(
    targets: SlotMap<A>,
    mut open: impl FnMut(A) -> Result<T, IndexError>,
    mut release: impl FnMut(T) -> Result<(), IndexError>,
) -> Result<SlotMap<T>, IndexError> {
    let mut opened: Vec<(Slot, T)> = Vec::with_capacity(Slot::COUNT);

    for (slot, target) in Slot::ALL.into_iter().zip(targets) {
        match open(target) {
            Ok(resource) => opened.push((slot, resource)),
            Err(err) => {
                while let Some((slot, resource)) = opened.pop() {
                    let failed = release(resource).is_err();
                    record(IndexEvent::LifecycleFanOut {
                        op: LifecycleOp::Release,
                        slot,
                        failed,
                    });
                }
                return Err(err);
            }
        }
    }

    let [(_, number), (_, spatial), (_, generic)]: [(Slot, T); Slot::COUNT] =
        opened.try_into().map_err(|_| {
            IndexError::new(
                ErrorClass::Internal,
                ErrorOrigin::Fusion,
                "slot resources do not cover every slot",
            )
        })?;

    Ok(SlotMap::new(number, spatial, generic))
}
