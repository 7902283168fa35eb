use crate::{
    config::FailureWitness,
    error::{IndexError, QueryError},
    index::{
        EntityId, IndexClient, IndexDescriptor, IndexOrder, IndexPredicate, IndexProgressor,
        IndexReader, Slot, SlotMap, SlotSelection, fusion::fan_out::fan_out,
        query::check_predicates, select_slots, slot_for_values,
    },
    obs::sink::{IndexEvent, LifecycleOp, record},
    value::Value,
};

///
/// FusionIndexReader
///
/// Routes each query to the slot owning the queried category. Queries that
/// constrain no category visit every slot, unordered.
///

pub struct FusionIndexReader<'a> {
    descriptor: &'a IndexDescriptor,
    readers: SlotMap<Box<dyn IndexReader + 'a>>,
    witness: FailureWitness,
}

impl<'a> FusionIndexReader<'a> {
    pub(crate) const fn new(
        descriptor: &'a IndexDescriptor,
        readers: SlotMap<Box<dyn IndexReader + 'a>>,
        witness: FailureWitness,
    ) -> Self {
        Self {
            descriptor,
            readers,
            witness,
        }
    }
}

impl IndexReader for FusionIndexReader<'_> {
    fn descriptor(&self) -> &IndexDescriptor {
        self.descriptor
    }

    fn progressor(
        &self,
        order: IndexOrder,
        predicates: &[IndexPredicate],
    ) -> Result<Box<dyn IndexProgressor + '_>, IndexError> {
        check_predicates(self.descriptor, predicates)?;

        match select_slots(predicates) {
            SlotSelection::One(slot) => {
                let progressor = self.readers[slot].progressor(order, predicates)?;
                record(IndexEvent::QueryStart {
                    order,
                    slot: Some(slot),
                });

                Ok(progressor)
            }
            SlotSelection::All => {
                if order != IndexOrder::None {
                    return Err(IndexError::query(QueryError::MixedCategories));
                }

                let mut parts = Vec::with_capacity(Slot::COUNT);
                for (_, reader) in self.readers.iter() {
                    match reader.progressor(order, predicates) {
                        Ok(part) => parts.push(part),
                        Err(err) => {
                            parts.iter_mut().for_each(|part| part.close());
                            return Err(err);
                        }
                    }
                }
                record(IndexEvent::QueryStart { order, slot: None });

                Ok(Box::new(UnionProgressor::new(parts)))
            }
        }
    }

    fn count_entity(&self, entity: EntityId, values: &[Value]) -> Result<u64, IndexError> {
        self.readers[slot_for_values(values)].count_entity(entity, values)
    }

    fn close(&mut self) -> Result<(), IndexError> {
        fan_out(
            LifecycleOp::Release,
            self.witness,
            self.readers.iter_mut(),
            |reader| reader.close(),
        )
    }
}

///
/// UnionProgressor
///
/// Drains its parts one after another. Candidates from different parts are
/// not interleaved, so the union carries no order guarantee.
///

pub struct UnionProgressor<'a> {
    parts: Vec<Box<dyn IndexProgressor + 'a>>,
    current: usize,
}

impl<'a> UnionProgressor<'a> {
    #[must_use]
    pub const fn new(parts: Vec<Box<dyn IndexProgressor + 'a>>) -> Self {
        Self { parts, current: 0 }
    }
}

impl IndexProgressor for UnionProgressor<'_> {
    fn next(&mut self, client: &mut dyn IndexClient) -> Result<bool, IndexError> {
        while let Some(part) = self.parts.get_mut(self.current) {
            if part.next(client)? {
                return Ok(true);
            }
            part.close();
            self.current += 1;
        }

        Ok(false)
    }

    fn close(&mut self) {
        for part in &mut self.parts {
            part.close();
        }
        self.current = self.parts.len();
    }
}
