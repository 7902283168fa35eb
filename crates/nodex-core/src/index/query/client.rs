use crate::{
    index::{EntityId, IndexClient, IndexDescriptor, IndexPredicate},
    value::Value,
};

///
/// EntityValueClient
///
/// Keeps the most recently accepted entity and its key values.
///

#[derive(Debug, Default)]
pub struct EntityValueClient {
    pub entity: Option<EntityId>,
    pub values: Vec<Value>,
    predicates: Vec<IndexPredicate>,
}

impl EntityValueClient {
    #[must_use]
    pub fn predicates(&self) -> &[IndexPredicate] {
        &self.predicates
    }
}

impl IndexClient for EntityValueClient {
    fn initialize(&mut self, _: &IndexDescriptor, predicates: &[IndexPredicate]) {
        self.predicates = predicates.to_vec();
        self.entity = None;
        self.values.clear();
    }

    fn needs_values(&self) -> bool {
        true
    }

    fn accept_entity(&mut self, entity: EntityId, values: &[Value]) -> bool {
        self.entity = Some(entity);
        self.values.clear();
        self.values.extend_from_slice(values);

        true
    }
}

///
/// CollectingClient
///
/// Accumulates accepted entity ids, optionally stopping after `limit`.
///

#[derive(Debug, Default)]
pub struct CollectingClient {
    pub entities: Vec<EntityId>,
    limit: Option<usize>,
}

impl CollectingClient {
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            entities: Vec::new(),
            limit: Some(limit),
        }
    }
}

impl IndexClient for CollectingClient {
    fn initialize(&mut self, _: &IndexDescriptor, _: &[IndexPredicate]) {
        self.entities.clear();
    }

    fn needs_values(&self) -> bool {
        false
    }

    fn accept_entity(&mut self, entity: EntityId, _: &[Value]) -> bool {
        self.entities.push(entity);

        true
    }

    fn wants_more(&self) -> bool {
        self.limit.is_none_or(|limit| self.entities.len() < limit)
    }
}

///
/// FilteringClient
///
/// Layers one extra predicate over an inner client. A candidate reaches the
/// inner client only when the filter accepts the key value at `position`,
/// and is accepted only when the inner client accepts it too.
///

#[derive(Debug)]
pub struct FilteringClient<C> {
    inner: C,
    filter: IndexPredicate,
    position: usize,
}

impl<C: IndexClient> FilteringClient<C> {
    pub const fn new(inner: C, filter: IndexPredicate) -> Self {
        Self::at(inner, filter, 0)
    }

    /// Filter on the key value at `position` of a composite key.
    pub const fn at(inner: C, filter: IndexPredicate, position: usize) -> Self {
        Self {
            inner,
            filter,
            position,
        }
    }

    pub const fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: IndexClient> IndexClient for FilteringClient<C> {
    fn initialize(&mut self, descriptor: &IndexDescriptor, predicates: &[IndexPredicate]) {
        self.inner.initialize(descriptor, predicates);
    }

    fn needs_values(&self) -> bool {
        true
    }

    fn accept_entity(&mut self, entity: EntityId, values: &[Value]) -> bool {
        let passes = values
            .get(self.position)
            .is_some_and(|value| self.filter.accepts_value(value));

        passes && self.inner.accept_entity(entity, values)
    }

    fn wants_more(&self) -> bool {
        self.inner.wants_more()
    }
}
