use crate::{
    error::IndexError,
    index::{EntityId, IndexDescriptor},
    value::Value,
};

///
/// UpdateKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UpdateKind {
    Added,
    Changed,
    Removed,
}

///
/// IndexEntryUpdate
///
/// One entity's change against one index. `values` are the key values after
/// the change (or the removed key for `Removed`); `before` is set only for
/// `Changed`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct IndexEntryUpdate {
    pub entity: EntityId,
    pub kind: UpdateKind,
    pub before: Option<Vec<Value>>,
    pub values: Vec<Value>,
}

impl IndexEntryUpdate {
    #[must_use]
    pub const fn add(entity: EntityId, values: Vec<Value>) -> Self {
        Self {
            entity,
            kind: UpdateKind::Added,
            before: None,
            values,
        }
    }

    #[must_use]
    pub const fn remove(entity: EntityId, values: Vec<Value>) -> Self {
        Self {
            entity,
            kind: UpdateKind::Removed,
            before: None,
            values,
        }
    }

    #[must_use]
    pub const fn change(entity: EntityId, before: Vec<Value>, after: Vec<Value>) -> Self {
        Self {
            entity,
            kind: UpdateKind::Changed,
            before: Some(before),
            values: after,
        }
    }

    /// Key values the entity held before this update, if any.
    #[must_use]
    pub fn before_values(&self) -> Option<&[Value]> {
        self.before.as_deref()
    }

    /// Reject updates whose key width differs from the index key arity.
    pub(crate) fn check_arity(&self, descriptor: &IndexDescriptor) -> Result<(), IndexError> {
        let expected = descriptor.arity();
        let before_ok = self.before.as_ref().is_none_or(|b| b.len() == expected);

        if self.values.len() == expected && before_ok {
            Ok(())
        } else {
            Err(IndexError::updater_invariant(format!(
                "index {} expects {expected} key values per update, entity {} supplied {}",
                descriptor.id,
                self.entity,
                self.values.len()
            )))
        }
    }
}
