//! Module: index::query
//! Responsibility: the pull-based progressor/client protocol between an
//! index's candidate producer and a result consumer.
//! Does not own: candidate production (physical progressors) or slot
//! fan-out (fusion).
//!
//! A query is single-pass and synchronous: each `IndexQuery::advance` moves
//! the progressor, which hands candidates to the client until one is
//! accepted or the cursor is exhausted. A rejected candidate is skipped,
//! never a stop signal; a client ends the query early through
//! `IndexClient::wants_more`.

mod client;


pub use client::{CollectingClient, EntityValueClient, FilteringClient};

use crate::{
    error::{IndexError, QueryError},
    index::{EntityId, IndexDescriptor, IndexPredicate},
    value::Value,
};

///
/// IndexProgressor
///
/// Producer side of the query protocol. Wraps a cursor over candidate
/// entries that can only move forward.
///

pub trait IndexProgressor {
    /// Advance the cursor, offering candidates to `client` until it accepts
    /// one. Returns `false` once the cursor is exhausted.
    ///
    /// Values are decoded and passed only when `client.needs_values()`;
    /// otherwise `values` is empty.
    fn next(&mut self, client: &mut dyn IndexClient) -> Result<bool, IndexError>;

    /// Release the underlying cursor. Further `next` calls return `false`
    /// and a second `close` does nothing.
    fn close(&mut self);
}

///
/// IndexClient
///
/// Consumer side of the query protocol.
///

pub trait IndexClient {
    /// Called exactly once, before the first candidate.
    fn initialize(&mut self, descriptor: &IndexDescriptor, predicates: &[IndexPredicate]);

    /// Whether candidates must carry their decoded key values.
    fn needs_values(&self) -> bool;

    /// Offer one candidate. `false` skips it and the progressor continues.
    fn accept_entity(&mut self, entity: EntityId, values: &[Value]) -> bool;

    /// Checked before every advance; `false` terminates the query and
    /// releases the cursor.
    fn wants_more(&self) -> bool {
        true
    }
}

impl<C: IndexClient + ?Sized> IndexClient for &mut C {
    fn initialize(&mut self, descriptor: &IndexDescriptor, predicates: &[IndexPredicate]) {
        (**self).initialize(descriptor, predicates);
    }

    fn needs_values(&self) -> bool {
        (**self).needs_values()
    }

    fn accept_entity(&mut self, entity: EntityId, values: &[Value]) -> bool {
        (**self).accept_entity(entity, values)
    }

    fn wants_more(&self) -> bool {
        (**self).wants_more()
    }
}

///
/// IndexQuery
///
/// One running query: a progressor paired with the client it feeds.
/// The progressor is released exactly once: on exhaustion, early stop,
/// error, `close()` or drop.
///

pub struct IndexQuery<'a, C> {
    cursor: QueryCursor<'a>,
    client: C,
}

impl<'a, C: IndexClient> IndexQuery<'a, C> {
    pub(crate) fn start(
        descriptor: &IndexDescriptor,
        progressor: Box<dyn IndexProgressor + 'a>,
        mut client: C,
        predicates: &[IndexPredicate],
    ) -> Self {
        client.initialize(descriptor, predicates);

        Self {
            cursor: QueryCursor {
                progressor,
                finished: false,
            },
            client,
        }
    }

    /// Advance to the next accepted candidate.
    pub fn advance(&mut self) -> Result<bool, IndexError> {
        if self.cursor.finished {
            return Ok(false);
        }
        if !self.client.wants_more() {
            self.close();
            return Ok(false);
        }

        let accepted = match self.cursor.progressor.next(&mut self.client) {
            Ok(accepted) => accepted,
            Err(err) => {
                self.close();
                return Err(err);
            }
        };
        if !accepted {
            self.close();
        }

        Ok(accepted)
    }

    /// Run the query to exhaustion (or until the client stops it).
    pub fn drain(mut self) -> Result<C, IndexError> {
        while self.advance()? {}

        Ok(self.into_client())
    }

    pub const fn client(&self) -> &C {
        &self.client
    }

    pub const fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.cursor.finished
    }

    /// Release the cursor early. Idempotent.
    pub fn close(&mut self) {
        self.cursor.close();
    }

    pub fn into_client(self) -> C {
        let Self { mut cursor, client } = self;
        cursor.close();

        client
    }
}

///
/// QueryCursor
///
/// Owns the progressor of a query and closes it when dropped.
///

struct QueryCursor<'a> {
    progressor: Box<dyn IndexProgressor + 'a>,
    finished: bool,
}

impl QueryCursor<'_> {
    fn close(&mut self) {
        if !self.finished {
            self.finished = true;
            self.progressor.close();
        }
    }
}

impl Drop for QueryCursor<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Reject predicate lists that do not fit the index: the count must equal
/// the key arity and range bounds must belong to the range's category.
pub(crate) fn check_predicates(
    descriptor: &IndexDescriptor,
    predicates: &[IndexPredicate],
) -> Result<(), IndexError> {
    let expected = descriptor.arity();
    if predicates.len() != expected {
        return Err(IndexError::query(QueryError::ArityMismatch {
            expected,
            found: predicates.len(),
        }));
    }

    for predicate in predicates {
        if let (Some(expected), Some(found)) = (predicate.category(), predicate.mismatched_bound())
        {
            return Err(IndexError::query(QueryError::MismatchedBound {
                expected,
                found,
            }));
        }
    }

    Ok(())
}
