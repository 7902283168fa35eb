use crate::{index::IndexOrder, value::ValueCategory};
use std::fmt;
use thiserror::Error as ThisError;

///
/// IndexError
///
/// Structured runtime error with a stable internal classification.
///
/// Errors are plain values: fan-out paths move the failing slot's error
/// through unchanged, so callers can compare the surfaced error against
/// the one a slot produced.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct IndexError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    pub detail: Option<ErrorDetail>,
}

impl IndexError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct an I/O-class failure for a specific origin.
    pub fn io(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Io, origin, message)
    }

    /// Construct an accessor-origin invariant violation.
    pub(crate) fn accessor_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Accessor,
            message,
        )
    }

    /// Construct an updater-origin invariant violation.
    pub(crate) fn updater_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Updater, message)
    }

    /// Construct a reader-origin invariant violation.
    pub(crate) fn reader_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Reader, message)
    }

    /// Construct a reader-origin corruption error.
    pub(crate) fn reader_corruption(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, ErrorOrigin::Reader, message)
    }

    /// Construct a configuration error.
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Config, message)
    }

    /// Construct a query-protocol misuse error with its structured detail.
    pub(crate) fn query(err: QueryError) -> Self {
        Self {
            class: ErrorClass::Unsupported,
            origin: ErrorOrigin::Query,
            message: err.to_string(),
            detail: Some(ErrorDetail::Query(err)),
        }
    }

    #[must_use]
    pub const fn query_detail(&self) -> Option<&QueryError> {
        match &self.detail {
            Some(ErrorDetail::Query(err)) => Some(err),
            None => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<std::io::Error> for IndexError {
    fn from(err: std::io::Error) -> Self {
        Self::io(ErrorOrigin::Accessor, err.to_string())
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`IndexError`].
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Query(QueryError),
}

///
/// QueryError
///
/// Caller errors against the query protocol. These are reported
/// immediately and never retried.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("order {order} is not supported for {category} values")]
    UnsupportedOrder {
        category: ValueCategory,
        order: IndexOrder,
    },

    #[error("ordered query requires a single value category, got an unconstrained predicate")]
    UnorderableQuery { order: IndexOrder },

    #[error("predicate arity {found} does not match index key arity {expected}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("query spans several index slots and cannot be ordered")]
    MixedCategories,

    #[error("{expected} range has a {found} bound")]
    MismatchedBound {
        expected: ValueCategory,
        found: ValueCategory,
    },
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Io,
    Corruption,
    Unsupported,
    InvariantViolation,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Io => "io",
            Self::Corruption => "corruption",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Value,
    Accessor,
    Reader,
    Updater,
    Fusion,
    Query,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Value => "value",
            Self::Accessor => "accessor",
            Self::Reader => "reader",
            Self::Updater => "updater",
            Self::Fusion => "fusion",
            Self::Query => "query",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}
