//! Module: store
//! Responsibility: the ordered-range capability listing depends on.
//! Does not own: limit validation, lookahead, or cursor tokens.

mod memory;

pub use memory::MemoryStore;

use crate::{
    db::predicate::Predicate,
    error::{ErrorClass, ErrorOrigin, InternalError},
    traits::EntityKind,
};
use thiserror::Error as ThisError;

///
/// RangeQuery
///
/// "Up to `take` rows matching `predicate`, in canonical order
/// (`created_at` desc, `id` asc), strictly after the row with id `after`."
///

#[derive(Clone, Copy, Debug)]
pub struct RangeQuery<'a> {
    pub predicate: &'a Predicate,
    pub after: Option<&'a str>,
    pub take: usize,
}

///
/// RangeScan
/// Rows returned by one range read, plus how many rows were examined.
///

#[derive(Clone, Debug)]
pub struct RangeScan<E> {
    pub rows: Vec<E>,
    pub rows_scanned: u64,
}

///
/// Store
///
/// Storage collaborator for one entity type. Each call is one consistent
/// read: implementations must not expose a half-applied write to a caller.
///

pub trait Store<E: EntityKind>: Send + Sync {
    /// Ordered range read. Fails with `StoreError::NotFound` when `after`
    /// names a row that does not exist.
    fn range(&self, query: RangeQuery<'_>) -> Result<RangeScan<E>, StoreError>;

    fn get(&self, id: &str) -> Result<Option<E>, StoreError>;

    /// Lookup through one of `E::UNIQUE_FIELDS`.
    fn get_unique(&self, field: &str, value: &str) -> Result<Option<E>, StoreError>;
}

///
/// StoreError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("key not found: {entity_path}:{key}")]
    NotFound {
        entity_path: &'static str,
        key: String,
    },

    #[error("duplicate key for {entity_path}.{field}: {key}")]
    Conflict {
        entity_path: &'static str,
        field: &'static str,
        key: String,
    },

    #[error("'{field}' is not a unique field of {entity_path}")]
    NotUnique {
        entity_path: &'static str,
        field: String,
    },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::Conflict { .. } => ErrorClass::Conflict,
            Self::NotUnique { .. } => ErrorClass::Validation,
            Self::Unavailable { .. } => ErrorClass::Unavailable,
        }
    }
}

impl From<StoreError> for InternalError {
    fn from(err: StoreError) -> Self {
        Self::new(err.class(), ErrorOrigin::Store, err.to_string())
    }
}
