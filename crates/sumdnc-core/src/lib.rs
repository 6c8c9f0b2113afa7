//! Core runtime for Sumdnc: entity traits, values, predicates, continuation
//! cursors, ordered stores, and the paginated lister.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod db;
pub mod error;
pub mod obs;
pub mod serialize;
pub mod traits;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

pub use db::lister::{DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT};

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, serializers, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::{ListRequest, Page, Predicate},
        traits::{EntityKind, FieldModel},
        types::Timestamp,
        value::{Value, ValueKind},
    };
}
