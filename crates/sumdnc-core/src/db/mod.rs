//! Listing engine: predicates, canonical order, continuation cursors, the
//! store capability, and the paginated lister built on top of them.

pub mod codec;
pub mod cursor;
pub mod lister;
pub mod order;
pub mod predicate;
pub mod response;
pub mod store;

pub use lister::{ListError, ListRequest, PagePolicy, PaginatedLister};
pub use order::OrderKey;
pub use predicate::Predicate;
pub use response::Page;
pub use store::{MemoryStore, Store, StoreError};
