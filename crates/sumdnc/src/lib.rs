//! ## Crate layout
//! - `config`: file + environment configuration.
//! - `context`: the per-process context procedures run against.
//! - `db`: user and post storage plus listing.
//! - `error`: public error taxonomy.
//! - `model`: resource entities and views.
//! - `router`: `resource.procedure` dispatch over JSON.
//!
//! Pagination, predicates and cursors live in `sumdnc_core`, re-exported
//! here as `core`.

pub use sumdnc_core as core;

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod model;
pub mod router;

pub use error::Error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        config::Config,
        context::Context,
        db::Database,
        error::{Error, ErrorKind, ErrorOrigin},
        model::{NewPost, NewUser, PostView, Role, User},
        router::{Procedure, call},
    };
    pub use sumdnc_core::prelude::*;
}
