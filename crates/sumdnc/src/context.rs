use crate::{config::Config, db::Database};
use sumdnc_core::db::PagePolicy;

///
/// Context
///
/// Process-wide request context. Built once and shared by reference with
/// every procedure call.
///

pub struct Context {
    config: Config,
    db: Database,
}

impl Context {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_database(config, Database::new())
    }

    #[must_use]
    pub const fn with_database(config: Config, db: Database) -> Self {
        Self { config, db }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    /// Page limits applied to every list procedure.
    #[must_use]
    pub const fn page_policy(&self) -> PagePolicy {
        self.config.pagination
    }
}
