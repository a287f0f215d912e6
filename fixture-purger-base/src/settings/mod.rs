//! Settings for purging a fixtures database.
//!
//! ### Configuration
//!
//! Settings are read from config files, then from the environment.
//!
//! Configuration key/value pairs are loaded in the following order, with later
//! sources taking precedence:
//!
//! 1. The files listed in `CONFIG_FILES`, comma separated, each overwriting
//!    the previous ones as appropriate. The format is inferred from the file
//!    extension.
//! 2. Environment variables with the prefix `PURGER_`. Variable names map
//!    onto the config hierarchy with `_` as separator, e.g.
//!    `PURGER_TRACING_LEVEL=debug` sets `tracing.level`.
//!
//! | Key           | Env var                | Default    |
//! |---------------|------------------------|------------|
//! | `db`          | `PURGER_DB`            | (required) |
//! | `purgeMode`   | `PURGER_PURGEMODE`     | `truncate` |
//! | `exclude`     | `PURGER_EXCLUDE`       | none       |
//! | `tracing.fmt` | `PURGER_TRACING_FMT`   | `full`     |
//! | `tracing.level` | `PURGER_TRACING_LEVEL` | `info`   |
//!
//! `exclude` is a list of table names; from the environment it is given
//! comma separated.

use std::collections::HashMap;
use std::env;

use eyre::{Result, WrapErr};
use serde::Deserialize;

use fixture_purger_core::PurgeMode;

pub use trace::*;

use crate::db::{EntityRegistry, SeaOrmObjectManager};
use crate::OrmPurger;

pub(crate) mod loader;
/// Tracing subscriber management
mod trace;

/// Settings of a fixtures purge.
#[derive(Debug, Clone, Deserialize)]
pub struct PurgerSettings {
    /// Database connection string
    pub db: String,
    /// How tables are emptied
    #[serde(default, rename = "purgemode", alias = "purgeMode")]
    pub purge_mode: PurgeMode,
    /// Tables to leave untouched
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Logging
    #[serde(default)]
    pub tracing: TracingConfig,
}

impl PurgerSettings {
    /// Load settings from the config files and environment of this process.
    pub fn load() -> Result<Self> {
        Self::load_from(env::vars().collect())
    }

    /// Load settings treating `env` as the process environment.
    pub fn load_from(env: HashMap<String, String>) -> Result<Self> {
        loader::load_settings_object("purger", env)
    }

    /// Connect to the configured database and build a purger for the
    /// entities in `registry`.
    pub async fn build_purger(
        &self,
        registry: EntityRegistry,
    ) -> Result<OrmPurger<SeaOrmObjectManager>> {
        let manager = SeaOrmObjectManager::connect(&self.db, registry)
            .await
            .wrap_err("Failed to connect to the fixtures database")?;
        let mut purger = OrmPurger::new(manager).with_purge_mode(self.purge_mode);
        purger.set_excluded_tables(self.exclude.iter().cloned());
        Ok(purger)
    }
}
