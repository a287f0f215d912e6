//! Purges every table an ORM maps so that data fixtures can be reloaded
//! into an empty database.
//!
//! The [`OrmPurger`] works against any [`ObjectManager`]; the [`db`] module
//! provides one backed by sea-orm. [`settings`] loads the purger's
//! configuration and sets up tracing.

// Forbid unsafe code outside of tests
#![cfg_attr(not(test), forbid(unsafe_code))]
#![warn(missing_docs)]

pub use fixture_purger_core::*;

pub mod settings;

/// The purger itself
mod purger;
pub use purger::*;

/// sea-orm integration
pub mod db;
