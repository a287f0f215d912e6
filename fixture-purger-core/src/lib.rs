//! Core types for purging the tables mapped by an ORM before data fixtures
//! are (re)loaded.
//!
//! This crate only describes the world the purger works against: entity
//! metadata as exposed by the ORM, the SQL platform behind a connection and
//! the traits an ORM integration must implement. The purger itself lives in
//! `fixture-purger-base`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub use error::*;
pub use traits::*;
pub use types::*;

mod error;
/// Seams an ORM integration implements
pub mod traits;
/// Metadata, platform and mode types
pub mod types;
