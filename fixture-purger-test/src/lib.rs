//! Mocks and metadata fixtures for testing purgers without a database.

#![allow(missing_docs)]

/// Mock objects for the purger traits
pub mod mocks;

/// Canned entity metadata and recording doubles
pub mod test_utils;
