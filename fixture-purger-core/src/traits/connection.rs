use std::fmt::Debug;

use async_trait::async_trait;
use auto_impl::auto_impl;

use crate::{DatabasePlatform, PurgeResult};

/// A connection able to run raw SQL against the fixtures database.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait PurgeConnection: Send + Sync + Debug {
    /// The platform this connection talks to.
    fn database_platform(&self) -> DatabasePlatform;

    /// Execute a single statement and return the number of affected rows.
    async fn execute(&self, sql: &str) -> PurgeResult<u64>;
}
