use std::fmt::Debug;

use async_trait::async_trait;
use auto_impl::auto_impl;

use crate::{EntityMetadata, PurgeResult};

/// Source of mapping information for every entity known to the ORM.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait MetadataProvider: Send + Sync + Debug {
    /// Metadata of all mapped entities, mapped superclasses included, in
    /// the ORM's enumeration order.
    async fn all_metadata(&self) -> PurgeResult<Vec<EntityMetadata>>;
}
