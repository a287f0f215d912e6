#![allow(non_snake_case)]

use async_trait::async_trait;
use mockall::*;

use fixture_purger_core::*;

mock! {
    pub MetadataProvider {
        pub fn _all_metadata(&self) -> PurgeResult<Vec<EntityMetadata>>;
    }
}

impl std::fmt::Debug for MockMetadataProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockMetadataProvider")
    }
}

#[async_trait]
impl MetadataProvider for MockMetadataProvider {
    async fn all_metadata(&self) -> PurgeResult<Vec<EntityMetadata>> {
        self._all_metadata()
    }
}
