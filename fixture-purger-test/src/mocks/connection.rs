#![allow(non_snake_case)]

use async_trait::async_trait;
use mockall::*;

use fixture_purger_core::*;

mock! {
    pub PurgeConnection {
        pub fn _database_platform(&self) -> DatabasePlatform;

        pub fn _execute(&self, sql: &str) -> PurgeResult<u64>;
    }
}

impl std::fmt::Debug for MockPurgeConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockPurgeConnection")
    }
}

#[async_trait]
impl PurgeConnection for MockPurgeConnection {
    fn database_platform(&self) -> DatabasePlatform {
        self._database_platform()
    }

    async fn execute(&self, sql: &str) -> PurgeResult<u64> {
        self._execute(sql)
    }
}
