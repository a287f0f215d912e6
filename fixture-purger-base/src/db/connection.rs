use async_trait::async_trait;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DbConn, Statement};
use tracing::{instrument, trace};

use fixture_purger_core::{DatabasePlatform, PurgeConnection, PurgeError, PurgeResult};

/// Platform a sea-orm backend speaks.
pub fn platform_for_backend(backend: DatabaseBackend) -> DatabasePlatform {
    #[allow(unreachable_patterns)]
    match backend {
        DatabaseBackend::MySql => DatabasePlatform::MySql,
        DatabaseBackend::Postgres => DatabasePlatform::Postgres,
        DatabaseBackend::Sqlite => DatabasePlatform::Sqlite,
        other => DatabasePlatform::Other(format!("{other:?}").to_lowercase()),
    }
}

/// A sea-orm connection the purger can run its statements on.
#[derive(Debug)]
pub struct SeaOrmConnection(DbConn);

impl SeaOrmConnection {
    /// Open a connection to `url`.
    #[instrument(skip_all)]
    pub async fn connect(url: &str) -> PurgeResult<Self> {
        let db = Database::connect(url)
            .await
            .map_err(PurgeError::from_connection)?;
        Ok(Self(db))
    }

    /// Unwrap into the sea-orm connection.
    pub fn into_inner(self) -> DbConn {
        self.0
    }
}

impl From<DbConn> for SeaOrmConnection {
    fn from(db: DbConn) -> Self {
        Self(db)
    }
}

#[async_trait]
impl PurgeConnection for SeaOrmConnection {
    fn database_platform(&self) -> DatabasePlatform {
        platform_for_backend(self.0.get_database_backend())
    }

    async fn execute(&self, sql: &str) -> PurgeResult<u64> {
        trace!(sql, "Executing statement");
        let backend = self.0.get_database_backend();
        let result = ConnectionTrait::execute(&self.0, Statement::from_string(backend, sql.to_owned()))
            .await
            .map_err(|err| PurgeError::statement(sql, err))?;
        Ok(result.rows_affected())
    }
}
