use derive_new::new;
use tracing::instrument;

use fixture_purger_core::{MetadataProvider, ObjectManager, PurgeConnection, PurgeResult};

use crate::db::{EntityRegistry, SeaOrmConnection};

/// ORM session backed by sea-orm: registered entities plus the connection
/// their tables live behind.
#[derive(Debug, new)]
pub struct SeaOrmObjectManager {
    connection: SeaOrmConnection,
    registry: EntityRegistry,
}

impl SeaOrmObjectManager {
    /// Connect to `url` and serve the entities in `registry`.
    #[instrument(skip_all)]
    pub async fn connect(url: &str, registry: EntityRegistry) -> PurgeResult<Self> {
        let connection = SeaOrmConnection::connect(url).await?;
        Ok(Self::new(connection, registry))
    }

    /// Registered entities.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Unwrap into the connection.
    pub fn into_connection(self) -> SeaOrmConnection {
        self.connection
    }
}

impl ObjectManager for SeaOrmObjectManager {
    fn metadata_provider(&self) -> &dyn MetadataProvider {
        &self.registry
    }

    fn connection(&self) -> &dyn PurgeConnection {
        &self.connection
    }
}
