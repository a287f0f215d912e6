use std::collections::HashMap;

use async_trait::async_trait;
use derive_new::new;
use parking_lot::Mutex;

use fixture_purger_core::*;

/// Metadata provider serving a fixed entity list.
#[derive(Debug, Clone, Default, new)]
pub struct FixedMetadata(pub Vec<EntityMetadata>);

#[async_trait]
impl MetadataProvider for FixedMetadata {
    async fn all_metadata(&self) -> PurgeResult<Vec<EntityMetadata>> {
        Ok(self.0.clone())
    }
}

/// Connection double that records every statement it is asked to run.
///
/// Statements listed with [`RecordingConnection::fail_on`] are still
/// recorded but answered with an error.
#[derive(Debug)]
pub struct RecordingConnection {
    platform: DatabasePlatform,
    rows_per_statement: u64,
    failures: HashMap<String, &'static str>,
    statements: Mutex<Vec<String>>,
}

impl RecordingConnection {
    pub fn new(platform: DatabasePlatform) -> Self {
        Self {
            platform,
            rows_per_statement: 0,
            failures: HashMap::new(),
            statements: Mutex::new(vec![]),
        }
    }

    /// Report `rows` affected rows for every successful statement.
    pub fn with_rows_per_statement(mut self, rows: u64) -> Self {
        self.rows_per_statement = rows;
        self
    }

    /// Fail whenever `sql` is executed.
    pub fn fail_on(mut self, sql: impl Into<String>, message: &'static str) -> Self {
        self.failures.insert(sql.into(), message);
        self
    }

    /// Everything executed so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().clone()
    }
}

#[async_trait]
impl PurgeConnection for RecordingConnection {
    fn database_platform(&self) -> DatabasePlatform {
        self.platform.clone()
    }

    async fn execute(&self, sql: &str) -> PurgeResult<u64> {
        self.statements.lock().push(sql.to_owned());
        match self.failures.get(sql) {
            Some(message) => Err(PurgeError::statement_str(sql, *message)),
            None => Ok(self.rows_per_statement),
        }
    }
}

/// An ORM session assembled from separate metadata and connection doubles.
#[derive(Debug, new)]
pub struct TestObjectManager<P, C> {
    pub metadata: P,
    pub connection: C,
}

impl<P, C> ObjectManager for TestObjectManager<P, C>
where
    P: MetadataProvider,
    C: PurgeConnection,
{
    fn metadata_provider(&self) -> &dyn MetadataProvider {
        &self.metadata
    }

    fn connection(&self) -> &dyn PurgeConnection {
        &self.connection
    }
}

/// `User` and `Tag` with `User` owning a many-to-many through `user_tag`.
/// The inverse side on `Tag` references the same join table.
pub fn user_tag_metadata() -> Vec<EntityMetadata> {
    vec![
        EntityMetadata::new("User", "user")
            .with_association(AssociationMapping::many_to_many("tags", "Tag", "user_tag")),
        EntityMetadata::new("Tag", "tag").with_association(
            AssociationMapping::inverse_many_to_many("users", "User", "user_tag"),
        ),
    ]
}

/// An abstract `BaseEntity` and its concrete `Invoice` subclass.
pub fn invoice_metadata() -> Vec<EntityMetadata> {
    vec![
        EntityMetadata::mapped_superclass("BaseEntity"),
        EntityMetadata::new("Invoice", "invoice").with_association(
            AssociationMapping::to_single_table(
                "customer",
                "Customer",
                AssociationKind::ManyToOne,
                true,
            ),
        ),
    ]
}
