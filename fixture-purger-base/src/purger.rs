use derive_new::new;
use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use fixture_purger_core::{
    DatabasePlatform, EntityMetadata, ObjectManager, PurgeConnection, PurgeError, PurgeMode,
    PurgeResult,
};

const DISABLE_FOREIGN_KEY_CHECKS: &str = "SET foreign_key_checks = 0";
const ENABLE_FOREIGN_KEY_CHECKS: &str = "SET foreign_key_checks = 1";

/// Outcome of a successful purge.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct PurgeReport {
    /// Platform the statements were generated for
    pub platform: DatabasePlatform,
    /// Mode the tables were cleared with
    pub mode: PurgeMode,
    /// Cleared tables, in purge order
    pub tables: Vec<String>,
    /// Sum of the affected row counts reported by the database
    pub rows_affected: u64,
}

/// Empties every table mapped by an ORM session before fixtures are loaded.
///
/// The table list is rebuilt from the session's metadata on every call to
/// [`OrmPurger::purge`]; nothing is cached between calls.
#[derive(Debug)]
pub struct OrmPurger<M> {
    manager: M,
    purge_mode: PurgeMode,
    excluded_tables: Vec<String>,
}

impl<M: ObjectManager> OrmPurger<M> {
    /// A purger truncating every table mapped by `manager`.
    pub fn new(manager: M) -> Self {
        Self {
            manager,
            purge_mode: PurgeMode::default(),
            excluded_tables: vec![],
        }
    }

    /// Builder variant of [`OrmPurger::set_purge_mode`].
    pub fn with_purge_mode(mut self, mode: PurgeMode) -> Self {
        self.purge_mode = mode;
        self
    }

    /// Select how tables are emptied.
    pub fn set_purge_mode(&mut self, mode: PurgeMode) {
        self.purge_mode = mode;
    }

    /// How tables are emptied.
    pub fn purge_mode(&self) -> PurgeMode {
        self.purge_mode
    }

    /// Replace the ORM session this purger works on.
    pub fn set_object_manager(&mut self, manager: M) {
        self.manager = manager;
    }

    /// The ORM session this purger works on.
    pub fn object_manager(&self) -> &M {
        &self.manager
    }

    /// Unwrap into the ORM session.
    pub fn into_object_manager(self) -> M {
        self.manager
    }

    /// Tables to leave untouched, by bare or schema-qualified name.
    pub fn set_excluded_tables<I, S>(&mut self, tables: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_tables = tables.into_iter().map(Into::into).collect();
    }

    /// Tables left untouched by [`OrmPurger::purge`].
    pub fn excluded_tables(&self) -> &[String] {
        &self.excluded_tables
    }

    /// Tables a purge against `platform` would clear, in the order they
    /// would be cleared.
    pub async fn purge_tables(&self, platform: &DatabasePlatform) -> PurgeResult<Vec<String>> {
        let metadatas = self.manager.metadata_provider().all_metadata().await?;
        Ok(self.collect_tables(&metadatas, platform))
    }

    fn collect_tables(
        &self,
        metadatas: &[EntityMetadata],
        platform: &DatabasePlatform,
    ) -> Vec<String> {
        let entity_tables = metadatas
            .iter()
            .filter(|metadata| !metadata.is_mapped_superclass)
            .map(|metadata| &metadata.table);
        let join_tables = metadatas
            .iter()
            .flat_map(|metadata| metadata.owned_join_tables())
            .map(|join| &join.name);

        entity_tables
            .chain(join_tables)
            .filter(|table| {
                !self
                    .excluded_tables
                    .iter()
                    .any(|excluded| *excluded == table.name || *excluded == table.qualified_name())
            })
            .map(|table| table.quoted_name(platform))
            .unique()
            .collect()
    }

    fn clear_statement(&self, platform: &DatabasePlatform, table: &str) -> PurgeResult<String> {
        match self.purge_mode {
            PurgeMode::Delete => Ok(format!("DELETE IGNORE FROM {table}")),
            PurgeMode::Truncate => platform.truncate_table_sql(table, true),
        }
    }

    /// Empty every mapped table.
    ///
    /// On MySQL-family platforms foreign key checks are disabled for the
    /// duration of the purge and re-enabled afterwards, also when clearing a
    /// table failed. Statements are not wrapped in a transaction: on failure
    /// the returned [`PurgeError::PartialPurge`] lists the tables that were
    /// already emptied.
    #[instrument(skip(self), fields(mode = %self.purge_mode))]
    pub async fn purge(&self) -> PurgeResult<PurgeReport> {
        let connection = self.manager.connection();
        let platform = connection.database_platform();
        let tables = self.purge_tables(&platform).await?;
        let statements = tables
            .iter()
            .map(|table| self.clear_statement(&platform, table))
            .collect::<PurgeResult<Vec<_>>>()?;
        debug!(%platform, table_count = tables.len(), "Purging tables");

        let toggle_foreign_keys = platform.requires_foreign_key_toggle();
        if toggle_foreign_keys {
            connection.execute(DISABLE_FOREIGN_KEY_CHECKS).await?;
        }

        let outcome = clear_tables(connection, &tables, &statements).await;

        if toggle_foreign_keys {
            if outcome.is_err() {
                warn!("Purge aborted, re-enabling foreign key checks");
            }
            if let Err(err) = connection.execute(ENABLE_FOREIGN_KEY_CHECKS).await {
                if outcome.is_ok() {
                    return Err(err);
                }
                warn!(error = %err, "Failed to re-enable foreign key checks");
            }
        }

        let rows_affected = outcome?;
        info!(
            %platform,
            table_count = tables.len(),
            rows_affected,
            "Purged fixture tables"
        );
        Ok(PurgeReport::new(platform, self.purge_mode, tables, rows_affected))
    }
}

async fn clear_tables(
    connection: &dyn PurgeConnection,
    tables: &[String],
    statements: &[String],
) -> PurgeResult<u64> {
    let mut rows_affected = 0;
    for (purged, (table, sql)) in tables.iter().zip(statements).enumerate() {
        match connection.execute(sql).await {
            Ok(affected) => {
                debug!(table = %table, affected, "Cleared table");
                rows_affected += affected;
            }
            Err(err) => {
                return Err(PurgeError::PartialPurge {
                    purged: tables[..purged].to_vec(),
                    source: Box::new(err),
                })
            }
        }
    }
    Ok(rows_affected)
}

#[cfg(test)]
mod test {
    use fixture_purger_core::{AssociationMapping, EntityMetadata, TableName};
    use fixture_purger_test::mocks::{MockMetadataProvider, MockPurgeConnection};
    use fixture_purger_test::test_utils::*;
    use mockall::Sequence;

    use super::*;

    type TestPurger = OrmPurger<TestObjectManager<FixedMetadata, RecordingConnection>>;

    fn purger(metadata: Vec<EntityMetadata>, connection: RecordingConnection) -> TestPurger {
        OrmPurger::new(TestObjectManager::new(FixedMetadata::new(metadata), connection))
    }

    fn statements(purger: &TestPurger) -> Vec<String> {
        purger.object_manager().connection.statements()
    }

    #[tokio::test]
    async fn owning_many_to_many_join_table_is_listed_once() {
        let purger = purger(
            user_tag_metadata(),
            RecordingConnection::new(DatabasePlatform::MySql),
        );
        let tables = purger.purge_tables(&DatabasePlatform::MySql).await.unwrap();
        assert_eq!(tables, ["user", "tag", "user_tag"]);
    }

    #[tokio::test]
    async fn join_table_claimed_by_both_sides_is_listed_once() {
        let metadata = vec![
            EntityMetadata::new("User", "user")
                .with_association(AssociationMapping::many_to_many("tags", "Tag", "user_tag")),
            EntityMetadata::new("Tag", "tag")
                .with_association(AssociationMapping::many_to_many("users", "User", "user_tag")),
        ];
        let purger = purger(metadata, RecordingConnection::new(DatabasePlatform::Postgres));
        let tables = purger
            .purge_tables(&DatabasePlatform::Postgres)
            .await
            .unwrap();
        assert_eq!(tables, ["user", "tag", "user_tag"]);
    }

    #[tokio::test]
    async fn mapped_superclasses_have_no_table() {
        let purger = purger(
            invoice_metadata(),
            RecordingConnection::new(DatabasePlatform::MySql),
        );
        let tables = purger.purge_tables(&DatabasePlatform::MySql).await.unwrap();
        assert_eq!(tables, ["invoice"]);
    }

    #[tokio::test]
    async fn table_names_are_quoted_for_the_platform() {
        let metadata = vec![EntityMetadata::new(
            "Order",
            TableName::new("order").with_schema("shop").quoted(),
        )];
        let purger = purger(metadata, RecordingConnection::new(DatabasePlatform::MySql));

        let report = purger.purge().await.unwrap();

        assert_eq!(report.tables, ["`shop`.`order`"]);
        assert_eq!(
            statements(&purger),
            [
                "SET foreign_key_checks = 0",
                "TRUNCATE `shop`.`order`",
                "SET foreign_key_checks = 1",
            ]
        );
    }

    #[tokio::test]
    async fn mysql_truncate_is_wrapped_in_foreign_key_toggle() {
        let purger = purger(
            user_tag_metadata(),
            RecordingConnection::new(DatabasePlatform::MySql).with_rows_per_statement(2),
        );

        let report = purger.purge().await.unwrap();

        assert_eq!(
            statements(&purger),
            [
                "SET foreign_key_checks = 0",
                "TRUNCATE user",
                "TRUNCATE tag",
                "TRUNCATE user_tag",
                "SET foreign_key_checks = 1",
            ]
        );
        assert_eq!(
            report,
            PurgeReport::new(
                DatabasePlatform::MySql,
                PurgeMode::Truncate,
                vec!["user".into(), "tag".into(), "user_tag".into()],
                6,
            )
        );
    }

    #[tokio::test]
    async fn delete_mode_never_truncates() {
        let mut purger = purger(
            user_tag_metadata(),
            RecordingConnection::new(DatabasePlatform::MariaDb),
        );
        purger.set_purge_mode(PurgeMode::Delete);
        assert_eq!(purger.purge_mode(), PurgeMode::Delete);

        purger.purge().await.unwrap();

        assert_eq!(
            statements(&purger),
            [
                "SET foreign_key_checks = 0",
                "DELETE IGNORE FROM user",
                "DELETE IGNORE FROM tag",
                "DELETE IGNORE FROM user_tag",
                "SET foreign_key_checks = 1",
            ]
        );
    }

    #[tokio::test]
    async fn other_platforms_keep_foreign_key_checks() {
        let purger = purger(
            user_tag_metadata(),
            RecordingConnection::new(DatabasePlatform::Postgres),
        );

        purger.purge().await.unwrap();

        assert_eq!(
            statements(&purger),
            [
                "TRUNCATE user CASCADE",
                "TRUNCATE tag CASCADE",
                "TRUNCATE user_tag CASCADE",
            ]
        );
    }

    #[tokio::test]
    async fn excluded_tables_are_skipped() {
        let mut purger = purger(
            user_tag_metadata(),
            RecordingConnection::new(DatabasePlatform::Sqlite),
        );
        purger.set_excluded_tables(["tag"]);
        assert_eq!(purger.excluded_tables(), ["tag"]);

        purger.purge().await.unwrap();

        assert_eq!(
            statements(&purger),
            ["DELETE FROM user", "DELETE FROM user_tag"]
        );
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn failed_statement_still_reenables_foreign_key_checks() {
        let purger = purger(
            user_tag_metadata(),
            RecordingConnection::new(DatabasePlatform::MySql)
                .fail_on("TRUNCATE tag", "Lock wait timeout exceeded"),
        );

        let err = purger.purge().await.unwrap_err();

        assert!(matches!(err, PurgeError::PartialPurge { .. }));
        assert_eq!(err.purged_tables(), ["user"]);
        assert_eq!(err.failed_sql(), Some("TRUNCATE tag"));
        assert_eq!(
            statements(&purger),
            [
                "SET foreign_key_checks = 0",
                "TRUNCATE user",
                "TRUNCATE tag",
                "SET foreign_key_checks = 1",
            ]
        );
        assert!(logs_contain("Purge aborted, re-enabling foreign key checks"));
    }

    #[tokio::test]
    async fn failed_reenable_is_reported_after_a_clean_purge() {
        let purger = purger(
            invoice_metadata(),
            RecordingConnection::new(DatabasePlatform::MySql)
                .fail_on(ENABLE_FOREIGN_KEY_CHECKS, "server has gone away"),
        );

        let err = purger.purge().await.unwrap_err();

        assert_eq!(err.failed_sql(), Some(ENABLE_FOREIGN_KEY_CHECKS));
        assert!(err.purged_tables().is_empty());
    }

    #[tokio::test]
    async fn unsupported_platform_fails_before_touching_the_database() {
        let purger = purger(
            user_tag_metadata(),
            RecordingConnection::new(DatabasePlatform::Other("db2".into())),
        );

        let err = purger.purge().await.unwrap_err();

        assert!(matches!(err, PurgeError::UnsupportedPlatform(_)));
        assert!(statements(&purger).is_empty());
    }

    #[tokio::test]
    async fn metadata_is_reloaded_on_every_purge() {
        let mut metadata = MockMetadataProvider::new();
        let mut seq = Sequence::new();
        metadata
            .expect__all_metadata()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![EntityMetadata::new("User", "user")]));
        metadata
            .expect__all_metadata()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![EntityMetadata::new("Tag", "tag")]));

        let purger = OrmPurger::new(TestObjectManager::new(
            metadata,
            RecordingConnection::new(DatabasePlatform::Postgres),
        ));

        assert_eq!(purger.purge().await.unwrap().tables, ["user"]);
        assert_eq!(purger.purge().await.unwrap().tables, ["tag"]);
    }

    #[tokio::test]
    async fn metadata_failure_runs_no_statements() {
        let mut metadata = MockMetadataProvider::new();
        metadata
            .expect__all_metadata()
            .returning(|| Err(PurgeError::from_metadata_str("mapping driver failed")));
        let mut connection = MockPurgeConnection::new();
        connection
            .expect__database_platform()
            .returning(|| DatabasePlatform::MySql);
        connection.expect__execute().never();

        let purger = OrmPurger::new(TestObjectManager::new(metadata, connection));

        let err = purger.purge().await.unwrap_err();
        assert!(matches!(err, PurgeError::Metadata(_)));
    }

    #[tokio::test]
    async fn statements_run_in_order_on_the_session_connection() {
        let mut connection = MockPurgeConnection::new();
        connection
            .expect__database_platform()
            .returning(|| DatabasePlatform::MySql);
        let mut seq = Sequence::new();
        for expected in [
            "SET foreign_key_checks = 0",
            "DELETE IGNORE FROM invoice",
            "SET foreign_key_checks = 1",
        ] {
            connection
                .expect__execute()
                .withf(move |sql: &str| sql == expected)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(1));
        }

        let purger = OrmPurger::new(TestObjectManager::new(
            FixedMetadata::new(invoice_metadata()),
            connection,
        ))
        .with_purge_mode(PurgeMode::Delete);

        let report = purger.purge().await.unwrap();
        assert_eq!(report.rows_affected, 1);
    }
}
