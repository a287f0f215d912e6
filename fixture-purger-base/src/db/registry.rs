use async_trait::async_trait;
use sea_orm::EntityName;

use fixture_purger_core::{
    AssociationMapping, EntityMetadata, MetadataProvider, PurgeResult, TableName,
};

/// Table an entity is stored in, schema included.
pub fn entity_table<E: EntityName>() -> TableName {
    let entity = E::default();
    let table = TableName::new(entity.table_name());
    match entity.schema_name() {
        Some(schema) => table.with_schema(schema),
        None => table,
    }
}

/// Metadata for a sea-orm entity, without associations.
pub fn entity_metadata<E: EntityName>() -> EntityMetadata {
    let table = entity_table::<E>();
    EntityMetadata::new(table.name.clone(), table)
}

/// The entities of an application, as the purger needs to see them.
///
/// sea-orm does not keep a global list of entities, so they are registered
/// here once, in the order their tables should be cleared.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Vec<EntityMetadata>,
}

impl EntityRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register hand-written metadata.
    pub fn register(mut self, metadata: EntityMetadata) -> Self {
        self.entities.push(metadata);
        self
    }

    /// Register a sea-orm entity.
    pub fn entity<E: EntityName>(self) -> Self {
        self.register(entity_metadata::<E>())
    }

    /// Register a sea-orm entity `E` owning a many-to-many association to
    /// `T` through the junction entity `J`. The junction table is cleared
    /// through the association; it does not need registering itself.
    pub fn many_to_many<E, T, J>(self, field: &str) -> Self
    where
        E: EntityName,
        T: EntityName,
        J: EntityName,
    {
        let target = entity_table::<T>().name;
        self.register(
            entity_metadata::<E>()
                .with_association(AssociationMapping::many_to_many(field, target, entity_table::<J>())),
        )
    }

    /// Registered entities, in registration order.
    pub fn entities(&self) -> &[EntityMetadata] {
        &self.entities
    }
}

#[async_trait]
impl MetadataProvider for EntityRegistry {
    async fn all_metadata(&self) -> PurgeResult<Vec<EntityMetadata>> {
        Ok(self.entities.clone())
    }
}
