use derive_new::new;

use crate::DatabasePlatform;

/// Name of a table as mapped by the ORM.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    /// Schema (or database) the table lives in, if it is not the default one
    pub schema: Option<String>,
    /// Bare table name
    pub name: String,
    /// Whether the mapping asked for the identifier to be quoted
    pub quoted: bool,
}

impl TableName {
    /// An unquoted table in the default schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            quoted: false,
        }
    }

    /// Place the table in `schema`.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Quote the identifier when rendering it for a platform.
    pub fn quoted(mut self) -> Self {
        self.quoted = true;
        self
    }

    /// `schema.name` or just `name`, never quoted.
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// The name as it has to appear in SQL sent to `platform`.
    pub fn quoted_name(&self, platform: &DatabasePlatform) -> String {
        let render = |ident: &str| {
            if self.quoted {
                platform.quote_identifier(ident)
            } else {
                ident.to_owned()
            }
        };
        match &self.schema {
            Some(schema) => format!("{}.{}", render(schema), render(&self.name)),
            None => render(&self.name),
        }
    }
}

impl From<&str> for TableName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TableName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Cardinality of an association between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AssociationKind {
    /// Single-valued, unique on both sides
    OneToOne,
    /// Single-valued, many owners may point at the same target
    ManyToOne,
    /// Collection-valued inverse of a many-to-one
    OneToMany,
    /// Collection-valued on both sides, backed by a join table
    ManyToMany,
}

/// Table backing a many-to-many association.
#[derive(Debug, Clone, PartialEq, Eq, Hash, new)]
pub struct JoinTable {
    /// Name of the join table
    pub name: TableName,
}

/// One association declared on an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationMapping {
    /// Field on the declaring entity
    pub field: String,
    /// Entity on the other end
    pub target_entity: String,
    /// Cardinality
    pub kind: AssociationKind,
    /// Whether this side declares the association's storage
    pub is_owning_side: bool,
    /// Join table, for many-to-many associations
    pub join_table: Option<JoinTable>,
}

impl AssociationMapping {
    /// The owning side of a many-to-many association stored in `join_table`.
    pub fn many_to_many(
        field: impl Into<String>,
        target_entity: impl Into<String>,
        join_table: impl Into<TableName>,
    ) -> Self {
        Self {
            field: field.into(),
            target_entity: target_entity.into(),
            kind: AssociationKind::ManyToMany,
            is_owning_side: true,
            join_table: Some(JoinTable::new(join_table.into())),
        }
    }

    /// The inverse side of a many-to-many association. The join table is
    /// recorded for reference only; the owning side is responsible for it.
    pub fn inverse_many_to_many(
        field: impl Into<String>,
        target_entity: impl Into<String>,
        join_table: impl Into<TableName>,
    ) -> Self {
        Self {
            is_owning_side: false,
            ..Self::many_to_many(field, target_entity, join_table)
        }
    }

    /// An association stored in the entity's own table or the target's.
    pub fn to_single_table(
        field: impl Into<String>,
        target_entity: impl Into<String>,
        kind: AssociationKind,
        is_owning_side: bool,
    ) -> Self {
        Self {
            field: field.into(),
            target_entity: target_entity.into(),
            kind,
            is_owning_side,
            join_table: None,
        }
    }

    /// The join table this side is responsible for, if any. Only owning
    /// many-to-many associations own one.
    pub fn owned_join_table(&self) -> Option<&JoinTable> {
        if self.is_owning_side && self.kind == AssociationKind::ManyToMany {
            self.join_table.as_ref()
        } else {
            None
        }
    }
}

/// Mapping information for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    /// Entity name, for diagnostics
    pub name: String,
    /// Primary table of the entity
    pub table: TableName,
    /// Mapped superclasses carry inherited fields but have no table of their
    /// own
    pub is_mapped_superclass: bool,
    /// Associations declared on the entity
    pub associations: Vec<AssociationMapping>,
}

impl EntityMetadata {
    /// A concrete entity stored in `table`.
    pub fn new(name: impl Into<String>, table: impl Into<TableName>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            is_mapped_superclass: false,
            associations: vec![],
        }
    }

    /// An abstract mapped superclass.
    pub fn mapped_superclass(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table: TableName::new(name.clone()),
            name,
            is_mapped_superclass: true,
            associations: vec![],
        }
    }

    /// Add an association to the entity.
    pub fn with_association(mut self, association: AssociationMapping) -> Self {
        self.associations.push(association);
        self
    }

    /// Join tables owned by this entity, in declaration order.
    pub fn owned_join_tables(&self) -> impl Iterator<Item = &JoinTable> {
        self.associations
            .iter()
            .filter_map(AssociationMapping::owned_join_table)
    }
}
