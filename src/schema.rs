//! Static field schemas.
//!
//! Each entity declares, once at startup, the semantic type of every field a
//! client may filter or sort on. The compiler only ever consults these maps;
//! nothing is discovered from entity structs at runtime.
//!
//! ```rust,ignore
//! let schema = SchemaRegistry::new()
//!     .entity(
//!         EntitySchema::new("user")
//!             .field("name", FieldType::String)
//!             .field("age", FieldType::Number)
//!             .field("createdAt", FieldType::DateTime),
//!     );
//!
//! assert_eq!(schema.field_type("user", "age"), Some(FieldType::Number));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::operation::Operation;

/// Semantic type of a filterable or sortable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    String,
    Number,
    Date,
    #[serde(rename = "DATETIME")]
    DateTime,
}

impl FieldType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Number => "NUMBER",
            Self::Date => "DATE",
            Self::DateTime => "DATETIME",
        }
    }

    /// Whether `operation` can be applied to a field of this type.
    ///
    /// Comparisons work for every type; pattern operators need text.
    #[must_use]
    pub const fn supports(self, operation: Operation) -> bool {
        !operation.is_pattern() || matches!(self, Self::String)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of field types, keyed by entity and field name.
pub trait SchemaProvider: Send + Sync {
    /// Type of `field` on `entity`, or `None` when the field is not declared.
    fn field_type(&self, entity: &str, field: &str) -> Option<FieldType>;
}

impl<T: SchemaProvider + ?Sized> SchemaProvider for Arc<T> {
    fn field_type(&self, entity: &str, field: &str) -> Option<FieldType> {
        (**self).field_type(entity, field)
    }
}

/// Declared fields of a single entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitySchema {
    name: String,
    fields: HashMap<String, FieldType>,
}

impl EntitySchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
        }
    }

    /// Declare a field. Redeclaring a name replaces its type.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<FieldType> {
        self.fields.get(field).copied()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), *ty))
    }
}

impl SchemaProvider for EntitySchema {
    fn field_type(&self, entity: &str, field: &str) -> Option<FieldType> {
        if entity == self.name {
            self.get(field)
        } else {
            None
        }
    }
}

/// Schemas for every entity exposed to paged queries.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entities: HashMap<String, EntitySchema>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entity(mut self, schema: EntitySchema) -> Self {
        self.entities.insert(schema.name.clone(), schema);
        self
    }

    #[must_use]
    pub fn get(&self, entity: &str) -> Option<&EntitySchema> {
        self.entities.get(entity)
    }
}

impl SchemaProvider for SchemaRegistry {
    fn field_type(&self, entity: &str, field: &str) -> Option<FieldType> {
        self.entities.get(entity).and_then(|schema| schema.get(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> EntitySchema {
        EntitySchema::new("user")
            .field("name", FieldType::String)
            .field("age", FieldType::Number)
            .field("birthday", FieldType::Date)
            .field("createdAt", FieldType::DateTime)
    }

    #[test]
    fn test_entity_schema_lookup() {
        let schema = users();
        assert_eq!(schema.field_type("user", "age"), Some(FieldType::Number));
        assert_eq!(schema.field_type("user", "missing"), None);
        assert_eq!(schema.field_type("order", "age"), None);
    }

    #[test]
    fn test_field_lookup_is_case_sensitive() {
        assert_eq!(users().get("createdat"), None);
        assert_eq!(users().get("createdAt"), Some(FieldType::DateTime));
    }

    #[test]
    fn test_registry_routes_by_entity() {
        let registry = SchemaRegistry::new()
            .entity(users())
            .entity(EntitySchema::new("order").field("total", FieldType::Number));

        assert_eq!(registry.field_type("order", "total"), Some(FieldType::Number));
        assert_eq!(registry.field_type("user", "total"), None);
        assert_eq!(registry.field_type("invoice", "total"), None);
        assert_eq!(registry.get("user").map(EntitySchema::name), Some("user"));
    }

    #[test]
    fn test_operation_matrix() {
        for op in Operation::ALL {
            assert!(FieldType::String.supports(op), "STRING should support {op}");
        }
        for ty in [FieldType::Number, FieldType::Date, FieldType::DateTime] {
            for op in Operation::ALL {
                assert_eq!(ty.supports(op), !op.is_pattern(), "{ty} / {op}");
            }
        }
    }
}
