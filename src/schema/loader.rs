//! Schema catalog: the immutable set of descriptors a compiler works against
//!
//! A catalog is built once at startup, either programmatically or from a
//! JSON file of the form:
//!
//! ```json
//! {
//!   "entities": [
//!     {
//!       "entity": "users",
//!       "fields": [{ "name": "id", "kind": "integer" }],
//!       "relationships": [
//!         { "name": "role", "target": "roles", "local_key": "role_id", "remote_key": "id" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::errors::{SchemaError, SchemaResult};
use super::types::SchemaDescriptor;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    entities: Vec<SchemaDescriptor>,
}

/// Immutable registry of schema descriptors keyed by entity name
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    entities: BTreeMap<String, SchemaDescriptor>,
}

impl SchemaCatalog {
    /// Builds a catalog, validating every descriptor and every relationship target.
    pub fn new(descriptors: impl IntoIterator<Item = SchemaDescriptor>) -> SchemaResult<Self> {
        let mut entities = BTreeMap::new();

        for descriptor in descriptors {
            descriptor.validate_structure()?;
            let name = descriptor.entity().to_string();
            if entities.contains_key(&name) {
                return Err(SchemaError::DuplicateEntity(name));
            }
            entities.insert(name, descriptor);
        }

        let catalog = Self { entities };
        catalog.validate_relationships()?;
        Ok(catalog)
    }

    /// Loads a catalog from a JSON file
    pub fn load(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Parses a catalog from JSON text
    pub fn from_json(content: &str) -> SchemaResult<Self> {
        let file: CatalogFile = serde_json::from_str(content)
            .map_err(|e| SchemaError::Malformed(format!("Invalid JSON: {}", e)))?;
        Self::new(file.entities)
    }

    fn validate_relationships(&self) -> SchemaResult<()> {
        for descriptor in self.entities.values() {
            for rel in descriptor.relationships() {
                let target =
                    self.entities
                        .get(&rel.target)
                        .ok_or_else(|| SchemaError::UnknownTarget {
                            entity: descriptor.entity().to_string(),
                            relationship: rel.name.clone(),
                            target: rel.target.clone(),
                        })?;

                if target.field(&rel.remote_key).is_none() {
                    return Err(SchemaError::UnknownJoinKey {
                        entity: target.entity().to_string(),
                        relationship: rel.name.clone(),
                        key: rel.remote_key.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Gets a descriptor by entity name
    pub fn get(&self, entity: &str) -> Option<&SchemaDescriptor> {
        self.entities.get(entity)
    }

    /// Gets a descriptor by entity name, failing with `UnknownEntity`
    pub fn descriptor(&self, entity: &str) -> SchemaResult<&SchemaDescriptor> {
        self.get(entity)
            .ok_or_else(|| SchemaError::UnknownEntity(entity.to_string()))
    }

    /// Iterates descriptors in entity-name order
    pub fn descriptors(&self) -> impl Iterator<Item = &SchemaDescriptor> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    fn roles() -> SchemaDescriptor {
        SchemaDescriptor::builder("roles")
            .field("id", FieldKind::Integer)
            .field("name", FieldKind::Text)
            .build()
            .unwrap()
    }

    fn users() -> SchemaDescriptor {
        SchemaDescriptor::builder("users")
            .field("id", FieldKind::Integer)
            .field("role_id", FieldKind::Integer)
            .relationship("role", "roles", "role_id", "id")
            .build()
            .unwrap()
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = SchemaCatalog::new([users(), roles()]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("users").is_some());
        assert!(matches!(
            catalog.descriptor("posts"),
            Err(SchemaError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_unknown_target_rejected() {
        let result = SchemaCatalog::new([users()]);
        assert!(matches!(result, Err(SchemaError::UnknownTarget { .. })));
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let result = SchemaCatalog::new([roles(), roles()]);
        assert!(matches!(result, Err(SchemaError::DuplicateEntity(_))));
    }

    #[test]
    fn test_unknown_remote_key_rejected() {
        let users = SchemaDescriptor::builder("users")
            .field("role_id", FieldKind::Integer)
            .relationship("role", "roles", "role_id", "role_pk")
            .build()
            .unwrap();
        let result = SchemaCatalog::new([users, roles()]);
        assert!(matches!(result, Err(SchemaError::UnknownJoinKey { .. })));
    }

    #[test]
    fn test_from_json() {
        let catalog = SchemaCatalog::from_json(
            r#"{
                "entities": [
                    {"entity": "roles", "fields": [{"name": "id", "kind": "integer"}]},
                    {
                        "entity": "users",
                        "fields": [
                            {"name": "role_id", "kind": "integer"},
                            {"name": "attributes", "kind": "document"}
                        ],
                        "relationships": [
                            {"name": "role", "target": "roles", "local_key": "role_id", "remote_key": "id"}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let users = catalog.get("users").unwrap();
        assert_eq!(users.field("attributes").unwrap().kind, FieldKind::Document);
        assert!(catalog.get("roles").unwrap().relationships().is_empty());
    }

    #[test]
    fn test_from_json_malformed() {
        let result = SchemaCatalog::from_json("{\"entities\": 3}");
        assert!(matches!(result, Err(SchemaError::Malformed(_))));
    }
}
