//! Schema descriptor types
//!
//! A descriptor is static metadata about one entity:
//! - its fields, in declaration order, each with a [`FieldKind`]
//! - its named relationships to other entities of the same catalog
//!
//! Descriptors are immutable once built. The compiler only ever borrows them.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};

/// Semantic type of a field, used for operator dispatch and coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// UTF-8 text
    Text,
    /// 64-bit signed integer
    Integer,
    /// Boolean
    Boolean,
    /// Enumeration stored by its textual representation
    Enum,
    /// Date/time without zone
    Temporal,
    /// Semi-structured document (object/array of scalars)
    Document,
}

impl FieldKind {
    /// Returns the kind name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum => "enum",
            FieldKind::Temporal => "temporal",
            FieldKind::Document => "document",
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self, FieldKind::Document)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldKind::Temporal)
    }
}

/// A declared field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

/// A named relationship to another entity.
///
/// `local_key` is a field of the owning entity and `remote_key` a field of
/// the target; direction (one-to-many or many-to-one) does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    pub target: String,
    pub local_key: String,
    pub remote_key: String,
}

/// Static metadata about one entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    entity: String,
    fields: Vec<FieldDef>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

impl SchemaDescriptor {
    /// Starts building a descriptor for `entity`
    pub fn builder(entity: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            entity: entity.into(),
            fields: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Entity name, which is also the descriptor's identity within a catalog
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Looks up a declared field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up a relationship by name
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Checks identifiers, member uniqueness and that every `local_key`
    /// is a declared field. Relationship targets are checked by the catalog.
    pub fn validate_structure(&self) -> SchemaResult<()> {
        if !is_identifier(&self.entity) {
            return Err(SchemaError::InvalidIdentifier(self.entity.clone()));
        }

        let mut seen = HashSet::new();
        let names = self
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .chain(self.relationships.iter().map(|r| r.name.as_str()));

        for name in names {
            if !is_identifier(name) {
                return Err(SchemaError::InvalidIdentifier(name.to_string()));
            }
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateMember {
                    entity: self.entity.clone(),
                    name: name.to_string(),
                });
            }
        }

        for rel in &self.relationships {
            if self.field(&rel.local_key).is_none() {
                return Err(SchemaError::UnknownJoinKey {
                    entity: self.entity.clone(),
                    relationship: rel.name.clone(),
                    key: rel.local_key.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Builder for [`SchemaDescriptor`]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    entity: String,
    fields: Vec<FieldDef>,
    relationships: Vec<Relationship>,
}

impl SchemaBuilder {
    /// Declares a field
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            kind,
        });
        self
    }

    /// Declares a relationship joined on `local_key = target.remote_key`
    pub fn relationship(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        local_key: impl Into<String>,
        remote_key: impl Into<String>,
    ) -> Self {
        self.relationships.push(Relationship {
            name: name.into(),
            target: target.into(),
            local_key: local_key.into(),
            remote_key: remote_key.into(),
        });
        self
    }

    /// Validates and freezes the descriptor
    pub fn build(self) -> SchemaResult<SchemaDescriptor> {
        let descriptor = SchemaDescriptor {
            entity: self.entity,
            fields: self.fields,
            relationships: self.relationships,
        };
        descriptor.validate_structure()?;
        Ok(descriptor)
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern compiles")
    })
}

fn field_path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
            .expect("field path pattern compiles")
    })
}

/// True for `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(s: &str) -> bool {
    identifier_pattern().is_match(s)
}

/// True for dotted identifier paths such as `role.name`
pub fn is_field_path(s: &str) -> bool {
    field_path_pattern().is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> SchemaDescriptor {
        SchemaDescriptor::builder("users")
            .field("id", FieldKind::Integer)
            .field("name", FieldKind::Text)
            .field("role_id", FieldKind::Integer)
            .relationship("role", "roles", "role_id", "id")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_preserves_field_order() {
        let schema = users();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "role_id"]);
        assert_eq!(schema.field("name").unwrap().kind, FieldKind::Text);
        assert_eq!(schema.relationship("role").unwrap().target, "roles");
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let result = SchemaDescriptor::builder("users")
            .field("role", FieldKind::Text)
            .field("role_id", FieldKind::Integer)
            .relationship("role", "roles", "role_id", "id")
            .build();
        assert!(matches!(result, Err(SchemaError::DuplicateMember { .. })));
    }

    #[test]
    fn test_unknown_local_key_rejected() {
        let result = SchemaDescriptor::builder("users")
            .field("id", FieldKind::Integer)
            .relationship("role", "roles", "role_id", "id")
            .build();
        assert!(matches!(result, Err(SchemaError::UnknownJoinKey { .. })));
    }

    #[test]
    fn test_invalid_identifier_rejected() {
        let result = SchemaDescriptor::builder("users")
            .field("first-name", FieldKind::Text)
            .build();
        assert!(matches!(result, Err(SchemaError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_field_path_syntax() {
        assert!(is_field_path("name"));
        assert!(is_field_path("role.name"));
        assert!(is_field_path("_meta.a1"));
        assert!(!is_field_path(""));
        assert!(!is_field_path("role."));
        assert!(!is_field_path(".name"));
        assert!(!is_field_path("role..name"));
        assert!(!is_field_path("1abc"));
    }

    #[test]
    fn test_kind_serde_lowercase() {
        let kind: FieldKind = serde_json::from_str("\"temporal\"").unwrap();
        assert_eq!(kind, FieldKind::Temporal);
        assert_eq!(serde_json::to_string(&FieldKind::Document).unwrap(), "\"document\"");
    }
}
