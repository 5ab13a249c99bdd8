//! Schema catalog errors
//!
//! All schema errors are raised while building or loading a catalog, i.e.
//! at startup. None of them can occur during query compilation.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema catalog errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Catalog file could not be read
    #[error("Failed to read schema catalog '{path}': {reason}")]
    Io { path: String, reason: String },

    /// Catalog file is not valid catalog JSON
    #[error("Malformed schema catalog: {0}")]
    Malformed(String),

    /// Entity, field or relationship name is not an identifier
    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// Two descriptors share an entity name
    #[error("Duplicate entity '{0}'")]
    DuplicateEntity(String),

    /// Two members of one entity share a name
    #[error("Duplicate field or relationship '{name}' on entity '{entity}'")]
    DuplicateMember { entity: String, name: String },

    /// Relationship points at an entity missing from the catalog
    #[error("Relationship '{relationship}' on entity '{entity}' targets unknown entity '{target}'")]
    UnknownTarget {
        entity: String,
        relationship: String,
        target: String,
    },

    /// Join key is not a declared field
    #[error("Join key '{key}' of relationship '{relationship}' is not a field of entity '{entity}'")]
    UnknownJoinKey {
        entity: String,
        relationship: String,
        key: String,
    },

    /// Entity is not part of the catalog
    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),
}

impl SchemaError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Io { .. } => "SCHEMA_IO",
            SchemaError::Malformed(_) => "SCHEMA_MALFORMED",
            SchemaError::InvalidIdentifier(_) => "SCHEMA_INVALID_IDENTIFIER",
            SchemaError::DuplicateEntity(_) => "SCHEMA_DUPLICATE_ENTITY",
            SchemaError::DuplicateMember { .. } => "SCHEMA_DUPLICATE_MEMBER",
            SchemaError::UnknownTarget { .. } => "SCHEMA_UNKNOWN_TARGET",
            SchemaError::UnknownJoinKey { .. } => "SCHEMA_UNKNOWN_JOIN_KEY",
            SchemaError::UnknownEntity(_) => "SCHEMA_UNKNOWN_ENTITY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_offender() {
        let err = SchemaError::UnknownTarget {
            entity: "users".into(),
            relationship: "role".into(),
            target: "roles".into(),
        };
        let display = err.to_string();
        assert!(display.contains("users"));
        assert!(display.contains("roles"));
        assert_eq!(err.code(), "SCHEMA_UNKNOWN_TARGET");
    }
}
