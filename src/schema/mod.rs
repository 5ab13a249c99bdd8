//! Schema catalog subsystem
//!
//! Explicit, statically constructed descriptors of entities: field kinds and
//! named relationships. Built once at startup and treated as read-only
//! shared data by every compilation.

mod errors;
mod loader;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use loader::SchemaCatalog;
pub use types::{
    is_field_path, is_identifier, FieldDef, FieldKind, Relationship, SchemaBuilder,
    SchemaDescriptor,
};
