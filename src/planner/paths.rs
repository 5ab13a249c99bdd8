//! Field-path resolution
//!
//! Relational paths (`role.name`) walk relationships left to right and end on
//! a field, acquiring at most one join per related entity. Document paths
//! (`attributes.address.city`) descend structurally into a document column of
//! the root entity.
//!
//! Resolution never mutates the join plan. New joins come back as pending
//! steps, and the caller commits them only once the whole term compiled.

use crate::schema::{is_field_path, SchemaCatalog, SchemaDescriptor};

use super::ast::FieldRef;
use super::errors::CompileError;
use super::plan::{JoinPlan, JoinStep};

/// Dotted key path inside a document value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl DocumentPath {
    /// Splits on `.`; every segment must be non-empty
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

/// Why a path failed to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    pub path: String,
    pub reason: String,
}

impl PathError {
    fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// As a filter-stage error
    pub fn into_field_error(self) -> CompileError {
        CompileError::InvalidFieldPath {
            path: self.path,
            reason: self.reason,
        }
    }

    /// As a sort-stage error
    pub fn into_sort_error(self) -> CompileError {
        CompileError::InvalidSortField {
            path: self.path,
            reason: self.reason,
        }
    }
}

/// A resolved relational path
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    pub field: FieldRef,
    pending: Vec<JoinStep>,
}

impl ResolvedPath {
    /// Joins this path needs that the plan does not have yet
    pub fn pending_joins(&self) -> &[JoinStep] {
        &self.pending
    }

    /// Records the pending joins in `joins`
    pub fn commit(self, joins: &mut JoinPlan) -> FieldRef {
        joins.commit(self.pending);
        self.field
    }
}

/// Resolves paths relative to a root descriptor
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    catalog: &'a SchemaCatalog,
    root: &'a SchemaDescriptor,
}

impl<'a> PathResolver<'a> {
    pub fn new(catalog: &'a SchemaCatalog, root: &'a SchemaDescriptor) -> Self {
        Self { catalog, root }
    }

    pub fn root(&self) -> &'a SchemaDescriptor {
        self.root
    }

    /// Resolves a relational path against the current join plan.
    pub fn resolve(&self, path: &str, joins: &JoinPlan) -> Result<ResolvedPath, PathError> {
        if !is_field_path(path) {
            return Err(PathError::new(path, "expected identifier(.identifier)*"));
        }

        let segments: Vec<&str> = path.split('.').collect();
        let mut current = self.root;
        let mut current_alias = self.root.entity().to_string();
        let mut pending: Vec<JoinStep> = Vec::new();

        for (i, segment) in segments.iter().enumerate() {
            let is_last = i + 1 == segments.len();

            if let Some(rel) = current.relationship(segment) {
                let target = self.catalog.get(&rel.target).ok_or_else(|| {
                    PathError::new(
                        path,
                        format!(
                            "relationship '{}' of entity '{}' targets unknown entity '{}'",
                            segment,
                            current.entity(),
                            rel.target
                        ),
                    )
                })?;

                let known = joins
                    .alias_for(target.entity())
                    .map(str::to_string)
                    .or_else(|| {
                        pending
                            .iter()
                            .find(|s| s.entity == target.entity())
                            .map(|s| s.alias.clone())
                    });

                let alias = match known {
                    Some(alias) => alias,
                    None => {
                        let alias = format!(
                            "{}_{}",
                            target.entity(),
                            joins.len() + pending.len() + 1
                        );
                        pending.push(JoinStep {
                            alias: alias.clone(),
                            entity: target.entity().to_string(),
                            parent_alias: current_alias.clone(),
                            relationship: rel.name.clone(),
                            local_key: rel.local_key.clone(),
                            remote_key: rel.remote_key.clone(),
                        });
                        alias
                    }
                };

                if is_last {
                    return Err(PathError::new(
                        path,
                        format!(
                            "path ends on relationship '{}' of entity '{}' instead of a field",
                            segment,
                            current.entity()
                        ),
                    ));
                }

                current = target;
                current_alias = alias;
                continue;
            }

            if let Some(field) = current.field(segment) {
                if !is_last {
                    return Err(PathError::new(
                        path,
                        format!(
                            "field '{}' of entity '{}' is not a relationship",
                            segment,
                            current.entity()
                        ),
                    ));
                }
                return Ok(ResolvedPath {
                    field: FieldRef::new(current_alias, current.entity(), &field.name, field.kind),
                    pending,
                });
            }

            return Err(PathError::new(
                path,
                format!(
                    "could not resolve '{}' on entity '{}'",
                    segment,
                    current.entity()
                ),
            ));
        }

        Err(PathError::new(path, "path does not name a field"))
    }

    /// Splits `path` into a root document column and a sub-path when the
    /// first segment names a document field and further segments follow.
    pub fn resolve_document(&self, path: &str) -> Option<(FieldRef, DocumentPath)> {
        let (head, rest) = path.split_once('.')?;
        let field = self.root.field(head)?;
        if !field.kind.is_document() {
            return None;
        }
        let sub_path = DocumentPath::parse(rest)?;
        Some((
            FieldRef::new(self.root.entity(), self.root.entity(), &field.name, field.kind),
            sub_path,
        ))
    }
}
