//! Free-text search over the root entity's own fields
//!
//! Only fields for which the term is meaningful participate. Search never
//! fails; a term no field can compare against contributes nothing.

use crate::schema::{FieldKind, SchemaDescriptor};

use super::ast::{Coercion, Comparison, FieldRef, Literal, Predicate, ValueExpr};

#[derive(Debug, Clone, Copy)]
pub struct SearchCompiler<'a> {
    root: &'a SchemaDescriptor,
}

impl<'a> SearchCompiler<'a> {
    pub fn new(root: &'a SchemaDescriptor) -> Self {
        Self { root }
    }

    /// Disjunction of per-field conditions, or `None` if no field qualifies.
    pub fn compile(&self, term: &str) -> Option<Predicate> {
        let as_integer = parse_whole_number(term);
        let as_bool = match term.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        };

        let entity = self.root.entity();
        let conditions: Vec<Predicate> = self
            .root
            .fields()
            .iter()
            .filter_map(|def| {
                let column = ValueExpr::column(FieldRef::new(entity, entity, &def.name, def.kind));
                match def.kind {
                    FieldKind::Text => Some(Predicate::compare(
                        column,
                        Comparison::Contains(term.to_string()),
                    )),
                    FieldKind::Enum => Some(Predicate::compare(
                        column.cast(Coercion::Text),
                        Comparison::Contains(term.to_string()),
                    )),
                    FieldKind::Integer => as_integer
                        .map(|n| Predicate::compare(column, Comparison::Eq(Literal::Int(n)))),
                    FieldKind::Boolean => as_bool
                        .map(|b| Predicate::compare(column, Comparison::Eq(Literal::Bool(b)))),
                    FieldKind::Temporal | FieldKind::Document => None,
                }
            })
            .collect();

        if conditions.is_empty() {
            None
        } else {
            Some(Predicate::or(conditions))
        }
    }
}

/// ASCII digits only, no sign, within `i64`
fn parse_whole_number(term: &str) -> Option<i64> {
    if term.is_empty() || !term.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    term.parse().ok()
}
