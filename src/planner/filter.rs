//! Filter language
//!
//! A filter is a JSON object. `$and`/`$or` keys hold lists of nested filter
//! objects; every other key is a field path mapped to an object of
//! `operator: operand` pairs. Sibling entries are conjoined.
//!
//! ```text
//! {"$or": [{"status": {"$eq": "active"}}, {"age": {"$gte": 30}}],
//!  "role.name": {"$eq": "admin"}}
//! ```

use serde_json::{Map, Value};

use crate::config::CompilerConfig;

use super::ast::Predicate;
use super::errors::{CompileError, CompileResult};
use super::operators::Operator;
use super::paths::PathResolver;
use super::plan::JoinPlan;

/// Logical connective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "$and" => Some(Connective::And),
            "$or" => Some(Connective::Or),
            _ => None,
        }
    }
}

/// One key of a filter object
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEntry {
    /// `$and`/`$or` group
    Group {
        connective: Connective,
        children: Vec<FilterNode>,
    },
    /// Field path with its operators
    Field {
        path: String,
        operators: Vec<Operator>,
    },
}

/// Parsed filter object
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterNode {
    entries: Vec<FilterEntry>,
}

impl FilterNode {
    /// Parses filter text. Operators and operand shapes are validated here;
    /// field paths are checked at compile time against the schema.
    pub fn parse(text: &str, config: &CompilerConfig) -> CompileResult<FilterNode> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| CompileError::InvalidFilterSyntax(format!("not valid JSON: {}", e)))?;
        Self::from_value(&value, config)
    }

    pub fn from_value(value: &Value, config: &CompilerConfig) -> CompileResult<FilterNode> {
        match value {
            Value::Object(object) => parse_object(object, config, 0),
            other => Err(CompileError::InvalidFilterSyntax(format!(
                "expected a filter object, found {}",
                json_type(other)
            ))),
        }
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_object(
    object: &Map<String, Value>,
    config: &CompilerConfig,
    depth: usize,
) -> CompileResult<FilterNode> {
    let mut entries = Vec::with_capacity(object.len());

    for (key, value) in object {
        if let Some(connective) = Connective::from_key(key) {
            if depth + 1 > config.max_filter_depth {
                return Err(CompileError::InvalidFilterSyntax(format!(
                    "filter nests deeper than {} groups",
                    config.max_filter_depth
                )));
            }
            let items = value.as_array().ok_or_else(|| {
                CompileError::InvalidFilterSyntax(format!(
                    "'{}' expects a list of filter objects, found {}",
                    key,
                    json_type(value)
                ))
            })?;
            let children = items
                .iter()
                .map(|item| match item {
                    Value::Object(child) => parse_object(child, config, depth + 1),
                    other => Err(CompileError::InvalidFilterSyntax(format!(
                        "'{}' members must be filter objects, found {}",
                        key,
                        json_type(other)
                    ))),
                })
                .collect::<CompileResult<Vec<_>>>()?;
            entries.push(FilterEntry::Group {
                connective,
                children,
            });
            continue;
        }

        if key.starts_with('$') {
            return Err(CompileError::InvalidFilterSyntax(format!(
                "unknown logical key '{}'",
                key
            )));
        }

        let operands = value.as_object().ok_or_else(|| {
            CompileError::InvalidFilterSyntax(format!(
                "field '{}' expects an operator object, found {}",
                key,
                json_type(value)
            ))
        })?;
        let operators = operands
            .iter()
            .map(|(symbol, operand)| {
                Operator::parse(key, symbol, operand, config.max_list_operand_len)
            })
            .collect::<CompileResult<Vec<_>>>()?;

        entries.push(FilterEntry::Field {
            path: key.clone(),
            operators,
        });
    }

    Ok(FilterNode { entries })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Compiles parsed filters into predicates, accumulating joins.
#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler<'a> {
    resolver: PathResolver<'a>,
}

impl<'a> FilterCompiler<'a> {
    pub fn new(resolver: PathResolver<'a>) -> Self {
        Self { resolver }
    }

    /// `None` means the node contributes no condition.
    ///
    /// Inside `$and` such children are skipped; inside `$or` they hold for
    /// every row. An empty `$and` is always true and an empty `$or` is never
    /// true.
    pub fn compile(&self, node: &FilterNode, joins: &mut JoinPlan) -> CompileResult<Option<Predicate>> {
        let mut terms = Vec::with_capacity(node.entries.len());

        for entry in &node.entries {
            let term = match entry {
                FilterEntry::Group {
                    connective: Connective::And,
                    children,
                } => {
                    let mut parts = Vec::with_capacity(children.len());
                    for child in children {
                        if let Some(p) = self.compile(child, joins)? {
                            parts.push(p);
                        }
                    }
                    Some(Predicate::and(parts))
                }
                FilterEntry::Group {
                    connective: Connective::Or,
                    children,
                } => {
                    let mut parts = Vec::with_capacity(children.len());
                    for child in children {
                        parts.push(self.compile(child, joins)?.unwrap_or_else(Predicate::always));
                    }
                    Some(Predicate::or(parts))
                }
                FilterEntry::Field { path, operators } => self.compile_field(path, operators, joins)?,
            };

            if let Some(term) = term {
                terms.push(term);
            }
        }

        if terms.is_empty() {
            return Ok(None);
        }
        Ok(Some(Predicate::and(terms)))
    }

    fn compile_field(
        &self,
        path: &str,
        operators: &[Operator],
        joins: &mut JoinPlan,
    ) -> CompileResult<Option<Predicate>> {
        if let Some((field, sub_path)) = self.resolver.resolve_document(path) {
            let leaves = operators
                .iter()
                .map(|op| op.build_document_leaf(&field, &sub_path, path))
                .collect::<CompileResult<Vec<_>>>()?;
            return Ok(conjoin(leaves));
        }

        let resolved = self
            .resolver
            .resolve(path, joins)
            .map_err(|e| e.into_field_error())?;

        if operators.is_empty() {
            return Ok(None);
        }

        let leaves = operators
            .iter()
            .map(|op| op.build(&resolved.field, path))
            .collect::<CompileResult<Vec<_>>>()?;

        resolved.commit(joins);
        Ok(conjoin(leaves))
    }
}

fn conjoin(leaves: Vec<Predicate>) -> Option<Predicate> {
    if leaves.is_empty() {
        None
    } else {
        Some(Predicate::and(leaves))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ast::{Comparison, ValueExpr};
    use crate::schema::{FieldKind, SchemaCatalog, SchemaDescriptor};
    use serde_json::json;

    fn catalog() -> SchemaCatalog {
        let roles = SchemaDescriptor::builder("roles")
            .field("id", FieldKind::Integer)
            .field("name", FieldKind::Text)
            .build()
            .unwrap();
        let users = SchemaDescriptor::builder("users")
            .field("id", FieldKind::Integer)
            .field("name", FieldKind::Text)
            .field("age", FieldKind::Integer)
            .field("role_id", FieldKind::Integer)
            .field("attributes", FieldKind::Document)
            .relationship("role", "roles", "role_id", "id")
            .build()
            .unwrap();
        SchemaCatalog::new([roles, users]).unwrap()
    }

    fn compile(filter: Value) -> CompileResult<(Option<Predicate>, JoinPlan)> {
        let catalog = catalog();
        let resolver = PathResolver::new(&catalog, catalog.get("users").unwrap());
        let node = FilterNode::from_value(&filter, &CompilerConfig::default())?;
        let mut joins = JoinPlan::new();
        let predicate = FilterCompiler::new(resolver).compile(&node, &mut joins)?;
        Ok((predicate, joins))
    }

    #[test]
    fn test_rejects_non_object() {
        for text in ["[1, 2]", "\"name\"", "42", "{not json"] {
            let err = FilterNode::parse(text, &CompilerConfig::default()).unwrap_err();
            assert!(matches!(err, CompileError::InvalidFilterSyntax(_)), "{}", text);
        }
    }

    #[test]
    fn test_rejects_bad_groups() {
        for filter in [
            json!({"$and": {"name": {"$eq": "a"}}}),
            json!({"$or": ["name"]}),
            json!({"$not": [{"name": {"$eq": "a"}}]}),
            json!({"name": "alice"}),
        ] {
            let err = compile(filter.clone()).unwrap_err();
            assert!(matches!(err, CompileError::InvalidFilterSyntax(_)), "{}", filter);
        }
    }

    #[test]
    fn test_depth_limit() {
        let config = CompilerConfig {
            max_filter_depth: 2,
            ..CompilerConfig::default()
        };
        let ok = json!({"$and": [{"$or": [{"age": {"$gt": 1}}]}]});
        assert!(FilterNode::from_value(&ok, &config).is_ok());

        let deep = json!({"$and": [{"$or": [{"$and": []}]}]});
        let err = FilterNode::from_value(&deep, &config).unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilterSyntax(_)));
    }

    #[test]
    fn test_siblings_conjoined() {
        let (predicate, joins) = compile(json!({
            "name": {"$eq": "alice"},
            "age": {"$gte": 30, "$lt": 60}
        }))
        .unwrap();

        let predicate = predicate.unwrap();
        assert!(matches!(predicate, Predicate::And(ref c) if c.len() == 2));
        assert_eq!(predicate.leaf_count(), 3);
        assert!(joins.is_empty());
    }

    #[test]
    fn test_empty_groups() {
        let (p, _) = compile(json!({"$and": []})).unwrap();
        assert!(p.unwrap().is_always());

        let (p, _) = compile(json!({"$or": []})).unwrap();
        assert!(p.unwrap().is_never());

        let (p, _) = compile(json!({})).unwrap();
        assert!(p.is_none());
    }

    #[test]
    fn test_empty_child_in_or_is_true() {
        let (p, _) = compile(json!({"$or": [{}, {"age": {"$gt": 10}}]})).unwrap();
        match p.unwrap() {
            Predicate::Or(children) => {
                assert!(children[0].is_always());
                assert_eq!(children.len(), 2);
            }
            other => panic!("expected disjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_relationship_joined_once() {
        let (p, joins) = compile(json!({
            "$or": [
                {"role.name": {"$eq": "admin"}},
                {"role.name": {"$eq": "manager"}}
            ],
            "role.id": {"$gt": 0}
        }))
        .unwrap();

        assert_eq!(joins.len(), 1);
        assert_eq!(p.unwrap().leaf_count(), 3);
    }

    #[test]
    fn test_failed_term_adds_no_join() {
        let catalog = catalog();
        let resolver = PathResolver::new(&catalog, catalog.get("users").unwrap());
        let node = FilterNode::from_value(
            &json!({"role.name": {"$has_key": "x"}}),
            &CompilerConfig::default(),
        )
        .unwrap();

        let mut joins = JoinPlan::new();
        let err = FilterCompiler::new(resolver).compile(&node, &mut joins).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedOperator { .. }));
        assert!(joins.is_empty());
    }

    #[test]
    fn test_field_without_operators() {
        let (p, joins) = compile(json!({"role.name": {}})).unwrap();
        assert!(p.is_none());
        assert!(joins.is_empty());

        let err = compile(json!({"role.nope": {}})).unwrap_err();
        assert!(matches!(err, CompileError::InvalidFieldPath { .. }));
    }

    #[test]
    fn test_document_path_routes_to_extract() {
        let (p, joins) = compile(json!({"attributes.address.city": {"$eq": "Paris"}})).unwrap();
        assert!(joins.is_empty());
        match p.unwrap() {
            Predicate::Compare {
                target: ValueExpr::Extract { path, .. },
                comparison: Comparison::Eq(_),
            } => assert_eq!(path, vec!["address".to_string(), "city".to_string()]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field() {
        let err = compile(json!({"nickname": {"$eq": "al"}})).unwrap_err();
        match err {
            CompileError::InvalidFieldPath { path, reason } => {
                assert_eq!(path, "nickname");
                assert!(reason.contains("users"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
