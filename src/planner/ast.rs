//! Predicate tree produced by compilation
//!
//! Leaves compare a value expression against typed literals; inner nodes are
//! `And`/`Or` connectives. Nodes never mutate after construction and are
//! composed purely by wrapping.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::schema::FieldKind;

/// Resolved reference to a column on a concrete, possibly joined, entity instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRef {
    /// Alias of the entity instance (root entity name or a join alias)
    pub alias: String,
    /// Entity the column belongs to
    pub entity: String,
    /// Column name
    pub column: String,
    /// Kind used for operator dispatch
    pub kind: FieldKind,
}

impl FieldRef {
    pub fn new(
        alias: impl Into<String>,
        entity: impl Into<String>,
        column: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        Self {
            alias: alias.into(),
            entity: entity.into(),
            column: column.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.alias, self.column)
    }
}

/// Explicit type coercion applied before comparing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Coercion {
    Text,
    Integer,
    Timestamp,
}

impl Coercion {
    pub fn sql_type(&self) -> &'static str {
        match self {
            Coercion::Text => "TEXT",
            Coercion::Integer => "INTEGER",
            Coercion::Timestamp => "TIMESTAMP",
        }
    }
}

/// Left-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum ValueExpr {
    /// A column as stored
    Column(FieldRef),
    /// Scalar leaf of a document column, materialized as text
    Extract { field: FieldRef, path: Vec<String> },
    /// Coerced value
    Cast { expr: Box<ValueExpr>, to: Coercion },
}

impl ValueExpr {
    pub fn column(field: FieldRef) -> Self {
        ValueExpr::Column(field)
    }

    pub fn extract(field: FieldRef, path: Vec<String>) -> Self {
        ValueExpr::Extract { field, path }
    }

    pub fn cast(self, to: Coercion) -> Self {
        ValueExpr::Cast {
            expr: Box::new(self),
            to,
        }
    }
}

impl fmt::Display for ValueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueExpr::Column(field) => write!(f, "{}", field),
            ValueExpr::Extract { field, path } => {
                write!(f, "{}", field)?;
                for (i, key) in path.iter().enumerate() {
                    let arrow = if i + 1 == path.len() { "->>" } else { "->" };
                    write!(f, "{}{}", arrow, quote(key))?;
                }
                Ok(())
            }
            ValueExpr::Cast { expr, to } => write!(f, "CAST({} AS {})", expr, to.sql_type()),
        }
    }
}

/// Typed literal operand
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    /// Structured value compared against a document column
    Json(Value),
}

impl Literal {
    /// Converts a JSON scalar. Arrays and objects become `Json`.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Literal::Int(i),
                None => Literal::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Literal::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Literal::Json(value.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Literal::Json(_))
    }

    /// Text form of a scalar, as a document leaf would render it
    pub fn as_text(&self) -> Option<String> {
        match self {
            Literal::Null | Literal::Json(_) => None,
            Literal::Bool(b) => Some(b.to_string()),
            Literal::Int(i) => Some(i.to_string()),
            Literal::Float(x) => Some(x.to_string()),
            Literal::Text(s) => Some(s.clone()),
            Literal::Timestamp(ts) => Some(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    /// Converts to a JSON value for document comparisons
    pub fn to_json(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::from(*i),
            Literal::Float(x) => Value::from(*x),
            Literal::Text(s) => Value::String(s.clone()),
            Literal::Timestamp(ts) => Value::String(ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Literal::Json(v) => v.clone(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Bool(true) => write!(f, "TRUE"),
            Literal::Bool(false) => write!(f, "FALSE"),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::Text(s) => write!(f, "{}", quote(s)),
            Literal::Timestamp(ts) => {
                write!(f, "TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S%.f"))
            }
            Literal::Json(v) => write!(f, "{}::jsonb", quote(&v.to_string())),
        }
    }
}

/// Comparison applied by a predicate leaf, with its typed operand
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "operand", rename_all = "snake_case")]
pub enum Comparison {
    Eq(Literal),
    Ne(Literal),
    Gt(Literal),
    Gte(Literal),
    Lt(Literal),
    Lte(Literal),
    In(Vec<Literal>),
    /// Case-insensitive substring match
    Contains(String),
    NotContains(String),
    /// Case-insensitive prefix match
    StartsWith(String),
    /// Case-insensitive suffix match
    EndsWith(String),
    IsNull,
    IsNotNull,
    /// Inclusive range
    Between(Literal, Literal),
    /// Document contains the operand as a sub-structure
    JsonContains(Value),
    /// Document is contained by the operand
    JsonContainedBy(Value),
    HasKey(String),
    HasAny(Vec<String>),
    HasAll(Vec<String>),
}

/// Backend-neutral boolean expression tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Conjunction; empty means always true
    And(Vec<Predicate>),
    /// Disjunction; empty means always false
    Or(Vec<Predicate>),
    Compare {
        target: ValueExpr,
        comparison: Comparison,
    },
}

impl Predicate {
    pub fn compare(target: ValueExpr, comparison: Comparison) -> Self {
        Predicate::Compare { target, comparison }
    }

    /// Predicate that holds for every row
    pub fn always() -> Self {
        Predicate::And(Vec::new())
    }

    /// Predicate that holds for no row
    pub fn never() -> Self {
        Predicate::Or(Vec::new())
    }

    /// Conjunction of `children`; a single child is returned unwrapped.
    pub fn and(mut children: Vec<Predicate>) -> Self {
        if children.len() == 1 {
            return children.remove(0);
        }
        Predicate::And(children)
    }

    /// Disjunction of `children`; a single child is returned unwrapped.
    pub fn or(mut children: Vec<Predicate>) -> Self {
        if children.len() == 1 {
            return children.remove(0);
        }
        Predicate::Or(children)
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::And(c) if c.is_empty())
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Predicate::Or(c) if c.is_empty())
    }

    /// Number of comparison leaves in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::And(children) | Predicate::Or(children) => {
                children.iter().map(Predicate::leaf_count).sum()
            }
            Predicate::Compare { .. } => 1,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::And(children) if children.is_empty() => write!(f, "TRUE"),
            Predicate::Or(children) if children.is_empty() => write!(f, "FALSE"),
            Predicate::And(children) => write_joined(f, children, " AND "),
            Predicate::Or(children) => write_joined(f, children, " OR "),
            Predicate::Compare { target, comparison } => write_comparison(f, target, comparison),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Predicate], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", child)?;
    }
    write!(f, ")")
}

fn write_comparison(
    f: &mut fmt::Formatter<'_>,
    target: &ValueExpr,
    comparison: &Comparison,
) -> fmt::Result {
    match comparison {
        Comparison::Eq(v) => write!(f, "{} = {}", target, v),
        Comparison::Ne(v) => write!(f, "{} != {}", target, v),
        Comparison::Gt(v) => write!(f, "{} > {}", target, v),
        Comparison::Gte(v) => write!(f, "{} >= {}", target, v),
        Comparison::Lt(v) => write!(f, "{} < {}", target, v),
        Comparison::Lte(v) => write!(f, "{} <= {}", target, v),
        Comparison::In(values) => {
            write!(f, "{} IN (", target)?;
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", v)?;
            }
            write!(f, ")")
        }
        Comparison::Contains(s) => write!(f, "{} ILIKE {}", target, quote(&format!("%{}%", s))),
        Comparison::NotContains(s) => {
            write!(f, "{} NOT ILIKE {}", target, quote(&format!("%{}%", s)))
        }
        Comparison::StartsWith(s) => write!(f, "{} ILIKE {}", target, quote(&format!("{}%", s))),
        Comparison::EndsWith(s) => write!(f, "{} ILIKE {}", target, quote(&format!("%{}", s))),
        Comparison::IsNull => write!(f, "{} IS NULL", target),
        Comparison::IsNotNull => write!(f, "{} IS NOT NULL", target),
        Comparison::Between(low, high) => write!(f, "{} BETWEEN {} AND {}", target, low, high),
        Comparison::JsonContains(v) => write!(f, "{} @> {}::jsonb", target, quote(&v.to_string())),
        Comparison::JsonContainedBy(v) => {
            write!(f, "{} <@ {}::jsonb", target, quote(&v.to_string()))
        }
        Comparison::HasKey(k) => write!(f, "{} ? {}", target, quote(k)),
        Comparison::HasAny(keys) => write!(f, "{} ?| {}", target, key_array(keys)),
        Comparison::HasAll(keys) => write!(f, "{} ?& {}", target, key_array(keys)),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn key_array(keys: &[String]) -> String {
    let quoted: Vec<String> = keys.iter().map(|k| quote(k)).collect();
    format!("ARRAY[{}]", quoted.join(", "))
}
