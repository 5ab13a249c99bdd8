//! Predicate evaluation against bound rows
//!
//! A predicate is evaluated against one join combination: one row (or none,
//! for an unmatched outer join) per alias. Comparisons follow SQL null
//! semantics: any comparison with a null side is false, except the null
//! tests themselves.

use std::cmp::Ordering;

use serde_json::Value;

use crate::planner::{parse_timestamp, Coercion, Comparison, Literal, Predicate, ValueExpr};
use crate::schema::FieldKind;

/// Rows bound to plan aliases for one join combination
#[derive(Debug, Clone, Default)]
pub struct Bindings<'a> {
    slots: Vec<(&'a str, Option<&'a Value>)>,
}

impl<'a> Bindings<'a> {
    pub fn root(alias: &'a str, row: &'a Value) -> Self {
        Self {
            slots: vec![(alias, Some(row))],
        }
    }

    /// Copy with `alias` bound to `row`
    pub fn bind(&self, alias: &'a str, row: Option<&'a Value>) -> Self {
        let mut slots = self.slots.clone();
        slots.push((alias, row));
        Self { slots }
    }

    /// Row bound to `alias`; `None` when unbound or unmatched
    pub fn row(&self, alias: &str) -> Option<&'a Value> {
        self.slots
            .iter()
            .find(|(a, _)| *a == alias)
            .and_then(|(_, row)| *row)
    }
}

/// Evaluates predicates
pub struct PredicateEvaluator;

impl PredicateEvaluator {
    /// `None` (no `where` clause) matches every row
    pub fn matches(predicate: Option<&Predicate>, bindings: &Bindings<'_>) -> bool {
        predicate.map_or(true, |p| Self::eval(p, bindings))
    }

    pub fn eval(predicate: &Predicate, bindings: &Bindings<'_>) -> bool {
        match predicate {
            Predicate::And(children) => children.iter().all(|c| Self::eval(c, bindings)),
            Predicate::Or(children) => children.iter().any(|c| Self::eval(c, bindings)),
            Predicate::Compare { target, comparison } => {
                let value = Self::value_of(target, bindings);
                Self::compare(&value, comparison)
            }
        }
    }

    /// Evaluates a value expression. Missing values and failed casts are
    /// `Literal::Null`.
    pub fn value_of(expr: &ValueExpr, bindings: &Bindings<'_>) -> Literal {
        match expr {
            ValueExpr::Column(field) => {
                let raw = bindings.row(&field.alias).and_then(|row| row.get(&field.column));
                column_literal(raw, field.kind)
            }
            ValueExpr::Extract { field, path } => {
                let mut current = bindings.row(&field.alias).and_then(|row| row.get(&field.column));
                for key in path {
                    current = current.and_then(|v| v.get(key.as_str()));
                }
                match current {
                    None | Some(Value::Null) => Literal::Null,
                    Some(Value::String(s)) => Literal::Text(s.clone()),
                    Some(other) => Literal::Text(other.to_string()),
                }
            }
            ValueExpr::Cast { expr, to } => cast(Self::value_of(expr, bindings), *to),
        }
    }

    fn compare(value: &Literal, comparison: &Comparison) -> bool {
        match comparison {
            Comparison::IsNull => return value.is_null(),
            Comparison::IsNotNull => return !value.is_null(),
            _ if value.is_null() => return false,
            _ => {}
        }

        match comparison {
            Comparison::Eq(v) => equals(value, v) == Some(true),
            Comparison::Ne(v) => equals(value, v) == Some(false),
            Comparison::Gt(v) => order(value, v) == Some(Ordering::Greater),
            Comparison::Gte(v) => matches!(order(value, v), Some(Ordering::Greater | Ordering::Equal)),
            Comparison::Lt(v) => order(value, v) == Some(Ordering::Less),
            Comparison::Lte(v) => matches!(order(value, v), Some(Ordering::Less | Ordering::Equal)),
            Comparison::In(values) => values.iter().any(|v| equals(value, v) == Some(true)),
            Comparison::Contains(s) => text_of(value).to_lowercase().contains(&s.to_lowercase()),
            Comparison::NotContains(s) => !text_of(value).to_lowercase().contains(&s.to_lowercase()),
            Comparison::StartsWith(s) => text_of(value).to_lowercase().starts_with(&s.to_lowercase()),
            Comparison::EndsWith(s) => text_of(value).to_lowercase().ends_with(&s.to_lowercase()),
            Comparison::Between(low, high) => {
                matches!(order(value, low), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(order(value, high), Some(Ordering::Less | Ordering::Equal))
            }
            Comparison::JsonContains(operand) => match value {
                Literal::Json(doc) => json_contains(doc, operand),
                _ => false,
            },
            Comparison::JsonContainedBy(operand) => match value {
                Literal::Json(doc) => json_contains(operand, doc),
                _ => false,
            },
            Comparison::HasKey(key) => match value {
                Literal::Json(doc) => has_key(doc, key),
                _ => false,
            },
            Comparison::HasAny(keys) => match value {
                Literal::Json(doc) => keys.iter().any(|k| has_key(doc, k)),
                _ => false,
            },
            Comparison::HasAll(keys) => match value {
                Literal::Json(doc) => keys.iter().all(|k| has_key(doc, k)),
                _ => false,
            },
            Comparison::IsNull | Comparison::IsNotNull => false,
        }
    }
}

/// Stored value as a typed literal. Temporal text parses to a timestamp;
/// document columns stay structured.
fn column_literal(raw: Option<&Value>, kind: FieldKind) -> Literal {
    let value = match raw {
        None | Some(Value::Null) => return Literal::Null,
        Some(v) => v,
    };
    match (kind, value) {
        (FieldKind::Document, v) => Literal::Json(v.clone()),
        (FieldKind::Temporal, Value::String(s)) => parse_timestamp(s)
            .map(Literal::Timestamp)
            .unwrap_or_else(|| Literal::Text(s.clone())),
        (_, v) => Literal::from_json(v),
    }
}

fn cast(value: Literal, to: Coercion) -> Literal {
    match (to, value) {
        (_, Literal::Null) => Literal::Null,
        (Coercion::Text, Literal::Json(v)) => Literal::Text(v.to_string()),
        (Coercion::Text, other) => other.as_text().map(Literal::Text).unwrap_or(Literal::Null),
        (Coercion::Integer, Literal::Int(i)) => Literal::Int(i),
        (Coercion::Integer, Literal::Float(x)) if x.fract() == 0.0 => Literal::Int(x as i64),
        (Coercion::Integer, Literal::Text(s)) => {
            s.trim().parse().map(Literal::Int).unwrap_or(Literal::Null)
        }
        (Coercion::Integer, Literal::Json(Value::Number(n))) => {
            n.as_i64().map(Literal::Int).unwrap_or(Literal::Null)
        }
        (Coercion::Timestamp, Literal::Timestamp(ts)) => Literal::Timestamp(ts),
        (Coercion::Timestamp, Literal::Text(s)) | (Coercion::Timestamp, Literal::Json(Value::String(s))) => {
            parse_timestamp(&s).map(Literal::Timestamp).unwrap_or(Literal::Null)
        }
        _ => Literal::Null,
    }
}

fn text_of(value: &Literal) -> String {
    match value {
        Literal::Json(v) => v.to_string(),
        other => other.as_text().unwrap_or_default(),
    }
}

fn number(value: &Literal) -> Option<f64> {
    match value {
        Literal::Int(i) => Some(*i as f64),
        Literal::Float(x) => Some(*x),
        _ => None,
    }
}

/// Equality, or `None` when the two sides cannot be compared
pub(crate) fn equals(left: &Literal, right: &Literal) -> Option<bool> {
    match (left, right) {
        (_, Literal::Null) | (Literal::Null, _) => None,
        (Literal::Json(a), Literal::Json(b)) => Some(a == b),
        (Literal::Json(a), scalar) => Some(*a == scalar.to_json()),
        _ => order(left, right).map(|o| o == Ordering::Equal),
    }
}

/// Ordering between comparable literals. Text compared against a number or
/// a timestamp is parsed first.
pub(crate) fn order(left: &Literal, right: &Literal) -> Option<Ordering> {
    match (left, right) {
        (Literal::Int(a), Literal::Int(b)) => Some(a.cmp(b)),
        (Literal::Text(a), Literal::Text(b)) => Some(a.cmp(b)),
        (Literal::Bool(a), Literal::Bool(b)) => Some(a.cmp(b)),
        (Literal::Timestamp(a), Literal::Timestamp(b)) => Some(a.cmp(b)),
        (Literal::Timestamp(a), Literal::Text(b)) => parse_timestamp(b).map(|b| a.cmp(&b)),
        (Literal::Text(a), Literal::Timestamp(b)) => parse_timestamp(a).map(|a| a.cmp(b)),
        (Literal::Text(s), n) if number(n).is_some() => {
            let a: f64 = s.trim().parse().ok()?;
            a.partial_cmp(&number(n)?)
        }
        (n, Literal::Text(s)) if number(n).is_some() => {
            let b: f64 = s.trim().parse().ok()?;
            number(n)?.partial_cmp(&b)
        }
        (a, b) => number(a)?.partial_cmp(&number(b)?),
    }
}

/// Structural containment: every part of `contained` appears in `container`
fn json_contains(container: &Value, contained: &Value) -> bool {
    match (container, contained) {
        (Value::Object(a), Value::Object(b)) => b
            .iter()
            .all(|(k, bv)| a.get(k).map_or(false, |av| json_contains(av, bv))),
        (Value::Array(a), Value::Array(b)) => b
            .iter()
            .all(|bv| a.iter().any(|av| json_contains(av, bv))),
        (Value::Array(a), scalar) if !scalar.is_object() => a.iter().any(|av| av == scalar),
        (a, b) => a == b,
    }
}

/// Object key, or string element of an array
fn has_key(doc: &Value, key: &str) -> bool {
    match doc {
        Value::Object(map) => map.contains_key(key),
        Value::Array(items) => items.iter().any(|v| v.as_str() == Some(key)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::FieldRef;
    use serde_json::json;

    fn field(column: &str, kind: FieldKind) -> ValueExpr {
        ValueExpr::column(FieldRef::new("users", "users", column, kind))
    }

    fn check(row: &Value, target: ValueExpr, comparison: Comparison) -> bool {
        let bindings = Bindings::root("users", row);
        PredicateEvaluator::eval(&Predicate::compare(target, comparison), &bindings)
    }

    #[test]
    fn test_null_comparisons_false() {
        let row = json!({"age": null});
        let age = || field("age", FieldKind::Integer);
        assert!(!check(&row, age(), Comparison::Eq(Literal::Int(1))));
        assert!(!check(&row, age(), Comparison::Ne(Literal::Int(1))));
        assert!(!check(&row, age(), Comparison::NotContains("x".into())));
        assert!(check(&row, age(), Comparison::IsNull));
        assert!(check(&json!({}), age(), Comparison::IsNull));
    }

    #[test]
    fn test_text_ops_case_insensitive() {
        let row = json!({"name": "Alice Smith"});
        let name = || field("name", FieldKind::Text);
        assert!(check(&row, name(), Comparison::Contains("SMITH".into())));
        assert!(check(&row, name(), Comparison::StartsWith("ali".into())));
        assert!(check(&row, name(), Comparison::EndsWith("th".into())));
        assert!(check(&row, name(), Comparison::NotContains("bob".into())));
    }

    #[test]
    fn test_temporal_column_compares_as_timestamp() {
        let row = json!({"created_at": "2024-03-01T23:59:59"});
        let ts = Literal::Timestamp(parse_timestamp("2024-03-02").unwrap());
        assert!(check(&row, field("created_at", FieldKind::Temporal), Comparison::Lt(ts)));
    }

    #[test]
    fn test_failed_cast_is_null() {
        let row = json!({"attributes": {"score": "high"}});
        let attrs = FieldRef::new("users", "users", "attributes", FieldKind::Document);
        let leaf = ValueExpr::extract(attrs, vec!["score".into()]).cast(Coercion::Integer);
        assert!(!check(&row, leaf.clone(), Comparison::Gt(Literal::Int(0))));
        assert!(check(&row, leaf, Comparison::IsNull));
    }

    #[test]
    fn test_extract_renders_text() {
        let row = json!({"attributes": {"score": 90, "tags": ["a"]}});
        let attrs = FieldRef::new("users", "users", "attributes", FieldKind::Document);
        let bindings = Bindings::root("users", &row);

        let score = ValueExpr::extract(attrs.clone(), vec!["score".into()]);
        assert_eq!(PredicateEvaluator::value_of(&score, &bindings), Literal::Text("90".into()));

        let missing = ValueExpr::extract(attrs, vec!["nope".into(), "deeper".into()]);
        assert_eq!(PredicateEvaluator::value_of(&missing, &bindings), Literal::Null);
    }

    #[test]
    fn test_json_containment() {
        let doc = json!({"hair": "Brown", "tags": ["a", "b"], "address": {"city": "Paris"}});
        assert!(json_contains(&doc, &json!({"hair": "Brown"})));
        assert!(json_contains(&doc, &json!({"tags": ["b"]})));
        assert!(json_contains(&doc, &json!({"address": {}})));
        assert!(!json_contains(&doc, &json!({"hair": "brown"})));
        assert!(!json_contains(&doc, &json!({"tags": ["c"]})));
        assert!(json_contains(&json!(["a", "b"]), &json!("a")));
    }

    #[test]
    fn test_has_key_variants() {
        let row = json!({"attributes": {"hair": "Brown", "eyes": "blue"}});
        let attrs = || field("attributes", FieldKind::Document);
        assert!(check(&row, attrs(), Comparison::HasKey("hair".into())));
        assert!(check(&row, attrs(), Comparison::HasAny(vec!["x".into(), "eyes".into()])));
        assert!(!check(&row, attrs(), Comparison::HasAll(vec!["x".into(), "eyes".into()])));
        assert!(has_key(&json!(["x"]), "x"));
    }

    #[test]
    fn test_order_mixed_numbers() {
        assert_eq!(order(&Literal::Int(2), &Literal::Float(1.5)), Some(Ordering::Greater));
        assert_eq!(order(&Literal::Text("30".into()), &Literal::Int(30)), Some(Ordering::Equal));
        assert_eq!(order(&Literal::Text("abc".into()), &Literal::Int(30)), None);
        assert_eq!(order(&Literal::Bool(true), &Literal::Int(1)), None);
    }

    #[test]
    fn test_unmatched_join_alias_is_null() {
        let row = json!({"name": "a"});
        let bindings = Bindings::root("users", &row).bind("roles_1", None);
        let role_name = ValueExpr::column(FieldRef::new("roles_1", "roles", "name", FieldKind::Text));
        assert_eq!(PredicateEvaluator::value_of(&role_name, &bindings), Literal::Null);
    }
}
