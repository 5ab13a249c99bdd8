//! Operator registry
//!
//! Operators form a closed enumeration, one variant per family, each carrying
//! a typed operand validated when the filter is parsed. Building a predicate
//! leaf is a single exhaustive match over the family and the field kind.
//!
//! | Family        | Symbols                                             |
//! |---------------|-----------------------------------------------------|
//! | Equality      | `$eq` `$ne`                                         |
//! | Ordering      | `$gt` `$gte` `$lt` `$lte`                           |
//! | Membership    | `$in` `$isanyof`                                    |
//! | Text          | `$contains` `$ncontains` `$startswith` `$endswith`  |
//! | Null          | `$isempty` `$isnotempty`                            |
//! | Structural    | `$has_key` `$has_any` `$has_all` `$contained_by`    |
//! | Range         | `$int_between` `$dt_between`                        |
//! | DocumentPath  | `$path_eq` `$path_gt` `$path_gte` `$path_lt` `$path_lte` `$path_in` |

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::schema::FieldKind;

use super::ast::{Coercion, Comparison, FieldRef, Literal, Predicate, ValueExpr};
use super::errors::{CompileError, CompileResult};
use super::paths::DocumentPath;
use super::temporal::{day_bounds, parse_timestamp, TemporalLiteral};

/// Ordering comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl OrderingOp {
    fn comparison(self, value: Literal) -> Comparison {
        match self {
            OrderingOp::Gt => Comparison::Gt(value),
            OrderingOp::Gte => Comparison::Gte(value),
            OrderingOp::Lt => Comparison::Lt(value),
            OrderingOp::Lte => Comparison::Lte(value),
        }
    }
}

/// Case-insensitive text match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
}

impl TextOp {
    fn comparison(self, text: String) -> Comparison {
        match self {
            TextOp::Contains => Comparison::Contains(text),
            TextOp::NotContains => Comparison::NotContains(text),
            TextOp::StartsWith => Comparison::StartsWith(text),
            TextOp::EndsWith => Comparison::EndsWith(text),
        }
    }
}

/// Document-only structural test
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralOp {
    HasKey(String),
    HasAny(Vec<String>),
    HasAll(Vec<String>),
    ContainedBy(Value),
}

/// Inclusive range bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBounds {
    Integer(i64, i64),
    Timestamp(NaiveDateTime, NaiveDateTime),
}

/// Comparison against an explicit sub-path of a document field
#[derive(Debug, Clone, PartialEq)]
pub enum PathCondition {
    /// Leaf text equals `text`, case-sensitively
    Eq { path: DocumentPath, text: String },
    /// Leaf coerced to integer compared against a numeric `value`
    Compare {
        op: OrderingOp,
        path: DocumentPath,
        value: Literal,
    },
    /// Leaf text is one of `texts`
    In {
        path: DocumentPath,
        texts: Vec<String>,
    },
}

/// A parsed operator with its typed operand
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Equality { negated: bool, value: Literal },
    Ordering { op: OrderingOp, value: Literal },
    Membership { any_of: bool, values: Vec<Literal> },
    Text { op: TextOp, value: Value },
    Null { negated: bool },
    Structural(StructuralOp),
    Range(RangeBounds),
    DocumentPath(PathCondition),
}

impl Operator {
    /// Parses `symbol` with its raw operand.
    ///
    /// `field` only names the filter key in diagnostics. List operands longer
    /// than `max_list_len` are rejected.
    pub fn parse(
        field: &str,
        symbol: &str,
        operand: &Value,
        max_list_len: usize,
    ) -> CompileResult<Operator> {
        let invalid = |reason: &str| CompileError::invalid_operand(field, symbol, reason);
        let check_len = |len: usize| {
            if len > max_list_len {
                Err(CompileError::invalid_operand(
                    field,
                    symbol,
                    format!("list has {} items, at most {} allowed", len, max_list_len),
                ))
            } else {
                Ok(())
            }
        };

        let op = match symbol {
            "$eq" | "$ne" => Operator::Equality {
                negated: symbol == "$ne",
                value: Literal::from_json(operand),
            },
            "$gt" | "$gte" | "$lt" | "$lte" => {
                let value = Literal::from_json(operand);
                if value.is_null() || !value.is_scalar() {
                    return Err(invalid("expected a scalar value"));
                }
                let op = match symbol {
                    "$gt" => OrderingOp::Gt,
                    "$gte" => OrderingOp::Gte,
                    "$lt" => OrderingOp::Lt,
                    _ => OrderingOp::Lte,
                };
                Operator::Ordering { op, value }
            }
            "$in" | "$isanyof" => {
                let items = operand
                    .as_array()
                    .ok_or_else(|| invalid("expected a list of values"))?;
                check_len(items.len())?;
                let values: Vec<Literal> = items.iter().map(Literal::from_json).collect();
                if values.iter().any(|v| !v.is_scalar()) {
                    return Err(invalid("list members must be scalars"));
                }
                Operator::Membership {
                    any_of: symbol == "$isanyof",
                    values,
                }
            }
            "$contains" | "$ncontains" | "$startswith" | "$endswith" => {
                let op = match symbol {
                    "$contains" => TextOp::Contains,
                    "$ncontains" => TextOp::NotContains,
                    "$startswith" => TextOp::StartsWith,
                    _ => TextOp::EndsWith,
                };
                if operand.is_null() {
                    return Err(invalid("expected a value"));
                }
                // Only $contains accepts structured operands (document containment).
                if op != TextOp::Contains && scalar_text(operand).is_none() {
                    return Err(invalid("expected a scalar value"));
                }
                Operator::Text {
                    op,
                    value: operand.clone(),
                }
            }
            "$isempty" | "$isnotempty" => Operator::Null {
                negated: symbol == "$isnotempty",
            },
            "$has_key" => {
                let key = operand
                    .as_str()
                    .ok_or_else(|| invalid("expected a key string"))?;
                Operator::Structural(StructuralOp::HasKey(key.to_string()))
            }
            "$has_any" | "$has_all" => {
                let keys = string_list(operand).ok_or_else(|| invalid("expected a list of key strings"))?;
                check_len(keys.len())?;
                Operator::Structural(if symbol == "$has_any" {
                    StructuralOp::HasAny(keys)
                } else {
                    StructuralOp::HasAll(keys)
                })
            }
            "$contained_by" => {
                if operand.is_null() {
                    return Err(invalid("expected a document value"));
                }
                Operator::Structural(StructuralOp::ContainedBy(operand.clone()))
            }
            "$int_between" => {
                let (low, high) = pair(operand).ok_or_else(|| invalid("expected [low, high]"))?;
                match (low.as_i64(), high.as_i64()) {
                    (Some(low), Some(high)) => Operator::Range(RangeBounds::Integer(low, high)),
                    _ => return Err(invalid("bounds must be integers")),
                }
            }
            "$dt_between" => {
                let (low, high) = pair(operand).ok_or_else(|| invalid("expected [low, high]"))?;
                let parse = |v: &Value| v.as_str().and_then(parse_timestamp);
                match (parse(low), parse(high)) {
                    (Some(low), Some(high)) => Operator::Range(RangeBounds::Timestamp(low, high)),
                    _ => return Err(invalid("bounds must be dates or timestamps")),
                }
            }
            "$path_eq" => {
                let object = operand
                    .as_object()
                    .filter(|o| o.len() == 1)
                    .ok_or_else(|| invalid("expected {\"<path>\": <value>}"))?;
                let (path, value) = object
                    .iter()
                    .next()
                    .ok_or_else(|| invalid("expected {\"<path>\": <value>}"))?;
                let path = DocumentPath::parse(path).ok_or_else(|| invalid("malformed document path"))?;
                let text = scalar_text(value).ok_or_else(|| invalid("expected a scalar value"))?;
                Operator::DocumentPath(PathCondition::Eq { path, text })
            }
            "$path_gt" | "$path_gte" | "$path_lt" | "$path_lte" => {
                let path = path_member(operand).ok_or_else(|| invalid("expected {\"path\": ..., \"value\": ...}"))?;
                let value = operand
                    .get("value")
                    .and_then(numeric_value)
                    .ok_or_else(|| invalid("value must be a number"))?;
                let op = match symbol {
                    "$path_gt" => OrderingOp::Gt,
                    "$path_gte" => OrderingOp::Gte,
                    "$path_lt" => OrderingOp::Lt,
                    _ => OrderingOp::Lte,
                };
                Operator::DocumentPath(PathCondition::Compare { op, path, value })
            }
            "$path_in" => {
                let path = path_member(operand).ok_or_else(|| invalid("expected {\"path\": ..., \"values\": [...]}"))?;
                let items = operand
                    .get("values")
                    .and_then(Value::as_array)
                    .ok_or_else(|| invalid("values must be a list"))?;
                check_len(items.len())?;
                let texts = items
                    .iter()
                    .map(scalar_text)
                    .collect::<Option<Vec<String>>>()
                    .ok_or_else(|| invalid("values must be scalars"))?;
                Operator::DocumentPath(PathCondition::In { path, texts })
            }
            other => {
                return Err(CompileError::unsupported(field, other, "unknown operator"));
            }
        };

        Ok(op)
    }

    /// Canonical symbol, for diagnostics
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equality { negated: false, .. } => "$eq",
            Operator::Equality { negated: true, .. } => "$ne",
            Operator::Ordering { op, .. } => match op {
                OrderingOp::Gt => "$gt",
                OrderingOp::Gte => "$gte",
                OrderingOp::Lt => "$lt",
                OrderingOp::Lte => "$lte",
            },
            Operator::Membership { any_of: false, .. } => "$in",
            Operator::Membership { any_of: true, .. } => "$isanyof",
            Operator::Text { op, .. } => match op {
                TextOp::Contains => "$contains",
                TextOp::NotContains => "$ncontains",
                TextOp::StartsWith => "$startswith",
                TextOp::EndsWith => "$endswith",
            },
            Operator::Null { negated: false } => "$isempty",
            Operator::Null { negated: true } => "$isnotempty",
            Operator::Structural(op) => match op {
                StructuralOp::HasKey(_) => "$has_key",
                StructuralOp::HasAny(_) => "$has_any",
                StructuralOp::HasAll(_) => "$has_all",
                StructuralOp::ContainedBy(_) => "$contained_by",
            },
            Operator::Range(RangeBounds::Integer(..)) => "$int_between",
            Operator::Range(RangeBounds::Timestamp(..)) => "$dt_between",
            Operator::DocumentPath(cond) => match cond {
                PathCondition::Eq { .. } => "$path_eq",
                PathCondition::Compare { op, .. } => match op {
                    OrderingOp::Gt => "$path_gt",
                    OrderingOp::Gte => "$path_gte",
                    OrderingOp::Lt => "$path_lt",
                    OrderingOp::Lte => "$path_lte",
                },
                PathCondition::In { .. } => "$path_in",
            },
        }
    }

    /// Builds the predicate leaf for this operator applied to a resolved field.
    ///
    /// `key` is the filter key, used in diagnostics.
    pub fn build(&self, field: &FieldRef, key: &str) -> CompileResult<Predicate> {
        let symbol = self.symbol();
        let column = || ValueExpr::column(field.clone());
        let kind = field.kind;

        match self {
            Operator::Equality { negated, value } => {
                build_equality(column(), kind, *negated, value, key, symbol)
            }
            Operator::Ordering { op, value } => {
                if kind.is_temporal() {
                    return build_temporal_ordering(column(), *op, value, key, symbol);
                }
                Ok(Predicate::compare(column(), op.comparison(value.clone())))
            }
            Operator::Membership { any_of: false, values } => {
                let values = values
                    .iter()
                    .map(|v| match kind {
                        FieldKind::Temporal => temporal_literal(v, key, symbol),
                        FieldKind::Document => Ok(v.clone()),
                        _ => scalar_for_kind(v, kind, key, symbol),
                    })
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(Predicate::compare(column(), Comparison::In(values)))
            }
            Operator::Membership { any_of: true, values } => {
                let branches = values
                    .iter()
                    .map(|v| build_equality(column(), kind, false, v, key, symbol))
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(Predicate::or(branches))
            }
            Operator::Text { op, value } => {
                if kind.is_document() {
                    if *op == TextOp::Contains {
                        return Ok(Predicate::compare(
                            column(),
                            Comparison::JsonContains(value.clone()),
                        ));
                    }
                    let text = scalar_text(value)
                        .ok_or_else(|| CompileError::invalid_operand(key, symbol, "expected a scalar value"))?;
                    return Ok(Predicate::compare(column().cast(Coercion::Text), op.comparison(text)));
                }
                let text = scalar_text(value).ok_or_else(|| {
                    CompileError::invalid_operand(
                        key,
                        symbol,
                        format!("structured operand requires a document field, '{}' is {}", key, kind.type_name()),
                    )
                })?;
                let target = match kind {
                    FieldKind::Text => column(),
                    _ => column().cast(Coercion::Text),
                };
                Ok(Predicate::compare(target, op.comparison(text)))
            }
            Operator::Null { negated } => Ok(null_test(column(), *negated)),
            Operator::Structural(op) => {
                if !kind.is_document() {
                    return Err(document_only(key, symbol, kind));
                }
                let comparison = match op {
                    StructuralOp::HasKey(k) => Comparison::HasKey(k.clone()),
                    StructuralOp::HasAny(keys) => Comparison::HasAny(keys.clone()),
                    StructuralOp::HasAll(keys) => Comparison::HasAll(keys.clone()),
                    StructuralOp::ContainedBy(v) => Comparison::JsonContainedBy(v.clone()),
                };
                Ok(Predicate::compare(column(), comparison))
            }
            Operator::Range(bounds) => {
                let target = match (bounds, kind) {
                    (RangeBounds::Integer(..), FieldKind::Integer) => column(),
                    (RangeBounds::Timestamp(..), FieldKind::Temporal) => column(),
                    (RangeBounds::Integer(..), FieldKind::Text | FieldKind::Document) => {
                        column().cast(Coercion::Integer)
                    }
                    (RangeBounds::Timestamp(..), FieldKind::Text | FieldKind::Document) => {
                        column().cast(Coercion::Timestamp)
                    }
                    _ => {
                        return Err(CompileError::unsupported(
                            key,
                            symbol,
                            format!("cannot coerce {} field", kind.type_name()),
                        ))
                    }
                };
                Ok(range(target, bounds))
            }
            Operator::DocumentPath(cond) => {
                if !kind.is_document() {
                    return Err(document_only(key, symbol, kind));
                }
                Ok(build_path_condition(field, cond))
            }
        }
    }

    /// Builds the leaf for this operator applied to a scalar extracted from
    /// `field` at `path`.
    ///
    /// The leaf is compared as raw text, except that ordering operators
    /// coerce it to integer and range operators to the range's type. Day
    /// normalization never applies here.
    pub fn build_document_leaf(
        &self,
        field: &FieldRef,
        path: &DocumentPath,
        key: &str,
    ) -> CompileResult<Predicate> {
        let symbol = self.symbol();
        let leaf = || ValueExpr::extract(field.clone(), path.segments().to_vec());
        let text_of = |lit: &Literal| {
            lit.as_text().ok_or_else(|| {
                CompileError::invalid_operand(key, symbol, "expected a scalar value")
            })
        };

        match self {
            Operator::Equality { negated, value } => {
                if value.is_null() {
                    return Ok(null_test(leaf(), *negated));
                }
                let text = Literal::Text(text_of(value)?);
                let comparison = if *negated {
                    Comparison::Ne(text)
                } else {
                    Comparison::Eq(text)
                };
                Ok(Predicate::compare(leaf(), comparison))
            }
            Operator::Ordering { op, value } => {
                let number = match value {
                    Literal::Int(i) => *i,
                    Literal::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                        CompileError::invalid_operand(key, symbol, "expected an integer value")
                    })?,
                    _ => {
                        return Err(CompileError::invalid_operand(
                            key,
                            symbol,
                            "expected an integer value",
                        ))
                    }
                };
                Ok(Predicate::compare(
                    leaf().cast(Coercion::Integer),
                    op.comparison(Literal::Int(number)),
                ))
            }
            Operator::Membership { values, .. } => {
                let texts = values
                    .iter()
                    .map(|v| text_of(v).map(Literal::Text))
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(Predicate::compare(leaf(), Comparison::In(texts)))
            }
            Operator::Text { op, value } => {
                let text = scalar_text(value).ok_or_else(|| {
                    CompileError::invalid_operand(key, symbol, "expected a scalar value")
                })?;
                Ok(Predicate::compare(leaf(), op.comparison(text)))
            }
            Operator::Null { negated } => Ok(null_test(leaf(), *negated)),
            Operator::Range(bounds) => {
                let to = match bounds {
                    RangeBounds::Integer(..) => Coercion::Integer,
                    RangeBounds::Timestamp(..) => Coercion::Timestamp,
                };
                Ok(range(leaf().cast(to), bounds))
            }
            Operator::Structural(_) | Operator::DocumentPath(_) => Err(CompileError::unsupported(
                key,
                symbol,
                "not supported on a document sub-path",
            )),
        }
    }
}

fn document_only(key: &str, symbol: &str, kind: FieldKind) -> CompileError {
    CompileError::unsupported(
        key,
        symbol,
        format!("only valid on document fields, '{}' is {}", key, kind.type_name()),
    )
}

fn null_test(target: ValueExpr, negated: bool) -> Predicate {
    let comparison = if negated {
        Comparison::IsNotNull
    } else {
        Comparison::IsNull
    };
    Predicate::compare(target, comparison)
}

fn range(target: ValueExpr, bounds: &RangeBounds) -> Predicate {
    let (low, high) = match *bounds {
        RangeBounds::Integer(low, high) => (Literal::Int(low), Literal::Int(high)),
        RangeBounds::Timestamp(low, high) => (Literal::Timestamp(low), Literal::Timestamp(high)),
    };
    Predicate::compare(target, Comparison::Between(low, high))
}

/// `$eq`/`$ne`: empty string and null become null tests; a date-only literal
/// on a temporal field becomes the whole calendar day.
fn build_equality(
    target: ValueExpr,
    kind: FieldKind,
    negated: bool,
    value: &Literal,
    key: &str,
    symbol: &str,
) -> CompileResult<Predicate> {
    match value {
        Literal::Null => return Ok(null_test(target, negated)),
        Literal::Text(s) if s.is_empty() => return Ok(null_test(target, negated)),
        _ => {}
    }

    let value = match kind {
        FieldKind::Temporal => {
            let text = match value {
                Literal::Text(s) => s,
                _ => {
                    return Err(CompileError::invalid_operand(
                        key,
                        symbol,
                        "expected a date or timestamp string",
                    ))
                }
            };
            match TemporalLiteral::parse(text) {
                Some(TemporalLiteral::Date(date)) => {
                    let (start, end) = day_bounds(date).ok_or_else(|| {
                        CompileError::invalid_operand(key, symbol, "date out of range")
                    })?;
                    return Ok(if negated {
                        Predicate::Or(vec![
                            Predicate::compare(target.clone(), Comparison::Lt(Literal::Timestamp(start))),
                            Predicate::compare(target, Comparison::Gte(Literal::Timestamp(end))),
                        ])
                    } else {
                        Predicate::And(vec![
                            Predicate::compare(target.clone(), Comparison::Gte(Literal::Timestamp(start))),
                            Predicate::compare(target, Comparison::Lt(Literal::Timestamp(end))),
                        ])
                    });
                }
                Some(TemporalLiteral::DateTime(ts)) => Literal::Timestamp(ts),
                None => {
                    return Err(CompileError::invalid_operand(
                        key,
                        symbol,
                        format!("'{}' is not a date or timestamp", text),
                    ))
                }
            }
        }
        FieldKind::Document => Literal::Json(value.to_json()),
        _ => scalar_for_kind(value, kind, key, symbol)?,
    };

    let comparison = if negated {
        Comparison::Ne(value)
    } else {
        Comparison::Eq(value)
    };
    Ok(Predicate::compare(target, comparison))
}

/// Scalar operand for a non-temporal, non-document field. Boolean fields
/// take `true`/`false` as booleans or as text, in any case.
fn scalar_for_kind(value: &Literal, kind: FieldKind, key: &str, symbol: &str) -> CompileResult<Literal> {
    if !value.is_scalar() {
        return Err(CompileError::invalid_operand(
            key,
            symbol,
            "structured operand requires a document field",
        ));
    }
    if kind != FieldKind::Boolean {
        return Ok(value.clone());
    }
    match value {
        Literal::Null | Literal::Bool(_) => Ok(value.clone()),
        Literal::Text(s) if s.eq_ignore_ascii_case("true") => Ok(Literal::Bool(true)),
        Literal::Text(s) if s.eq_ignore_ascii_case("false") => Ok(Literal::Bool(false)),
        other => Err(CompileError::invalid_operand(
            key,
            symbol,
            format!("expected true or false, found {}", other),
        )),
    }
}

/// Ordering against a temporal field. For a date-only literal:
/// `$gt d` is `>= midnight(d + 1)`, `$gte d` is `>= midnight(d)`,
/// `$lt d` is `< midnight(d)` and `$lte d` is `< midnight(d + 1)`.
fn build_temporal_ordering(
    target: ValueExpr,
    op: OrderingOp,
    value: &Literal,
    key: &str,
    symbol: &str,
) -> CompileResult<Predicate> {
    let text = match value {
        Literal::Text(s) => s,
        _ => {
            return Err(CompileError::invalid_operand(
                key,
                symbol,
                "expected a date or timestamp string",
            ))
        }
    };

    let comparison = match TemporalLiteral::parse(text) {
        Some(TemporalLiteral::Date(date)) => {
            let (start, end) = day_bounds(date)
                .ok_or_else(|| CompileError::invalid_operand(key, symbol, "date out of range"))?;
            match op {
                OrderingOp::Gt => Comparison::Gte(Literal::Timestamp(end)),
                OrderingOp::Gte => Comparison::Gte(Literal::Timestamp(start)),
                OrderingOp::Lt => Comparison::Lt(Literal::Timestamp(start)),
                OrderingOp::Lte => Comparison::Lt(Literal::Timestamp(end)),
            }
        }
        Some(TemporalLiteral::DateTime(ts)) => op.comparison(Literal::Timestamp(ts)),
        None => {
            return Err(CompileError::invalid_operand(
                key,
                symbol,
                format!("'{}' is not a date or timestamp", text),
            ))
        }
    };

    Ok(Predicate::compare(target, comparison))
}

fn temporal_literal(value: &Literal, key: &str, symbol: &str) -> CompileResult<Literal> {
    match value {
        Literal::Null => Ok(Literal::Null),
        Literal::Text(s) => parse_timestamp(s).map(Literal::Timestamp).ok_or_else(|| {
            CompileError::invalid_operand(key, symbol, format!("'{}' is not a date or timestamp", s))
        }),
        _ => Err(CompileError::invalid_operand(
            key,
            symbol,
            "expected date or timestamp strings",
        )),
    }
}

fn build_path_condition(field: &FieldRef, cond: &PathCondition) -> Predicate {
    let leaf = |path: &DocumentPath| ValueExpr::extract(field.clone(), path.segments().to_vec());
    match cond {
        PathCondition::Eq { path, text } => {
            Predicate::compare(leaf(path), Comparison::Eq(Literal::Text(text.clone())))
        }
        PathCondition::Compare { op, path, value } => Predicate::compare(
            leaf(path).cast(Coercion::Integer),
            op.comparison(value.clone()),
        ),
        PathCondition::In { path, texts } => Predicate::compare(
            leaf(path),
            Comparison::In(texts.iter().cloned().map(Literal::Text).collect()),
        ),
    }
}

/// Text form of a JSON scalar; `None` for null, arrays and objects
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn pair(value: &Value) -> Option<(&Value, &Value)> {
    match value.as_array()?.as_slice() {
        [low, high] => Some((low, high)),
        _ => None,
    }
}

fn path_member(operand: &Value) -> Option<DocumentPath> {
    operand
        .get("path")
        .and_then(Value::as_str)
        .and_then(DocumentPath::parse)
}

/// Integer or finite float, from a JSON number or numeric text
fn numeric_value(value: &Value) -> Option<Literal> {
    let literal = match value {
        Value::Number(_) => Literal::from_json(value),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => Literal::Int(i),
                Err(_) => Literal::Float(s.parse::<f64>().ok()?),
            }
        }
        _ => return None,
    };
    match literal {
        Literal::Float(x) if !x.is_finite() => None,
        Literal::Int(_) | Literal::Float(_) => Some(literal),
        _ => None,
    }
}
