//! Result ordering
//!
//! Nulls sort first ascending and last descending. Keys of different kinds
//! never compare equal by accident: each kind has a fixed rank. The sort is
//! stable, so rows with equal keys keep dataset order.

use std::cmp::Ordering;

use crate::planner::{Literal, SortDirection};

/// A matched row with its evaluated sort key
#[derive(Debug, Clone)]
pub struct SortableRow<T> {
    pub key: Literal,
    pub row: T,
}

/// Sorts matched rows
pub struct ResultSorter;

impl ResultSorter {
    pub fn sort<T>(rows: &mut [SortableRow<T>], direction: SortDirection) {
        rows.sort_by(|a, b| {
            let ordering = Self::compare_keys(&a.key, &b.key);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    /// Total order over keys. Kinds rank null < bool < number < timestamp
    /// < text < json; keys of one kind compare by value.
    fn compare_keys(a: &Literal, b: &Literal) -> Ordering {
        rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
            (Literal::Bool(x), Literal::Bool(y)) => x.cmp(y),
            (Literal::Int(x), Literal::Int(y)) => x.cmp(y),
            (Literal::Int(_) | Literal::Float(_), Literal::Int(_) | Literal::Float(_)) => {
                numeric_key(a).total_cmp(&numeric_key(b)).then_with(|| {
                    // Same f64 value: the int sorts first
                    matches!(a, Literal::Float(_)).cmp(&matches!(b, Literal::Float(_)))
                })
            }
            (Literal::Timestamp(x), Literal::Timestamp(y)) => x.cmp(y),
            (Literal::Text(x), Literal::Text(y)) => x.cmp(y),
            (Literal::Json(x), Literal::Json(y)) => x.to_string().cmp(&y.to_string()),
            _ => Ordering::Equal,
        })
    }
}

fn rank(key: &Literal) -> u8 {
    match key {
        Literal::Null => 0,
        Literal::Bool(_) => 1,
        Literal::Int(_) | Literal::Float(_) => 2,
        Literal::Timestamp(_) => 3,
        Literal::Text(_) => 4,
        Literal::Json(_) => 5,
    }
}

fn numeric_key(key: &Literal) -> f64 {
    match key {
        Literal::Int(i) => *i as f64,
        Literal::Float(x) => *x,
        _ => 0.0,
    }
}
