//! Result types for query execution

use serde::Serialize;
use serde_json::Value;

/// Result of executing a compiled plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    /// Root rows in result order
    pub rows: Vec<Value>,
    /// Root rows examined
    pub scanned_count: usize,
    /// Root rows matching the predicate, before offset and limit
    pub matched_count: usize,
}

impl ExecutionResult {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            scanned_count: 0,
            matched_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.rows.iter()
    }

    /// Values of `column` across the result rows, in order
    pub fn column(&self, column: &str) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| row.get(column).cloned().unwrap_or(Value::Null))
            .collect()
    }
}
