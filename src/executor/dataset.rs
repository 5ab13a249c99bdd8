//! In-memory rows keyed by entity
//!
//! JSON form: `{"users": [{...}, ...], "roles": [...]}`. Every row must be
//! an object.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use super::errors::{ExecutorError, ExecutorResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    tables: BTreeMap<String, Vec<Value>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the rows of `entity`
    pub fn insert(&mut self, entity: impl Into<String>, rows: Vec<Value>) -> ExecutorResult<()> {
        let entity = entity.into();
        if let Some(index) = rows.iter().position(|r| !r.is_object()) {
            return Err(ExecutorError::RowNotObject { entity, index });
        }
        self.tables.insert(entity, rows);
        Ok(())
    }

    pub fn with_rows(mut self, entity: impl Into<String>, rows: Vec<Value>) -> ExecutorResult<Self> {
        self.insert(entity, rows)?;
        Ok(self)
    }

    pub fn rows(&self, entity: &str) -> ExecutorResult<&[Value]> {
        self.tables
            .get(entity)
            .map(Vec::as_slice)
            .ok_or_else(|| ExecutorError::UnknownEntity(entity.to_string()))
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn load(path: &Path) -> ExecutorResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ExecutorError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ExecutorResult<Self> {
        let raw: BTreeMap<String, Vec<Value>> =
            serde_json::from_str(content).map_err(|e| ExecutorError::Malformed(e.to_string()))?;

        let mut dataset = Dataset::new();
        for (entity, rows) in raw {
            dataset.insert(entity, rows)?;
        }
        Ok(dataset)
    }
}
