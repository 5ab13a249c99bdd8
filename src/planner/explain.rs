//! Explain output
//!
//! Produces deterministic, human-readable explain output for a compiled plan
//! or a rejected request.

use std::fmt;

use super::errors::CompileError;
use super::plan::CompiledPlan;

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainPlan {
    /// Whether compilation succeeded
    pub accepted: bool,
    /// Root entity (if accepted)
    pub entity: Option<String>,
    /// One line per join, in application order
    pub joins: Vec<String>,
    /// Rendered `where` clause
    pub predicate: Option<String>,
    /// Sort description
    pub sort: Option<String>,
    pub limit: Option<u64>,
    pub offset: u64,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    pub fn from_plan(plan: &CompiledPlan) -> Self {
        let joins = plan
            .joins()
            .steps()
            .iter()
            .map(|step| {
                format!(
                    "LEFT OUTER JOIN {} AS {} ON {}.{} = {}.{}",
                    step.entity,
                    step.alias,
                    step.parent_alias,
                    step.local_key,
                    step.alias,
                    step.remote_key
                )
            })
            .collect();

        Self {
            accepted: true,
            entity: Some(plan.entity().to_string()),
            joins,
            predicate: plan.predicate().map(|p| p.to_string()),
            sort: plan
                .ordering()
                .map(|o| format!("{} {}", o.target, o.direction.as_str().to_uppercase())),
            limit: plan.limit(),
            offset: plan.offset(),
            rejection_reason: None,
            rejection_code: None,
        }
    }

    pub fn from_error(err: &CompileError) -> Self {
        Self {
            accepted: false,
            entity: None,
            joins: Vec::new(),
            predicate: None,
            sort: None,
            limit: None,
            offset: 0,
            rejection_reason: Some(err.to_string()),
            rejection_code: Some(err.code().to_string()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            if let Some(entity) = &self.entity {
                writeln!(f, "FROM {}", entity)?;
            }
            for join in &self.joins {
                writeln!(f, "{}", join)?;
            }
            if let Some(predicate) = &self.predicate {
                writeln!(f, "WHERE {}", predicate)?;
            }
            if let Some(sort) = &self.sort {
                writeln!(f, "ORDER BY {}", sort)?;
            }
            if let Some(limit) = self.limit {
                writeln!(f, "LIMIT {}", limit)?;
            }
            if self.offset > 0 {
                writeln!(f, "OFFSET {}", self.offset)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::compiler::{QueryCompiler, QueryRequest};
    use crate::schema::{FieldKind, SchemaCatalog, SchemaDescriptor};

    fn catalog() -> SchemaCatalog {
        let roles = SchemaDescriptor::builder("roles")
            .field("id", FieldKind::Integer)
            .field("name", FieldKind::Text)
            .build()
            .unwrap();
        let users = SchemaDescriptor::builder("users")
            .field("age", FieldKind::Integer)
            .field("role_id", FieldKind::Integer)
            .relationship("role", "roles", "role_id", "id")
            .build()
            .unwrap();
        SchemaCatalog::new([roles, users]).unwrap()
    }

    #[test]
    fn test_explain_accepted_plan() {
        let catalog = catalog();
        let compiler = QueryCompiler::new(&catalog, "users").unwrap();
        let request = QueryRequest::new()
            .with_filters(r#"{"role.name": {"$eq": "admin"}}"#)
            .with_sort("age:desc");
        let plan = compiler.compile(&request).unwrap().with_limit(10);

        let output = ExplainPlan::from_plan(&plan).to_string();
        assert!(output.contains("ACCEPTED"));
        assert!(output.contains("FROM users"));
        assert!(output.contains("LEFT OUTER JOIN roles AS roles_1 ON users.role_id = roles_1.id"));
        assert!(output.contains("WHERE roles_1.name = 'admin'"));
        assert!(output.contains("ORDER BY users.age DESC"));
        assert!(output.contains("LIMIT 10"));
        assert!(!output.contains("OFFSET"));
    }

    #[test]
    fn test_explain_rejected_plan() {
        let err = CompileError::InvalidFilterSyntax("expected a filter object".into());
        let explain = ExplainPlan::from_error(&err);

        assert!(!explain.accepted);
        let output = explain.to_string();
        assert!(output.contains("REJECTED"));
        assert!(output.contains("QUERY_INVALID_FILTER_SYNTAX"));
    }

    #[test]
    fn test_explain_deterministic() {
        let catalog = catalog();
        let compiler = QueryCompiler::new(&catalog, "users").unwrap();
        let request = QueryRequest::new().with_filters(r#"{"age": {"$in": [1, 2]}, "role.id": {"$gt": 0}}"#);
        let plan = compiler.compile(&request).unwrap();

        assert_eq!(
            ExplainPlan::from_plan(&plan).to_string(),
            ExplainPlan::from_plan(&plan).to_string()
        );
    }
}
