//! Compiled plan: predicate, join plan and ordering
//!
//! A plan is produced fresh per request and consumed once by the execution
//! layer. It stays composable (extra `where` terms, pagination) without
//! re-parsing the request.

use serde::Serialize;

use super::ast::{FieldRef, Predicate};

/// One relationship traversal, materialized as a left outer join
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinStep {
    /// Alias given to the joined entity instance
    pub alias: String,
    /// Joined entity
    pub entity: String,
    /// Alias the relationship was traversed from
    pub parent_alias: String,
    /// Relationship name on the parent entity
    pub relationship: String,
    /// Join condition: `parent.local_key = alias.remote_key`
    pub local_key: String,
    pub remote_key: String,
}

/// Deduplicated set of joins, keyed by target entity.
///
/// At most one join exists per distinct related entity, however many filter
/// or sort terms traverse a relationship to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinPlan {
    steps: Vec<JoinStep>,
}

impl JoinPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias of the join for `entity`, if one exists
    pub fn alias_for(&self, entity: &str) -> Option<&str> {
        self.steps
            .iter()
            .find(|s| s.entity == entity)
            .map(|s| s.alias.as_str())
    }

    /// Joins in the order they must be applied
    pub fn steps(&self) -> &[JoinStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Adds joins discovered by a successful path resolution.
    ///
    /// Steps for entities that are already joined are dropped.
    pub(crate) fn commit(&mut self, pending: Vec<JoinStep>) {
        for step in pending {
            if self.alias_for(&step.entity).is_none() {
                self.steps.push(step);
            }
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Ordering instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ordering {
    pub target: FieldRef,
    pub direction: SortDirection,
}

/// Final output of compilation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledPlan {
    entity: String,
    joins: JoinPlan,
    predicate: Option<Predicate>,
    ordering: Option<Ordering>,
    limit: Option<u64>,
    offset: u64,
}

impl CompiledPlan {
    /// Unfiltered, unordered query over `entity`
    pub(crate) fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            joins: JoinPlan::new(),
            predicate: None,
            ordering: None,
            limit: None,
            offset: 0,
        }
    }

    /// Root entity
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn joins(&self) -> &JoinPlan {
        &self.joins
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub fn ordering(&self) -> Option<&Ordering> {
        self.ordering.as_ref()
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Conjoins `predicate` with any existing `where` clause
    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(match self.predicate.take() {
            None => predicate,
            Some(Predicate::And(mut children)) if !children.is_empty() => {
                children.push(predicate);
                Predicate::And(children)
            }
            Some(existing) => Predicate::And(vec![existing, predicate]),
        });
        self
    }

    pub fn with_ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Mutable join plan, threaded through the compilation stages
    pub(crate) fn joins_mut(&mut self) -> &mut JoinPlan {
        &mut self.joins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ast::{Comparison, Literal, ValueExpr};
    use crate::schema::FieldKind;

    fn step(alias: &str, entity: &str) -> JoinStep {
        JoinStep {
            alias: alias.into(),
            entity: entity.into(),
            parent_alias: "users".into(),
            relationship: "role".into(),
            local_key: "role_id".into(),
            remote_key: "id".into(),
        }
    }

    fn leaf(column: &str) -> Predicate {
        Predicate::compare(
            ValueExpr::column(FieldRef::new("users", "users", column, FieldKind::Integer)),
            Comparison::Eq(Literal::Int(1)),
        )
    }

    #[test]
    fn test_commit_dedupes_by_entity() {
        let mut joins = JoinPlan::new();
        joins.commit(vec![step("roles_1", "roles")]);
        joins.commit(vec![step("roles_2", "roles")]);

        assert_eq!(joins.len(), 1);
        assert_eq!(joins.alias_for("roles"), Some("roles_1"));
        assert_eq!(joins.alias_for("teams"), None);
    }

    #[test]
    fn test_and_where_conjoins() {
        let plan = CompiledPlan::new("users")
            .and_where(leaf("a"))
            .and_where(leaf("b"))
            .and_where(leaf("c"));

        match plan.predicate() {
            Some(Predicate::And(children)) => assert_eq!(children.len(), 3),
            other => panic!("expected conjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_and_where_wraps_identity() {
        let plan = CompiledPlan::new("users")
            .and_where(Predicate::always())
            .and_where(leaf("a"));

        match plan.predicate() {
            Some(Predicate::And(children)) => {
                assert_eq!(children.len(), 2);
                assert!(children[0].is_always());
            }
            other => panic!("expected conjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_pagination_composes() {
        let plan = CompiledPlan::new("users").with_limit(20).with_offset(40);
        assert_eq!(plan.limit(), Some(20));
        assert_eq!(plan.offset(), 40);
        assert!(plan.predicate().is_none());
    }
}
