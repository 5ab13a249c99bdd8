//! In-memory query executor
//!
//! Execution flow (strict order):
//! 1. Expand each root row into its join combinations (left outer joins, in
//!    plan order)
//! 2. Keep the root row if any combination satisfies the predicate
//! 3. Evaluate the sort key on the first satisfying combination
//! 4. Apply ordering, then offset and limit
//!
//! Each root row appears at most once, however many related rows it joins.

use serde_json::Value;

use crate::planner::{CompiledPlan, JoinStep, Literal, ValueExpr};

use super::dataset::Dataset;
use super::errors::ExecutorResult;
use super::filters::{Bindings, PredicateEvaluator};
use super::result::ExecutionResult;
use super::sorter::{ResultSorter, SortableRow};

/// Executes compiled plans against a dataset
#[derive(Debug, Clone, Copy)]
pub struct QueryExecutor<'a> {
    dataset: &'a Dataset,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Same plan and same data always give the same result.
    pub fn execute(&self, plan: &CompiledPlan) -> ExecutorResult<ExecutionResult> {
        let roots = self.dataset.rows(plan.entity())?;
        let joined: Vec<(&JoinStep, &[Value])> = plan
            .joins()
            .steps()
            .iter()
            .map(|step| -> ExecutorResult<(&JoinStep, &[Value])> {
                Ok((step, self.dataset.rows(&step.entity)?))
            })
            .collect::<ExecutorResult<_>>()?;

        let mut matched: Vec<SortableRow<&Value>> = Vec::new();

        for row in roots {
            let combinations = expand(Bindings::root(plan.entity(), row), &joined);
            let first = combinations
                .iter()
                .find(|b| PredicateEvaluator::matches(plan.predicate(), b));

            if let Some(bindings) = first {
                let key = plan
                    .ordering()
                    .map(|o| {
                        PredicateEvaluator::value_of(&ValueExpr::column(o.target.clone()), bindings)
                    })
                    .unwrap_or(Literal::Null);
                matched.push(SortableRow { key, row });
            }
        }

        if let Some(ordering) = plan.ordering() {
            ResultSorter::sort(&mut matched, ordering.direction);
        }

        let matched_count = matched.len();
        let offset = usize::try_from(plan.offset()).unwrap_or(usize::MAX);
        let limit = plan
            .limit()
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        let rows = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|m| m.row.clone())
            .collect();

        Ok(ExecutionResult {
            rows,
            scanned_count: roots.len(),
            matched_count,
        })
    }
}

/// All join combinations for one root row. An unmatched join binds its
/// alias to no row instead of dropping the combination.
fn expand<'a>(root: Bindings<'a>, joined: &[(&'a JoinStep, &'a [Value])]) -> Vec<Bindings<'a>> {
    let mut combinations = vec![root];

    for &(step, rows) in joined {
        let mut next = Vec::with_capacity(combinations.len());
        for bindings in &combinations {
            let key = bindings
                .row(&step.parent_alias)
                .and_then(|parent| parent.get(&step.local_key))
                .filter(|k| !k.is_null());

            let children: Vec<&'a Value> = match key {
                Some(key) => rows
                    .iter()
                    .filter(|child| child.get(&step.remote_key) == Some(key))
                    .collect(),
                None => Vec::new(),
            };

            if children.is_empty() {
                next.push(bindings.bind(&step.alias, None));
            } else {
                for child in children {
                    next.push(bindings.bind(&step.alias, Some(child)));
                }
            }
        }
        combinations = next;
    }

    combinations
}
