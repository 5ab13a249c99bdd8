//! In-memory query execution
//!
//! Gives compiled plans their meaning over rows held in memory, the way a
//! relational backend would evaluate them.
//!
//! # Execution Flow (strict order)
//!
//! 1. Expand root rows through the plan's left outer joins
//! 2. Filter by existential match of the predicate
//! 3. Apply ordering (if specified)
//! 4. Apply offset and limit
//!
//! # Semantics
//!
//! - Comparisons with null are false
//! - Casts that cannot be performed yield null
//! - Text matching is case-insensitive

mod dataset;
mod errors;
mod executor;
mod filters;
mod result;
mod sorter;

pub use dataset::Dataset;
pub use errors::{ExecutorError, ExecutorResult};
pub use executor::QueryExecutor;
pub use filters::{Bindings, PredicateEvaluator};
pub use result::ExecutionResult;
pub use sorter::{ResultSorter, SortableRow};
