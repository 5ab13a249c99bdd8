//! Query compilation
//!
//! Translates a textual request (filter expression, search term, sort
//! directive) into a backend-neutral [`CompiledPlan`]: a predicate tree, a
//! deduplicated join plan and an optional ordering.
//!
//! # Stages
//!
//! 1. Filters: parsed into [`FilterNode`], compiled through the path
//!    resolvers and the operator registry
//! 2. Search: disjunction over the root entity's own fields
//! 3. Sort: one relational path plus a direction
//!
//! Stages thread a single [`JoinPlan`]; at most one join exists per related
//! entity.

mod ast;
mod compiler;
mod errors;
mod explain;
mod filter;
mod operators;
mod paths;
mod plan;
mod search;
mod sort;
mod temporal;

pub use ast::{Coercion, Comparison, FieldRef, Literal, Predicate, ValueExpr};
pub use compiler::{QueryCompiler, QueryRequest};
pub use errors::{CompileError, CompileResult, ErrorResponse};
pub use explain::ExplainPlan;
pub use filter::{Connective, FilterCompiler, FilterEntry, FilterNode};
pub use operators::{Operator, OrderingOp, PathCondition, RangeBounds, StructuralOp, TextOp};
pub use paths::{DocumentPath, PathError, PathResolver, ResolvedPath};
pub use plan::{CompiledPlan, JoinPlan, JoinStep, Ordering, SortDirection};
pub use search::SearchCompiler;
pub use sort::{SortCompiler, SortDirective};
pub use temporal::{day_bounds, parse_timestamp, TemporalLiteral};
