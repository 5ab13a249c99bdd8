//! filterdsl - a filter/sort/search DSL compiler
//!
//! Compiles a JSON filter expression, a free-text search term and a sort
//! directive into a backend-neutral plan (predicate tree, deduplicated join
//! plan, ordering) against an explicit schema catalog. An in-memory executor
//! evaluates plans over JSON rows.

pub mod cli;
pub mod config;
pub mod executor;
pub mod observability;
pub mod planner;
pub mod schema;
