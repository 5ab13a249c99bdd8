//! Query orchestration
//!
//! Stages run in a fixed order: filters, then search, then sort. They share
//! one join plan, so a join introduced by the filter stage is reused by the
//! sort stage.

use serde::Deserialize;

use crate::config::CompilerConfig;
use crate::observability::Logger;
use crate::schema::{SchemaCatalog, SchemaDescriptor, SchemaResult};

use super::errors::CompileResult;
use super::filter::{FilterCompiler, FilterNode};
use super::paths::PathResolver;
use super::plan::CompiledPlan;
use super::search::SearchCompiler;
use super::sort::SortCompiler;

/// Raw request: three optional strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub filters: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = Some(filters.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

/// Present and not blank
fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Compiles requests against one root entity.
///
/// Holds only shared references to the catalog; compilations are independent
/// and may run concurrently.
#[derive(Debug, Clone)]
pub struct QueryCompiler<'a> {
    catalog: &'a SchemaCatalog,
    root: &'a SchemaDescriptor,
    config: CompilerConfig,
    logger: Logger,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(catalog: &'a SchemaCatalog, entity: &str) -> SchemaResult<Self> {
        let root = catalog.descriptor(entity)?;
        let config = CompilerConfig::default();
        Ok(Self {
            catalog,
            root,
            logger: config.logger(),
            config,
        })
    }

    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.logger = config.logger();
        self.config = config;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn root(&self) -> &'a SchemaDescriptor {
        self.root
    }

    /// Unfiltered plan over the root entity
    pub fn base_query(&self) -> CompiledPlan {
        CompiledPlan::new(self.root.entity())
    }

    pub fn compile(&self, request: &QueryRequest) -> CompileResult<CompiledPlan> {
        self.compile_onto(self.base_query(), request)
    }

    /// Applies `request` on top of `base`, which must be a plan over the
    /// root entity. On error nothing of the request is applied.
    pub fn compile_onto(
        &self,
        base: CompiledPlan,
        request: &QueryRequest,
    ) -> CompileResult<CompiledPlan> {
        debug_assert_eq!(base.entity(), self.root.entity());

        match self.apply(base, request) {
            Ok(plan) => {
                let joins = plan.joins().len().to_string();
                let leaves = plan
                    .predicate()
                    .map(|p| p.leaf_count())
                    .unwrap_or(0)
                    .to_string();
                let sorted = plan.ordering().is_some().to_string();
                self.logger.trace(
                    "QUERY_COMPILED",
                    &[
                        ("entity", plan.entity()),
                        ("joins", joins.as_str()),
                        ("leaves", leaves.as_str()),
                        ("sorted", sorted.as_str()),
                    ],
                );
                Ok(plan)
            }
            Err(err) => {
                let message = err.to_string();
                self.logger.warn(
                    "QUERY_REJECTED",
                    &[
                        ("entity", self.root.entity()),
                        ("code", err.code()),
                        ("field", err.field().unwrap_or("")),
                        ("error", message.as_str()),
                    ],
                );
                Err(err)
            }
        }
    }

    fn apply(&self, mut plan: CompiledPlan, request: &QueryRequest) -> CompileResult<CompiledPlan> {
        let resolver = PathResolver::new(self.catalog, self.root);

        if let Some(text) = given(&request.filters) {
            let node = FilterNode::parse(text, &self.config)?;
            let predicate = FilterCompiler::new(resolver).compile(&node, plan.joins_mut())?;
            if let Some(predicate) = predicate {
                plan = plan.and_where(predicate);
            }
        }

        if let Some(term) = given(&request.search) {
            if let Some(predicate) = SearchCompiler::new(self.root).compile(term) {
                plan = plan.and_where(predicate);
            }
        }

        if let Some(text) = given(&request.sort) {
            let ordering = SortCompiler::new(resolver).compile(text, plan.joins_mut())?;
            plan = plan.with_ordering(ordering);
        }

        Ok(plan)
    }
}
