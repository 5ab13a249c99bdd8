//! Sort directive: `path` or `path:direction`

use super::errors::CompileResult;
use super::paths::PathResolver;
use super::plan::{JoinPlan, Ordering, SortDirection};

/// Parsed sort directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub path: String,
    pub direction: SortDirection,
}

impl SortDirective {
    /// Splits on the last `:`. Only a case-insensitive `desc` sorts
    /// descending; any other token, or none, sorts ascending.
    pub fn parse(text: &str) -> Self {
        let (path, direction) = match text.rsplit_once(':') {
            Some((path, token)) if token.trim().eq_ignore_ascii_case("desc") => {
                (path, SortDirection::Desc)
            }
            Some((path, _)) => (path, SortDirection::Asc),
            None => (text, SortDirection::Asc),
        };
        Self {
            path: path.trim().to_string(),
            direction,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SortCompiler<'a> {
    resolver: PathResolver<'a>,
}

impl<'a> SortCompiler<'a> {
    pub fn new(resolver: PathResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Resolves the sort path relationally, reusing joins already in the plan.
    pub fn compile(&self, text: &str, joins: &mut JoinPlan) -> CompileResult<Ordering> {
        let directive = SortDirective::parse(text);
        let resolved = self
            .resolver
            .resolve(&directive.path, joins)
            .map_err(|e| e.into_sort_error())?;

        Ok(Ordering {
            target: resolved.commit(joins),
            direction: directive.direction,
        })
    }
}
