//! CLI command implementations
//!
//! Both commands load the catalog (and optional config), compile the request
//! against the root entity, then either print the plan or execute it.

use std::io::{self, Write};
use std::path::Path;

use crate::config::CompilerConfig;
use crate::executor::{Dataset, QueryExecutor};
use crate::planner::{ExplainPlan, QueryCompiler, QueryRequest};
use crate::schema::SchemaCatalog;

use super::args::{Cli, Command, OutputFormat, QueryArgs};
use super::errors::CliResult;
use super::io::{write_error, write_json, write_text};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cmd {
        Command::Compile { query, format } => compile(&query, format, &mut out),
        Command::Run {
            query,
            data,
            limit,
            offset,
        } => execute(&query, &data, limit, offset, &mut out),
    }
}

fn load_config(path: Option<&Path>) -> CliResult<CompilerConfig> {
    match path {
        Some(path) => Ok(CompilerConfig::load(path)?),
        None => Ok(CompilerConfig::default()),
    }
}

fn request(args: &QueryArgs) -> QueryRequest {
    QueryRequest {
        filters: args.filters.clone(),
        search: args.search.clone(),
        sort: args.sort.clone(),
    }
}

/// Compile and print the plan.
///
/// In JSON mode a rejected request still prints its error response body
/// before failing.
pub fn compile<W: Write>(args: &QueryArgs, format: OutputFormat, out: &mut W) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    let catalog = SchemaCatalog::load(&args.schema)?;
    let compiler = QueryCompiler::new(&catalog, &args.entity)?.with_config(config);

    match (compiler.compile(&request(args)), format) {
        (Ok(plan), OutputFormat::Text) => write_text(out, &ExplainPlan::from_plan(&plan).to_string()),
        (Ok(plan), OutputFormat::Json) => write_json(out, &plan),
        (Err(err), OutputFormat::Text) => {
            write_text(out, &ExplainPlan::from_error(&err).to_string())?;
            Err(err.into())
        }
        (Err(err), OutputFormat::Json) => {
            write_error(out, &err)?;
            Err(err.into())
        }
    }
}

/// Compile, execute against the dataset and print the matching rows
pub fn execute<W: Write>(
    args: &QueryArgs,
    data: &Path,
    limit: Option<u64>,
    offset: Option<u64>,
    out: &mut W,
) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    let catalog = SchemaCatalog::load(&args.schema)?;
    let dataset = Dataset::load(data)?;
    let compiler = QueryCompiler::new(&catalog, &args.entity)?.with_config(config);

    let mut plan = compiler.compile(&request(args))?;
    if let Some(limit) = limit {
        plan = plan.with_limit(limit);
    }
    if let Some(offset) = offset {
        plan = plan.with_offset(offset);
    }

    let result = QueryExecutor::new(&dataset).execute(&plan)?;
    write_json(out, &result.rows)
}
