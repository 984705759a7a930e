mod config;
mod logging;
mod output;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use config::{FileConfig, Overrides, load_config, resolve};
use ddlgraph_catalog::{
    CatalogSnapshot, ExtractOptions, SnapshotProvider, build_graph, extract, load_catalog,
};
use ddlgraph_core::{Error as CoreError, RenderOptions};
use ddlgraph_diff::{DiffError, compare_trees, read_tree, write_tree};
use logging::{LogFormat, init_logging};
use output::{emit_script, write_stdout};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("diff error: {0}")]
    Diff(#[from] DiffError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logging setup failed: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "ddlgraph", version, about = "Dependency-ordered Db2 DDL extraction")]
struct Cli {
    /// Log output format on stderr.
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,
    /// Optional TOML settings file.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the DDL script of a catalog snapshot.
    Extract(ExtractArgs),
    /// Compare two rendered trees or two snapshots.
    Diff(DiffArgs),
    /// Print the dependency graph report as JSON.
    Graph(GraphArgs),
    /// Print the JSON schema of the snapshot format.
    SnapshotSchema,
}

#[derive(Args, Debug, Default)]
struct RenderArgs {
    /// Schema name(s) to include.
    #[arg(long, value_name = "SCHEMA")]
    schema: Vec<String>,
    /// Statement terminator.
    #[arg(long, value_name = "TERMINATOR")]
    terminator: Option<String>,
    /// Skip COMMENT ON statements.
    #[arg(long)]
    no_remarks: bool,
    #[arg(long)]
    no_views: bool,
    #[arg(long)]
    no_routines: bool,
    #[arg(long)]
    no_triggers: bool,
    /// Do not append identity RESTART statements.
    #[arg(long)]
    no_identity_resync: bool,
    /// Omit the `--#SET TERMINATOR` directive.
    #[arg(long)]
    no_directive: bool,
}

impl RenderArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            terminator: self.terminator.clone(),
            schemas: self.schema.clone(),
            no_remarks: self.no_remarks,
            no_views: self.no_views,
            no_routines: self.no_routines,
            no_triggers: self.no_triggers,
            no_identity_resync: self.no_identity_resync,
            no_directive: self.no_directive,
        }
    }
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Catalog snapshot (JSON).
    #[arg(long, value_name = "FILE")]
    snapshot: PathBuf,
    /// Write one file per object into this directory instead of stdout.
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// Rendered tree directory or catalog snapshot.
    left: PathBuf,
    /// Rendered tree directory or catalog snapshot.
    right: PathBuf,
    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args, Debug)]
struct GraphArgs {
    /// Catalog snapshot (JSON).
    #[arg(long, value_name = "FILE")]
    snapshot: PathBuf,
    #[command(flatten)]
    render: RenderArgs,
}

/// Outcome of a successful command.
enum Status {
    Clean,
    Differences,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.log_format) {
        eprintln!("error: {err}");
        return ExitCode::from(2);
    }

    match run(cli).await {
        Ok(Status::Clean) => ExitCode::SUCCESS,
        Ok(Status::Differences) => ExitCode::from(1),
        Err(err) => {
            tracing::error!(event = "command_failed", error = %err);
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<Status, CliError> {
    let file_config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };

    match cli.command {
        Command::Extract(args) => run_extract(&file_config, args).await,
        Command::Diff(args) => run_diff(&file_config, args).await,
        Command::Graph(args) => run_graph(&file_config, args).await,
        Command::SnapshotSchema => run_snapshot_schema(),
    }
}

async fn run_extract(file_config: &FileConfig, args: ExtractArgs) -> Result<Status, CliError> {
    let (opts, render) = resolve(file_config, &args.render.overrides())?;
    let provider = SnapshotProvider::from_path(&args.snapshot)?;
    let extraction = extract(&provider, &opts, &render).await?;
    emit_script(&extraction.script, args.out_dir.as_deref())?;
    Ok(Status::Clean)
}

async fn run_graph(file_config: &FileConfig, args: GraphArgs) -> Result<Status, CliError> {
    let (opts, _) = resolve(file_config, &args.render.overrides())?;
    let provider = SnapshotProvider::from_path(&args.snapshot)?;
    let catalog = load_catalog(&provider, &opts).await?;
    let graph = build_graph(&provider, &catalog).await?;

    let report = graph.report();
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    write_stdout(&json)?;
    Ok(Status::Clean)
}

async fn run_diff(file_config: &FileConfig, args: DiffArgs) -> Result<Status, CliError> {
    let (opts, render) = resolve(file_config, &args.render.overrides())?;

    let (left, right) = tokio::try_join!(
        load_side(&args.left, &opts, &render),
        load_side(&args.right, &opts, &render)
    )?;

    let comparison = compare_trees(&left.label, &left.files, &right.label, &right.files);
    tracing::info!(
        event = "diff_done",
        left = %left.label,
        right = %right.label,
        left_only = comparison.left_only.len(),
        right_only = comparison.right_only.len(),
        changed = comparison.changed.len()
    );

    if comparison.is_identical() {
        return Ok(Status::Clean);
    }
    write_stdout(&comparison.render(&left.label, &right.label))?;
    Ok(Status::Differences)
}

/// One side of a comparison, read from disk or rendered from a snapshot.
struct Side {
    label: String,
    files: BTreeMap<String, String>,
}

async fn load_side(
    path: &Path,
    opts: &ExtractOptions,
    render: &RenderOptions,
) -> Result<Side, CliError> {
    if path.is_dir() {
        return Ok(Side {
            label: path.display().to_string(),
            files: read_tree(path)?,
        });
    }

    let provider = SnapshotProvider::from_path(path)?;
    let extraction = extract(&provider, opts, render).await?;
    let staging = tempfile::tempdir()?;
    write_tree(staging.path(), &extraction.script)?;
    Ok(Side {
        label: extraction.source,
        files: read_tree(staging.path())?,
    })
}

fn run_snapshot_schema() -> Result<Status, CliError> {
    let schema = schemars::schema_for!(CatalogSnapshot);
    let mut json = serde_json::to_string_pretty(&schema)?;
    json.push('\n');
    write_stdout(&json)?;
    Ok(Status::Clean)
}
