//! Clap argument definitions for the `catalog` CLI.

use std::path::PathBuf;

use catalog_query::Backend;
use clap::{ArgAction, Args, Parser, Subcommand};

/// Parses a backend name.
fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse()
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Faceted search over a metadata catalogue")]
pub struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Browse request given as `key=value` parameters.
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Request parameters, e.g. query=cloud category=compute,storage from=10
    #[arg(value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

/// Shared output mode flags.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `catalog init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.catalog.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `catalog index`.
#[derive(Args, Debug, Clone)]
pub struct IndexCommand {
    /// Documents to index: JSON Lines, or a JSON array of objects
    pub file: PathBuf,
}

/// Arguments for `catalog search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    #[command(flatten)]
    /// Request parameters.
    pub request: RequestArgs,

    /// Query backend: structured or textual [default: from config]
    #[arg(short = 'b', long, value_parser = parse_backend)]
    pub backend: Option<Backend>,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `catalog explain`.
#[derive(Args, Debug, Clone)]
pub struct ExplainCommand {
    #[command(flatten)]
    /// Request parameters.
    pub request: RequestArgs,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Supported `catalog` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize catalog configuration in current directory
    Init(InitCommand),

    /// Validate configuration and diagnose issues
    Check,

    /// Rebuild the search index from a documents file
    Index(IndexCommand),

    /// Browse the catalogue
    #[command(after_help = "\
PARAMETERS:
  query=TEXT            Free-text keyword; \"quoted\" parts match as phrases
  searchFields=F1,F2    Fields the keyword is matched against
  from=N                Offset of the first result
  quantity=N            Page size
  orderField=FIELD      Sort on a field instead of relevance
  order=asc|desc        Sort direction
  FIELD=V1,V2           Filter on any other field; values are alternatives

EXAMPLES:
  catalog search query=cloud
  catalog search 'query=\"open data\"' category=storage,compute
  catalog search provider=prov-a orderField=name order=desc quantity=5")]
    Search(SearchCommand),

    /// Show the normalized filter and the queries it compiles to
    Explain(ExplainCommand),

    /// Print the textual query for a request
    Render(RequestArgs),

    /// Show configuration, index status, and validation warnings
    Status,
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
