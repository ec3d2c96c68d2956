//! Command implementations and dispatch.

pub mod check;
pub mod explain;
pub mod index;
pub mod init;
pub mod render;
pub mod search;
pub mod status;

use std::process::ExitCode;

use catalog_query::{FacetFilter, Params};

use super::{
    args::{Commands, RequestArgs},
    context::CommandContext,
};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Check => check::run(ctx),
        Commands::Index(cmd) => index::run(ctx, &cmd),
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::Explain(cmd) => explain::run(ctx, &cmd),
        Commands::Render(cmd) => render::run(ctx, &cmd),
        Commands::Status => status::run(ctx),
    }
}

/// Normalizes request arguments, exiting on malformed paging.
fn normalize_request(ctx: &CommandContext, request: &RequestArgs) -> Result<FacetFilter, ExitCode> {
    let params = Params::from_args(&request.params);
    ctx.normalizer().normalize(&params).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::FAILURE
    })
}
