//! Implementation of `catalog render`.

use std::process::ExitCode;

use catalog_query::render;

use crate::cli::{args::RequestArgs, commands::normalize_request, context::CommandContext};

/// Prints the textual query for a request.
pub fn run(ctx: &CommandContext, request: &RequestArgs) -> ExitCode {
    match normalize_request(ctx, request) {
        Ok(filter) => {
            println!("{}", render(&filter));
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}
