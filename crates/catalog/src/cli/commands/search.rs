//! Implementation of `catalog search`.

use std::process::ExitCode;

use tracing::debug;

use crate::cli::{
    args::SearchCommand,
    commands::normalize_request,
    context::CommandContext,
    output::{Columns, print_browsing, print_json},
};

/// Browses the catalogue and prints one page with its facets.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let filter = match normalize_request(ctx, &cmd.request) {
        Ok(filter) => filter,
        Err(code) => return code,
    };
    let backend = match cmd.backend {
        Some(backend) => backend,
        None => match ctx.backend() {
            Ok(backend) => backend,
            Err(code) => return code,
        },
    };
    debug!(%backend, "browsing");
    let store = match ctx.open_store() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let browser = match ctx.browser(store) {
        Ok(browser) => browser,
        Err(code) => return code,
    };

    let browsing = match browser.browse_with(&filter, backend) {
        Ok(browsing) => browsing,
        Err(e) => {
            eprintln!("error: search failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.output.json {
        return print_json(&browsing);
    }

    let facets = &ctx.config.facets;
    print_browsing(
        &browsing,
        &Columns {
            id_fields: &facets.id_fields,
            name_fields: &facets.name_fields,
        },
    );
    ExitCode::SUCCESS
}
