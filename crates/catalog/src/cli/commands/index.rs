//! Implementation of `catalog index`.

use std::process::ExitCode;

use catalog_index::{load_documents, rebuild_index};

use crate::cli::{args::IndexCommand, context::CommandContext, output::dim};

/// Rebuilds the index from a documents file.
pub fn run(ctx: &CommandContext, cmd: &IndexCommand) -> ExitCode {
    let documents = match load_documents(&cmd.file) {
        Ok(documents) => documents,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rebuild_index(&ctx.config, &documents) {
        Ok(summary) => {
            println!(
                "Indexed {} documents {}",
                summary.documents,
                dim(&format!("({})", summary.path.display()))
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: indexing failed: {e}");
            ExitCode::FAILURE
        }
    }
}
