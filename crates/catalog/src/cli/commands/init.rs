//! Implementation of `catalog init`.

use std::{
    fs,
    io::{self, Write},
    path::Path,
    process::ExitCode,
};

use catalog_config::{CONFIG_FILENAME, global_config_path, global_template, local_template};
use catalog_index::DATA_DIR;

use crate::cli::{args::InitCommand, context::CommandContext, output::subheader};

/// Writes a commented `.catalog.toml` template.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let cwd = &ctx.cwd;

    let in_home = global_config_path()
        .and_then(|p| p.parent().map(|home| home == cwd))
        .unwrap_or(false);
    let use_global = cmd.global || in_home;

    let config_path = if use_global {
        let Some(path) = global_config_path() else {
            eprintln!("error: could not determine home directory");
            return ExitCode::FAILURE;
        };
        path
    } else {
        cwd.join(CONFIG_FILENAME)
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = if use_global {
        global_template()
    } else {
        local_template()
    };

    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("{}", subheader("Next steps:"));
    println!("   1. List your document fields under [index] and [facets]");
    println!("   2. Run 'catalog index <FILE>' to build the index");
    println!("   3. Run 'catalog search query=<TEXT>' to browse");

    if !use_global && let Err(e) = update_gitignore(cwd) {
        eprintln!("warning: could not update .gitignore: {e}");
    }

    ExitCode::SUCCESS
}

/// Appends the index data directory to an existing `.gitignore`.
fn update_gitignore(dir: &Path) -> io::Result<()> {
    let path = dir.join(".gitignore");
    if !path.exists() {
        return Ok(());
    }

    let contents = fs::read_to_string(&path)?;
    let pattern = format!("{DATA_DIR}/");
    if contents
        .lines()
        .map(str::trim)
        .any(|line| line == pattern || line == DATA_DIR)
    {
        return Ok(());
    }

    let mut file = fs::OpenOptions::new().append(true).open(&path)?;
    if !contents.is_empty() && !contents.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{pattern}")?;
    println!("Added {pattern} to .gitignore");

    Ok(())
}
