//! Implementation of `catalog status`.

use std::process::ExitCode;

use catalog_config::{discover_config_files, is_global_config};
use catalog_index::{IndexStatus, TantivyStore, detect_index_status, index_directory};

use crate::cli::{
    commands::check::print_warnings,
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Shows configuration files, index state, effective settings and warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    let config_files = discover_config_files(&ctx.cwd);
    println!("{}", subheader("Config files:"));
    if config_files.is_empty() {
        println!("   {}", dim("(none; using defaults, run 'catalog init' to create one)"));
    }
    for path in &config_files {
        let scope = if is_global_config(path) { "global" } else { "local" };
        println!("   {} {}", path.display(), dim(&format!("({scope})")));
    }
    println!();

    println!("{}", subheader("Index:"));
    let status = detect_index_status(config);
    let status_text = match status {
        IndexStatus::Current => status.description().to_string(),
        IndexStatus::Stale | IndexStatus::Missing => warning(status.description()),
    };
    match index_directory(config) {
        Some(path) => println!("   {status_text} {}", dim(&format!("({})", path.display()))),
        None => println!("   {status_text}"),
    }
    if !matches!(status, IndexStatus::Missing) {
        match TantivyStore::open_with_config(config).and_then(|store| store.num_docs()) {
            Ok(count) => println!("   {count} documents"),
            Err(e) => println!("   {}", warning(&format!("unreadable: {e}"))),
        }
    }
    println!();

    println!("{}", subheader("Effective settings:"));
    match config.settings_to_toml() {
        Ok(toml) => {
            for line in toml.lines() {
                println!("   {line}");
            }
        }
        Err(e) => println!("   {}", warning(&format!("could not render settings: {e}"))),
    }
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }
    print_warnings(&warnings);
    ExitCode::FAILURE
}
