//! Implementation of `catalog check`.

use std::process::ExitCode;

use catalog_config::ConfigWarning;

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Validates the configuration; fails when there is anything to report.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let warnings = ctx.config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    print_warnings(&warnings);
    ExitCode::FAILURE
}

/// Prints warnings followed by hints for resolving them.
pub fn print_warnings(warnings: &[ConfigWarning]) {
    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    let mut printed = Vec::new();
    for w in warnings {
        if let Some(text) = hint(w)
            && !printed.contains(&text)
        {
            println!("{}", dim(&format!("Hint: {text}")));
            printed.push(text);
        }
    }
}

/// Returns a hint for resolving `w`, if there is one.
fn hint(w: &ConfigWarning) -> Option<&'static str> {
    match w {
        ConfigWarning::UnknownBackend { .. } => {
            Some("set search.backend to \"structured\" or \"textual\"")
        }
        ConfigWarning::NoSearchFields => Some("list fields in search.search_fields"),
        ConfigWarning::SearchFieldNotIndexed { .. } | ConfigWarning::FilterKeyNotIndexed { .. } => {
            Some("add the field to index.text_fields or index.keyword_fields")
        }
        ConfigWarning::FacetFieldNotKeyword { .. } => {
            Some("facet fields must be listed in index.keyword_fields")
        }
        ConfigWarning::FieldDeclaredTwice { .. } => {
            Some("remove the field from one of the [index] lists")
        }
        ConfigWarning::ZeroBucketSize => None,
    }
}
