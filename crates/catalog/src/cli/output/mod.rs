//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use catalog_query::{Browsing, Document, Facet};
use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;

/// ANSI bold.
const BOLD: &str = "\x1b[1m";
/// ANSI cyan foreground.
const CYAN: &str = "\x1b[36m";
/// ANSI yellow foreground.
const YELLOW: &str = "\x1b[33m";
/// ANSI dim.
const DIM: &str = "\x1b[2m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Formats a section header.
pub fn header(text: &str) -> String {
    format!("{BOLD}{CYAN}{text}{RESET}")
}

/// Formats a subsection header.
pub fn subheader(text: &str) -> String {
    format!("{BOLD}{text}{RESET}")
}

/// Formats de-emphasized text.
pub fn dim(text: &str) -> String {
    format!("{DIM}{text}{RESET}")
}

/// Formats a warning.
pub fn warning(text: &str) -> String {
    format!("{YELLOW}{text}{RESET}")
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Field names used for the result table columns.
pub struct Columns<'a> {
    /// Identifier fields, tried in order.
    pub id_fields: &'a [String],
    /// Name fields, tried in order.
    pub name_fields: &'a [String],
}

impl Columns<'_> {
    /// First value of the first present field in `fields`.
    fn pick<'d>(doc: &'d Document, fields: &[String]) -> &'d str {
        fields
            .iter()
            .find_map(|field| doc.first(field))
            .unwrap_or("")
    }
}

/// Prints a page of results followed by its facets.
pub fn print_browsing(browsing: &Browsing, columns: &Columns<'_>) {
    if browsing.results.is_empty() {
        println!("{}", dim("No results found."));
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec!["#", "ID", "Name"]);
        for (offset, doc) in (u64::from(browsing.from) + 1..).zip(&browsing.results) {
            table.add_row(vec![
                Cell::new(offset),
                Cell::new(Columns::pick(doc, columns.id_fields)),
                Cell::new(Columns::pick(doc, columns.name_fields)),
            ]);
        }
        println!("{table}");
    }

    println!(
        "{}",
        dim(&format!(
            "Showing {}-{} of {}",
            browsing.from.saturating_add(u32::from(!browsing.results.is_empty())),
            browsing.to,
            browsing.total
        ))
    );

    for facet in &browsing.facets {
        println!();
        print_facet(facet);
    }
}

/// Prints one facet's buckets.
fn print_facet(facet: &Facet) {
    println!("{}", header(&facet.label));
    if facet.values.is_empty() {
        println!("   {}", dim("(no values)"));
        return;
    }
    for value in &facet.values {
        if value.label == value.value {
            println!("   {} {}", value.label, dim(&format!("({})", value.count)));
        } else {
            println!(
                "   {} {} {}",
                value.label,
                dim(&format!("[{}]", value.value)),
                dim(&format!("({})", value.count))
            );
        }
    }
}
