//! Implementation of `catalog explain`.

use std::process::ExitCode;

use catalog_query::{FacetFilter, StructuredQuery, render};
use serde::Serialize;

use crate::cli::{
    args::ExplainCommand,
    commands::normalize_request,
    context::CommandContext,
    output::{dim, header, print_json},
};

/// JSON output for `explain`.
#[derive(Serialize)]
struct Explanation<'a> {
    /// The normalized filter.
    filter: &'a FacetFilter,
    /// The compiled structured query.
    structured: &'a StructuredQuery,
    /// The rendered textual query.
    textual: &'a str,
}

/// Shows how a request is normalized, compiled and rendered.
pub fn run(ctx: &CommandContext, cmd: &ExplainCommand) -> ExitCode {
    let filter = match normalize_request(ctx, &cmd.request) {
        Ok(filter) => filter,
        Err(code) => return code,
    };
    let structured = ctx.compiler().compile(&filter);
    let textual = render(&filter);

    if cmd.output.json {
        return print_json(&Explanation {
            filter: &filter,
            structured: &structured,
            textual: &textual,
        });
    }

    println!("{}", header("Filter"));
    match filter.effective_keyword() {
        Some(keyword) => println!("   keyword: {keyword}"),
        None => println!("   keyword: {}", dim("(none)")),
    }
    println!("   search fields: {}", filter.search_fields.join(", "));
    println!("   page: from {} quantity {}", filter.from, filter.quantity);
    if let Some(order) = &filter.order_by {
        println!("   order: {} {}", order.field, order.direction);
    }
    for (key, values) in filter.filters.iter() {
        println!("   {key} = {}", values.join(" | "));
    }
    println!();

    println!("{}", header("Structured query"));
    print!("{structured}");
    println!();

    println!("{}", header("Textual query"));
    if textual.is_empty() {
        println!("   {}", dim("(empty)"));
    } else {
        println!("   {textual}");
    }

    ExitCode::SUCCESS
}
