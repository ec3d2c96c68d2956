//! Textual query renderer.
//!
//! Renders a [`FacetFilter`] as a flat query string for backends that take
//! `field=value` expressions joined by `AND`/`OR` instead of a query tree:
//!
//! ```text
//! ( name=open OR title=open ) AND ( category=a OR category=b ) AND active=true
//! ```
//!
//! The keyword is split into words on whitespace and every search field is
//! paired with every word. There is no phrase or fuzzy handling.

use crate::filter::FacetFilter;

/// Joins alternatives in a clause.
const OR: &str = " OR ";
/// Joins clauses.
const AND: &str = " AND ";

/// Renders a facet filter as a textual query.
///
/// Returns an empty string when the filter has neither a keyword nor field
/// filters.
pub fn render(filter: &FacetFilter) -> String {
    let mut clauses = Vec::with_capacity(filter.filters.len() + 1);

    if let Some(keyword) = keyword_clause(filter) {
        clauses.push(keyword);
    }
    for (key, values) in filter.filters.iter() {
        clauses.push(filter_clause(key, values));
    }

    clauses.join(AND)
}

/// Renders the keyword disjunction, if the keyword has any words.
fn keyword_clause(filter: &FacetFilter) -> Option<String> {
    let keyword = filter.effective_keyword()?;
    let words: Vec<&str> = keyword.split_whitespace().collect();

    let terms: Vec<String> = filter
        .search_fields
        .iter()
        .flat_map(|field| words.iter().map(move |word| format!("{field}={word}")))
        .collect();
    if terms.is_empty() {
        return None;
    }
    Some(group(&terms))
}

/// Renders one field filter; a single value is left ungrouped.
fn filter_clause(key: &str, values: &[String]) -> String {
    let terms: Vec<String> = values.iter().map(|value| format!("{key}={value}")).collect();
    if terms.len() > 1 {
        group(&terms)
    } else {
        terms.concat()
    }
}

/// Wraps alternatives in spaced parentheses.
fn group(terms: &[String]) -> String {
    format!("( {} )", terms.join(OR))
}
