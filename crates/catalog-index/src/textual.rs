//! Rendered query strings executed against the index.
//!
//! A rendered query is a conjunction of clauses joined by ` AND `. Each clause
//! is either one `field=value` atom or a group `( a OR b )` of atoms. Atoms
//! match as phrases on text fields and exactly on keyword fields; atoms on
//! fields the index does not have match nothing.

use catalog_query::{
    Clause, DisMax, MatchExpr, Page, StoreError, StructuredQuery, TextualQueryStore,
};
use tracing::debug;

use crate::TantivyStore;

/// Joins required clauses.
const AND: &str = " AND ";
/// Joins the atoms of a group.
const OR: &str = " OR ";
/// Opens a group.
const GROUP_OPEN: &str = "( ";
/// Closes a group.
const GROUP_CLOSE: &str = " )";

/// Parses a rendered query into a structured query.
///
/// Every clause is required. A group becomes a dismax whose branches all add
/// to the score. An empty string matches everything.
///
/// Operator words only count between atoms: `category=a ( b` is a single
/// atom, and so is `name=x AND y` since `y` does not start a new atom.
pub fn parse_textual(rendered: &str) -> StructuredQuery {
    let must: Vec<Clause> = split_clauses(rendered.trim(), AND)
        .into_iter()
        .map(parse_clause)
        .collect();
    if must.is_empty() {
        return StructuredQuery::match_all();
    }
    StructuredQuery {
        must,
        ..StructuredQuery::default()
    }
}

/// Parses one `AND` operand.
fn parse_clause(clause: &str) -> Clause {
    if let Some(inner) = clause
        .strip_prefix(GROUP_OPEN)
        .and_then(|rest| rest.strip_suffix(GROUP_CLOSE))
    {
        return Clause::DisMax(DisMax {
            branches: split_clauses(inner, OR).into_iter().map(atom).collect(),
            boost: 1.0,
            tie_breaker: 1.0,
        });
    }
    Clause::Match {
        expr: atom(clause),
        boost: 1.0,
    }
}

/// Splits on `separator` where the text after it starts a new clause.
///
/// Separators inside a value stay part of that value.
fn split_clauses<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut start = 0;
    for (at, _) in text.match_indices(separator) {
        let next = at + separator.len();
        if starts_clause(&text[next..]) {
            parts.push(&text[start..at]);
            start = next;
        }
    }
    parts.push(&text[start..]);
    parts
}

/// A group opening, or a `field=` prefix with a plain field name.
fn starts_clause(text: &str) -> bool {
    text.starts_with(GROUP_OPEN)
        || text.split_once('=').is_some_and(|(field, _)| {
            !field.is_empty()
                && !field.contains(|c: char| c.is_whitespace() || c == '(' || c == ')')
        })
}

/// Reads a `field=value` atom as a phrase; an atom without a field matches
/// nothing.
fn atom(text: &str) -> MatchExpr {
    let (field, value) = text.split_once('=').unwrap_or(("", text));
    MatchExpr::Phrase {
        field: field.to_string(),
        text: value.to_string(),
    }
}

impl TextualQueryStore for TantivyStore {
    fn execute(&self, query: &str, from: u32, quantity: u32) -> Result<Page, StoreError> {
        let structured = parse_textual(query);
        debug!(rendered = %query, clauses = structured.must.len(), "executing textual query");
        let translated = self.translate(&structured);
        let searcher = self.searcher()?;
        Ok(self.relevance_page(&searcher, &*translated, from, quantity)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrase(field: &str, text: &str) -> MatchExpr {
        MatchExpr::Phrase {
            field: field.into(),
            text: text.into(),
        }
    }

    fn single(field: &str, text: &str) -> Clause {
        Clause::Match {
            expr: phrase(field, text),
            boost: 1.0,
        }
    }

    #[test]
    fn groups_and_atoms() {
        let query = parse_textual("( name=cloud OR title=cloud ) AND category=compute");
        assert_eq!(query.must.len(), 2);
        let Clause::DisMax(group) = &query.must[0] else {
            panic!("expected a group: {query:?}");
        };
        assert_eq!(group.branches, [phrase("name", "cloud"), phrase("title", "cloud")]);
        assert_eq!(query.must[1], single("category", "compute"));
        assert!(query.should.is_empty());
    }

    #[test]
    fn values_keep_inner_spaces() {
        let query = parse_textual("category=Data Storage AND active=true");
        assert_eq!(
            query.must,
            [single("category", "Data Storage"), single("active", "true")]
        );
    }

    #[test]
    fn operator_words_inside_values() {
        assert_eq!(parse_textual("category=a ( b").must, [single("category", "a ( b")]);
        assert_eq!(
            parse_textual("name=x AND y AND active=true").must,
            [single("name", "x AND y"), single("active", "true")]
        );

        let query = parse_textual("( k=a OR b ) OR k=c )");
        let Clause::DisMax(group) = &query.must[0] else {
            panic!("expected a group: {query:?}");
        };
        assert_eq!(group.branches, [phrase("k", "a OR b )"), phrase("k", "c")]);
    }

    #[test]
    fn single_term_group() {
        let query = parse_textual("( name=open )");
        let Clause::DisMax(group) = &query.must[0] else {
            panic!("expected a group: {query:?}");
        };
        assert_eq!(group.branches, [phrase("name", "open")]);
    }

    #[test]
    fn atom_without_field_has_empty_field() {
        assert_eq!(parse_textual("orphan").must, [single("", "orphan")]);
    }

    #[test]
    fn empty_render_matches_everything() {
        assert!(parse_textual("").is_match_all());
        assert!(parse_textual("   ").is_match_all());
    }
}
