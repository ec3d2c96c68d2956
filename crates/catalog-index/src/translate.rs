//! Translation of structured queries into Tantivy queries.
//!
//! This is the only place that knows both the structured query model and the
//! engine. Leaves are resolved against the index schema: text fields are
//! analyzed, keyword fields are matched verbatim, and fields the index does
//! not have match nothing.

use catalog_query::{Clause, DisMax, MatchExpr, StructuredQuery};
use tantivy::{
    Term,
    query::{
        AllQuery, BooleanQuery, BoostQuery, ConstScoreQuery, DisjunctionMaxQuery, EmptyQuery,
        Occur, PhraseQuery, Query, RegexQuery, TermQuery,
    },
    schema::{Field, IndexRecordOption},
    tokenizer::TextAnalyzer,
};
use tracing::{debug, trace};

use crate::{
    analyzer::analyze,
    schema::{CatalogSchema, FieldKind},
};

/// Characters with a meaning in Tantivy's regex syntax.
const REGEX_META: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$', '#', '&', '-', '~',
];

/// Translates structured queries against one schema.
pub struct QueryTranslator<'a> {
    /// Schema used to resolve field names.
    schema: &'a CatalogSchema,
    /// Analyzer applied to text-field query input.
    analyzer: TextAnalyzer,
}

impl<'a> QueryTranslator<'a> {
    /// Creates a translator for `schema`, analyzing text with `analyzer`.
    pub fn new(schema: &'a CatalogSchema, analyzer: TextAnalyzer) -> Self {
        Self { schema, analyzer }
    }

    /// Translates a whole boolean query.
    ///
    /// `must` clauses are required and scored. `filter` clauses are required
    /// and contribute a constant zero. The `should` group is wrapped in one
    /// required boolean clause when `minimum_should_match` is at least one,
    /// otherwise its clauses only add to the score.
    pub fn translate(&mut self, query: &StructuredQuery) -> Box<dyn Query> {
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        for clause in &query.must {
            clauses.push((Occur::Must, self.clause(clause)));
        }
        for clause in &query.filter {
            let gated = ConstScoreQuery::new(self.clause(clause), 0.0);
            clauses.push((Occur::Must, Box::new(gated)));
        }

        if !query.should.is_empty() {
            let group: Vec<(Occur, Box<dyn Query>)> = query
                .should
                .iter()
                .map(|clause| (Occur::Should, self.clause(clause)))
                .collect();
            if query.minimum_should_match >= 1 {
                if query.minimum_should_match > 1 {
                    debug!(
                        minimum_should_match = query.minimum_should_match,
                        "treating minimum_should_match above one as one"
                    );
                }
                clauses.push((Occur::Must, Box::new(BooleanQuery::new(group))));
            } else {
                clauses.extend(group);
            }
        }

        if !clauses.iter().any(|(occur, _)| *occur == Occur::Must) {
            clauses.push((Occur::Must, Box::new(AllQuery)));
        }
        if clauses.len() == 1
            && let Some((_, only)) = clauses.pop()
        {
            return only;
        }
        Box::new(BooleanQuery::new(clauses))
    }

    /// Translates one clause.
    fn clause(&mut self, clause: &Clause) -> Box<dyn Query> {
        match clause {
            Clause::MatchAll => Box::new(AllQuery),
            Clause::Match { expr, boost } => Box::new(BoostQuery::new(self.expr(expr), *boost)),
            Clause::DisMax(dismax) => self.dismax(dismax),
        }
    }

    /// Translates a dismax clause, boost applied outside the disjunction.
    fn dismax(&mut self, dismax: &DisMax) -> Box<dyn Query> {
        let branches: Vec<Box<dyn Query>> =
            dismax.branches.iter().map(|expr| self.expr(expr)).collect();
        let inner = DisjunctionMaxQuery::with_tie_breaker(branches, dismax.tie_breaker);
        Box::new(BoostQuery::new(Box::new(inner), dismax.boost))
    }

    /// Translates a leaf expression.
    fn expr(&mut self, expr: &MatchExpr) -> Box<dyn Query> {
        let Some((field, kind)) = self.schema.field(expr.field()) else {
            trace!(field = expr.field(), "field not indexed; matches nothing");
            return Box::new(EmptyQuery);
        };

        match (expr, kind) {
            (MatchExpr::Phrase { text, .. }, FieldKind::Text) => self.phrase(field, text),
            (MatchExpr::Match { text, .. }, FieldKind::Text) => self.analyzed(field, text),
            (MatchExpr::Substring { text, .. }, _) => substring(field, text),
            (MatchExpr::Phrase { text, .. } | MatchExpr::Match { text, .. }, FieldKind::Keyword)
            | (MatchExpr::Term { value: text, .. }, _) => exact(field, kind, text),
        }
    }

    /// Adjacent-token match; a single token degrades to a term query.
    fn phrase(&mut self, field: Field, text: &str) -> Box<dyn Query> {
        let mut terms: Vec<Term> = analyze(&mut self.analyzer, text)
            .iter()
            .map(|token| Term::from_field_text(field, token))
            .collect();
        match terms.len() {
            0 => Box::new(EmptyQuery),
            1 => match terms.pop() {
                Some(term) => Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)),
                None => Box::new(EmptyQuery),
            },
            _ => Box::new(PhraseQuery::new(terms)),
        }
    }

    /// Analyzed match: any of the text's tokens.
    fn analyzed(&mut self, field: Field, text: &str) -> Box<dyn Query> {
        let mut terms: Vec<Box<dyn Query>> = analyze(&mut self.analyzer, text)
            .iter()
            .map(|token| -> Box<dyn Query> {
                Box::new(TermQuery::new(
                    Term::from_field_text(field, token),
                    IndexRecordOption::WithFreqs,
                ))
            })
            .collect();
        match terms.len() {
            0 => Box::new(EmptyQuery),
            1 => terms.pop().unwrap_or_else(|| Box::new(EmptyQuery)),
            _ => Box::new(BooleanQuery::new(
                terms.into_iter().map(|q| (Occur::Should, q)).collect(),
            )),
        }
    }
}

/// Exact term match on the raw value.
fn exact(field: Field, kind: FieldKind, value: &str) -> Box<dyn Query> {
    let record = match kind {
        FieldKind::Text => IndexRecordOption::WithFreqs,
        FieldKind::Keyword => IndexRecordOption::Basic,
    };
    Box::new(TermQuery::new(Term::from_field_text(field, value), record))
}

/// Matches indexed terms containing `text`.
fn substring(field: Field, text: &str) -> Box<dyn Query> {
    let pattern = format!(".*{}.*", escape_regex(text));
    match RegexQuery::from_pattern(&pattern, field) {
        Ok(query) => Box::new(query),
        Err(err) => {
            debug!(%err, %pattern, "substring pattern rejected; matches nothing");
            Box::new(EmptyQuery)
        }
    }
}

/// Escapes regex metacharacters in `text`.
fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if REGEX_META.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
