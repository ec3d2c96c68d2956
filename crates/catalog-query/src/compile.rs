//! Query compiler.
//!
//! Compiles a [`FacetFilter`] into a [`StructuredQuery`]:
//!
//! - a phrase branch matching quoted phrases and the whole keyword,
//! - a fuzzy branch for the keyword or its long and short fragments,
//! - one clause per field filter, routed to `must` or `filter` by a [`FilterHook`].
//!
//! Keyword branches go into `should` with `minimum_should_match = 1`. A blank
//! keyword compiles to a match-all clause instead.

use crate::{
    ast::{Clause, DisMax, MatchExpr, StructuredQuery},
    filter::FacetFilter,
    hook::{ClauseClass, FilterHook, MustByDefault},
    keyword,
};

/// Relative scoring weights for each query branch.
pub mod boost {
    /// Boost and tie breaker of a dismax clause.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Weight {
        /// Score multiplier.
        pub boost: f32,
        /// Weight of non-maximal branches.
        pub tie_breaker: f32,
    }

    /// Phrase matches on quoted phrases and the whole keyword.
    pub const PHRASE: Weight = Weight {
        boost: 4.0,
        tie_breaker: 1.0,
    };
    /// Fuzzy match on a keyword without internal delimiters.
    pub const SINGLE_KEYWORD: Weight = Weight {
        boost: 1.0,
        tie_breaker: 0.5,
    };
    /// Fuzzy match on long keyword fragments.
    pub const LONG_KEYWORDS: Weight = Weight {
        boost: 1.0,
        tie_breaker: 0.2,
    };
    /// Fuzzy match on short keyword fragments.
    pub const SHORT_KEYWORDS: Weight = Weight {
        boost: 0.2,
        tie_breaker: 0.1,
    };
    /// Exact matches on field filter values.
    pub const FILTER: Weight = Weight {
        boost: 2.0,
        tie_breaker: 0.7,
    };
}

/// Compiles facet filters into structured queries.
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler<H = MustByDefault> {
    /// Decides where each filter clause goes.
    hook: H,
}

impl QueryCompiler<MustByDefault> {
    /// Creates a compiler that scores every filter clause.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: FilterHook> QueryCompiler<H> {
    /// Creates a compiler with a custom filter hook.
    pub fn with_hook(hook: H) -> Self {
        Self { hook }
    }

    /// Compiles a facet filter.
    pub fn compile(&self, filter: &FacetFilter) -> StructuredQuery {
        let mut query = StructuredQuery::default();

        let keyword = filter
            .effective_keyword()
            .map(|text| keyword_clauses(&filter.search_fields, text))
            .filter(|clauses| !clauses.is_empty());
        match keyword {
            Some(clauses) => {
                query.should = clauses;
                query.minimum_should_match = 1;
            }
            None => query.must.push(Clause::MatchAll),
        }

        for (key, values) in filter.filters.iter() {
            let clause = filter_clause(key, values);
            match self.hook.classify(key) {
                ClauseClass::Must => query.must.push(clause),
                ClauseClass::Filter => query.filter.push(clause),
            }
        }

        query
    }
}

/// Builds the `should` clauses for a non-blank keyword.
///
/// Branch groups that end up empty are left out.
fn keyword_clauses(fields: &[String], text: &str) -> Vec<Clause> {
    let parts = keyword::analyze(text);
    let mut clauses = Vec::with_capacity(3);

    let phrase_branches: Vec<MatchExpr> = fields
        .iter()
        .flat_map(|field| {
            parts.phrases.iter().map(move |phrase| MatchExpr::Phrase {
                field: field.clone(),
                text: phrase.clone(),
            })
        })
        .collect();
    let groups = [
        (phrase_branches, boost::PHRASE),
        (
            fuzzy_branches(fields, parts.single.as_slice()),
            boost::SINGLE_KEYWORD,
        ),
        (fuzzy_branches(fields, &parts.long), boost::LONG_KEYWORDS),
        (fuzzy_branches(fields, &parts.short), boost::SHORT_KEYWORDS),
    ];
    for (branches, weight) in groups {
        if !branches.is_empty() {
            clauses.push(dismax(branches, weight));
        }
    }

    clauses
}

/// Builds the clause for one field filter.
///
/// A single value is a plain boosted term; several values become a dismax.
fn filter_clause(key: &str, values: &[String]) -> Clause {
    let mut branches: Vec<MatchExpr> = values
        .iter()
        .map(|value| MatchExpr::Term {
            field: key.to_string(),
            value: value.clone(),
        })
        .collect();

    if branches.len() == 1 {
        if let Some(expr) = branches.pop() {
            return Clause::Match {
                expr,
                boost: boost::FILTER.boost,
            };
        }
    }
    dismax(branches, boost::FILTER)
}

/// Wraps branches in a dismax clause with the given weight.
fn dismax(branches: Vec<MatchExpr>, weight: boost::Weight) -> Clause {
    Clause::DisMax(DisMax::new(branches, weight.boost, weight.tie_breaker))
}

/// Expands every (field, keyword) pair into case-insensitive exact,
/// substring and camel-case variants.
fn fuzzy_branches(fields: &[String], keywords: &[String]) -> Vec<MatchExpr> {
    let mut branches = Vec::new();
    for field in fields {
        for keyword in keywords {
            let lower = keyword.to_lowercase();
            let upper = keyword.to_uppercase();
            let camel = camel_case(keyword);

            let variants = [
                MatchExpr::Match {
                    field: field.clone(),
                    text: lower.clone(),
                },
                MatchExpr::Match {
                    field: field.clone(),
                    text: upper.clone(),
                },
                MatchExpr::Substring {
                    field: field.clone(),
                    text: keyword.clone(),
                },
                MatchExpr::Substring {
                    field: field.clone(),
                    text: lower,
                },
                MatchExpr::Substring {
                    field: field.clone(),
                    text: upper,
                },
                MatchExpr::Match {
                    field: field.clone(),
                    text: camel.clone(),
                },
                MatchExpr::Substring {
                    field: field.clone(),
                    text: camel,
                },
            ];

            let start = branches.len();
            for variant in variants {
                if !branches[start..].contains(&variant) {
                    branches.push(variant);
                }
            }
        }
    }
    branches
}

/// Upper-cases the first character and lower-cases the rest.
fn camel_case(keyword: &str) -> String {
    let mut chars = keyword.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}
