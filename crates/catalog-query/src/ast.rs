//! Structured query tree.
//!
//! The compiler's output: an explicit boolean query over leaf match
//! expressions. It carries no search-engine types; store adapters translate
//! it into whatever their engine expects.

use std::fmt;

use serde::Serialize;

/// A leaf match against one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchExpr {
    /// Adjacent-token phrase match.
    Phrase {
        /// Field to match.
        field: String,
        /// Phrase text.
        text: String,
    },
    /// Analyzed full-text match.
    Match {
        /// Field to match.
        field: String,
        /// Text to analyze and match.
        text: String,
    },
    /// Substring match against indexed terms (`*text*`).
    Substring {
        /// Field to match.
        field: String,
        /// Substring to look for.
        text: String,
    },
    /// Exact, unanalyzed term match.
    Term {
        /// Field to match.
        field: String,
        /// Exact value.
        value: String,
    },
}

impl MatchExpr {
    /// Returns the field this expression targets.
    pub fn field(&self) -> &str {
        match self {
            Self::Phrase { field, .. }
            | Self::Match { field, .. }
            | Self::Substring { field, .. }
            | Self::Term { field, .. } => field,
        }
    }
}

impl fmt::Display for MatchExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phrase { field, text } => write!(f, "Phrase({field}: {text:?})"),
            Self::Match { field, text } => write!(f, "Match({field}: {text:?})"),
            Self::Substring { field, text } => write!(f, "Substring({field}: *{text}*)"),
            Self::Term { field, value } => write!(f, "Term({field} = {value:?})"),
        }
    }
}

/// Disjunction-max over match expressions.
///
/// A document scores the best branch it matches plus `tie_breaker` times the
/// scores of its other matching branches, multiplied by `boost`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisMax {
    /// Alternative match expressions.
    pub branches: Vec<MatchExpr>,
    /// Score multiplier; always positive.
    pub boost: f32,
    /// Weight of non-maximal branches; within `0.0..=1.0`.
    pub tie_breaker: f32,
}

impl DisMax {
    /// Creates a dismax clause.
    pub fn new(branches: Vec<MatchExpr>, boost: f32, tie_breaker: f32) -> Self {
        debug_assert!(boost > 0.0, "dismax boost must be positive");
        debug_assert!(
            (0.0..=1.0).contains(&tie_breaker),
            "dismax tie breaker must be within 0..=1"
        );
        Self {
            branches,
            boost,
            tie_breaker,
        }
    }
}

/// A clause inside a boolean group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Clause {
    /// Accepts every document with a neutral score.
    MatchAll,
    /// Disjunction-max over several expressions.
    DisMax(DisMax),
    /// A single boosted expression.
    Match {
        /// The expression.
        expr: MatchExpr,
        /// Score multiplier.
        boost: f32,
    },
}

impl Clause {
    /// Returns the dismax payload, if this clause is one.
    fn dismax(&self) -> Option<&DisMax> {
        match self {
            Self::DisMax(dismax) => Some(dismax),
            _ => None,
        }
    }
}

/// Boolean query produced by the compiler.
///
/// - `must`: every clause must match; contributes to the score.
/// - `should`: at least `minimum_should_match` clauses must match; contributes to the score.
/// - `filter`: every clause must match; never contributes to the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuredQuery {
    /// Required, scoring clauses.
    pub must: Vec<Clause>,
    /// Optional, scoring clauses.
    pub should: Vec<Clause>,
    /// Required, non-scoring clauses.
    pub filter: Vec<Clause>,
    /// Number of `should` clauses a document has to satisfy.
    pub minimum_should_match: u32,
}

impl StructuredQuery {
    /// A query accepting every document.
    pub fn match_all() -> Self {
        Self {
            must: vec![Clause::MatchAll],
            ..Self::default()
        }
    }

    /// Returns true if the query accepts every document unconditionally.
    pub fn is_match_all(&self) -> bool {
        self.should.is_empty()
            && self.filter.is_empty()
            && self.must.iter().all(|c| matches!(c, Clause::MatchAll))
    }

    /// Iterates over every dismax clause in the query.
    pub fn dismax_clauses(&self) -> impl Iterator<Item = &DisMax> {
        self.must
            .iter()
            .chain(&self.should)
            .chain(&self.filter)
            .filter_map(Clause::dismax)
    }

    /// Formats one clause at the given indentation.
    fn fmt_clause(f: &mut fmt::Formatter<'_>, clause: &Clause, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match clause {
            Clause::MatchAll => writeln!(f, "{prefix}MatchAll"),
            Clause::Match { expr, boost } => writeln!(f, "{prefix}{expr}^{boost}"),
            Clause::DisMax(dismax) => {
                writeln!(
                    f,
                    "{prefix}DisMax(boost={}, tie_breaker={})",
                    dismax.boost, dismax.tie_breaker
                )?;
                for branch in &dismax.branches {
                    writeln!(f, "{prefix}  {branch}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for StructuredQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bool")?;
        for (name, clauses) in [
            ("Must", &self.must),
            ("Should", &self.should),
            ("Filter", &self.filter),
        ] {
            if clauses.is_empty() {
                continue;
            }
            if name == "Should" {
                writeln!(f, "  Should(minimum_should_match={})", self.minimum_should_match)?;
            } else {
                writeln!(f, "  {name}")?;
            }
            for clause in clauses {
                Self::fmt_clause(f, clause, 2)?;
            }
        }
        Ok(())
    }
}
