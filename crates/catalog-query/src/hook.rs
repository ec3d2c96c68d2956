//! Per-deployment routing of filter keys to scoring or gating clauses.
//!
//! Gating fields such as an `active` flag should decide inclusion without
//! affecting ranking, while descriptive fields such as a category should rank
//! matching documents higher. A [`FilterHook`] makes that call per key.

use std::collections::BTreeSet;

/// Where a filter clause is placed in the boolean query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClauseClass {
    /// Required and scoring.
    #[default]
    Must,
    /// Required and non-scoring.
    Filter,
}

/// Decides the clause class for each filter key.
pub trait FilterHook {
    /// Classifies the filter on `key`.
    fn classify(&self, key: &str) -> ClauseClass;
}

impl<F> FilterHook for F
where
    F: Fn(&str) -> ClauseClass,
{
    fn classify(&self, key: &str) -> ClauseClass {
        self(key)
    }
}

/// Routes every filter key to a scoring clause.
#[derive(Debug, Clone, Copy, Default)]
pub struct MustByDefault;

impl FilterHook for MustByDefault {
    fn classify(&self, _key: &str) -> ClauseClass {
        ClauseClass::Must
    }
}

/// Routes a fixed set of keys to non-scoring clauses and everything else to
/// scoring clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterKeys {
    /// Keys classified as [`ClauseClass::Filter`].
    keys: BTreeSet<String>,
}

impl FilterKeys {
    /// Creates a hook gating on the given keys.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl FilterHook for FilterKeys {
    fn classify(&self, key: &str) -> ClauseClass {
        if self.keys.contains(key) {
            ClauseClass::Filter
        } else {
            ClauseClass::Must
        }
    }
}
