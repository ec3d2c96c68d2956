//! The canonical facet filter produced by normalization.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::params::FilterMap;

/// Parameter carrying the free-text keyword.
pub const QUERY_PARAM: &str = "query";
/// Parameter carrying the paging offset.
pub const FROM_PARAM: &str = "from";
/// Parameter carrying the page size.
pub const QUANTITY_PARAM: &str = "quantity";
/// Parameter carrying the sort direction.
pub const ORDER_PARAM: &str = "order";
/// Parameter carrying the sort field.
pub const ORDER_FIELD_PARAM: &str = "orderField";
/// Parameter overriding the fields the keyword is matched against.
pub const SEARCH_FIELDS_PARAM: &str = "searchFields";

/// Every parameter name that is never treated as a field filter.
pub const RESERVED_PARAMS: [&str; 6] = [
    QUERY_PARAM,
    FROM_PARAM,
    QUANTITY_PARAM,
    ORDER_PARAM,
    ORDER_FIELD_PARAM,
    SEARCH_FIELDS_PARAM,
];

/// Fields the keyword is matched against when the request names none.
pub const DEFAULT_SEARCH_FIELDS: [&str; 3] = ["resource_internal_id", "name", "title"];

/// Page size used when the request does not specify `quantity`.
pub const DEFAULT_QUANTITY: u32 = 10;

/// Sort direction for an ordered listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Parses a direction leniently: anything other than `desc` is ascending.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// A single sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    /// Field to sort on.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

/// A normalized browse request.
///
/// Created once per request by the normalizer and read by the compiler and
/// the textual renderer. `filters` never contains a reserved parameter and
/// never holds an empty value list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetFilter {
    /// Raw free-text keyword.
    pub keyword: Option<String>,
    /// Fields the keyword is matched against.
    pub search_fields: Vec<String>,
    /// Offset of the first result.
    pub from: u32,
    /// Maximum number of results.
    pub quantity: u32,
    /// Optional sort key; relevance order when absent.
    pub order_by: Option<OrderBy>,
    /// Field filters in insertion order.
    pub filters: FilterMap,
}

impl Default for FacetFilter {
    fn default() -> Self {
        Self {
            keyword: None,
            search_fields: DEFAULT_SEARCH_FIELDS.iter().map(|f| f.to_string()).collect(),
            from: 0,
            quantity: DEFAULT_QUANTITY,
            order_by: None,
            filters: FilterMap::new(),
        }
    }
}

impl FacetFilter {
    /// Returns the keyword if it contains anything besides whitespace.
    pub fn effective_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .filter(|keyword| !keyword.trim().is_empty())
    }

    /// Sets the keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Replaces the search fields.
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a field filter.
    pub fn with_filter<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters
            .insert(key, values.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_direction_parsing() {
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("sideways".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::parse_lenient("sideways"), SortDirection::Asc);
    }

    #[test]
    fn default_filter() {
        let filter = FacetFilter::default();
        assert_eq!(filter.search_fields, ["resource_internal_id", "name", "title"]);
        assert_eq!(filter.from, 0);
        assert_eq!(filter.quantity, 10);
        assert!(filter.order_by.is_none());
        assert!(filter.filters.is_empty());
    }

    #[test]
    fn blank_keyword_is_not_effective() {
        let filter = FacetFilter::default().with_keyword("   ");
        assert_eq!(filter.effective_keyword(), None);
        let filter = FacetFilter::default().with_keyword(" rust ");
        assert_eq!(filter.effective_keyword(), Some(" rust "));
    }
}
