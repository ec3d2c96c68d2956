//! Filter normalization.
//!
//! Turns a raw parameter multimap into a [`FacetFilter`]. Reserved parameters
//! become keyword, paging and sort settings; every other parameter becomes a
//! field filter. Comma-separated values and repeated parameters are
//! interchangeable: `type=a,b` and `type=a&type=b` normalize identically.

use tracing::debug;

use crate::{
    QueryError,
    filter::{
        DEFAULT_QUANTITY, DEFAULT_SEARCH_FIELDS, FROM_PARAM, FacetFilter, ORDER_FIELD_PARAM,
        ORDER_PARAM, OrderBy, QUANTITY_PARAM, QUERY_PARAM, SEARCH_FIELDS_PARAM, SortDirection,
    },
    params::{FilterMap, Params},
};

/// Defaults applied when a request leaves a setting out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerSettings {
    /// Search fields used when `searchFields` is absent.
    pub default_search_fields: Vec<String>,
    /// Page size used when `quantity` is absent.
    pub default_quantity: u32,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            default_search_fields: DEFAULT_SEARCH_FIELDS.iter().map(|f| f.to_string()).collect(),
            default_quantity: DEFAULT_QUANTITY,
        }
    }
}

/// Parses request parameters into facet filters.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    /// Request defaults.
    settings: NormalizerSettings,
}

impl Normalizer {
    /// Creates a normalizer with the given defaults.
    pub fn new(settings: NormalizerSettings) -> Self {
        Self { settings }
    }

    /// Returns the defaults this normalizer applies.
    pub fn settings(&self) -> &NormalizerSettings {
        &self.settings
    }

    /// Normalizes a parameter map.
    ///
    /// Fails only when `from` or `quantity` is not an unsigned integer.
    pub fn normalize(&self, params: &Params) -> Result<FacetFilter, QueryError> {
        debug!(?params, "normalizing request parameters");
        let mut params = params.clone();

        let keyword = params.take_first(QUERY_PARAM);
        let from = take_paging(&mut params, FROM_PARAM)?.unwrap_or(0);
        let quantity =
            take_paging(&mut params, QUANTITY_PARAM)?.unwrap_or(self.settings.default_quantity);

        let direction = params.take_first(ORDER_PARAM);
        let order_by = params
            .take_first(ORDER_FIELD_PARAM)
            .filter(|field| !field.is_empty())
            .map(|field| OrderBy {
                field,
                direction: direction
                    .as_deref()
                    .map(SortDirection::parse_lenient)
                    .unwrap_or_default(),
            });

        let search_fields = params
            .take(SEARCH_FIELDS_PARAM)
            .map(|values| split_values(&values))
            .filter(|fields| !fields.is_empty())
            .unwrap_or_else(|| self.settings.default_search_fields.clone());

        let mut filters = FilterMap::new();
        for (key, values) in params.into_entries() {
            let values = split_values(&values);
            if !values.is_empty() {
                filters.insert(key, values);
            }
        }

        Ok(FacetFilter {
            keyword,
            search_fields,
            from,
            quantity,
            order_by,
            filters,
        })
    }
}

/// Removes a paging parameter and parses its first value.
fn take_paging(params: &mut Params, param: &'static str) -> Result<Option<u32>, QueryError> {
    let Some(value) = params.take_first(param) else {
        return Ok(None);
    };
    value
        .parse::<u32>()
        .map(Some)
        .map_err(|_| QueryError::MalformedPaging { param, value })
}

/// Splits every value on commas, trims fragments, and drops empty and
/// duplicate fragments while keeping first-seen order.
fn split_values(values: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for fragment in values.iter().flat_map(|v| v.split(',')) {
        let fragment = fragment.trim();
        if !fragment.is_empty() && !result.iter().any(|existing| existing == fragment) {
            result.push(fragment.to_string());
        }
    }
    result
}
