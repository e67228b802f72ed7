// Query-string form of the catalog filters, shared by the HTML page and the JSON API

use reqwest::Url;
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::filters::{FilterState, NumericRange, PreOwnedTab, SortOrder};

pub const CATALOG_PATH: &str = "/motos";

// Only used to borrow Url's query encoder, never rendered
const LINK_BASE: &str = "http://catalog.local";

// Everything arrives as text; malformed values are ignored rather than rejected
#[derive(Debug, Default, Deserialize, Clone)]
pub struct CatalogQuery {
    pub sort: Option<String>,
    // Comma-separated chip values
    pub brands: Option<String>,
    pub categories: Option<String>,
    pub transmissions: Option<String>,
    pub tab: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub cc_min: Option<String>,
    pub cc_max: Option<String>,
    pub perf_min: Option<String>,
    pub perf_max: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
    pub dealer: Option<String>,
}

fn parse_bound(raw: Option<&String>) -> Option<f64> {
    raw.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_list(raw: Option<&String>) -> BTreeSet<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

fn non_empty(raw: Option<&String>) -> Option<&str> {
    raw.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl CatalogQuery {
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            sort_order: self.sort.as_deref().map(SortOrder::from_param).unwrap_or_default(),
            price: NumericRange::new(parse_bound(self.price_min.as_ref()), parse_bound(self.price_max.as_ref())),
            displacement: NumericRange::new(parse_bound(self.cc_min.as_ref()), parse_bound(self.cc_max.as_ref())),
            performance: NumericRange::new(
                parse_bound(self.perf_min.as_ref()),
                parse_bound(self.perf_max.as_ref()),
            ),
            brands: parse_list(self.brands.as_ref()),
            categories: parse_list(self.categories.as_ref()),
            transmissions: parse_list(self.transmissions.as_ref()),
            pre_owned_tab: self.tab.as_deref().map(PreOwnedTab::from_param).unwrap_or_default(),
            search: non_empty(self.q.as_ref()).map(String::from),
        }
    }

    // Requested page, 1 when missing or not a number
    pub fn page(&self) -> usize {
        non_empty(self.page.as_ref())
            .and_then(|p| p.parse::<usize>().ok())
            .unwrap_or(1)
    }

    pub fn dealer(&self) -> Option<&str> {
        non_empty(self.dealer.as_ref())
    }
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Query parameters describing `filters`, `page` and `dealer`, defaults omitted.
///
/// Parsing the result back through `CatalogQuery` yields the same state.
pub fn query_pairs(filters: &FilterState, page: usize, dealer: Option<&str>) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if filters.sort_order != SortOrder::default() {
        pairs.push(("sort", filters.sort_order.as_param().to_string()));
    }
    for (key, set) in [
        ("brands", &filters.brands),
        ("categories", &filters.categories),
        ("transmissions", &filters.transmissions),
    ] {
        if !set.is_empty() {
            pairs.push((key, join(set)));
        }
    }
    if filters.pre_owned_tab != PreOwnedTab::All {
        pairs.push(("tab", filters.pre_owned_tab.as_param().to_string()));
    }
    for (key, bound) in [
        ("price_min", filters.price.min),
        ("price_max", filters.price.max),
        ("cc_min", filters.displacement.min),
        ("cc_max", filters.displacement.max),
        ("perf_min", filters.performance.min),
        ("perf_max", filters.performance.max),
    ] {
        if let Some(value) = bound {
            pairs.push((key, value.to_string()));
        }
    }
    if let Some(q) = filters.search_term() {
        pairs.push(("q", q.to_string()));
    }
    if let Some(dealer) = dealer {
        pairs.push(("dealer", dealer.to_string()));
    }
    if page > 1 {
        pairs.push(("page", page.to_string()));
    }
    pairs
}

/// Relative link to the catalog page showing `filters` at `page`.
pub fn catalog_href(filters: &FilterState, page: usize, dealer: Option<&str>) -> String {
    let pairs = query_pairs(filters, page, dealer);
    if pairs.is_empty() {
        return CATALOG_PATH.to_string();
    }

    let Ok(mut url) = Url::parse(LINK_BASE) else {
        return CATALOG_PATH.to_string();
    };
    url.query_pairs_mut().extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
    match url.query() {
        Some(query) if !query.is_empty() => format!("{CATALOG_PATH}?{query}"),
        _ => CATALOG_PATH.to_string(),
    }
}

/// Path of a listing's detail page, the code percent-encoded as a single segment.
pub fn detail_path(code: &str) -> String {
    let Ok(mut url) = Url::parse(LINK_BASE) else {
        return CATALOG_PATH.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .clear()
            .extend(CATALOG_PATH.split('/').filter(|s| !s.is_empty()))
            .push(code);
    }
    url.path().to_string()
}
