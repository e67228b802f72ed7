//! Catalog filter state and the filter/sort/paginate pipeline.
//!
//! Everything here is pure: `compute_view` never touches the network and
//! never mutates the listings it is given, it only borrows them in a new order.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{models::MotoListing, pagination::PaginationState};

// Transmission vocabulary offered as chips (upstream has no endpoint for it)
pub const TRANSMISSION_TYPES: [&str; 3] = ["Mecánica", "Automática", "Semiautomática"];

// Max suggestions returned by the search box
pub const SEARCH_SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortOrder {
    #[default]
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
        }
    }

    // Unknown values fall back to the default order
    pub fn from_param(value: &str) -> Self {
        match value.trim() {
            "price_desc" => SortOrder::PriceDesc,
            _ => SortOrder::PriceAsc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PreOwnedTab {
    #[default]
    All,
    New,
    UsedOnly,
}

impl PreOwnedTab {
    pub fn as_param(&self) -> &'static str {
        match self {
            PreOwnedTab::All => "all",
            PreOwnedTab::New => "new",
            PreOwnedTab::UsedOnly => "used",
        }
    }

    pub fn from_param(value: &str) -> Self {
        match value.trim() {
            "new" => PreOwnedTab::New,
            "used" => PreOwnedTab::UsedOnly,
            _ => PreOwnedTab::All,
        }
    }

    fn admits(&self, is_pre_owned: bool) -> bool {
        match self {
            PreOwnedTab::All => true,
            PreOwnedTab::New => !is_pre_owned,
            PreOwnedTab::UsedOnly => is_pre_owned,
        }
    }
}

/// Inclusive numeric bounds. `min <= max` is not enforced: an inverted range
/// simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether `value` lies within the bounds.
    ///
    /// An unknown value (`None`) passes an unbounded range and fails any
    /// bounded one.
    pub fn admits(&self, value: Option<f64>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(value) = value else {
            return false;
        };
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

// Exactly three digits, then the end of the number
fn is_digit_group(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    bytes.len() >= 3 && bytes[..3].iter().all(u8::is_ascii_digit) && !bytes.get(3).is_some_and(u8::is_ascii_digit)
}

/// Reads the number a free-text field starts with, e.g. `"149.5 cc"` → 149.5.
///
/// Leading whitespace and an optional sign are accepted. A comma is read as a
/// thousands separator only when exactly three digits follow it
/// (`"1,200cc"` → 1200); any other comma ends the number (`"149,5"` → 149).
/// Returns `None` when the text doesn't start with a number.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let mut digits = String::new();
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (i, ch) in text.char_indices() {
        match ch {
            '+' | '-' if i == 0 => digits.push(ch),
            '0'..='9' => {
                seen_digit = true;
                digits.push(ch);
            }
            '.' if !seen_dot => {
                seen_dot = true;
                digits.push(ch);
            }
            ',' if seen_digit && !seen_dot && is_digit_group(&text[i + 1..]) => continue,
            _ => break,
        }
    }

    if !seen_digit {
        return None;
    }
    digits.trim_end_matches('.').parse::<f64>().ok()
}

/// Declarative description of what the shopper wants to see.
///
/// Empty sets and unbounded ranges mean "no filter on that dimension".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    pub sort_order: SortOrder,
    pub price: NumericRange,
    pub displacement: NumericRange,
    pub performance: NumericRange,
    pub brands: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub transmissions: BTreeSet<String>,
    pub pre_owned_tab: PreOwnedTab,
    // Case-insensitive model name search
    pub search: Option<String>,
}

// Adds the value when absent, removes it when present
fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

impl FilterState {
    pub fn toggle_brand(&mut self, brand: &str) {
        toggle(&mut self.brands, brand);
    }

    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.categories, category);
    }

    pub fn toggle_transmission(&mut self, transmission: &str) {
        toggle(&mut self.transmissions, transmission);
    }

    // Back to defaults: no filters, cheapest first
    pub fn clear(&mut self) {
        *self = FilterState::default();
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn has_active_filters(&self) -> bool {
        !self.brands.is_empty()
            || !self.categories.is_empty()
            || !self.transmissions.is_empty()
            || !self.price.is_unbounded()
            || !self.displacement.is_unbounded()
            || !self.performance.is_unbounded()
            || self.pre_owned_tab != PreOwnedTab::All
            || self.search_term().is_some()
            || self.sort_order != SortOrder::default()
    }

    /// Runs every predicate against one listing; all of them must pass.
    pub fn matches(&self, moto: &MotoListing) -> bool {
        let in_set = |set: &BTreeSet<String>, value: &str| set.is_empty() || set.contains(value);

        in_set(&self.brands, &moto.brand)
            && in_set(&self.categories, &moto.category)
            && in_set(&self.transmissions, &moto.transmission)
            && self.pre_owned_tab.admits(moto.is_pre_owned)
            && self.price.admits(Some(moto.effective_price()))
            && self.displacement.admits(parse_leading_number(&moto.displacement))
            && self.performance.admits(parse_leading_number(&moto.performance))
            && self
                .search_term()
                .is_none_or(|q| moto.model.to_lowercase().contains(&q.to_lowercase()))
    }
}

/// Visible page of the catalog plus the numbers needed to render around it.
#[derive(Debug, Clone)]
pub struct CatalogView<'a> {
    pub visible: Vec<&'a MotoListing>,
    // Listings passing the filters, before pagination
    pub total_count: usize,
    pub pagination: PaginationState,
}

/// Filters, sorts by effective price and paginates `listings`.
///
/// The sort is stable, so listings with the same price keep their upstream
/// order. A `page` beyond the last page (or 0) yields page 1.
pub fn compute_view<'a>(
    listings: &'a [MotoListing],
    filters: &FilterState,
    page: usize,
    items_per_page: usize,
) -> CatalogView<'a> {
    let mut filtered: Vec<&MotoListing> = listings.iter().filter(|moto| filters.matches(moto)).collect();

    match filters.sort_order {
        SortOrder::PriceAsc => {
            filtered.sort_by(|a, b| a.effective_price().total_cmp(&b.effective_price()))
        }
        SortOrder::PriceDesc => {
            filtered.sort_by(|a, b| b.effective_price().total_cmp(&a.effective_price()))
        }
    }

    let total_count = filtered.len();
    let pagination = PaginationState::new(total_count, items_per_page, page);
    let (start, end) = pagination.slice_bounds(total_count);
    tracing::debug!(
        total = listings.len(),
        matched = total_count,
        page = pagination.current_page,
        total_pages = pagination.total_pages,
        "Computed catalog view"
    );

    let visible = filtered[start..end].to_vec();
    CatalogView {
        visible,
        total_count,
        pagination,
    }
}

/// Listings whose model name contains `query` (case-insensitive), in
/// upstream order, capped at `limit`. An empty query yields nothing.
pub fn search_models<'a>(listings: &'a [MotoListing], query: &str, limit: usize) -> Vec<&'a MotoListing> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    listings
        .iter()
        .filter(|moto| moto.model.to_lowercase().contains(&query))
        .take(limit)
        .collect()
}
