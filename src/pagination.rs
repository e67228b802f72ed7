// Pagination metadata derived from a filtered result size

use serde::Serialize;

// Numbered page buttons shown at once
const WINDOW_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub current_page: usize,
    pub items_per_page: usize,
    pub total_pages: usize,
}

// One entry of the pagination bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

impl PaginationState {
    /// Derives the page count for `total_items` and clamps `requested_page`.
    ///
    /// A requested page past the last page (or page 0) falls back to page 1.
    pub fn new(total_items: usize, items_per_page: usize, requested_page: usize) -> Self {
        let items_per_page = items_per_page.max(1);
        let total_pages = total_items.div_ceil(items_per_page);
        let current_page = if requested_page == 0 || requested_page > total_pages {
            1
        } else {
            requested_page
        };
        Self {
            current_page,
            items_per_page,
            total_pages,
        }
    }

    // Index range of the current page within the full sorted list
    pub fn slice_bounds(&self, total_items: usize) -> (usize, usize) {
        let start = ((self.current_page - 1) * self.items_per_page).min(total_items);
        let end = (start + self.items_per_page).min(total_items);
        (start, end)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Numbered pages around the current one, at most five, with shortcuts to
    /// the first and last page and ellipses for gaps.
    ///
    /// Empty when there is at most one page, since the bar is hidden then.
    pub fn window(&self) -> Vec<PageLink> {
        if self.total_pages <= 1 {
            return Vec::new();
        }

        let current = self.current_page;
        let total = self.total_pages;
        let mut start = current.saturating_sub(2).max(1);
        let mut end = (current + 2).min(total);

        // Keep five buttons visible near either end
        if current <= 3 {
            end = WINDOW_SIZE.min(total);
        } else if current + 2 >= total {
            start = total.saturating_sub(WINDOW_SIZE - 1).max(1);
        }

        let mut links = Vec::with_capacity(WINDOW_SIZE + 4);
        if start > 1 {
            links.push(PageLink::Page(1));
            if start > 2 {
                links.push(PageLink::Ellipsis);
            }
        }
        links.extend((start..=end).map(PageLink::Page));
        if end < total {
            if end + 1 < total {
                links.push(PageLink::Ellipsis);
            }
            links.push(PageLink::Page(total));
        }
        links
    }
}
