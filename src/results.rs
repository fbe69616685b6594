/// Listings captured from one rendered results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// URL the session was on when the page was read
    pub url: String,

    /// 1-based page number reported by the pagination widget
    pub ordinal: u32,

    /// Listing links in document order
    pub links: Vec<String>,
}

impl PageResult {
    /// Create a new page result instance
    pub fn new(url: String, ordinal: u32, links: Vec<String>) -> Self {
        Self {
            url,
            ordinal,
            links,
        }
    }
}

/// Flattens page results into one link list, keeping page then document order.
pub fn flatten(pages: Vec<PageResult>) -> Vec<String> {
    pages.into_iter().flat_map(|page| page.links).collect()
}
