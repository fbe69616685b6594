use crate::config::{CrawlConfig, PageMarkup};
use crate::crawlers::session::BrowsingSession;
use crate::error::SessionError;
use crate::parsers::Projection;
use crate::results::{self, PageResult};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

/// What reading one results page produced
#[derive(Debug)]
pub enum PageOutcome {
    /// Listings were found; the walk continues at `next_url`
    Listings { page: PageResult, next_url: String },
    /// The page carries no listing markup: the normal end of the results
    Exhausted,
    /// The page could not be read; treated as the end of the results
    Failed(SessionError),
}

/// Walks every results page of one paginated listing.
///
/// Pages are read strictly one after another through a single session. The
/// walk never fails: the first page that cannot be read ends it, and only the
/// pages read before that are returned.
#[derive(Debug, Clone)]
pub struct PageWalker {
    markup: PageMarkup,
    max_pages: Option<usize>,
    page_timeout: Duration,
}

impl Default for PageWalker {
    fn default() -> Self {
        Self::new(PageMarkup::default())
    }
}

impl PageWalker {
    pub fn new(markup: PageMarkup) -> Self {
        Self {
            markup,
            max_pages: None,
            page_timeout: Duration::from_secs(45),
        }
    }

    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(config.markup.clone())
            .with_max_pages(config.max_pages)
            .with_page_timeout(Duration::from_secs(config.page_timeout_secs))
    }

    /// Stop after this many pages have been read
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Upper bound for each navigation and each page read
    pub fn with_page_timeout(mut self, page_timeout: Duration) -> Self {
        self.page_timeout = page_timeout;
        self
    }

    /// Collects the listing links of every page reachable from `start_url`,
    /// in page order and, within a page, document order.
    pub async fn collect<S: BrowsingSession>(&self, session: &mut S, start_url: &str) -> Vec<String> {
        results::flatten(self.collect_pages(session, start_url).await)
    }

    /// Like [`collect`](Self::collect), keeping the per-page grouping.
    ///
    /// The session is left on the last URL attempted.
    pub async fn collect_pages<S: BrowsingSession>(
        &self,
        session: &mut S,
        start_url: &str,
    ) -> Vec<PageResult> {
        let mut pages: Vec<PageResult> = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();

        if self.max_pages == Some(0) {
            ::log::info!("Page limit is 0, nothing to read");
            return pages;
        }

        if let Err(e) = self.bounded(position(session, start_url)).await {
            ::log::warn!("Could not open {}: {}", start_url, e);
            ::log::info!("No more links found, stopping.");
            return pages;
        }

        loop {
            let outcome = match self
                .bounded(async { Ok(self.read_page(session).await) })
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => PageOutcome::Failed(e),
            };

            // A page only counts once the walk has moved past it
            let (page, next_url) = match outcome {
                PageOutcome::Listings { page, next_url } => {
                    ::log::info!(
                        "Captured {} properties on the {} page.",
                        page.links.len(),
                        page.ordinal
                    );
                    visited.insert(page.url.clone());
                    (page, next_url)
                }
                PageOutcome::Exhausted => {
                    ::log::info!("No listings on the current page");
                    break;
                }
                PageOutcome::Failed(e) => {
                    ::log::warn!("Stopping walk, page could not be read: {}", e);
                    break;
                }
            };

            if let Some(max_pages) = self.max_pages {
                if pages.len() + 1 >= max_pages {
                    ::log::info!("Reached the limit of {} pages", max_pages);
                    pages.push(page);
                    break;
                }
            }

            if visited.contains(&next_url) {
                ::log::warn!(
                    "Next page {} was already visited, the site is ignoring the page parameter",
                    next_url
                );
                pages.push(page);
                break;
            }

            ::log::debug!("Moving to {}", next_url);
            if let Err(e) = self.bounded(session.goto(&next_url)).await {
                ::log::warn!(
                    "Stopping walk, navigation failed, dropping the {} page: {}",
                    page.ordinal,
                    e
                );
                break;
            }
            pages.push(page);
        }

        ::log::info!(
            "No more links found, stopping. {} links across {} pages.",
            pages.iter().map(|p| p.links.len()).sum::<usize>(),
            pages.len()
        );
        pages
    }

    /// Reads the listings, the page number and the next page URL of the current page.
    pub async fn read_page<S: BrowsingSession>(&self, session: &mut S) -> PageOutcome {
        let links = match session
            .extract_all(&self.markup.listing_selector, &Projection::Link)
            .await
        {
            Ok(links) => links,
            Err(e) => return PageOutcome::Failed(e),
        };
        if links.is_empty() {
            return PageOutcome::Exhausted;
        }

        let raw_ordinal = match session
            .extract_one(
                &self.markup.pagination_selector,
                &Projection::data(&self.markup.ordinal_attribute),
            )
            .await
        {
            Ok(raw) => raw,
            Err(e) => return PageOutcome::Failed(e),
        };

        let ordinal = match parse_ordinal(&raw_ordinal) {
            Ok(ordinal) => ordinal,
            Err(e) => return PageOutcome::Failed(e),
        };

        let url = match session.current_url().await {
            Ok(url) => url,
            Err(e) => return PageOutcome::Failed(e),
        };

        match next_page_url(&url, &self.markup.page_param, ordinal) {
            Ok(next_url) => PageOutcome::Listings {
                page: PageResult::new(url, ordinal, links),
                next_url,
            },
            Err(e) => PageOutcome::Failed(e),
        }
    }

    async fn bounded<T, F>(&self, step: F) -> Result<T, SessionError>
    where
        F: Future<Output = Result<T, SessionError>>,
    {
        timeout(self.page_timeout, step)
            .await
            .map_err(|_| SessionError::Timeout(self.page_timeout.as_secs()))?
    }
}

/// Navigates to `start_url` unless the session is already there.
async fn position<S: BrowsingSession>(session: &mut S, start_url: &str) -> Result<(), SessionError> {
    match session.current_url().await {
        Ok(current) if current == start_url => {
            ::log::debug!("Session already on {}", start_url);
            Ok(())
        }
        _ => session.goto(start_url).await,
    }
}

/// Parses the page number reported by the pagination widget.
pub fn parse_ordinal(raw: &str) -> Result<u32, SessionError> {
    match raw.trim().parse::<u32>() {
        Ok(ordinal) if ordinal > 0 => Ok(ordinal),
        _ => Err(SessionError::InvalidOrdinal(raw.to_string())),
    }
}

/// Builds the URL of the page after `ordinal`.
///
/// Every existing `page_param` pair is dropped and a single
/// `page_param=<ordinal + 1>` is appended. The rest of the query is kept as
/// written, without decoding or re-encoding.
pub fn next_page_url(current: &str, page_param: &str, ordinal: u32) -> Result<String, SessionError> {
    let mut url = Url::parse(current).map_err(|e| SessionError::InvalidUrl {
        url: current.to_string(),
        reason: e.to_string(),
    })?;
    let next = ordinal
        .checked_add(1)
        .ok_or_else(|| SessionError::InvalidOrdinal(ordinal.to_string()))?;

    let mut query = url
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| segment.split('=').next() != Some(page_param))
        .collect::<Vec<&str>>()
        .join("&");
    if !query.is_empty() {
        query.push('&');
    }
    query.push_str(&format!("{page_param}={next}"));

    url.set_query(Some(&query));

    Ok(url.to_string())
}
