pub mod config;
pub mod crawlers;
pub mod error;
pub mod parsers;
pub mod results;
pub mod store;

// Re-export commonly used types for convenience
pub use config::{CrawlConfig, PageMarkup};
pub use crawlers::{BrowsingSession, MemorySession, PageWalker, WebDriverSession};
pub use error::{Error, Result, SessionError, StoreError};
pub use results::PageResult;
pub use store::SearchStore;

/// Opens a browser session, collects every listing link reachable from
/// `config.start_url` and closes the session again.
///
/// Only failing to open the session is an error; everything that goes wrong
/// once the walk has started just ends it early.
pub async fn crawl(config: &CrawlConfig) -> Result<Vec<String>> {
    ::log::info!("Starting crawl at: {}", config.start_url);

    let mut session = WebDriverSession::connect(&config.webdriver_url).await?;
    let links = PageWalker::from_config(config)
        .collect(&mut session, &config.start_url)
        .await;

    if let Err(e) = session.close().await {
        ::log::warn!("Failed to close browser session: {}", e);
    }

    Ok(links)
}
