use crate::error::SessionError;
use crate::parsers::{Projection, html};
use async_trait::async_trait;

/// A browsing session a walk can drive: navigate, look at the rendered page, close.
///
/// Extraction is evaluated against the rendered source, so implementors only
/// provide navigation and the page HTML.
#[async_trait]
pub trait BrowsingSession: Send {
    /// Navigate to `url` and wait for the page to load
    async fn goto(&mut self, url: &str) -> Result<(), SessionError>;

    /// URL the session is currently on, after any redirects
    async fn current_url(&mut self) -> Result<String, SessionError>;

    /// Rendered HTML of the current page
    async fn source(&mut self) -> Result<String, SessionError>;

    /// End the session
    async fn close(self) -> Result<(), SessionError>
    where
        Self: Sized;

    /// Projects every element matching `selector` on the current page.
    async fn extract_all(
        &mut self,
        selector: &str,
        projection: &Projection,
    ) -> Result<Vec<String>, SessionError> {
        let url = self.current_url().await?;
        let source = self.source().await?;
        html::select_all(&source, &url, selector, projection)
    }

    /// Projects the first element matching `selector` on the current page.
    async fn extract_one(
        &mut self,
        selector: &str,
        projection: &Projection,
    ) -> Result<String, SessionError> {
        let url = self.current_url().await?;
        let source = self.source().await?;
        html::select_one(&source, &url, selector, projection)
    }
}
