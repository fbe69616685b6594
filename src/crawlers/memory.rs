use crate::crawlers::session::BrowsingSession;
use crate::error::SessionError;
use async_trait::async_trait;
use std::collections::HashMap;

const BLANK_PAGE: &str = "about:blank";

/// A session over pages held in memory, keyed by exact URL.
///
/// Navigating to a URL with no page behaves like a network failure.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    pages: HashMap<String, String>,
    current: Option<String>,
    history: Vec<String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the HTML served at `url`
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.insert_page(url, html);
        self
    }

    pub fn insert_page(&mut self, url: &str, html: &str) {
        self.pages.insert(url.to_string(), html.to_string());
    }

    /// Every URL passed to `goto`, including failed ones, in order
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

#[async_trait]
impl BrowsingSession for MemorySession {
    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        self.history.push(url.to_string());
        if self.pages.contains_key(url) {
            self.current = Some(url.to_string());
            Ok(())
        } else {
            Err(SessionError::Navigation {
                url: url.to_string(),
                reason: "no such page".to_string(),
            })
        }
    }

    async fn current_url(&mut self) -> Result<String, SessionError> {
        Ok(self
            .current
            .clone()
            .unwrap_or_else(|| BLANK_PAGE.to_string()))
    }

    async fn source(&mut self) -> Result<String, SessionError> {
        Ok(self
            .current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .cloned()
            .unwrap_or_default())
    }

    async fn close(self) -> Result<(), SessionError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::Projection;

    #[tokio::test]
    async fn test_starts_blank() {
        let mut session = MemorySession::new();
        assert_eq!(session.current_url().await.unwrap(), "about:blank");
        assert_eq!(session.source().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_unknown_url_is_navigation_error() {
        let mut session =
            MemorySession::new().with_page("https://a.example/", "<p>a</p>");
        session.goto("https://a.example/").await.unwrap();

        let result = session.goto("https://b.example/").await;
        assert!(matches!(result, Err(SessionError::Navigation { .. })));
        // The failed navigation leaves the session where it was
        assert_eq!(session.current_url().await.unwrap(), "https://a.example/");
        assert_eq!(
            session.history(),
            &["https://a.example/".to_string(), "https://b.example/".to_string()]
        );
    }

    #[tokio::test]
    async fn test_extract_through_session() {
        let mut session = MemorySession::new().with_page(
            "https://a.example/list",
            r#"<ul><li class="active" data-num="7"><a href="x">x</a></li></ul>"#,
        );
        session.goto("https://a.example/list").await.unwrap();

        let ordinal = session
            .extract_one("li.active", &Projection::data("num"))
            .await
            .unwrap();
        assert_eq!(ordinal, "7");

        let links = session.extract_all("li > a", &Projection::Link).await.unwrap();
        assert_eq!(links, vec!["https://a.example/x"]);
    }
}
