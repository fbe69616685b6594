use crate::crawlers::session::BrowsingSession;
use crate::error::SessionError;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};

/// Common local WebDriver endpoints tried when the configured one refuses
const FALLBACK_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A real browser driven over the WebDriver protocol
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Connects to the WebDriver instance at `webdriver_url`, falling back to
    /// well-known local endpoints.
    pub async fn connect(webdriver_url: &str) -> Result<Self, SessionError> {
        match ClientBuilder::native().connect(webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Ok(Self { client });
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    webdriver_url,
                    e
                );
            }
        }

        let mut tried = vec![webdriver_url.to_string()];
        for url in FALLBACK_URLS.iter() {
            if *url == webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            tried.push(url.to_string());
            if let Ok(client) = ClientBuilder::native().connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self { client });
            }
            // Don't log error for fallbacks to avoid log spam
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(SessionError::Connect(tried.join(", ")))
    }
}

#[async_trait]
impl BrowsingSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| navigation_error(e, "accessing", url))
    }

    async fn current_url(&mut self) -> Result<String, SessionError> {
        let url = self.client.current_url().await?;
        Ok(url.to_string())
    }

    async fn source(&mut self) -> Result<String, SessionError> {
        self.client
            .source()
            .await
            .map_err(|e| navigation_error(e, "getting source for", "current page"))
    }

    async fn close(self) -> Result<(), SessionError> {
        self.client.close().await?;
        ::log::debug!("WebDriver session closed");
        Ok(())
    }
}

/// Logs a WebDriver failure at the level it deserves and converts it
fn navigation_error(
    error: fantoccini::error::CmdError,
    context: &str,
    url: &str,
) -> SessionError {
    let reason = error.to_string();
    if reason.contains("Unable to find session") {
        ::log::warn!("Lost session while {} {}", context, url);
    } else {
        ::log::debug!("Failed {} {}: {}", context, url, reason);
    }
    SessionError::Navigation {
        url: url.to_string(),
        reason,
    }
}
