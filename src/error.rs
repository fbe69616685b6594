use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Top-level error for the operations that are allowed to fail loudly:
/// opening a session, loading configuration and writing a search.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of a browsing session. Inside a walk these end the traversal.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Couldn't connect to any WebDriver server (tried {0})")]
    Connect(String),

    #[error("Failed to navigate to {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("WebDriver command failed: {0}")]
    Command(String),

    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    InvalidSelector(String),

    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    MissingElement(String),

    #[error("Element matched by {selector} has no {projection}")]
    MissingValue { selector: String, projection: String },

    #[error("Page ordinal {0:?} is not a number")]
    InvalidOrdinal(String),

    #[error("Invalid page URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Timed out after {0} seconds")]
    Timeout(u64),
}

/// Failures of the search store. Read-side problems never surface as these;
/// only writes, deletes and name validation do.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Search name {0:?} is not usable as a file name")]
    InvalidName(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<fantoccini::error::CmdError> for SessionError {
    fn from(value: fantoccini::error::CmdError) -> Self {
        SessionError::Command(value.to_string())
    }
}
