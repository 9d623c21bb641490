/// Error types for the site crate
use thiserror::Error;

/// Main error type for fetching and reading site pages
#[derive(Error, Debug)]
pub enum SiteError {
    /// The server answered with anything other than 200 OK
    #[error("Fetching {url} failed with status code {status}")]
    Fetch { url: String, status: u16 },

    /// HTTP request failed before a status was received
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A listing entry without its detail page anchor
    #[error("No a.eg-washington-element-10 found in listing entry")]
    MissingLink,

    /// A listing entry without its title block
    #[error("No title div found in listing entry")]
    MissingTitle,

    /// A detail page without the article container
    #[error("No div.content-article found in detail page")]
    MissingContent,
}

/// Type alias for Results using SiteError
pub type Result<T> = std::result::Result<T, SiteError>;
