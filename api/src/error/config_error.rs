//! Transport and URL configuration errors.

use thiserror::Error;

/// Errors in client configuration.
///
/// These occur while building a transport or a request URL, before any
/// request is sent, and usually indicate a programmer error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The URL cannot carry path segments (e.g. `mailto:` or `data:` URLs).
    #[error("URL cannot be a base: {url}")]
    CannotBeABase {
        /// The offending URL.
        url: String,
    },

    /// A default header name or value was rejected.
    #[error("Invalid header {name}: {message}")]
    InvalidHeader {
        /// The header name as given.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl ConfigError {
    /// Creates an invalid header error.
    pub fn invalid_header(name: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.to_string(),
        }
    }
}
