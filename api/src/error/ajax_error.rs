//! The unified request execution error.

use thiserror::Error;

use crate::request::RequestDescriptor;

/// What went wrong while executing a request.
///
/// Exactly one variant applies per failure. A successful response never
/// produces an `ErrorDescription`.
///
/// ## Examples
///
/// ```rust,ignore
/// use api_runtime::ErrorDescription;
///
/// match err.description() {
///     ErrorDescription::NotFound => show_empty_state(),
///     ErrorDescription::Response { status, body } => show_server_error(*status, body),
///     other => eprintln!("request failed: {other}"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorDescription {
    /// The body was received but could not be parsed as JSON or did not
    /// match the expected shape.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// The transport failed before any HTTP response existed (DNS, refused
    /// connection, client-side failure).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server answered with status 404.
    #[error("Not found")]
    NotFound,

    /// The server answered with a status outside `200..=299` other than 404.
    #[error("HTTP {status}: {body}")]
    Response {
        /// The HTTP status code returned.
        status: u16,
        /// The raw response body, verbatim.
        body: String,
    },

    /// The transport reported a structural failure of the response itself,
    /// such as an unreadable body.
    #[error("Response format error: {0}")]
    ResponseFormat(String),
}

impl ErrorDescription {
    /// Returns `true` for [`ErrorDescription::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns the HTTP status code when the server produced a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound => Some(404),
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the message carried by the message-only variants.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Decoding(m) | Self::Connection(m) | Self::ResponseFormat(m) => Some(m),
            Self::NotFound | Self::Response { .. } => None,
        }
    }
}

/// Error returned by request execution.
///
/// Carries the request as the caller supplied it, with its body erased since
/// bodies are not guaranteed to be printable, together with the
/// [`ErrorDescription`] of the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{request}: {description}")]
pub struct AjaxError {
    request: RequestDescriptor<()>,
    description: ErrorDescription,
}

impl AjaxError {
    /// Creates an error for the given request.
    pub fn new(request: RequestDescriptor<()>, description: ErrorDescription) -> Self {
        Self {
            request,
            description,
        }
    }

    /// Returns the request that failed.
    pub fn request(&self) -> &RequestDescriptor<()> {
        &self.request
    }

    /// Returns the description of the failure.
    pub fn description(&self) -> &ErrorDescription {
        &self.description
    }

    /// Splits the error into its request and description.
    pub fn into_parts(self) -> (RequestDescriptor<()>, ErrorDescription) {
        (self.request, self.description)
    }
}
