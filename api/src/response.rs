//! Response envelopes and status classification.

use std::fmt;

/// Outcome class of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// `200..=299`.
    Success,
    /// Exactly 404.
    NotFound,
    /// Any other status.
    Failure,
}

/// Classifies a status code.
///
/// ## Examples
///
/// ```rust
/// use api_runtime::{StatusClass, classify};
///
/// assert_eq!(classify(204), StatusClass::Success);
/// assert_eq!(classify(404), StatusClass::NotFound);
/// assert_eq!(classify(302), StatusClass::Failure);
/// ```
pub fn classify(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        404 => StatusClass::NotFound,
        _ => StatusClass::Failure,
    }
}

/// An HTTP response with its body.
///
/// Transports return `ResponseEnvelope<String>`; the executor hands back the
/// same metadata with the body replaced by the decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope<T> {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase, empty when the transport does not report one.
    pub status_text: String,
    /// Response headers, in the order received.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: T,
}

impl<T> ResponseEnvelope<T> {
    /// Returns the classification of this response's status.
    pub fn class(&self) -> StatusClass {
        classify(self.status)
    }

    /// Returns `true` for a `2xx` status.
    pub fn is_success(&self) -> bool {
        self.class() == StatusClass::Success
    }

    /// Returns the first header with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replaces the body, keeping status and headers.
    pub fn with_body<U>(self, body: U) -> ResponseEnvelope<U> {
        self.map(|_| body)
    }

    /// Transforms the body, keeping status and headers.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResponseEnvelope<U> {
        ResponseEnvelope {
            status: self.status,
            status_text: self.status_text,
            headers: self.headers,
            body: f(self.body),
        }
    }
}

impl<T: fmt::Debug> fmt::Display for ResponseEnvelope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if !self.status_text.is_empty() {
            write!(f, " {}", self.status_text)?;
        }
        write!(f, " {:?}", self.body)
    }
}
