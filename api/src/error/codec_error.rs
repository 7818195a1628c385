//! Encoding and URL piece rendering errors.

use std::fmt::Display;

use thiserror::Error;

/// Errors raised by a [`Codec`](crate::settings::Codec) while encoding a
/// value to JSON or rendering it as a URL piece.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value could not be represented as JSON (e.g. a map with
    /// non-string keys).
    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The value's `Serialize` implementation failed while rendering a URL piece.
    #[error("URL piece error: {0}")]
    UrlPiece(String),
}

impl serde::ser::Error for CodecError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::UrlPiece(msg.to_string())
    }
}
