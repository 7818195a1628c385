//! Client configuration.
//!
//! [`Settings`] is built explicitly by the caller and threaded into every
//! generated endpoint function. It bundles the [`Codec`] used to encode
//! request bodies, decode responses and render path pieces, together with
//! arbitrary caller parameters such as a base URL or an auth token.

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::decode::Decode;
use crate::error::{CodecError, ConfigError};
use crate::url_piece;

/// JSON encoding, JSON decoding and URL piece rendering used by generated clients.
pub trait Codec: Send + Sync {
    /// Encodes a value as JSON.
    ///
    /// ## Errors
    ///
    /// Returns an error if the value has no JSON representation.
    fn encode_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, CodecError>;

    /// Decodes a JSON value, rendering any decode errors into one message.
    ///
    /// ## Errors
    ///
    /// Returns the rendered decode errors.
    fn decode_json<T: Decode>(&self, value: &Value) -> Result<T, String>;

    /// Renders a value as a URL path piece.
    ///
    /// ## Errors
    ///
    /// Returns an error if the value's `Serialize` implementation fails.
    fn to_url_piece<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError>;
}

/// The default [`Codec`]: `serde_json` encoding, [`Decode`] decoding and
/// [`to_url_piece`](crate::to_url_piece) rendering.
///
/// Encoding then decoding returns an equal value for primitives, sequences
/// and [`Either`](crate::Either).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, CodecError> {
        Ok(serde_json::to_value(value)?)
    }

    fn decode_json<T: Decode>(&self, value: &Value) -> Result<T, String> {
        T::decode(value).map_err(|errors| errors.to_string())
    }

    fn to_url_piece<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError> {
        url_piece::to_url_piece(value)
    }
}

/// Configuration passed to generated client functions.
///
/// ## Type Parameters
///
/// - `P`: Caller parameters, passed through untouched.
/// - `C`: The [`Codec`], [`JsonCodec`] unless overridden.
///
/// ## Examples
///
/// ```rust
/// use api_runtime::{Codec, Settings};
///
/// struct Params {
///     base_url: String,
///     token: String,
/// }
///
/// let settings = Settings::new(Params {
///     base_url: "https://api.example.com".to_string(),
///     token: "sk-test".to_string(),
/// });
/// assert_eq!(settings.params().token, "sk-test");
/// assert_eq!(settings.codec().to_url_piece(&42).unwrap(), "42");
/// ```
#[derive(Debug, Clone)]
pub struct Settings<P, C = JsonCodec> {
    params: P,
    codec: C,
}

impl<P> Settings<P> {
    /// Creates settings with the default [`JsonCodec`].
    pub fn new(params: P) -> Self {
        Self {
            params,
            codec: JsonCodec,
        }
    }
}

impl<P, C: Codec> Settings<P, C> {
    /// Creates settings with a custom codec.
    pub fn with_codec(params: P, codec: C) -> Self {
        Self { params, codec }
    }

    /// Returns the caller parameters.
    pub fn params(&self) -> &P {
        &self.params
    }

    /// Returns the codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Splits the settings into parameters and codec.
    pub fn into_parts(self) -> (P, C) {
        (self.params, self.codec)
    }
}

/// Appends percent-encoded path segments to `base`.
///
/// A trailing empty segment of `base` (from a trailing `/`) is dropped first,
/// so `https://h/api/` and `https://h/api` behave the same.
///
/// ## Examples
///
/// ```rust
/// use api_runtime::append_path;
/// use url::Url;
///
/// let base = Url::parse("https://api.example.com/v1/").unwrap();
/// let url = append_path(&base, ["users", "Pair 1 2"]).unwrap();
/// assert_eq!(url.as_str(), "https://api.example.com/v1/users/Pair%201%202");
/// ```
///
/// ## Errors
///
/// Returns [`ConfigError::CannotBeABase`] for URLs without a path, such as `mailto:`.
pub fn append_path<I>(base: &Url, pieces: I) -> Result<Url, ConfigError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|()| ConfigError::CannotBeABase {
            url: base.to_string(),
        })?;
        segments.pop_if_empty().extend(pieces);
    }
    Ok(url)
}
