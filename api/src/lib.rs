//! Runtime support for generated REST API clients.
//!
//! Client code generated from an API definition calls into this crate once per
//! endpoint. The crate sends the request through an injected [`Transport`],
//! collapses every failure into a single [`AjaxError`], and decodes the JSON
//! response body into the endpoint's statically expected type.
//!
//! ## Features
//!
//! - **Unified error model**: connection failures, transport format failures,
//!   non-success statuses and decode failures all surface as one [`AjaxError`]
//!   carrying the originating request and an [`ErrorDescription`]
//! - **Structural decoding**: the [`Decode`] trait and [`Shape`] descriptors
//!   produce path-annotated errors such as `error at array index 3: expected integer`
//! - **Pluggable transport**: [`ReqwestTransport`] by default, any [`Transport`]
//!   implementation in tests or alternative runtimes
//! - **Explicit configuration**: [`Settings`] bundles the JSON codec and the
//!   caller's own parameters (base URL, credentials, ...)
//!
//! ## Example
//!
//! ```rust,ignore
//! use api_runtime::{ApiClient, Either, RequestDescriptor, Settings, decode_json};
//! use url::Url;
//!
//! let client = ApiClient::new(Settings::new("https://api.example.com"))?;
//! let request = RequestDescriptor::get(Url::parse("https://api.example.com/answer")?);
//!
//! let response = client
//!     .execute(decode_json::<Either<String, i64>>, request)
//!     .await?;
//! assert_eq!(response.body, Either::Right(42));
//! ```

pub mod client;
pub mod decode;
pub mod either;
pub mod error;
pub mod method;
pub mod request;
pub mod response;
pub mod settings;
pub mod transport;
pub mod url_piece;

// Re-exports for convenience
pub use client::{ApiClient, execute};
pub use decode::{Decode, RecordLayout, Shape, VariantLayout, VariantsLayout, decode_json, decode_shaped};
pub use either::Either;
pub use error::{
    AjaxError, CodecError, ConfigError, DecodeError, DecodeErrors, ErrorDescription,
};
pub use method::RestMethod;
pub use request::{RequestContent, RequestDescriptor, RequestHeader, ResponseFormat};
pub use response::{ResponseEnvelope, StatusClass, classify};
pub use settings::{Codec, JsonCodec, Settings, append_path};
pub use transport::{ReqwestTransport, ReqwestTransportBuilder, Transport, TransportError};
pub use url_piece::to_url_piece;
