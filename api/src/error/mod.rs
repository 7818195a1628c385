//! Error types for the runtime.
//!
//! The hierarchy is split by where a failure can escape:
//! - [`AjaxError`] - The only error returned by request execution, pairing the
//!   originating request with an [`ErrorDescription`]
//! - [`DecodeError`] / [`DecodeErrors`] - Path-annotated structural decode failures
//! - [`ConfigError`] - Transport construction and URL building errors
//! - [`CodecError`] - JSON encoding and URL piece rendering errors

mod ajax_error;
mod codec_error;
mod config_error;
mod decode_error;

pub use ajax_error::{AjaxError, ErrorDescription};
pub use codec_error::CodecError;
pub use config_error::ConfigError;
pub use decode_error::{DecodeError, DecodeErrors};
