//! HTTP transport abstraction.
//!
//! The runtime never performs network I/O itself. It drives a [`Transport`],
//! which sends one request and returns either the complete response with a
//! textual body or a [`TransportError`]. [`ReqwestTransport`] is the default
//! implementation; tests and alternative runtimes provide their own.

mod reqwest_transport;

use std::future::Future;

use thiserror::Error;

use crate::request::RequestDescriptor;
use crate::response::ResponseEnvelope;

pub use reqwest_transport::{ReqwestTransport, ReqwestTransportBuilder};

/// Failure reported by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No response was obtained: DNS failure, refused connection, timeout,
    /// or a request the client refused to build.
    #[error("{0}")]
    Connection(String),

    /// A response arrived but could not be read as a whole, e.g. a truncated
    /// or non-UTF-8 body.
    #[error("{0}")]
    ResponseFormat(String),
}

/// Capability to perform one HTTP request.
///
/// Implementations must deliver the body as text regardless of the request's
/// [`ResponseFormat`](crate::ResponseFormat); the executor already forces
/// [`ResponseFormat::Text`](crate::ResponseFormat::Text) on what it sends.
/// A panic inside `send` is caught by the executor and reported as a
/// connection error.
pub trait Transport: Send + Sync {
    /// Sends the request. The body is `None` for body-less requests.
    fn send(
        &self,
        request: RequestDescriptor<Option<String>>,
    ) -> impl Future<Output = Result<ResponseEnvelope<String>, TransportError>> + Send;
}

impl<T: Transport> Transport for &T {
    fn send(
        &self,
        request: RequestDescriptor<Option<String>>,
    ) -> impl Future<Output = Result<ResponseEnvelope<String>, TransportError>> + Send {
        (**self).send(request)
    }
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn send(
        &self,
        request: RequestDescriptor<Option<String>>,
    ) -> impl Future<Output = Result<ResponseEnvelope<String>, TransportError>> + Send {
        (**self).send(request)
    }
}
