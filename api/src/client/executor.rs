//! Request execution with tracing instrumentation.
//!
//! [`execute`] drives one request through a [`Transport`], isolates any panic
//! raised by the transport, classifies the outcome and decodes the body.
//! [`ApiClient`] bundles a transport with [`Settings`] for generated code.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt as _;
use serde_json::Value;
use tracing::{Span, debug, instrument, warn};

use crate::decode::{Decode, decode_json};
use crate::error::{AjaxError, ConfigError, DecodeErrors, ErrorDescription};
use crate::request::{RequestContent, RequestDescriptor, ResponseFormat};
use crate::response::{ResponseEnvelope, StatusClass, classify};
use crate::settings::{Codec, JsonCodec, Settings};
use crate::transport::{ReqwestTransport, Transport, TransportError};

/// Executes one request and decodes its JSON body.
///
/// The request actually sent is a copy of `request` with
/// `Content-Type: application/json` prepended when no content type is set,
/// and with the response format forced to text. Exactly one call is made to
/// the transport; nothing is retried.
///
/// ## Type Parameters
///
/// * `T` - The decoded body type.
/// * `B` - The request body type.
///
/// ## Arguments
///
/// * `transport` - Performs the HTTP call.
/// * `decoder` - Turns the parsed body into `T`, e.g. `decode_json::<T>`.
/// * `request` - The request as built by the caller.
///
/// ## Errors
///
/// Every failure is returned as an [`AjaxError`] carrying the caller's request
/// with its body erased:
/// - [`ErrorDescription::Connection`] if the transport failed or panicked
/// - [`ErrorDescription::ResponseFormat`] if the transport could not read the response
/// - [`ErrorDescription::NotFound`] for status 404
/// - [`ErrorDescription::Response`] for any other status outside `200..=299`
/// - [`ErrorDescription::Decoding`] if the body is not JSON or does not decode
#[instrument(
    name = "api_request",
    skip_all,
    fields(
        http.method = tracing::field::Empty,
        http.url = tracing::field::Empty,
        http.status_code = tracing::field::Empty,
        otel.kind = "client",
        otel.status_code = tracing::field::Empty,
    )
)]
pub async fn execute<Tr, T, B, D>(
    transport: &Tr,
    decoder: D,
    request: RequestDescriptor<B>,
) -> Result<ResponseEnvelope<T>, AjaxError>
where
    Tr: Transport,
    B: RequestContent,
    D: FnOnce(&Value) -> Result<T, DecodeErrors>,
{
    let span = Span::current();
    span.record("http.method", request.method.to_string().as_str());
    span.record("http.url", request.url.as_str());

    let original = request.without_body();
    let outgoing = request
        .map_body(RequestContent::into_content)
        .with_default_content_type()
        .with_response_format(ResponseFormat::Text);

    // Panics raised while building or polling the transport future end here.
    let outcome = AssertUnwindSafe(async move { transport.send(outgoing).await })
        .catch_unwind()
        .await;

    let response = match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(TransportError::Connection(message))) => {
            warn!(error = %message, "transport failed before a response");
            span.record("otel.status_code", "ERROR");
            return Err(AjaxError::new(original, ErrorDescription::Connection(message)));
        }
        Ok(Err(TransportError::ResponseFormat(message))) => {
            warn!(error = %message, "transport could not read the response");
            span.record("otel.status_code", "ERROR");
            return Err(AjaxError::new(
                original,
                ErrorDescription::ResponseFormat(message),
            ));
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(error = %message, "transport panicked");
            span.record("otel.status_code", "ERROR");
            return Err(AjaxError::new(original, ErrorDescription::Connection(message)));
        }
    };

    span.record("http.status_code", response.status);

    match classify(response.status) {
        StatusClass::Success => {}
        StatusClass::NotFound => {
            debug!("resource not found");
            span.record("otel.status_code", "UNSET");
            return Err(AjaxError::new(original, ErrorDescription::NotFound));
        }
        StatusClass::Failure => {
            let otel_status = if response.status >= 500 { "ERROR" } else { "UNSET" };
            span.record("otel.status_code", otel_status);
            debug!(status = response.status, "unsuccessful response");
            return Err(AjaxError::new(
                original,
                ErrorDescription::Response {
                    status: response.status,
                    body: response.body,
                },
            ));
        }
    }

    let decoded = serde_json::from_str::<Value>(&response.body)
        .map_err(|e| e.to_string())
        .and_then(|json| decoder(&json).map_err(|errors| errors.to_string()));

    match decoded {
        Ok(body) => {
            span.record("otel.status_code", "OK");
            Ok(response.with_body(body))
        }
        Err(message) => {
            debug!(error = %message, "response body did not decode");
            span.record("otel.status_code", "ERROR");
            Err(AjaxError::new(original, ErrorDescription::Decoding(message)))
        }
    }
}

/// Extracts the message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "transport panicked".to_string()
    }
}

/// Client handle used by generated endpoint functions.
///
/// Bundles the [`Settings`] the generated code reads (codec, base URL, ...)
/// with the [`Transport`] requests are sent through.
///
/// ## Examples
///
/// ```rust,ignore
/// use api_runtime::{ApiClient, RequestDescriptor, Settings, decode_json};
/// use url::Url;
///
/// #[derive(Debug)]
/// struct Params { base_url: Url }
///
/// let client = ApiClient::new(Settings::new(Params {
///     base_url: Url::parse("https://api.example.com")?,
/// }))?;
///
/// let url = client.settings().params().base_url.join("/users")?;
/// let users = client
///     .execute(decode_json::<Vec<User>>, RequestDescriptor::get(url))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient<P, Tr = ReqwestTransport, C = JsonCodec> {
    settings: Settings<P, C>,
    transport: Tr,
}

impl<P> ApiClient<P> {
    /// Creates a client with the default [`ReqwestTransport`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(settings: Settings<P>) -> Result<Self, ConfigError> {
        Ok(Self {
            settings,
            transport: ReqwestTransport::new()?,
        })
    }
}

impl<P, Tr: Transport, C: Codec> ApiClient<P, Tr, C> {
    /// Creates a client with a custom transport.
    pub fn with_transport(settings: Settings<P, C>, transport: Tr) -> Self {
        Self {
            settings,
            transport,
        }
    }

    /// Returns the settings.
    pub fn settings(&self) -> &Settings<P, C> {
        &self.settings
    }

    /// Returns the transport.
    pub fn transport(&self) -> &Tr {
        &self.transport
    }

    /// Executes a request with an explicit decoder. See [`execute`].
    ///
    /// ## Errors
    ///
    /// See [`execute`].
    pub async fn execute<T, B, D>(
        &self,
        decoder: D,
        request: RequestDescriptor<B>,
    ) -> Result<ResponseEnvelope<T>, AjaxError>
    where
        B: RequestContent,
        D: FnOnce(&Value) -> Result<T, DecodeErrors>,
    {
        execute(&self.transport, decoder, request).await
    }

    /// Executes a request, decoding the body with `T`'s [`Decode`] implementation.
    ///
    /// ## Errors
    ///
    /// See [`execute`].
    pub async fn execute_json<T, B>(
        &self,
        request: RequestDescriptor<B>,
    ) -> Result<ResponseEnvelope<T>, AjaxError>
    where
        T: Decode,
        B: RequestContent,
    {
        execute(&self.transport, decode_json::<T>, request).await
    }
}
