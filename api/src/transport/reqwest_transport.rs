//! Default transport backed by `reqwest`.

use std::error::Error as _;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use super::{Transport, TransportError};
use crate::error::ConfigError;
use crate::request::{RequestDescriptor, ResponseFormat};
use crate::response::ResponseEnvelope;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring a [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    timeout: Duration,
    default_headers: HeaderMap,
}

impl ReqwestTransportBuilder {
    fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
        }
    }

    /// Sets the request timeout. A request that exceeds it fails with
    /// [`TransportError::Connection`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header sent with every request.
    ///
    /// ## Examples
    ///
    /// ```rust,ignore
    /// let transport = ReqwestTransport::builder()
    ///     .default_header("User-Agent", "billing-client/1.0")?
    ///     .build()?;
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let header_name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ConfigError::invalid_header(name.as_ref(), e))?;
        let header_value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ConfigError::invalid_header(name.as_ref(), e))?;
        self.default_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Builds the transport.
    ///
    /// ## Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<ReqwestTransport, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(ReqwestTransport { client })
    }
}

/// A [`Transport`] backed by a pooled `reqwest::Client`.
///
/// Response bodies are always read as text.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a new builder.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }

    /// Creates a transport with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    /// Wraps an existing `reqwest::Client`.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: RequestDescriptor<Option<String>>,
    ) -> Result<ResponseEnvelope<String>, TransportError> {
        if request.response_format != ResponseFormat::Text {
            debug!(
                format = ?request.response_format,
                "response body will be read as text"
            );
        }

        let mut builder = self
            .client
            .request(request.method.to_reqwest(), request.url);
        for header in &request.headers {
            builder = builder.header(header.name(), header.value());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(ResponseEnvelope {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

/// Maps a reqwest error to a [`TransportError`].
///
/// Failures while reading the body are format errors; everything else
/// happened before a response existed.
fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    let message = error_chain(&err);
    if err.is_body() || err.is_decode() {
        TransportError::ResponseFormat(message)
    } else {
        TransportError::Connection(message)
    }
}

/// Renders an error followed by its sources, `": "`-separated.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut cur = err.source();
    while let Some(source) = cur {
        message.push_str(": ");
        message.push_str(&source.to_string());
        cur = source.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::RestMethod;
    use crate::request::RequestHeader;
    use url::Url;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request_to(server: &MockServer, p: &str) -> RequestDescriptor<Option<String>> {
        let url = Url::parse(&format!("{}{p}", server.uri())).unwrap();
        RequestDescriptor::get(url).with_body(None)
    }

    #[tokio::test]
    async fn test_send_returns_text_body_and_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[1,2,3]")
                    .insert_header("x-total", "3"),
            )
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let response = transport
            .send(request_to(&mock_server, "/items"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        assert_eq!(response.body, "[1,2,3]");
        assert_eq!(response.header("X-Total"), Some("3"));
    }

    #[tokio::test]
    async fn test_send_forwards_headers_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/items"))
            .and(header("content-type", "application/json"))
            .and(header("x-request-id", "abc"))
            .and(body_string(r#"{"name":"widget"}"#))
            .respond_with(ResponseTemplate::new(201).set_body_string("{}"))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&format!("{}/items", mock_server.uri())).unwrap();
        let request = RequestDescriptor::new(RestMethod::Post, url)
            .with_header(RequestHeader::ContentType("application/json".into()))
            .with_header(RequestHeader::custom("X-Request-Id", "abc"))
            .with_body(Some(r#"{"name":"widget"}"#.to_string()));

        let transport = ReqwestTransport::new().unwrap();
        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let response = transport
            .send(request_to(&mock_server, "/anything"))
            .await
            .unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(response.body, "down");
    }

    #[tokio::test]
    async fn test_default_header_is_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(header("user-agent", "billing-client/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::builder()
            .default_header("User-Agent", "billing-client/1.0")
            .unwrap()
            .build()
            .unwrap();
        let response = transport
            .send(request_to(&mock_server, "/"))
            .await
            .unwrap();
        assert_eq!(response.body, "ok");
    }

    #[tokio::test]
    async fn test_timeout_is_connection_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let result = transport.send(request_to(&mock_server, "/slow")).await;
        assert!(matches!(result, Err(TransportError::Connection(_))));
    }

    #[tokio::test]
    async fn test_refused_connection_is_connection_error() {
        let url = Url::parse("http://127.0.0.1:1/unreachable").unwrap();
        let transport = ReqwestTransport::new().unwrap();
        let result = transport.send(RequestDescriptor::get(url).with_body(None)).await;
        assert!(matches!(result, Err(TransportError::Connection(_))));
    }

    #[test]
    fn test_invalid_default_header() {
        let result = ReqwestTransport::builder().default_header("bad header", "v");
        assert!(matches!(result, Err(ConfigError::InvalidHeader { .. })));
    }
}
