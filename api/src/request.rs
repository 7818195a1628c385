//! Request descriptors.
//!
//! A [`RequestDescriptor`] is an immutable description of one HTTP request:
//! method, URL, ordered headers, a body and the format the caller would like
//! the response body delivered in. Generated client code builds one per call
//! and hands it to [`execute`](crate::execute).

use std::fmt;

use url::Url;

use crate::method::RestMethod;

/// MIME type injected when a request has no `Content-Type` header.
pub const APPLICATION_JSON: &str = "application/json";

/// Format in which a transport should deliver the response body.
///
/// The executor always overrides this with [`ResponseFormat::Text`] on the
/// request it actually sends, because decoding starts from the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponseFormat {
    /// Parsed JSON.
    #[default]
    Json,
    /// Raw text.
    Text,
    /// Raw bytes.
    Bytes,
    /// Body is discarded.
    Ignore,
}

/// A single request header.
///
/// `Accept` and `Content-Type` have dedicated variants; everything else is
/// [`RequestHeader::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestHeader {
    /// `Accept: <media type>`.
    Accept(String),
    /// `Content-Type: <media type>`.
    ContentType(String),
    /// Any other header.
    Custom {
        /// Header name, as written.
        name: String,
        /// Header value.
        value: String,
    },
}

impl RequestHeader {
    /// Creates a [`RequestHeader::Custom`] header.
    pub fn custom(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Custom {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the header name.
    pub fn name(&self) -> &str {
        match self {
            Self::Accept(_) => "Accept",
            Self::ContentType(_) => "Content-Type",
            Self::Custom { name, .. } => name,
        }
    }

    /// Returns the header value.
    pub fn value(&self) -> &str {
        match self {
            Self::Accept(v) | Self::ContentType(v) => v,
            Self::Custom { value, .. } => value,
        }
    }

    /// Returns `true` if this header sets the content type, whether through
    /// the dedicated variant or a custom header named `content-type` in any case.
    pub fn is_content_type(&self) -> bool {
        match self {
            Self::ContentType(_) => true,
            Self::Custom { name, .. } => name.eq_ignore_ascii_case("content-type"),
            Self::Accept(_) => false,
        }
    }
}

impl fmt::Display for RequestHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.value())
    }
}

/// Conversion of a request body into the text a transport sends.
///
/// `()` and `None` mean "no body".
pub trait RequestContent {
    /// Consumes the body, returning its textual form if there is one.
    fn into_content(self) -> Option<String>;
}

impl RequestContent for () {
    fn into_content(self) -> Option<String> {
        None
    }
}

impl RequestContent for String {
    fn into_content(self) -> Option<String> {
        Some(self)
    }
}

impl RequestContent for &str {
    fn into_content(self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl RequestContent for serde_json::Value {
    fn into_content(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl<T: RequestContent> RequestContent for Option<T> {
    fn into_content(self) -> Option<String> {
        self.and_then(RequestContent::into_content)
    }
}

/// An HTTP request as described by generated client code.
///
/// ## Type Parameters
///
/// - `B`: The body type. `()` for body-less requests; errors always carry a
///   `RequestDescriptor<()>`.
///
/// ## Examples
///
/// ```rust
/// use api_runtime::{RequestDescriptor, RequestHeader, RestMethod};
/// use url::Url;
///
/// let request = RequestDescriptor::new(RestMethod::Post, Url::parse("https://api.example.com/users").unwrap())
///     .with_header(RequestHeader::custom("X-Trace", "abc"))
///     .with_body(r#"{"name":"Alice"}"#.to_string());
///
/// assert!(!request.has_content_type());
/// let prepared = request.clone().with_default_content_type();
/// assert_eq!(prepared.headers[0], RequestHeader::ContentType("application/json".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor<B = ()> {
    /// HTTP method.
    pub method: RestMethod,
    /// Fully-qualified request URL.
    pub url: Url,
    /// Headers, in the order they will be sent.
    pub headers: Vec<RequestHeader>,
    /// Request body.
    pub body: B,
    /// Requested response body format.
    pub response_format: ResponseFormat,
}

impl RequestDescriptor<()> {
    /// Creates a body-less request with no headers.
    pub fn new(method: RestMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: (),
            response_format: ResponseFormat::default(),
        }
    }

    /// Creates a `GET` request.
    pub fn get(url: Url) -> Self {
        Self::new(RestMethod::Get, url)
    }
}

impl<B> RequestDescriptor<B> {
    /// Appends a header.
    pub fn with_header(mut self, header: RequestHeader) -> Self {
        self.headers.push(header);
        self
    }

    /// Replaces the body, possibly changing its type.
    pub fn with_body<B2>(self, body: B2) -> RequestDescriptor<B2> {
        self.map_body(|_| body)
    }

    /// Sets the requested response format.
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    /// Transforms the body, keeping everything else.
    pub fn map_body<B2>(self, f: impl FnOnce(B) -> B2) -> RequestDescriptor<B2> {
        RequestDescriptor {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: f(self.body),
            response_format: self.response_format,
        }
    }

    /// Returns a copy of this request with the body erased.
    pub fn without_body(&self) -> RequestDescriptor<()> {
        RequestDescriptor {
            method: self.method,
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: (),
            response_format: self.response_format,
        }
    }

    /// Returns `true` if any header sets the content type.
    pub fn has_content_type(&self) -> bool {
        self.headers.iter().any(RequestHeader::is_content_type)
    }

    /// Prepends `Content-Type: application/json` unless a content type is
    /// already present, in which case the headers are left untouched.
    pub fn with_default_content_type(mut self) -> Self {
        if !self.has_content_type() {
            self.headers
                .insert(0, RequestHeader::ContentType(APPLICATION_JSON.to_string()));
        }
        self
    }
}

impl<B> fmt::Display for RequestDescriptor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
