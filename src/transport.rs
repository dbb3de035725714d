use std::future::Future;

use crate::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// One fully-built outgoing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value with this name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A received response with its body already read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single HTTP exchange.
///
/// No retries, no auth handling: the client layers those on top. Return
/// [`TransportError::Connect`] when the destination could not be reached so
/// the client can report it as unreachable.
pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

#[cfg(feature = "http")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "http")]
mod reqwest_transport {
    use super::{HttpRequest, HttpResponse, Method, Transport};
    use crate::error::TransportError;

    /// [`Transport`] over a shared `reqwest::Client`.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        http: reqwest::Client,
    }

    impl ReqwestTransport {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Use a custom HTTP client (for connection pool reuse or timeouts).
        #[must_use]
        pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
            self.http = client;
            self
        }
    }

    impl Transport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
            };

            let mut builder = self.http.request(method, &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(classify)?;
            let status = response.status();
            let body = response.text().await.map_err(classify)?;

            Ok(HttpResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                body,
            })
        }
    }

    fn classify(e: reqwest::Error) -> TransportError {
        if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}
