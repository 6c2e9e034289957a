//! HTTP transport seam.
//!
//! [`Transport`] is the single capability the client needs: post one
//! multipart field and hand back status, headers, and body untouched.
//! [`HttpTransport`] implements it with `reqwest` and a persistent cookie jar.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use crate::core::AgentResult;

/// File name the request document is attached under.
pub const REQUEST_FILE_NAME: &str = "request.xml";

/// One agent call: a single multipart field carrying the XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartRequest {
    pub endpoint: String,
    pub field_name: &'static str,
    pub document: String,
    /// The response body may be a raw PDF rather than text.
    pub expect_binary: bool,
    pub timeout: Duration,
}

/// Response headers with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders(BTreeMap<String, String>);

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResponseHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Undecoded HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

/// Posts agent documents. Implementations must be usable from concurrent
/// calls on a shared reference.
pub trait Transport: Send + Sync {
    /// Perform the POST. Only failures to obtain a response are errors;
    /// any status code is returned as a [`RawResponse`].
    fn post(&self, request: MultipartRequest) -> impl Future<Output = AgentResult<RawResponse>> + Send;
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use std::sync::Arc;

    use reqwest::cookie::Jar;
    use reqwest::multipart::{Form, Part};

    use super::*;
    use crate::core::AgentError;

    fn transport_err(e: reqwest::Error) -> AgentError {
        let status_text = if e.is_timeout() {
            "request timed out".to_string()
        } else {
            e.to_string()
        };
        AgentError::Transport {
            status: e.status().map(|s| s.as_u16()),
            status_text,
        }
    }

    /// `reqwest`-backed transport. Cookies set by the service are kept for
    /// the lifetime of the transport and sent on every later call.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: reqwest::Client,
        cookies: Arc<Jar>,
    }

    impl HttpTransport {
        /// # Errors
        ///
        /// [`AgentError::Config`] if the TLS backend cannot be initialised.
        pub fn new() -> AgentResult<Self> {
            let cookies = Arc::new(Jar::default());
            let client = reqwest::Client::builder()
                .cookie_provider(Arc::clone(&cookies))
                .user_agent(concat!("szamla-agent/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))?;
            Ok(Self { client, cookies })
        }

        /// The session cookie jar shared by every request of this transport.
        pub fn cookie_jar(&self) -> &Arc<Jar> {
            &self.cookies
        }
    }

    impl Transport for HttpTransport {
        async fn post(&self, request: MultipartRequest) -> AgentResult<RawResponse> {
            let part = Part::text(request.document)
                .file_name(REQUEST_FILE_NAME)
                .mime_str("text/xml")
                .map_err(transport_err)?;
            let form = Form::new().part(request.field_name, part);

            let response = self
                .client
                .post(&request.endpoint)
                .multipart(form)
                .timeout(request.timeout)
                .send()
                .await
                .map_err(transport_err)?;

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
            let body = response.bytes().await.map_err(transport_err)?.to_vec();

            Ok(RawResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                headers,
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let headers: ResponseHeaders = [("Szlahu_Szamlaszam", "E-1")].into_iter().collect();
        assert_eq!(headers.get("szlahu_szamlaszam"), Some("E-1"));
        assert_eq!(headers.get("SZLAHU_SZAMLASZAM"), Some("E-1"));
        assert_eq!(headers.get("szlahu_error"), None);
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_transport_builds() {
        let transport = HttpTransport::new().unwrap();
        let url: reqwest::Url = "https://www.szamlazz.hu/szamla/".parse().unwrap();
        transport.cookie_jar().add_cookie_str("JSESSIONID=abc", &url);
        let sent = reqwest::cookie::CookieStore::cookies(transport.cookie_jar().as_ref(), &url);
        assert_eq!(sent.unwrap().to_str().unwrap(), "JSESSIONID=abc");
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn silent_server_times_out() {
        // Accepted by the kernel backlog but never answered.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/szamla/", listener.local_addr().unwrap());

        let transport = HttpTransport::new().unwrap();
        let err = transport
            .post(MultipartRequest {
                endpoint,
                field_name: "action-szamla_agent_taxpayer",
                document: "<xmltaxpayer/>".into(),
                expect_binary: false,
                timeout: Duration::from_millis(200),
            })
            .await
            .unwrap_err();

        assert!(
            matches!(
                &err,
                crate::core::AgentError::Transport { status: None, status_text } if status_text == "request timed out"
            ),
            "{err:?}"
        );
        drop(listener);
    }
}
