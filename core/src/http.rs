//! HTTP request types described as plain data.
//!
//! # Design
//! `RequestIssuer::build_*` produces an `HttpRequest` without touching the
//! network; `RequestIssuer::execute` is the only place that opens a socket.
//! Keeping the descriptor as plain owned data means argument checks, header
//! defaults and body encoding can be tested without a server.

use std::time::Duration;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Header names are lower-case. `body` is already encoded with the
/// `Encoding` the request was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// First value of the header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_secure(&self) -> bool {
        is_secure_url(&self.url)
    }
}

/// The body of a POST request before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostBody {
    /// Key/value pairs joined as `k1=v1&k2=v2` in insertion order.
    /// Neither keys nor values are escaped.
    Form(Vec<(String, String)>),
    /// A pre-encoded body written verbatim.
    Raw(String),
}

impl PostBody {
    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        PostBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The body text, or `None` when nothing should be written.
    pub fn to_text(&self) -> Option<String> {
        match self {
            PostBody::Form(pairs) if pairs.is_empty() => None,
            PostBody::Form(pairs) => Some(
                pairs
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("&"),
            ),
            PostBody::Raw(raw) => Some(raw.clone()),
        }
    }
}

pub(crate) fn is_secure_url(url: &str) -> bool {
    url.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https"))
}
