//! Bounded GET/POST request issuer.
//!
//! # Design
//! `RequestIssuer` owns one pooled `ureq::Agent` built from a `ClientConfig`
//! and otherwise carries no state between calls. Each operation is split
//! into a `build_*` method that validates arguments and produces an
//! `HttpRequest`, and `execute`, which performs the round-trip and hands the
//! live response to the caller. `issue_*` chain the two. Argument errors are
//! therefore always raised before a socket is opened.

use std::fmt;
use std::time::Duration;

use crate::config::{ClientConfig, TrustPolicy};
use crate::cookies::CookieSet;
use crate::encoding::Encoding;
use crate::error::HelperError;
use crate::http::{HttpMethod, HttpRequest, PostBody};
use crate::response::ResponseHandle;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Issues single GET and POST requests with per-call timeout, user agent,
/// keep-alive and cookies.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct RequestIssuer {
    config: ClientConfig,
    agent: ureq::Agent,
}

impl Default for RequestIssuer {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl RequestIssuer {
    pub fn new(config: ClientConfig) -> Self {
        let agent = config.build_agent();
        Self { config, agent }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_get(
        &self,
        url: &str,
        timeout_ms: Option<u64>,
        keep_alive: bool,
        user_agent: Option<&str>,
        cookies: Option<&CookieSet>,
    ) -> Result<HttpRequest, HelperError> {
        let url = require_url(url)?;
        let mut headers = vec![("user-agent".to_string(), self.user_agent(user_agent)?)];
        if !keep_alive {
            headers.push(("connection".to_string(), "close".to_string()));
        }
        push_cookies(&mut headers, cookies)?;

        Ok(HttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            timeout: timeout_ms.map(Duration::from_millis),
            body: None,
        })
    }

    /// Build a form POST. `encoding` is required even when there is no body.
    pub fn build_post(
        &self,
        url: &str,
        body: Option<&PostBody>,
        timeout_ms: Option<u64>,
        user_agent: Option<&str>,
        encoding: Option<Encoding>,
        cookies: Option<&CookieSet>,
    ) -> Result<HttpRequest, HelperError> {
        let url = require_url(url)?;
        let encoding =
            encoding.ok_or_else(|| HelperError::invalid("encoding", "must be provided for POST"))?;
        let mut headers = vec![
            ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ("user-agent".to_string(), self.user_agent(user_agent)?),
        ];
        push_cookies(&mut headers, cookies)?;

        Ok(HttpRequest {
            method: HttpMethod::Post,
            url,
            headers,
            timeout: timeout_ms.map(Duration::from_millis),
            body: body
                .and_then(PostBody::to_text)
                .map(|text| encoding.encode(&text)),
        })
    }

    pub fn issue_get(
        &self,
        url: &str,
        timeout_ms: Option<u64>,
        keep_alive: bool,
        user_agent: Option<&str>,
        cookies: Option<&CookieSet>,
    ) -> Result<ResponseHandle, HelperError> {
        let request = self.build_get(url, timeout_ms, keep_alive, user_agent, cookies)?;
        self.execute(request)
    }

    /// POST `params` as `k1=v1&k2=v2`, in the order given.
    pub fn issue_post<K, V>(
        &self,
        url: &str,
        params: &[(K, V)],
        timeout_ms: Option<u64>,
        user_agent: Option<&str>,
        encoding: Option<Encoding>,
        cookies: Option<&CookieSet>,
    ) -> Result<ResponseHandle, HelperError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let body = PostBody::form(
            params
                .iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())),
        );
        let request =
            self.build_post(url, Some(&body), timeout_ms, user_agent, encoding, cookies)?;
        self.execute(request)
    }

    /// POST a pre-encoded body verbatim. `None` sends an empty body.
    pub fn issue_post_raw(
        &self,
        url: &str,
        raw: Option<&str>,
        timeout_ms: Option<u64>,
        user_agent: Option<&str>,
        encoding: Option<Encoding>,
        cookies: Option<&CookieSet>,
    ) -> Result<ResponseHandle, HelperError> {
        let body = raw.map(|r| PostBody::Raw(r.to_string()));
        let request =
            self.build_post(url, body.as_ref(), timeout_ms, user_agent, encoding, cookies)?;
        self.execute(request)
    }

    /// Perform the round-trip. The returned handle must be read or dropped
    /// by the caller; nothing here reads the body.
    pub fn execute(&self, request: HttpRequest) -> Result<ResponseHandle, HelperError> {
        let url = require_url(&request.url)?;
        if request.is_secure() && self.config.trust == TrustPolicy::AcceptInvalidCerts {
            tracing::warn!(url = %url, "issuing https request without certificate verification");
        }
        let timeout = request.timeout.or_else(|| self.config.default_timeout());
        tracing::debug!(
            method = request.method.as_str(),
            url = %url,
            timeout_ms = timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
            "issuing request"
        );

        let response = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(url.as_str());
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.config().timeout_global(timeout).build().call()?
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(url.as_str());
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                let body = request.body.unwrap_or_default();
                builder
                    .config()
                    .timeout_global(timeout)
                    .build()
                    .send(&body[..])?
            }
        };

        tracing::debug!(status = response.status().as_u16(), url = %url, "response received");
        Ok(ResponseHandle::new(response))
    }

    fn user_agent(&self, explicit: Option<&str>) -> Result<String, HelperError> {
        let ua = match explicit {
            Some(ua) if !ua.is_empty() => ua,
            _ => self.config.fallback_user_agent(),
        };
        if ua.chars().any(char::is_control) {
            return Err(HelperError::invalid(
                "user_agent",
                "must not contain control characters",
            ));
        }
        Ok(ua.to_string())
    }
}

impl fmt::Debug for RequestIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestIssuer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn require_url(url: &str) -> Result<String, HelperError> {
    if url.is_empty() {
        return Err(HelperError::invalid("url", "must not be empty"));
    }
    Ok(url.to_string())
}

fn push_cookies(
    headers: &mut Vec<(String, String)>,
    cookies: Option<&CookieSet>,
) -> Result<(), HelperError> {
    if let Some(header) = cookies.map(CookieSet::to_header).transpose()?.flatten() {
        headers.push(("cookie".to_string(), header));
    }
    Ok(())
}
