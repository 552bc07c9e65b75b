//! Client configuration, created once and shared by every request.
//!
//! # Design
//! Connection limits and the certificate trust policy belong to the agent,
//! not to individual calls. A `RequestIssuer` builds its `ureq::Agent` from a
//! `ClientConfig` exactly once; issuing a request never mutates anything
//! process-wide.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::tls::TlsConfig;

use crate::error::HelperError;

/// User agent sent when neither the request nor the config overrides it.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/4.0 (compatible; MSIE 6.0; Windows NT 5.2; SV1; .NET CLR 1.1.4322; .NET CLR 2.0.50727)";

/// How server certificates are checked on `https` requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrustPolicy {
    /// Verify against the bundled webpki roots.
    #[default]
    System,
    /// Accept any certificate. Logged at `warn` whenever it is in effect.
    AcceptInvalidCerts,
}

/// Agent-wide settings for a `RequestIssuer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub max_idle_connections: usize,
    pub max_idle_connections_per_host: usize,
    pub trust: TrustPolicy,
    /// Applied to requests that do not carry their own timeout.
    pub default_timeout_ms: Option<u64>,
    /// Replaces `DEFAULT_USER_AGENT` for requests without an explicit one.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_idle_connections: 1000,
            max_idle_connections_per_host: 1000,
            trust: TrustPolicy::System,
            default_timeout_ms: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, HelperError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout_ms.map(Duration::from_millis)
    }

    /// The user agent used when a request gives none.
    pub fn fallback_user_agent(&self) -> &str {
        match self.user_agent.as_deref() {
            Some(ua) if !ua.is_empty() => ua,
            _ => DEFAULT_USER_AGENT,
        }
    }

    pub(crate) fn build_agent(&self) -> ureq::Agent {
        let tls = match self.trust {
            TrustPolicy::System => TlsConfig::builder().build(),
            TrustPolicy::AcceptInvalidCerts => {
                tracing::warn!("certificate verification is disabled for this client");
                TlsConfig::builder().disable_verification(true).build()
            }
        };

        ureq::Agent::config_builder()
            .max_idle_connections(self.max_idle_connections)
            .max_idle_connections_per_host(self.max_idle_connections_per_host)
            .http_status_as_error(false)
            .tls_config(tls)
            .build()
            .new_agent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_trust_the_system_roots() {
        let config = ClientConfig::default();
        assert_eq!(config.trust, TrustPolicy::System);
        assert_eq!(config.max_idle_connections, 1000);
        assert_eq!(config.fallback_user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ClientConfig::from_json_str(r#"{"default_timeout_ms": 2500}"#).unwrap();
        assert_eq!(config.default_timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(config.max_idle_connections_per_host, 1000);
        assert_eq!(config.trust, TrustPolicy::System);
    }

    #[test]
    fn insecure_trust_is_opt_in_by_name() {
        let config = ClientConfig::from_json_str(r#"{"trust": "accept-invalid-certs"}"#).unwrap();
        assert_eq!(config.trust, TrustPolicy::AcceptInvalidCerts);
    }

    #[test]
    fn empty_user_agent_override_falls_back() {
        let config = ClientConfig {
            user_agent: Some(String::new()),
            ..ClientConfig::default()
        };
        assert_eq!(config.fallback_user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = ClientConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, HelperError::Config(_)));
    }
}
