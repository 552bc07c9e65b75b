//! Error types for the request issuer.
//!
//! # Design
//! Argument problems get their own variant because they are raised before any
//! network I/O and callers can always fix them locally. Everything the
//! transport reports is passed through untouched in `Transport`, with no
//! retry and no reclassification.

use thiserror::Error;

/// Errors returned by `RequestIssuer` and `ClientConfig`.
#[derive(Debug, Error)]
pub enum HelperError {
    /// A required argument was empty, absent or malformed.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// DNS, connect, TLS, timeout, protocol or body-read failure from the
    /// transport.
    #[error(transparent)]
    Transport(#[from] ureq::Error),

    /// A client configuration document could not be parsed.
    #[error("client config: {0}")]
    Config(#[from] serde_json::Error),
}

impl HelperError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        HelperError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Name of the offending argument, if this is an argument error.
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            HelperError::InvalidArgument { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_display_names_the_argument() {
        let err = HelperError::invalid("url", "must not be empty");
        assert_eq!(err.to_string(), "invalid argument `url`: must not be empty");
        assert_eq!(err.argument(), Some("url"));
    }

    #[test]
    fn config_errors_are_not_argument_errors() {
        let err = HelperError::from(serde_json::from_str::<u8>("x").unwrap_err());
        assert_eq!(err.argument(), None);
    }
}
