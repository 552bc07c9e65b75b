//! Bounded HTTP requests and bounded actions.
//!
//! # Overview
//! Two independent pieces:
//! - `RequestIssuer` builds a single GET or POST as plain data
//!   (`HttpRequest`), validating every argument before any I/O, and then
//!   issues it, handing the live `ResponseHandle` to the caller.
//! - `run_with_timeout` runs an action on a worker thread and reports
//!   whether it finished within a wall-clock bound, cancelling the action's
//!   `CancelToken` when it did not.
//!
//! # Design
//! - Connection limits and certificate trust live in `ClientConfig`, applied
//!   once when the issuer is created. Issuing a request touches no global
//!   state.
//! - Certificate verification is on unless the caller opts out with
//!   `TrustPolicy::AcceptInvalidCerts`, which is logged at `warn`.
//! - Transport failures pass through unchanged as `HelperError::Transport`.

pub mod config;
pub mod cookies;
pub mod encoding;
pub mod error;
pub mod http;
pub mod issuer;
pub mod response;
pub mod runner;

pub use config::{ClientConfig, TrustPolicy, DEFAULT_USER_AGENT};
pub use cookies::{Cookie, CookieSet};
pub use encoding::Encoding;
pub use error::HelperError;
pub use http::{HttpMethod, HttpRequest, PostBody};
pub use issuer::RequestIssuer;
pub use response::ResponseHandle;
pub use runner::{run_with_timeout, run_with_timeout_ms, CancelToken, Cancelled};
