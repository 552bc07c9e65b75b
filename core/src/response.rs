//! The caller-owned handle to a live response.
//!
//! # Design
//! The handle owns the response and its unread body. Reading consumes or
//! borrows the body; dropping the handle (or calling `close`) releases the
//! connection back to the agent's pool, so a forgotten close cannot exhaust
//! connections.

use std::fmt;

use ureq::http::Response;
use ureq::{Body, BodyReader};

use crate::error::HelperError;

/// An open HTTP response. Status codes of every class are returned as data.
pub struct ResponseHandle {
    inner: Response<Body>,
}

impl ResponseHandle {
    pub(crate) fn new(inner: Response<Body>) -> Self {
        Self { inner }
    }

    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// First value of the header `name`, if it is valid text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    pub fn headers(&self) -> Vec<(String, String)> {
        self.inner
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }

    /// Read the remaining body as UTF-8 text.
    pub fn read_to_string(&mut self) -> Result<String, HelperError> {
        Ok(self.inner.body_mut().read_to_string()?)
    }

    /// Read the remaining body as raw bytes.
    pub fn read_to_vec(&mut self) -> Result<Vec<u8>, HelperError> {
        Ok(self.inner.body_mut().read_to_vec()?)
    }

    /// Stream the body. The connection is released when the reader drops.
    pub fn into_reader(self) -> BodyReader<'static> {
        self.inner.into_body().into_reader()
    }

    pub fn into_inner(self) -> Response<Body> {
        self.inner
    }

    /// Release the connection without reading the rest of the body.
    pub fn close(self) {
        drop(self);
    }
}

impl fmt::Debug for ResponseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseHandle")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
