//! Cookies attached to an outgoing request.
//!
//! # Design
//! A `CookieSet` is the whole container for one request: it renders into a
//! single `cookie` header and keeps the order the caller inserted pairs in.
//! Validation happens when the request is built, so a malformed cookie is an
//! argument error rather than a transport error.

use crate::error::HelperError;

/// A single `name=value` cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Insertion-ordered cookies sent together with a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieSet {
    cookies: Vec<Cookie>,
}

impl CookieSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie, replacing the value of an existing one with the same name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.cookies.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.value = value,
            None => self.cookies.push(Cookie { name, value }),
        }
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Render as a `cookie` header value, or `None` for an empty set.
    pub fn to_header(&self) -> Result<Option<String>, HelperError> {
        if self.cookies.is_empty() {
            return Ok(None);
        }
        for cookie in &self.cookies {
            validate(cookie)?;
        }
        let header = self
            .cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");
        Ok(Some(header))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CookieSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = CookieSet::new();
        for (k, v) in iter {
            set.add(k, v);
        }
        set
    }
}

fn validate(cookie: &Cookie) -> Result<(), HelperError> {
    if cookie.name.is_empty() {
        return Err(HelperError::invalid("cookies", "cookie name must not be empty"));
    }
    if cookie
        .name
        .chars()
        .any(|c| c == '=' || c == ';' || c == ',' || c.is_whitespace() || c.is_control())
    {
        return Err(HelperError::invalid(
            "cookies",
            format!("cookie name `{}` contains a reserved character", cookie.name),
        ));
    }
    if cookie.value.chars().any(|c| c == ';' || c.is_control()) {
        return Err(HelperError::invalid(
            "cookies",
            format!("value of cookie `{}` contains a reserved character", cookie.name),
        ));
    }
    Ok(())
}
