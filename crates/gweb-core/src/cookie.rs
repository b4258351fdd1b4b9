//! Request cookie lookup and `Set-Cookie` values.

use std::fmt;

use crate::request::Headers;

/// A cookie to send with a response.
///
/// ```
/// use gweb_core::Cookie;
///
/// let cookie = Cookie::new("session", "abc123").max_age(3600).http_only(true);
/// assert_eq!(cookie.to_string(), "session=abc123; Path=/; Max-Age=3600; HttpOnly");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    path: String,
    domain: Option<String>,
    max_age: Option<i64>,
    secure: bool,
    http_only: bool,
}

impl Cookie {
    /// A cookie scoped to `/` that lasts for the browser session.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: "/".to_owned(),
            domain: None,
            max_age: None,
            secure: false,
            http_only: false,
        }
    }

    /// Restrict the cookie to a path; an empty path means `/`.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = if path.is_empty() { "/".to_owned() } else { path };
        self
    }

    /// Restrict the cookie to a domain and its subdomains.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Lifetime in seconds. Zero or less expires the cookie immediately.
    #[must_use]
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds.max(0));
        self
    }

    /// Only send the cookie over HTTPS.
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Hide the cookie from scripts.
    #[must_use]
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Formats the cookie as a `Set-Cookie` header value.
///
/// Bytes that cannot appear in a cookie value are dropped, and a value
/// holding a space or comma is quoted.
impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value: String = self
            .value
            .chars()
            .filter(|&c| c.is_ascii() && !c.is_ascii_control() && !matches!(c, '"' | ';' | '\\'))
            .collect();
        if value.contains([' ', ',']) {
            write!(f, "{}=\"{value}\"", self.name)?;
        } else {
            write!(f, "{}={value}", self.name)?;
        }

        write!(f, "; Path={}", self.path)?;
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={domain}")?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={max_age}")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}

/// Raw value of the first cookie called `name` in the `Cookie` headers.
pub(crate) fn find<'h>(headers: &'h Headers, name: &str) -> Option<&'h str> {
    headers
        .get_all("Cookie")
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
        })
}
