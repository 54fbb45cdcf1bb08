//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;
use url::Url;

/// A validated controller base URL.
///
/// The URL must use the `http` or `https` scheme and name a host. Any
/// trailing slash is stripped so request paths can be appended directly.
///
/// # Example
///
/// ```rust
/// use controller_sdk::ControllerUrl;
///
/// let url = ControllerUrl::new("https://deis.example.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://deis.example.com");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), Some("deis.example.com"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerUrl {
    raw: String,
    parsed: Url,
}

impl ControllerUrl {
    /// Creates a new validated controller URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidControllerUrl`] if the URL does not parse,
    /// is not `http`/`https`, or has no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidControllerUrl { url: url.clone() };

        let parsed = Url::parse(&trimmed).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(invalid());
        }

        Ok(Self {
            raw: trimmed,
            parsed,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.parsed.scheme()
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.parsed.host_str()
    }

    /// Joins a request path onto the controller URL.
    ///
    /// The path may or may not start with `/`; exactly one separator is used.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.raw, path.trim_start_matches('/'))
    }

    /// Returns the path prefix of the controller URL without a trailing
    /// slash, or `""` when the controller is served from the root.
    #[must_use]
    pub fn base_path(&self) -> &str {
        self.parsed.path().trim_end_matches('/')
    }

    /// Strips the controller's path prefix from a server-issued path so it
    /// can be passed back to [`join`](Self::join).
    ///
    /// Paths outside the prefix are returned unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use controller_sdk::ControllerUrl;
    ///
    /// let url = ControllerUrl::new("https://example.com/deis").unwrap();
    /// assert_eq!(url.strip_base("/deis/v2/apps/?offset=1"), "/v2/apps/?offset=1");
    /// assert_eq!(url.strip_base("/v2/apps/"), "/v2/apps/");
    /// ```
    #[must_use]
    pub fn strip_base<'a>(&self, path: &'a str) -> &'a str {
        let base = self.base_path();
        if base.is_empty() {
            return path;
        }
        match path.strip_prefix(base) {
            Some(rest) if rest.starts_with('/') => rest,
            Some("") => "/",
            _ => path,
        }
    }
}

impl AsRef<str> for ControllerUrl {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ControllerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// An authentication token issued by the controller.
///
/// Sent as `Authorization: token <value>` on every request. An empty token
/// means "anonymous" and suppresses the header entirely, which is what
/// registration and login calls need.
///
/// # Security
///
/// The `Debug` implementation masks the token, displaying only
/// `Token(*****)` instead of the actual value.
///
/// # Example
///
/// ```rust
/// use controller_sdk::Token;
///
/// let token = Token::new("abc123");
/// assert_eq!(token.as_ref(), "abc123");
/// assert_eq!(format!("{:?}", token), "Token(*****)");
/// assert!(Token::anonymous().is_anonymous());
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wraps a token value.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns an empty token; no `Authorization` header will be sent.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(String::new())
    }

    /// Returns `true` if the token is empty.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(*****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_url_strips_trailing_slash() {
        let url = ControllerUrl::new("http://localhost:8000/").unwrap();
        assert_eq!(url.as_ref(), "http://localhost:8000");
        assert_eq!(url.host_name(), Some("localhost"));
    }

    #[test]
    fn test_controller_url_strips_its_own_path_prefix() {
        let url = ControllerUrl::new("https://example.com/deis/").unwrap();
        assert_eq!(url.base_path(), "/deis");
        assert_eq!(url.strip_base("/deis/v2/apps/?limit=1"), "/v2/apps/?limit=1");
        assert_eq!(url.strip_base("/deis"), "/");
        assert_eq!(url.strip_base("/deisv2/apps/"), "/deisv2/apps/");
        assert_eq!(url.strip_base("/v2/apps/"), "/v2/apps/");

        let root = ControllerUrl::new("https://example.com").unwrap();
        assert_eq!(root.base_path(), "");
        assert_eq!(root.strip_base("/v2/apps/"), "/v2/apps/");
    }

    #[test]
    fn test_controller_url_rejects_invalid() {
        for bad in ["", "not a url", "ftp://deis.example.com", "localhost:8000"] {
            let result = ControllerUrl::new(bad);
            assert!(
                matches!(result, Err(ConfigError::InvalidControllerUrl { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_controller_url_join_handles_leading_slash() {
        let url = ControllerUrl::new("https://deis.example.com").unwrap();
        assert_eq!(url.join("/v2/apps/"), "https://deis.example.com/v2/apps/");
        assert_eq!(url.join("v2/apps/"), "https://deis.example.com/v2/apps/");
    }

    #[test]
    fn test_token_masks_value_in_debug() {
        let token = Token::new("super-secret");
        let debug = format!("{token:?}");
        assert_eq!(debug, "Token(*****)");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_token_anonymous_is_empty() {
        assert!(Token::anonymous().is_anonymous());
        assert!(Token::default().is_anonymous());
        assert!(!Token::new("x").is_anonymous());
    }
}
