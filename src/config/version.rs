//! Controller API version definitions.
//!
//! This module provides the [`ApiVersion`] type used to negotiate with the
//! controller's `DEIS_API_VERSION` response header.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Controller API version, expressed as `MAJOR.MINOR`.
///
/// Every controller response carries the version it speaks in the
/// `DEIS_API_VERSION` header. The client compares that value against the
/// version it was built for and reports any difference as a non-fatal
/// version mismatch.
///
/// # Example
///
/// ```rust
/// use controller_sdk::ApiVersion;
///
/// let version = ApiVersion::current();
/// assert_eq!(version.to_string(), "2.3");
///
/// let parsed: ApiVersion = "2.5".parse().unwrap();
/// assert_eq!(parsed.major(), 2);
/// assert_eq!(parsed.minor(), 5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApiVersion {
    major: u32,
    minor: u32,
}

impl ApiVersion {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Returns the API version this SDK was written against.
    #[must_use]
    pub const fn current() -> Self {
        Self::new(2, 3)
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// Returns the minor component.
    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    /// Returns `true` if a server advertising `server` can be expected to
    /// understand requests built for `self`.
    ///
    /// The server must share the major version and must not be older on the
    /// minor version.
    ///
    /// # Example
    ///
    /// ```rust
    /// use controller_sdk::ApiVersion;
    ///
    /// let client = ApiVersion::new(2, 3);
    /// assert!(client.accepts(&ApiVersion::new(2, 4)));
    /// assert!(!client.accepts(&ApiVersion::new(2, 2)));
    /// assert!(!client.accepts(&ApiVersion::new(3, 0)));
    /// ```
    #[must_use]
    pub const fn accepts(&self, server: &Self) -> bool {
        self.major == server.major && server.minor >= self.minor
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ConfigError::InvalidApiVersion {
            version: trimmed.to_string(),
        };

        let (major, minor) = trimmed.split_once('.').ok_or_else(invalid)?;
        if !is_numeric(major) || !is_numeric(minor) {
            return Err(invalid());
        }

        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}
