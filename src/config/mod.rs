//! Configuration types for the controller SDK.
//!
//! This module provides the configuration used to construct a
//! [`Client`](crate::Client).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: The configuration struct holding all SDK settings
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`ControllerUrl`]: A validated controller base URL
//! - [`Token`]: An authentication token with masked debug output
//! - [`ApiVersion`]: The controller API version the client speaks
//!
//! # Example
//!
//! ```rust
//! use controller_sdk::{ClientConfig, ControllerUrl, Token};
//!
//! let config = ClientConfig::builder()
//!     .controller_url(ControllerUrl::new("https://deis.example.com").unwrap())
//!     .token(Token::new("abc123"))
//!     .build()
//!     .unwrap();
//!
//! assert!(config.ssl_verify());
//! assert_eq!(config.page_size(), 100);
//! ```

mod newtypes;
mod version;

pub use newtypes::{ControllerUrl, Token};
pub use version::ApiVersion;

use crate::error::ConfigError;

/// Number of results requested per page when walking a list endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Configuration for a controller client.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use controller_sdk::{ClientConfig, ControllerUrl};
///
/// let config = ClientConfig::builder()
///     .controller_url(ControllerUrl::new("http://localhost:8000").unwrap())
///     .ssl_verify(false)
///     .build()
///     .unwrap();
///
/// assert!(!config.ssl_verify());
/// assert!(config.token().is_anonymous());
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    controller_url: ControllerUrl,
    token: Token,
    ssl_verify: bool,
    api_version: ApiVersion,
    user_agent_prefix: Option<String>,
    page_size: u32,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the controller base URL.
    #[must_use]
    pub const fn controller_url(&self) -> &ControllerUrl {
        &self.controller_url
    }

    /// Returns the authentication token.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// Returns whether TLS certificates are verified.
    #[must_use]
    pub const fn ssl_verify(&self) -> bool {
        self.ssl_verify
    }

    /// Returns the API version the client expects.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the number of results requested per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns a copy of this configuration carrying a different token.
    ///
    /// Useful after [`login`](crate::rest::resources::auth::login) to move
    /// from an anonymous client to an authenticated one.
    #[must_use]
    pub fn with_token(&self, token: Token) -> Self {
        Self {
            token,
            ..self.clone()
        }
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// The only required field is `controller_url`.
///
/// # Defaults
///
/// - `token`: anonymous (no `Authorization` header)
/// - `ssl_verify`: `true`
/// - `api_version`: [`ApiVersion::current`]
/// - `user_agent_prefix`: `None`
/// - `page_size`: 100
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    controller_url: Option<ControllerUrl>,
    token: Option<Token>,
    ssl_verify: Option<bool>,
    api_version: Option<ApiVersion>,
    user_agent_prefix: Option<String>,
    page_size: Option<u32>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the controller URL (required).
    #[must_use]
    pub fn controller_url(mut self, url: ControllerUrl) -> Self {
        self.controller_url = Some(url);
        self
    }

    /// Sets the authentication token.
    #[must_use]
    pub fn token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets whether TLS certificates should be verified.
    #[must_use]
    pub const fn ssl_verify(mut self, verify: bool) -> Self {
        self.ssl_verify = Some(verify);
        self
    }

    /// Sets the API version the client expects from the controller.
    #[must_use]
    pub const fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the page size used when walking list endpoints.
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Builds the [`ClientConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `controller_url` is
    /// not set, or [`ConfigError::InvalidPageSize`] if the page size is zero.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let controller_url = self
            .controller_url
            .ok_or(ConfigError::MissingRequiredField {
                field: "controller_url",
            })?;

        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::InvalidPageSize { size: page_size });
        }

        Ok(ClientConfig {
            controller_url,
            token: self.token.unwrap_or_default(),
            ssl_verify: self.ssl_verify.unwrap_or(true),
            api_version: self.api_version.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
            page_size,
        })
    }
}
