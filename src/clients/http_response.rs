//! HTTP response types for the controller SDK.
//!
//! This module provides the [`HttpResponse`] type returned by the request
//! executor for every successful (2xx) call.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::clients::errors::{ApiError, VersionMismatch};

/// Name of the header the controller uses to advertise its API version.
pub const API_VERSION_HEADER: &str = "DEIS_API_VERSION";

/// A successful response from the controller.
///
/// The body is kept as raw bytes; decode it with [`HttpResponse::json`].
/// If the controller advertised a different API version, the mismatch is
/// carried alongside the body rather than replacing it.
///
/// # Example
///
/// ```rust
/// use controller_sdk::clients::HttpResponse;
/// use std::collections::HashMap;
///
/// let mut headers = HashMap::new();
/// headers.insert("deis_api_version".to_string(), vec!["2.3".to_string()]);
///
/// let response = HttpResponse::new(200, headers, br#"{"token":"abc"}"#.to_vec());
/// assert!(response.is_ok());
/// assert_eq!(response.api_version(), Some("2.3"));
///
/// let value: serde_json::Value = response.json().unwrap();
/// assert_eq!(value["token"], "abc");
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercase name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: Vec<u8>,
    /// Set when the advertised API version differs from the expected one.
    pub version_mismatch: Option<VersionMismatch>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse` with no version mismatch recorded.
    #[must_use]
    pub const fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        Self {
            code,
            headers,
            body,
            version_mismatch: None,
        }
    }

    /// Attaches a version mismatch to this response.
    #[must_use]
    pub fn with_version_mismatch(mut self, mismatch: Option<VersionMismatch>) -> Self {
        self.version_mismatch = mismatch;
        self
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` if the body is empty or only whitespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `DEIS_API_VERSION` header value, if present.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.header(API_VERSION_HEADER)
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
