//! HTTP request types for the controller SDK.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing requests to the controller API.

use std::fmt;

use serde::Serialize;

/// HTTP methods used by the controller API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources and actions.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for merge-patch updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// An HTTP request to be sent to the controller.
///
/// The body is an opaque byte sequence and is sent exactly as supplied.
///
/// # Example
///
/// ```rust
/// use controller_sdk::clients::{HttpRequest, HttpMethod};
///
/// let request = HttpRequest::builder(HttpMethod::Post, "v2/apps/example-go/run")
///     .body(br#"{"command":"echo hi"}"#.to_vec())
///     .build();
///
/// assert_eq!(request.path, "/v2/apps/example-go/run");
/// assert_eq!(request.body.as_deref(), Some(&br#"{"command":"echo hi"}"#[..]));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path relative to the controller URL, always starting with `/`.
    ///
    /// May carry its own query string (pagination cursors do).
    pub path: String,
    /// The raw request body, if any.
    pub body: Option<Vec<u8>>,
    /// Extra query parameters, appended in order.
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<Vec<u8>>,
    query: Vec<(String, String)>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            http_method: method,
            path,
            body: None,
            query: Vec::new(),
        }
    }

    /// Sets the raw request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as JSON and uses it as the request body.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `value` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        Ok(self)
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Builds the [`HttpRequest`].
    #[must_use]
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            query: self.query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_http_method_maps_to_reqwest() {
        assert_eq!(HttpMethod::Patch.as_reqwest(), reqwest::Method::PATCH);
        assert_eq!(HttpMethod::Delete.as_reqwest(), reqwest::Method::DELETE);
    }

    #[test]
    fn test_builder_normalizes_leading_slash() {
        let request = HttpRequest::builder(HttpMethod::Get, "v2/apps/").build();
        assert_eq!(request.path, "/v2/apps/");

        let request = HttpRequest::builder(HttpMethod::Get, "/v2/apps/").build();
        assert_eq!(request.path, "/v2/apps/");
    }

    #[test]
    fn test_builder_creates_bodyless_request() {
        let request = HttpRequest::builder(HttpMethod::Post, "/v2/auth/tokens/").build();

        assert_eq!(request.http_method, HttpMethod::Post);
        assert!(request.body.is_none());
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_body_bytes_are_kept_verbatim() {
        let raw = b"{ \"spaced\" :  true }".to_vec();
        let request = HttpRequest::builder(HttpMethod::Post, "/x")
            .body(raw.clone())
            .build();
        assert_eq!(request.body, Some(raw));
    }

    #[test]
    fn test_json_body_serializes_value() {
        let request = HttpRequest::builder(HttpMethod::Post, "/v2/keys/")
            .json(&json!({"id": "me@host"}))
            .unwrap()
            .build();
        assert_eq!(request.body.unwrap(), br#"{"id":"me@host"}"#.to_vec());
    }

    #[test]
    fn test_builder_with_query_params_keeps_order() {
        let request = HttpRequest::builder(HttpMethod::Get, "/v2/apps/example-go/logs")
            .query_param("log_lines", 10)
            .query_param("b", "a")
            .build();

        assert_eq!(
            request.query,
            vec![
                ("log_lines".to_string(), "10".to_string()),
                ("b".to_string(), "a".to_string())
            ]
        );
    }
}
