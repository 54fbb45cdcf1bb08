//! Request executor for controller API communication.
//!
//! This module provides the [`Client`] type, which sends one request at a
//! time with the configured token, reads the complete response body and
//! classifies the outcome.

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::{check_version, classify_status, ApiError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ClientConfig;
use crate::error::ConfigError;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Client for the controller API.
///
/// The client handles:
/// - URL construction from the configured controller URL
/// - Default headers including User-Agent and the `token` authorization
/// - Status classification into [`ApiError`]
/// - API version comparison against the `DEIS_API_VERSION` header
///
/// It never retries. A request either completes or its error is returned
/// to the caller.
///
/// # Thread Safety
///
/// `Client` is immutable after construction and `Send + Sync`. Cloning is
/// cheap and clones share the underlying connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use controller_sdk::{Client, ClientConfig, ControllerUrl, Token};
/// use controller_sdk::clients::HttpMethod;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::builder()
///     .controller_url(ControllerUrl::new("https://deis.example.com")?)
///     .token(Token::new("abc"))
///     .build()?;
/// let client = Client::new(config)?;
///
/// let response = client.request(HttpMethod::Get, "/v2/apps/example-go/", None).await?;
/// if let Some(mismatch) = &response.version_mismatch {
///     eprintln!("{mismatch}");
/// }
/// let app: serde_json::Value = response.json()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    /// The internal reqwest HTTP client.
    http: reqwest::Client,
    /// The immutable configuration this client was built from.
    config: ClientConfig,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: HashMap<&str, &str> = self
            .default_headers
            .iter()
            .map(|(key, value)| {
                let value = if key.eq_ignore_ascii_case("Authorization") {
                    "token *****"
                } else {
                    value.as_str()
                };
                (key.as_str(), value)
            })
            .collect();

        f.debug_struct("Client")
            .field("config", &self.config)
            .field("default_headers", &headers)
            .finish_non_exhaustive()
    }
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client {
    /// Creates a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the underlying transport
    /// cannot be initialized (for example, TLS setup fails).
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Controller SDK v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        if !config.token().is_anonymous() {
            default_headers.insert(
                "Authorization".to_string(),
                format!("token {}", config.token().as_ref()),
            );
        }

        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(!config.ssl_verify())
            .build()
            .map_err(|e| ConfigError::HttpClient {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            config,
            default_headers,
        })
    }

    /// Returns the configuration this client was built from.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends `body` to `path` with the given method.
    ///
    /// Shorthand for building an [`HttpRequest`] and passing it to
    /// [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, ApiError> {
        let mut builder = HttpRequest::builder(method, path);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        self.execute(builder.build()).await
    }

    /// Sends a request to the controller.
    ///
    /// The full response body is read before classification. A 2xx response
    /// is returned even when the controller advertises a different API
    /// version; the mismatch is recorded in
    /// [`HttpResponse::version_mismatch`] and logged at `warn` level.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if no response is received, or the
    /// classified status error for any non-2xx response.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = self.config.controller_url().join(&request.path);

        tracing::debug!("{} {}", request.http_method, request.path);

        let mut req_builder = self.http.request(request.http_method.as_reqwest(), &url);

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = request.body {
            req_builder = req_builder
                .header("Content-Type", "application/json")
                .body(body);
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?.to_vec();

        tracing::debug!(
            "{} {} returned {} ({} bytes)",
            request.http_method,
            request.path,
            code,
            body.len()
        );

        if let Some(error) = classify_status(&request.path, code, &body) {
            return Err(error);
        }

        let response = HttpResponse::new(code, headers, body);
        let mismatch = check_version(self.config.api_version(), response.api_version());
        if let Some(mismatch) = &mismatch {
            tracing::warn!(
                "API version mismatch on {}: client {}, server {}",
                request.path,
                mismatch.expected,
                mismatch.advertised.as_deref().unwrap_or("unknown")
            );
        }

        Ok(response.with_version_mismatch(mismatch))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ControllerUrl, Token};

    fn create_test_config() -> ClientConfig {
        ClientConfig::builder()
            .controller_url(ControllerUrl::new("https://deis.example.com").unwrap())
            .token(Token::new("abc"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = Client::new(create_test_config()).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("Controller SDK v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ClientConfig::builder()
            .controller_url(ControllerUrl::new("https://deis.example.com").unwrap())
            .user_agent_prefix("deis-cli/2.0")
            .build()
            .unwrap();
        let client = Client::new(config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("deis-cli/2.0 | "));
        assert!(user_agent.contains("Controller SDK"));
    }

    #[test]
    fn test_token_authorization_header() {
        let client = Client::new(create_test_config()).unwrap();

        assert_eq!(
            client.default_headers().get("Authorization"),
            Some(&"token abc".to_string())
        );
    }

    #[test]
    fn test_no_authorization_header_when_anonymous() {
        let config = create_test_config().with_token(Token::anonymous());
        let client = Client::new(config).unwrap();

        assert!(client.default_headers().get("Authorization").is_none());
    }

    #[test]
    fn test_debug_output_masks_token() {
        let config = create_test_config().with_token(Token::new("s3cr3t-token"));
        let client = Client::new(config).unwrap();

        let debug = format!("{client:?}");
        assert!(!debug.contains("s3cr3t-token"));
        assert!(debug.contains("token *****"));
        assert!(debug.contains("Token(*****)"));
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = Client::new(create_test_config()).unwrap();

        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_client_builds_without_ssl_verification() {
        let config = ClientConfig::builder()
            .controller_url(ControllerUrl::new("https://self-signed.local").unwrap())
            .ssl_verify(false)
            .build()
            .unwrap();

        let client = Client::new(config).unwrap();
        assert!(!client.config().ssl_verify());
    }
}
