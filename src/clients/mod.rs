//! Request plumbing shared by every resource module.
//!
//! This module provides the three building blocks every controller call is
//! made of: the request executor, the error taxonomy and the pagination
//! walker.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Client`]: The async executor for controller requests
//! - [`HttpRequest`]: A request to be sent to the controller
//! - [`HttpResponse`]: A successful response, with any version mismatch attached
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, PATCH, DELETE)
//! - [`ApiError`]: The classified failure of a call
//! - [`ErrorKind`]: The fieldless discriminant of [`ApiError`]
//! - [`Page`]: The aggregated outcome of [`Client::fetch_limited`]
//!
//! # Example
//!
//! ```rust,no_run
//! use controller_sdk::{Client, ClientConfig, ControllerUrl, Token};
//! use controller_sdk::clients::{ErrorKind, HttpMethod};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(
//!     ClientConfig::builder()
//!         .controller_url(ControllerUrl::new("https://deis.example.com")?)
//!         .token(Token::new("abc"))
//!         .build()?,
//! )?;
//!
//! match client.request(HttpMethod::Get, "/v2/apps/missing/", None).await {
//!     Ok(response) => println!("{}", response.text()),
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("no such app"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Retry Behavior
//!
//! The client never retries. Any retry or backoff policy belongs to the
//! caller.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod pagination;

pub use errors::{
    check_version, classify, classify_status, extract_detail, ApiError, ErrorKind,
    VersionMismatch, CANCELLATION_MARKER, CANCEL_PATH_SUFFIX,
};
pub use http_client::{Client, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, API_VERSION_HEADER};
pub use pagination::{cursor_path, ListEnvelope, Page};
