//! # Controller SDK
//!
//! A Rust SDK for the Deis Workflow controller API, providing type-safe
//! configuration, a request executor with a closed error taxonomy, a
//! pagination walker and merge-patch documents for partial updates.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for the controller URL, token and API version
//! - An async [`Client`] that attaches the `token` authorization and checks
//!   the controller's advertised API version on every response
//! - Classified failures via [`ApiError`] and [`ErrorKind`]
//! - Offset/limit pagination via [`Client::fetch_limited`]
//! - Set/unset/absent patch documents via [`rest::PatchMap`]
//! - Resource modules for apps, auth, builds, config, keys, perms, ps,
//!   services, volumes and shared volumes under [`rest::resources`]
//!
//! ## Quick Start
//!
//! ```rust
//! use controller_sdk::{ApiVersion, ClientConfig, ControllerUrl, Token};
//!
//! let config = ClientConfig::builder()
//!     .controller_url(ControllerUrl::new("https://deis.example.com").unwrap())
//!     .token(Token::new("abc"))
//!     .api_version(ApiVersion::current())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.page_size(), 100);
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use controller_sdk::{Client, ErrorKind};
//! use controller_sdk::rest::resources::apps;
//!
//! let client = Client::new(config)?;
//!
//! match apps::get(&client, "example-go").await {
//!     Ok(app) => {
//!         if let Some(mismatch) = app.version_mismatch() {
//!             eprintln!("warning: {mismatch}");
//!         }
//!         println!("{} is owned by {}", app.id, app.owner);
//!     }
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("no such app"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Version Mismatches
//!
//! A response whose `DEIS_API_VERSION` header differs from the configured
//! [`ApiVersion`] is still returned. The mismatch rides along with the data
//! and is logged at `warn` level. Call
//! [`ResourceResponse::strict`](rest::ResourceResponse::strict) to treat it
//! as an error instead.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **No hidden retries**: Every failure reaches the caller

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{ApiVersion, ClientConfig, ClientConfigBuilder, ControllerUrl, Token};
pub use error::ConfigError;

// Re-export request executor types
pub use clients::{
    ApiError, Client, ErrorKind, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse, Page,
    VersionMismatch,
};

// Re-export patch document types
pub use rest::{PatchDocument, PatchField, PatchMap, PatchMode, ResourceResponse};
