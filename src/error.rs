//! Error types for the controller SDK.
//!
//! This module contains error types used throughout the SDK for configuration
//! and validation errors. Errors produced while talking to the controller live
//! in [`crate::clients::ApiError`].
//!
//! # Example
//!
//! ```rust
//! use controller_sdk::{ConfigError, ControllerUrl};
//!
//! let result = ControllerUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidControllerUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The controller URL is invalid.
    #[error("Invalid controller URL '{url}'. Please provide an http or https URL (e.g., 'https://deis.example.com').")]
    InvalidControllerUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'MAJOR.MINOR' (e.g., '2.3').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Page size must be positive.
    #[error("Invalid page size {size}. The page size must be greater than zero.")]
    InvalidPageSize {
        /// The rejected page size.
        size: u32,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {reason}")]
    HttpClient {
        /// Why the transport refused to build.
        reason: String,
    },
}
