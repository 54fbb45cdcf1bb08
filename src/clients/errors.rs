//! Classified error types for controller API calls.
//!
//! Every failed call against the controller is reported as exactly one
//! [`ApiError`] variant. Classification is a pure function of the request
//! path, the response status, the response body and the advertised API
//! version, so it can be tested without a server.
//!
//! # Error Handling
//!
//! - **401/403**: [`ApiError::Unauthorized`]
//! - **400**: [`ApiError::BadRequest`]
//! - **404**: [`ApiError::NotFound`]
//! - **409**: [`ApiError::Conflict`], or [`ApiError::CancellationFailed`] when
//!   an account cancellation is refused because applications are still owned
//! - **422**: [`ApiError::Unprocessable`]
//! - **5xx**: [`ApiError::ServerFault`]
//! - **Other non-2xx**: [`ApiError::UnexpectedStatus`]
//! - **Version header differs**: [`ApiError::VersionMismatch`] (non-fatal)
//! - **No response**: [`ApiError::Transport`]
//! - **Undecodable body**: [`ApiError::Decode`]
//!
//! # Example
//!
//! ```rust
//! use controller_sdk::clients::{classify_status, ErrorKind};
//!
//! let error = classify_status("/v2/apps/missing/", 404, br#"{"detail":"Not found."}"#)
//!     .unwrap();
//! assert_eq!(error.kind(), ErrorKind::NotFound);
//! assert_eq!(error.detail(), Some("Not found."));
//! assert_eq!(error.to_string(), "404 Not Found: Not found.");
//!
//! assert!(classify_status("/v2/apps/", 200, b"{}").is_none());
//! ```

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ApiVersion;

/// Path suffix of the account cancellation endpoint.
pub const CANCEL_PATH_SUFFIX: &str = "/v2/auth/cancel/";

/// Body fragment the controller uses when refusing to cancel an account.
pub const CANCELLATION_MARKER: &str = "still has applications assigned";

/// The fieldless discriminant of an [`ApiError`].
///
/// Useful for matching on the kind of failure without caring about the
/// attached detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or rejected credentials (401/403).
    Unauthorized,
    /// Malformed request (400).
    BadRequest,
    /// Resource does not exist (404).
    NotFound,
    /// Request conflicts with server state (409).
    Conflict,
    /// Account cancellation refused because applications are still owned.
    CancellationFailed,
    /// Semantically invalid request (422).
    Unprocessable,
    /// Server-side failure (5xx).
    ServerFault,
    /// Any other non-success status.
    UnexpectedStatus,
    /// The server advertised a different API version.
    VersionMismatch,
    /// No response was received.
    Transport,
    /// The response body could not be decoded.
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthorized => "unauthorized",
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::CancellationFailed => "cancellation_failed",
            Self::Unprocessable => "unprocessable",
            Self::ServerFault => "server_fault",
            Self::UnexpectedStatus => "unexpected_status",
            Self::VersionMismatch => "version_mismatch",
            Self::Transport => "transport",
            Self::Decode => "decode",
        };
        f.write_str(name)
    }
}

/// A difference between the API version the client expects and the version
/// the controller advertised in its `DEIS_API_VERSION` header.
///
/// A mismatch never prevents a response body from being used. `compatible`
/// records whether the server still satisfies [`ApiVersion::accepts`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionMismatch {
    /// The version the client was configured with.
    pub expected: ApiVersion,
    /// The raw header value, or `None` if the header was missing.
    pub advertised: Option<String>,
    /// Whether the advertised version is wire-compatible with `expected`.
    pub compatible: bool,
}

impl fmt::Display for VersionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let advertised = self.advertised.as_deref().unwrap_or("unknown");
        write!(
            f,
            "Client and server API versions do not match (client {}, server {advertised}). Please consider upgrading.",
            self.expected
        )
    }
}

/// A classified failure from a controller API call.
///
/// Only [`ApiError::VersionMismatch`] is non-fatal: see [`ApiError::is_fatal`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or rejected credentials.
    #[error("{}{}", status_line(.status), suffix(.detail))]
    Unauthorized {
        /// 401 or 403.
        status: u16,
        /// Server-provided explanation, if any.
        detail: Option<String>,
    },

    /// The server rejected the request's fields.
    #[error("400 Bad Request{}", suffix(.detail))]
    BadRequest {
        /// Server-provided field messages, if any.
        detail: Option<String>,
    },

    /// The resource does not exist.
    #[error("404 Not Found{}", suffix(.detail))]
    NotFound {
        /// Server-provided explanation, if any.
        detail: Option<String>,
    },

    /// The request conflicts with the current server state.
    #[error("409 Conflict{}", suffix(.detail))]
    Conflict {
        /// Server-provided explanation, if any.
        detail: Option<String>,
    },

    /// The account could not be cancelled because it still owns applications.
    #[error("the account still has applications assigned. Delete or change ownership of the applications and try again")]
    CancellationFailed {
        /// Server-provided explanation, if any.
        detail: Option<String>,
    },

    /// The request was well-formed but semantically invalid.
    #[error("422 Unprocessable Entity{}", suffix(.detail))]
    Unprocessable {
        /// Server-provided explanation, if any.
        detail: Option<String>,
    },

    /// The controller failed while handling the request.
    #[error("{}{}", status_line(.status), suffix(.detail))]
    ServerFault {
        /// The 5xx status code.
        status: u16,
        /// Server-provided explanation, if any.
        detail: Option<String>,
    },

    /// A non-success status outside the classified set.
    #[error("{}{}", status_line(.status), suffix(.detail))]
    UnexpectedStatus {
        /// The status code.
        status: u16,
        /// Server-provided explanation, if any.
        detail: Option<String>,
    },

    /// The controller speaks a different API version.
    #[error("{0}")]
    VersionMismatch(VersionMismatch),

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::CancellationFailed { .. } => ErrorKind::CancellationFailed,
            Self::Unprocessable { .. } => ErrorKind::Unprocessable,
            Self::ServerFault { .. } => ErrorKind::ServerFault,
            Self::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            Self::VersionMismatch(_) => ErrorKind::VersionMismatch,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Returns the HTTP status that produced this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. }
            | Self::ServerFault { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::BadRequest { .. } => Some(400),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } | Self::CancellationFailed { .. } => Some(409),
            Self::Unprocessable { .. } => Some(422),
            Self::VersionMismatch(_) | Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Returns the diagnostic detail extracted from the response body.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail, .. }
            | Self::BadRequest { detail }
            | Self::NotFound { detail }
            | Self::Conflict { detail }
            | Self::CancellationFailed { detail }
            | Self::Unprocessable { detail }
            | Self::ServerFault { detail, .. }
            | Self::UnexpectedStatus { detail, .. } => detail.as_deref(),
            Self::VersionMismatch(_) | Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Returns `false` only for [`ApiError::VersionMismatch`].
    ///
    /// A non-fatal error is reported alongside a usable response body.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::VersionMismatch(_))
    }

    /// Returns the carried version mismatch, if this is one.
    #[must_use]
    pub const fn as_version_mismatch(&self) -> Option<&VersionMismatch> {
        match self {
            Self::VersionMismatch(mismatch) => Some(mismatch),
            _ => None,
        }
    }
}

impl From<VersionMismatch> for ApiError {
    fn from(mismatch: VersionMismatch) -> Self {
        Self::VersionMismatch(mismatch)
    }
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
    assert_send_sync::<VersionMismatch>();
};

/// Classifies a response status.
///
/// Returns `None` for 2xx statuses. Every other status maps to exactly one
/// fatal [`ApiError`] carrying the detail extracted from `body`.
#[must_use]
pub fn classify_status(path: &str, status: u16, body: &[u8]) -> Option<ApiError> {
    if (200..300).contains(&status) {
        return None;
    }

    let detail = extract_detail(body);
    let error = match status {
        401 | 403 => ApiError::Unauthorized { status, detail },
        400 => ApiError::BadRequest { detail },
        404 => ApiError::NotFound { detail },
        409 if is_cancellation_refusal(path, body) => ApiError::CancellationFailed { detail },
        409 => ApiError::Conflict { detail },
        422 => ApiError::Unprocessable { detail },
        500..=599 => ApiError::ServerFault { status, detail },
        _ => ApiError::UnexpectedStatus { status, detail },
    };
    Some(error)
}

/// Compares the advertised API version against the expected one.
///
/// A missing header counts as a mismatch. Returns `None` only when the
/// advertised version equals `expected`.
#[must_use]
pub fn check_version(expected: &ApiVersion, advertised: Option<&str>) -> Option<VersionMismatch> {
    let parsed = advertised.and_then(|raw| raw.parse::<ApiVersion>().ok());
    if parsed.as_ref() == Some(expected) {
        return None;
    }

    Some(VersionMismatch {
        expected: *expected,
        advertised: advertised.map(str::to_string),
        compatible: parsed.is_some_and(|server| expected.accepts(&server)),
    })
}

/// Classifies a complete response.
///
/// A status failure takes precedence over a version mismatch, since a
/// failed response has no body worth keeping.
#[must_use]
pub fn classify(
    path: &str,
    status: u16,
    body: &[u8],
    expected: &ApiVersion,
    advertised: Option<&str>,
) -> Option<ApiError> {
    classify_status(path, status, body)
        .or_else(|| check_version(expected, advertised).map(ApiError::VersionMismatch))
}

fn is_cancellation_refusal(path: &str, body: &[u8]) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    path.ends_with(CANCEL_PATH_SUFFIX) && String::from_utf8_lossy(body).contains(CANCELLATION_MARKER)
}

/// Pulls a human-readable message out of an error body.
///
/// The controller usually answers with `{"detail": "..."}`. Validation
/// failures come back as an object of field name to message list, which is
/// flattened into `field: message` lines.
#[must_use]
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return Some(text.to_string());
    };

    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(detail)) = map.get("detail") {
                return Some(detail.clone());
            }
            let lines: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{key}: {}", render_value(value)))
                .collect();
            if lines.is_empty() {
                None
            } else {
                Some(lines.join("\n"))
            }
        }
        serde_json::Value::String(message) => Some(message),
        other => Some(render_value(&other)),
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn status_line(status: &u16) -> String {
    StatusCode::from_u16(*status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map_or_else(|| status.to_string(), |reason| format!("{status} {reason}"))
}

fn suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map_or_else(String::new, |detail| format!(": {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(path: &str, status: u16, body: &str) -> ErrorKind {
        classify_status(path, status, body.as_bytes())
            .map(|e| e.kind())
            .expect("non-2xx status should classify")
    }

    #[test]
    fn test_success_statuses_are_not_errors() {
        for status in [200, 201, 204, 299] {
            assert!(classify_status("/v2/apps/", status, b"").is_none());
        }
    }

    #[test]
    fn test_classification_table() {
        assert_eq!(kind_of("/v2/apps/", 401, ""), ErrorKind::Unauthorized);
        assert_eq!(kind_of("/v2/apps/", 403, ""), ErrorKind::Unauthorized);
        assert_eq!(kind_of("/v2/apps/", 400, ""), ErrorKind::BadRequest);
        assert_eq!(kind_of("/v2/apps/", 404, ""), ErrorKind::NotFound);
        assert_eq!(kind_of("/v2/apps/", 409, ""), ErrorKind::Conflict);
        assert_eq!(kind_of("/v2/apps/", 422, ""), ErrorKind::Unprocessable);
        assert_eq!(kind_of("/v2/apps/", 500, ""), ErrorKind::ServerFault);
        assert_eq!(kind_of("/v2/apps/", 503, ""), ErrorKind::ServerFault);
        assert_eq!(kind_of("/v2/apps/", 405, ""), ErrorKind::UnexpectedStatus);
        assert_eq!(kind_of("/v2/apps/", 302, ""), ErrorKind::UnexpectedStatus);
    }

    #[test]
    fn test_status_is_preserved() {
        let error = classify_status("/v2/apps/", 403, b"").unwrap();
        assert_eq!(error.status(), Some(403));
        assert_eq!(error.to_string(), "403 Forbidden");

        let error = classify_status("/v2/apps/", 502, b"").unwrap();
        assert_eq!(error.status(), Some(502));
        assert_eq!(error.to_string(), "502 Bad Gateway");
    }

    #[test]
    fn test_conflict_on_cancel_with_marker_is_cancellation_failed() {
        let body = r#"{"detail":"foo still has applications assigned. Delete or transfer ownership"}"#;
        let error = classify_status("/v2/auth/cancel/", 409, body.as_bytes()).unwrap();

        assert_eq!(error.kind(), ErrorKind::CancellationFailed);
        assert_eq!(error.status(), Some(409));
        assert!(error.to_string().contains("still has applications assigned"));
    }

    #[test]
    fn test_conflict_on_cancel_without_marker_stays_conflict() {
        let body = r#"{"detail":"something else"}"#;
        assert_eq!(kind_of("/v2/auth/cancel/", 409, body), ErrorKind::Conflict);
    }

    #[test]
    fn test_conflict_elsewhere_with_marker_stays_conflict() {
        let body = r#"{"detail":"foo still has applications assigned"}"#;
        assert_eq!(kind_of("/v2/apps/foo/", 409, body), ErrorKind::Conflict);
    }

    #[test]
    fn test_error_messages_match_controller_wording() {
        assert_eq!(
            classify_status("/", 401, b"").unwrap().to_string(),
            "401 Unauthorized"
        );
        assert_eq!(
            classify_status("/", 409, b"").unwrap().to_string(),
            "409 Conflict"
        );
        assert_eq!(
            classify_status("/", 422, b"").unwrap().to_string(),
            "422 Unprocessable Entity"
        );
        assert_eq!(
            classify_status("/", 500, b"").unwrap().to_string(),
            "500 Internal Server Error"
        );
    }

    #[test]
    fn test_extract_detail_prefers_detail_field() {
        assert_eq!(
            extract_detail(br#"{"detail":"Invalid token.","other":"x"}"#),
            Some("Invalid token.".to_string())
        );
    }

    #[test]
    fn test_extract_detail_flattens_field_errors() {
        let detail = extract_detail(br#"{"id":["App with this id already exists."],"owner":["bad","worse"]}"#);
        assert_eq!(
            detail,
            Some("id: App with this id already exists.\nowner: bad, worse".to_string())
        );
    }

    #[test]
    fn test_extract_detail_handles_plain_text_and_empty() {
        assert_eq!(
            extract_detail(b"  upstream timed out \n"),
            Some("upstream timed out".to_string())
        );
        assert_eq!(extract_detail(b""), None);
        assert_eq!(extract_detail(b"   "), None);
        assert_eq!(extract_detail(b"{}"), None);
    }

    #[test]
    fn test_detail_is_appended_to_message() {
        let error = classify_status("/", 400, br#"{"username":["This field is required."]}"#).unwrap();
        assert_eq!(error.detail(), Some("username: This field is required."));
        assert_eq!(
            error.to_string(),
            "400 Bad Request: username: This field is required."
        );
    }

    #[test]
    fn test_check_version_exact_match_is_none() {
        assert!(check_version(&ApiVersion::new(2, 3), Some("2.3")).is_none());
    }

    #[test]
    fn test_check_version_newer_minor_is_compatible_mismatch() {
        let mismatch = check_version(&ApiVersion::new(2, 3), Some("2.4")).unwrap();
        assert!(mismatch.compatible);
        assert_eq!(mismatch.advertised.as_deref(), Some("2.4"));
    }

    #[test]
    fn test_check_version_incompatible_versions() {
        let expected = ApiVersion::new(2, 3);
        assert!(!check_version(&expected, Some("2.2")).unwrap().compatible);
        assert!(!check_version(&expected, Some("3.3")).unwrap().compatible);
        assert!(!check_version(&expected, Some("garbage")).unwrap().compatible);
    }

    #[test]
    fn test_check_version_missing_header_is_mismatch() {
        let mismatch = check_version(&ApiVersion::new(2, 3), None).unwrap();
        assert!(mismatch.advertised.is_none());
        assert!(!mismatch.compatible);
        assert!(mismatch.to_string().contains("server unknown"));
    }

    #[test]
    fn test_classify_prefers_status_over_version() {
        let expected = ApiVersion::new(2, 3);
        let error = classify("/v2/apps/", 404, b"", &expected, Some("2.9")).unwrap();
        assert_eq!(error.kind(), ErrorKind::NotFound);

        let error = classify("/v2/apps/", 200, b"[]", &expected, Some("2.9")).unwrap();
        assert_eq!(error.kind(), ErrorKind::VersionMismatch);
        assert!(!error.is_fatal());

        assert!(classify("/v2/apps/", 200, b"[]", &expected, Some("2.3")).is_none());
    }

    #[test]
    fn test_only_version_mismatch_is_non_fatal() {
        let mismatch = ApiError::from(VersionMismatch {
            expected: ApiVersion::current(),
            advertised: Some("2.4".to_string()),
            compatible: true,
        });
        assert!(!mismatch.is_fatal());
        assert!(mismatch.as_version_mismatch().is_some());
        assert!(mismatch.status().is_none());

        for status in [400, 401, 404, 409, 422, 500, 418] {
            let error = classify_status("/", status, b"").unwrap();
            assert!(error.is_fatal(), "{status} should be fatal");
            assert!(error.as_version_mismatch().is_none());
        }
    }

    #[test]
    fn test_decode_error_converts_from_serde() {
        let err = serde_json::from_str::<Vec<u8>>("nope").unwrap_err();
        let error: ApiError = err.into();
        assert_eq!(error.kind(), ErrorKind::Decode);
        assert!(error.to_string().starts_with("Failed to decode response body"));
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::CancellationFailed.to_string(), "cancellation_failed");
        assert_eq!(ErrorKind::VersionMismatch.to_string(), "version_mismatch");
    }
}
