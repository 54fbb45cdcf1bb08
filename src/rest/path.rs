//! Path building for controller resources.
//!
//! Resource paths are written as templates with `{name}` placeholders:
//!
//! - `/v2/apps/{app}/`
//! - `/v2/apps/{app}/perms/{username}/`
//! - `/v2/apps/{app}/pods/{type}/{name}/restart/`
//!
//! [`build_path`] substitutes each placeholder with a percent-encoded value,
//! so an identifier can never introduce an extra path segment.
//!
//! # Example
//!
//! ```rust
//! use controller_sdk::rest::build_path;
//!
//! let path = build_path("/v2/apps/{app}/perms/{username}/", &[
//!     ("app", "example-go"),
//!     ("username", "test"),
//! ]);
//! assert_eq!(path, "/v2/apps/example-go/perms/test/");
//! ```

use std::fmt::Display;

/// Builds a path from a template by interpolating identifiers.
///
/// Each `{key}` placeholder is replaced with the percent-encoded value.
/// Placeholders without a matching identifier are left in place.
///
/// # Example
///
/// ```rust
/// use controller_sdk::rest::build_path;
///
/// assert_eq!(build_path("/v2/keys/{id}", &[("id", "a b/c")]), "/v2/keys/a%20b%2Fc");
/// ```
#[must_use]
pub fn build_path<V: Display>(template: &str, ids: &[(&str, V)]) -> String {
    let mut result = template.to_string();

    for (key, value) in ids {
        let placeholder = format!("{{{key}}}");
        let value = value.to_string();
        result = result.replace(&placeholder, &urlencoding::encode(&value));
    }

    result
}
