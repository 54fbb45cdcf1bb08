//! Pagination walker for controller list endpoints.
//!
//! Every list endpoint answers with the same envelope:
//!
//! ```json
//! { "count": 2, "next": "https://host/v2/apps/?limit=1&offset=1", "previous": null, "results": [ ... ] }
//! ```
//!
//! [`Client::fetch_limited`] follows `next` until the caller's limit is
//! satisfied or the server runs out of pages. A walk is all-or-nothing: if
//! any page fails, results from the pages already fetched are dropped and
//! the error is returned.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::clients::errors::{ApiError, VersionMismatch};
use crate::clients::http_client::Client;
use crate::clients::http_request::{HttpMethod, HttpRequest};

/// The list envelope returned by every paginated endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct ListEnvelope {
    /// Total number of results across all pages.
    pub count: u64,
    /// Cursor for the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// Cursor for the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,
    /// Results on this page.
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// The aggregated outcome of a pagination walk.
///
/// # Example
///
/// ```rust
/// use controller_sdk::clients::Page;
/// use serde_json::json;
///
/// let page = Page {
///     results: vec![json!("test"), json!("foo")],
///     count: 5,
///     has_more: true,
///     version_mismatch: None,
/// };
///
/// let names: Vec<String> = page.decode().unwrap();
/// assert_eq!(names, vec!["test", "foo"]);
/// assert_eq!(page.to_bytes().unwrap(), br#"["test","foo"]"#.to_vec());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// Accumulated results, in server order, truncated to the limit.
    pub results: Vec<serde_json::Value>,
    /// The `count` reported by the first page.
    pub count: u64,
    /// Whether the server holds results that were not returned.
    pub has_more: bool,
    /// The first version mismatch seen during the walk, if any.
    pub version_mismatch: Option<VersionMismatch>,
}

impl Page {
    /// Returns the number of accumulated results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if no results were accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Serializes the accumulated results as one JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ApiError> {
        Ok(serde_json::to_vec(&self.results)?)
    }

    /// Decodes every accumulated result into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if any result does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Vec<T>, ApiError> {
        self.results
            .iter()
            .map(|value| T::deserialize(value).map_err(ApiError::from))
            .collect()
    }
}

impl Client {
    /// Walks a paginated list endpoint.
    ///
    /// `limit` controls how much is fetched:
    ///
    /// - `limit < 0`: every page is fetched
    /// - `limit == 0`: only the first page is fetched, its results are
    ///   discarded and only `count` is returned
    /// - `limit > 0`: pages are fetched until at least `limit` results are
    ///   held, then the results are truncated to exactly `limit`
    ///
    /// The first request asks for `limit=<page size>` (or the caller's limit
    /// when that is smaller). Later requests follow the server's `next`
    /// cursor; absolute cursors are re-rooted onto the configured controller
    /// URL, including any path prefix it carries. The walk stops if a cursor
    /// repeats one already fetched.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error raised by any page. Results from pages
    /// fetched before the failure are discarded. A version mismatch is not
    /// fatal and is reported in [`Page::version_mismatch`].
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn run(client: controller_sdk::Client) -> Result<(), controller_sdk::ApiError> {
    /// let page = client.fetch_limited("/v2/apps/", 100).await?;
    /// println!("showing {} of {} apps", page.len(), page.count);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_limited(&self, path: &str, limit: i64) -> Result<Page, ApiError> {
        let page_size = u64::from(self.config().page_size());
        let first_size = u64::try_from(limit)
            .ok()
            .filter(|&wanted| wanted > 0)
            .map_or(page_size, |wanted| wanted.min(page_size));

        let separator = if path.contains('?') { '&' } else { '?' };
        let mut cursor = format!("{path}{separator}limit={first_size}");

        let mut results: Vec<serde_json::Value> = Vec::new();
        let mut count: Option<u64> = None;
        let mut version_mismatch: Option<VersionMismatch> = None;
        let mut visited: HashSet<String> = HashSet::new();

        loop {
            let request = HttpRequest::builder(HttpMethod::Get, cursor.as_str()).build();
            let response = self.execute(request).await?;
            if version_mismatch.is_none() {
                version_mismatch.clone_from(&response.version_mismatch);
            }

            let envelope: ListEnvelope = response.json()?;
            let total = *count.get_or_insert(envelope.count);

            tracing::debug!(
                "Fetched page {} ({} results, {} accumulated, count {})",
                cursor,
                envelope.results.len(),
                results.len(),
                total
            );

            if limit == 0 {
                return Ok(Page {
                    results: Vec::new(),
                    count: total,
                    has_more: total > 0,
                    version_mismatch,
                });
            }

            results.extend(envelope.results);

            if let Ok(wanted) = usize::try_from(limit) {
                if results.len() >= wanted {
                    let overshoot = results.len() > wanted;
                    results.truncate(wanted);
                    return Ok(Page {
                        results,
                        count: total,
                        has_more: overshoot || envelope.next.is_some(),
                        version_mismatch,
                    });
                }
            }

            let Some(next) = envelope.next else {
                break;
            };
            let next = self
                .config()
                .controller_url()
                .strip_base(&cursor_path(&next))
                .to_string();
            visited.insert(cursor);
            if visited.contains(&next) {
                tracing::warn!("Pagination cursor {} was already fetched, stopping", next);
                break;
            }
            cursor = next;
        }

        Ok(Page {
            results,
            count: count.unwrap_or_default(),
            has_more: false,
            version_mismatch,
        })
    }
}

/// Turns a `next` cursor into a path relative to the controller URL.
///
/// Absolute cursors keep only their path and query, so a controller that
/// advertises an internal host name is still reached through the
/// configured URL.
#[must_use]
pub fn cursor_path(next: &str) -> String {
    match Url::parse(next) {
        Ok(url) => {
            let mut path = url.path().to_string();
            if let Some(query) = url.query() {
                path.push('?');
                path.push_str(query);
            }
            path
        }
        Err(_) if next.starts_with('/') => next.to_string(),
        Err(_) => format!("/{next}"),
    }
}
