//! Response wrapper for resource operations.
//!
//! This module provides [`ResourceResponse<T>`], which pairs decoded
//! resource data with what the controller reported alongside it: the total
//! `count` of a list endpoint and any API version mismatch.
//!
//! # Deref Pattern
//!
//! `ResourceResponse<T>` implements `Deref<Target = T>`, which means you can
//! use it like the inner type directly:
//!
//! ```rust,ignore
//! let apps = controller_sdk::rest::resources::apps::list(&client, 100).await?;
//!
//! for app in apps.iter() {
//!     println!("{}", app.id);
//! }
//! println!("{} of {:?}", apps.len(), apps.count());
//! ```

use std::ops::{Deref, DerefMut};

use crate::clients::{ApiError, HttpResponse, Page, VersionMismatch};

/// The decoded result of a resource operation.
///
/// A version mismatch never replaces the data. It is carried here so the
/// caller can warn about it, or reject it with [`strict`](Self::strict).
///
/// # Example
///
/// ```rust
/// use controller_sdk::rest::ResourceResponse;
///
/// let response = ResourceResponse::new(vec!["test", "foo"]).with_count(Some(5));
///
/// assert_eq!(response.len(), 2);
/// assert_eq!(response[0], "test");
/// assert_eq!(response.count(), Some(5));
/// assert!(response.has_more());
/// assert!(response.version_mismatch().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ResourceResponse<T> {
    data: T,
    count: Option<u64>,
    has_more: bool,
    version_mismatch: Option<VersionMismatch>,
}

impl<T> ResourceResponse<T> {
    /// Creates a response holding only `data`.
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self {
            data,
            count: None,
            has_more: false,
            version_mismatch: None,
        }
    }

    /// Attaches a version mismatch.
    #[must_use]
    pub fn with_version_mismatch(mut self, mismatch: Option<VersionMismatch>) -> Self {
        self.version_mismatch = mismatch;
        self
    }

    /// Consumes the response and returns the inner data.
    ///
    /// Use this when the count and version mismatch are no longer needed.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Returns a reference to the inner data.
    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Returns a mutable reference to the inner data.
    #[must_use]
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// The server-reported total for list operations.
    #[must_use]
    pub const fn count(&self) -> Option<u64> {
        self.count
    }

    /// Returns `true` if the server holds results that were not fetched.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// The version mismatch reported by the controller, if any.
    #[must_use]
    pub const fn version_mismatch(&self) -> Option<&VersionMismatch> {
        self.version_mismatch.as_ref()
    }

    /// Returns the data, or the version mismatch as an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::VersionMismatch`] if the controller advertised a
    /// different API version.
    pub fn strict(self) -> Result<T, ApiError> {
        match self.version_mismatch {
            Some(mismatch) => Err(ApiError::VersionMismatch(mismatch)),
            None => Ok(self.data),
        }
    }

    /// Maps the inner data to a new type, keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> ResourceResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ResourceResponse {
            data: f(self.data),
            count: self.count,
            has_more: self.has_more,
            version_mismatch: self.version_mismatch,
        }
    }

    /// Wraps data decoded from `response`, carrying its version mismatch.
    pub(crate) fn from_http_response(data: T, response: &HttpResponse) -> Self {
        Self::new(data).with_version_mismatch(response.version_mismatch.clone())
    }

    /// Wraps data decoded from a pagination walk.
    pub(crate) fn from_page(data: T, page: &Page) -> Self {
        Self {
            data,
            count: Some(page.count),
            has_more: page.has_more,
            version_mismatch: page.version_mismatch.clone(),
        }
    }
}

impl<I> ResourceResponse<Vec<I>> {
    /// Records the server-reported total for a list.
    ///
    /// `has_more` is set when the count is larger than the number of items
    /// held.
    #[must_use]
    pub fn with_count(mut self, count: Option<u64>) -> Self {
        let held = u64::try_from(self.data.len()).unwrap_or(u64::MAX);
        self.count = count;
        self.has_more = count.is_some_and(|total| total > held);
        self
    }
}

/// Provides transparent access to the inner data.
impl<T> Deref for ResourceResponse<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Provides mutable access to the inner data.
impl<T> DerefMut for ResourceResponse<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

// Verify ResourceResponse is Send + Sync when T is Send + Sync
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceResponse<String>>();
    assert_send_sync::<ResourceResponse<Vec<String>>>();
};
