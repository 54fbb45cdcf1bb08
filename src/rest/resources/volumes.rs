//! Volumes attached to an app and mounted into its process types.
//!
//! # Example
//!
//! ```rust,ignore
//! use controller_sdk::rest::PatchMap;
//! use controller_sdk::rest::resources::volumes;
//!
//! volumes::create(&client, "example-go", "myvolume", "500M").await?;
//! let mounted = volumes::mount(
//!     &client,
//!     "example-go",
//!     "myvolume",
//!     &PatchMap::new().set("web", "/data/web1"),
//! )
//! .await?;
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::{ApiError, Client, HttpMethod};
use crate::rest::resource::{self, send_empty};
use crate::rest::{build_path, PatchDocument, PatchMap, PatchMode, ResourceResponse};

/// A volume of an app.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Volume {
    /// Unique identifier.
    #[serde(default)]
    pub uuid: String,
    /// Username of the owner.
    #[serde(default)]
    pub owner: String,
    /// The app the volume belongs to.
    #[serde(default)]
    pub app: String,
    /// The volume name.
    pub name: String,
    /// The requested size, such as `500M`.
    #[serde(default)]
    pub size: String,
    /// Process type to mount path.
    #[serde(default)]
    pub path: BTreeMap<String, Value>,
    /// When the volume was created.
    #[serde(default)]
    pub created: String,
    /// When the volume was last changed.
    #[serde(default)]
    pub updated: String,
}

#[derive(Serialize)]
struct VolumeCreateRequest<'a> {
    name: &'a str,
    size: &'a str,
}

fn volumes_path(app: &str) -> String {
    build_path("/v2/apps/{app}/volumes/", &[("app", app)])
}

/// Builds the `{"path": ...}` mount document.
///
/// Set entries mount the volume for a process type, unset entries unmount
/// it, and process types not named keep their current mount.
#[must_use]
pub fn mount_document(paths: &PatchMap) -> PatchDocument {
    PatchDocument::new().namespace("path", paths.clone())
}

/// Lists an app's volumes.
///
/// # Errors
///
/// Returns the first fatal [`ApiError`] raised during the walk.
pub async fn list(
    client: &Client,
    app: &str,
    limit: i64,
) -> Result<ResourceResponse<Vec<Volume>>, ApiError> {
    resource::list(client, &volumes_path(app), limit).await
}

/// Creates a volume of the given size.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn create(
    client: &Client,
    app: &str,
    name: &str,
    size: &str,
) -> Result<ResourceResponse<Volume>, ApiError> {
    let body = VolumeCreateRequest { name, size };
    resource::send(client, HttpMethod::Post, &volumes_path(app), &body).await
}

/// Deletes a volume.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn delete(client: &Client, app: &str, name: &str) -> Result<ResourceResponse<()>, ApiError> {
    let path = build_path("/v2/apps/{app}/volumes/{name}/", &[("app", app), ("name", name)]);
    send_empty::<()>(client, HttpMethod::Delete, &path, None).await
}

/// Changes where a volume is mounted.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn mount(
    client: &Client,
    app: &str,
    name: &str,
    paths: &PatchMap,
) -> Result<ResourceResponse<Volume>, ApiError> {
    let path = build_path(
        "/v2/apps/{app}/volumes/{name}/path/",
        &[("app", app), ("name", name)],
    );
    let body = mount_document(paths).to_bytes(PatchMode::Mutation)?;
    let response = client.request(HttpMethod::Patch, &path, Some(body)).await?;
    resource::decode(&response)
}
