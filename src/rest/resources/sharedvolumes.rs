//! Shared volumes: volumes of one app mounted into another.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::{ApiError, Client, HttpMethod};
use crate::rest::resource::{self, send_empty};
use crate::rest::resources::volumes::mount_document;
use crate::rest::{build_path, PatchMap, PatchMode, ResourceResponse};

/// A volume shared into an app from a parent app.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SharedVolume {
    /// Username of the owner.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,
    /// The app the volume is shared into.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub app: String,
    /// The volume being shared.
    #[serde(default, rename = "parentvolume", skip_serializing_if = "String::is_empty")]
    pub parent_volume: String,
    /// The app that owns the parent volume.
    #[serde(default, rename = "parentapp", skip_serializing_if = "String::is_empty")]
    pub parent_app: String,
    /// When the shared volume was created.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created: String,
    /// When the shared volume was last changed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated: String,
    /// Unique identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    /// The shared volume's name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// The size, such as `500M`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub size: String,
    /// Process type to mount path.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub path: BTreeMap<String, Value>,
}

fn sharedvolumes_path(app: &str) -> String {
    build_path("/v2/apps/{app}/sharedvolumes/", &[("app", app)])
}

/// Lists the volumes shared into an app.
///
/// # Errors
///
/// Returns the first fatal [`ApiError`] raised during the walk.
pub async fn list(
    client: &Client,
    app: &str,
    limit: i64,
) -> Result<ResourceResponse<Vec<SharedVolume>>, ApiError> {
    resource::list(client, &sharedvolumes_path(app), limit).await
}

/// Shares a volume into an app.
///
/// Only the non-empty fields of `volume` are sent.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn create(
    client: &Client,
    app: &str,
    volume: &SharedVolume,
) -> Result<ResourceResponse<SharedVolume>, ApiError> {
    resource::send(client, HttpMethod::Post, &sharedvolumes_path(app), volume).await
}

/// Removes a shared volume from an app.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn delete(client: &Client, app: &str, name: &str) -> Result<ResourceResponse<()>, ApiError> {
    let path = build_path(
        "/v2/apps/{app}/sharedvolumes/{name}/",
        &[("app", app), ("name", name)],
    );
    send_empty::<()>(client, HttpMethod::Delete, &path, None).await
}

/// Changes where a shared volume is mounted.
///
/// Accepts the same `{"path": ...}` document as a regular volume mount.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn mount(
    client: &Client,
    app: &str,
    name: &str,
    paths: &PatchMap,
) -> Result<ResourceResponse<SharedVolume>, ApiError> {
    let path = build_path(
        "/v2/apps/{app}/sharedvolumes/{name}/path",
        &[("app", app), ("name", name)],
    );
    let body = mount_document(paths).to_bytes(PatchMode::Mutation)?;
    let response = client.request(HttpMethod::Patch, &path, Some(body)).await?;
    resource::decode(&response)
}
