//! SSH keys registered to the current user.

use serde::{Deserialize, Serialize};

use crate::clients::{ApiError, Client, HttpMethod};
use crate::rest::resource::{self, send_empty};
use crate::rest::{build_path, ResourceResponse};

/// A public SSH key.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Key {
    /// When the key was added.
    #[serde(default)]
    pub created: String,
    /// The key's name.
    pub id: String,
    /// Username of the key's owner.
    #[serde(default)]
    pub owner: String,
    /// The public key material.
    #[serde(default)]
    pub public: String,
    /// When the key was last changed.
    #[serde(default)]
    pub updated: String,
    /// Unique identifier.
    #[serde(default)]
    pub uuid: String,
}

#[derive(Serialize)]
struct KeyCreateRequest<'a> {
    id: &'a str,
    public: &'a str,
}

const KEYS_PATH: &str = "/v2/keys/";

/// Lists the current user's keys.
///
/// # Errors
///
/// Returns the first fatal [`ApiError`] raised during the walk.
pub async fn list(client: &Client, limit: i64) -> Result<ResourceResponse<Vec<Key>>, ApiError> {
    resource::list(client, KEYS_PATH, limit).await
}

/// Registers a public key under `id`.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] if the key is malformed or already
/// registered.
pub async fn create(
    client: &Client,
    id: &str,
    public: &str,
) -> Result<ResourceResponse<Key>, ApiError> {
    resource::send(client, HttpMethod::Post, KEYS_PATH, &KeyCreateRequest { id, public }).await
}

/// Removes a key.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if no key has this id.
pub async fn delete(client: &Client, id: &str) -> Result<ResourceResponse<()>, ApiError> {
    let path = build_path("/v2/keys/{id}", &[("id", id)]);
    send_empty::<()>(client, HttpMethod::Delete, &path, None).await
}
