//! Permissions: app collaborators and cluster administrators.

use serde::{Deserialize, Serialize};

use crate::clients::{ApiError, Client, HttpMethod};
use crate::rest::resource::{self, send_empty};
use crate::rest::{build_path, ResourceResponse};

/// Users who may access an app, as returned by the app permissions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppPerms {
    /// Usernames with access.
    #[serde(default)]
    pub users: Vec<String>,
}

/// One entry of the administrators list.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AdminPerm {
    /// The administrator's username.
    pub username: String,
    /// Whether the user is a superuser.
    #[serde(default)]
    pub is_superuser: bool,
}

#[derive(Serialize)]
struct PermsRequest<'a> {
    username: &'a str,
}

const ADMIN_PATH: &str = "/v2/admin/perms/";

fn app_perms_path(app: &str) -> String {
    build_path("/v2/apps/{app}/perms/", &[("app", app)])
}

/// Lists the users who may access an app.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn list(client: &Client, app: &str) -> Result<ResourceResponse<Vec<String>>, ApiError> {
    let response: ResourceResponse<AppPerms> = resource::get(client, &app_perms_path(app)).await?;
    Ok(response.map(|perms| perms.users))
}

/// Lists cluster administrators by username.
///
/// # Errors
///
/// Returns the first fatal [`ApiError`] raised during the walk.
pub async fn list_admins(
    client: &Client,
    limit: i64,
) -> Result<ResourceResponse<Vec<String>>, ApiError> {
    let response: ResourceResponse<Vec<AdminPerm>> =
        resource::list(client, ADMIN_PATH, limit).await?;
    Ok(response.map(|admins| admins.into_iter().map(|admin| admin.username).collect()))
}

/// Grants `username` access to an app.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn create(
    client: &Client,
    app: &str,
    username: &str,
) -> Result<ResourceResponse<()>, ApiError> {
    let body = PermsRequest { username };
    send_empty(client, HttpMethod::Post, &app_perms_path(app), Some(&body)).await
}

/// Makes `username` a cluster administrator.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn create_admin(client: &Client, username: &str) -> Result<ResourceResponse<()>, ApiError> {
    let body = PermsRequest { username };
    send_empty(client, HttpMethod::Post, ADMIN_PATH, Some(&body)).await
}

/// Revokes `username`'s access to an app.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn delete(
    client: &Client,
    app: &str,
    username: &str,
) -> Result<ResourceResponse<()>, ApiError> {
    let path = build_path(
        "/v2/apps/{app}/perms/{username}",
        &[("app", app), ("username", username)],
    );
    send_empty::<()>(client, HttpMethod::Delete, &path, None).await
}

/// Revokes `username`'s administrator rights.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn delete_admin(client: &Client, username: &str) -> Result<ResourceResponse<()>, ApiError> {
    let path = build_path("/v2/admin/perms/{username}", &[("username", username)]);
    send_empty::<()>(client, HttpMethod::Delete, &path, None).await
}
