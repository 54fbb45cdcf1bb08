//! Apps: the unit of deployment on the controller.
//!
//! # Example
//!
//! ```rust,ignore
//! use controller_sdk::rest::resources::apps;
//!
//! let app = apps::create(&client, Some("example-go")).await?;
//! let output = apps::run(&client, &app.id, "echo hi").await?;
//! println!("{} ({})", output.output, output.exit_code);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::{ApiError, Client, HttpMethod, HttpRequest};
use crate::rest::resource::{self, send_empty};
use crate::rest::{build_path, ResourceResponse};

/// An application.
///
/// # Fields
///
/// ## Read-Only Fields
/// - `uuid`, `created`, `updated`
/// - `structure` - Process type to replica count
///
/// ## Writable Fields
/// - `id` - The app name
/// - `owner` - Changed through [`transfer`]
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct App {
    /// The app name.
    pub id: String,

    /// Username of the owner.
    #[serde(default)]
    pub owner: String,

    /// Process type to replica count.
    #[serde(default)]
    pub structure: BTreeMap<String, i64>,

    /// Process types declared by the app's Procfile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procfile_structure: Option<BTreeMap<String, Value>>,

    /// When the app was created.
    #[serde(default)]
    pub created: String,

    /// When the app was last changed.
    #[serde(default)]
    pub updated: String,

    /// Unique identifier, changes on every update.
    #[serde(default)]
    pub uuid: String,
}

/// The outcome of [`run`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppRunResponse {
    /// Combined output of the command.
    pub output: String,
    /// Exit status of the command.
    pub exit_code: i32,
}

#[derive(Serialize)]
struct AppCreateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}

#[derive(Serialize)]
struct AppRunRequest<'a> {
    command: &'a str,
}

#[derive(Serialize)]
struct AppTransferRequest<'a> {
    owner: &'a str,
}

const APPS_PATH: &str = "/v2/apps/";

fn app_path(app: &str) -> String {
    build_path("/v2/apps/{app}/", &[("app", app)])
}

/// Lists apps visible to the current user.
///
/// # Errors
///
/// Returns the first fatal [`ApiError`] raised during the walk.
pub async fn list(client: &Client, limit: i64) -> Result<ResourceResponse<Vec<App>>, ApiError> {
    resource::list(client, APPS_PATH, limit).await
}

/// Fetches one app.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the app does not exist.
pub async fn get(client: &Client, app: &str) -> Result<ResourceResponse<App>, ApiError> {
    resource::get(client, &app_path(app)).await
}

/// Creates an app. Without an id the controller picks a name.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] if the name is invalid or taken.
pub async fn create(client: &Client, id: Option<&str>) -> Result<ResourceResponse<App>, ApiError> {
    let id = id.filter(|id| !id.is_empty());
    if id.is_none() {
        // The controller names the app when no body is sent.
        let response = resource::send_raw::<()>(client, HttpMethod::Post, APPS_PATH, None).await?;
        return resource::decode(&response);
    }
    resource::send(client, HttpMethod::Post, APPS_PATH, &AppCreateRequest { id }).await
}

/// Destroys an app.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the app does not exist.
pub async fn delete(client: &Client, app: &str) -> Result<ResourceResponse<()>, ApiError> {
    send_empty::<()>(client, HttpMethod::Delete, &app_path(app), None).await
}

/// Transfers ownership of an app to another user.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn transfer(
    client: &Client,
    app: &str,
    owner: &str,
) -> Result<ResourceResponse<()>, ApiError> {
    let body = AppTransferRequest { owner };
    send_empty(client, HttpMethod::Post, &app_path(app), Some(&body)).await
}

/// Runs a one-off command in a fresh container for the app.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn run(
    client: &Client,
    app: &str,
    command: &str,
) -> Result<ResourceResponse<AppRunResponse>, ApiError> {
    let path = build_path("/v2/apps/{app}/run", &[("app", app)]);
    resource::send(client, HttpMethod::Post, &path, &AppRunRequest { command }).await
}

/// Fetches the app's aggregated logs as text.
///
/// `lines` limits the output to the most recent lines; `None` uses the
/// controller's default.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn logs(
    client: &Client,
    app: &str,
    lines: Option<u32>,
) -> Result<ResourceResponse<String>, ApiError> {
    let path = build_path("/v2/apps/{app}/logs", &[("app", app)]);
    let mut builder = HttpRequest::builder(HttpMethod::Get, path);
    if let Some(lines) = lines {
        builder = builder.query_param("log_lines", lines);
    }

    let response = client.execute(builder.build()).await?;
    Ok(ResourceResponse::from_http_response(response.text(), &response))
}
