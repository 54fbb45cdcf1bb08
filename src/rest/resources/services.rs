//! Services: routing path patterns to process types.

use serde::{Deserialize, Serialize};

use crate::clients::{ApiError, Client, HttpMethod};
use crate::rest::resource::{self, send_empty};
use crate::rest::{build_path, ResourceResponse};

/// A route from a path pattern to a process type.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Service {
    /// The process type receiving the traffic.
    pub procfile_type: String,
    /// The request path pattern.
    pub path_pattern: String,
}

#[derive(Deserialize)]
struct ServicesEnvelope {
    #[serde(default)]
    services: Vec<Service>,
}

#[derive(Serialize)]
struct ServiceDeleteRequest<'a> {
    procfile_type: &'a str,
}

fn services_path(app: &str) -> String {
    build_path("/v2/apps/{app}/services/", &[("app", app)])
}

/// Lists an app's services.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn list(client: &Client, app: &str) -> Result<ResourceResponse<Vec<Service>>, ApiError> {
    let response: ResourceResponse<ServicesEnvelope> =
        resource::get(client, &services_path(app)).await?;
    Ok(response.map(|envelope| envelope.services))
}

/// Routes `path_pattern` to `procfile_type`.
///
/// The controller's reply is not decoded; the returned service echoes the
/// request.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn create(
    client: &Client,
    app: &str,
    procfile_type: &str,
    path_pattern: &str,
) -> Result<ResourceResponse<Service>, ApiError> {
    let service = Service {
        procfile_type: procfile_type.to_string(),
        path_pattern: path_pattern.to_string(),
    };
    let response = send_empty(client, HttpMethod::Post, &services_path(app), Some(&service)).await?;
    Ok(response.map(|()| service))
}

/// Removes the service of `procfile_type`.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn delete(
    client: &Client,
    app: &str,
    procfile_type: &str,
) -> Result<ResourceResponse<()>, ApiError> {
    let body = ServiceDeleteRequest { procfile_type };
    send_empty(client, HttpMethod::Delete, &services_path(app), Some(&body)).await
}
