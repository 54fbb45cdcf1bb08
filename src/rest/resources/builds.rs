//! Builds: container images registered against an app.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clients::{ApiError, Client, HttpMethod};
use crate::rest::resource;
use crate::rest::{build_path, ResourceResponse};

/// A build of an app.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Build {
    /// The app this build belongs to.
    #[serde(default)]
    pub app: String,
    /// When the build was created.
    #[serde(default)]
    pub created: String,
    /// Dockerfile used to build the image, empty for image deploys.
    #[serde(default)]
    pub dockerfile: String,
    /// The image reference.
    #[serde(default)]
    pub image: String,
    /// Username of the build's owner.
    #[serde(default)]
    pub owner: String,
    /// Process type to command.
    #[serde(default)]
    pub procfile: BTreeMap<String, String>,
    /// Git commit the build came from, empty for image deploys.
    #[serde(default)]
    pub sha: String,
    /// When the build was last changed.
    #[serde(default)]
    pub updated: String,
    /// Unique identifier.
    #[serde(default)]
    pub uuid: String,
}

/// Body of a build creation request.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct BuildCreateRequest {
    /// The image to deploy.
    pub image: String,
    /// Process type to command. Omitted when empty.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub procfile: BTreeMap<String, String>,
}

fn builds_path(app: &str) -> String {
    build_path("/v2/apps/{app}/builds/", &[("app", app)])
}

/// Lists an app's builds, newest first.
///
/// # Errors
///
/// Returns the first fatal [`ApiError`] raised during the walk.
pub async fn list(
    client: &Client,
    app: &str,
    limit: i64,
) -> Result<ResourceResponse<Vec<Build>>, ApiError> {
    resource::list(client, &builds_path(app), limit).await
}

/// Deploys `image` as a new build of `app`.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn create(
    client: &Client,
    app: &str,
    image: &str,
    procfile: BTreeMap<String, String>,
) -> Result<ResourceResponse<Build>, ApiError> {
    let body = BuildCreateRequest {
        image: image.to_string(),
        procfile,
    };
    resource::send(client, HttpMethod::Post, &builds_path(app), &body).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_matches_controller_fixture() {
        let body = BuildCreateRequest {
            image: "deis/example-go".to_string(),
            procfile: BTreeMap::from([("web".to_string(), "example-go".to_string())]),
        };

        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"image":"deis/example-go","procfile":{"web":"example-go"}}"#
        );
    }

    #[test]
    fn test_create_request_without_procfile() {
        let body = BuildCreateRequest {
            image: "deis/example-go".to_string(),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"image":"deis/example-go"}"#);
    }
}
