//! Processes (pods) of an app: listing, scaling and restarting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clients::{ApiError, Client, HttpMethod};
use crate::rest::resource::{self, send_empty};
use crate::rest::resources::apps::App;
use crate::rest::{build_path, ResourceResponse};

/// A running process of an app.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Pod {
    /// The release the pod runs, such as `v2`.
    #[serde(default)]
    pub release: String,
    /// The process type.
    #[serde(rename = "type")]
    pub pod_type: String,
    /// The pod name.
    pub name: String,
    /// The pod state, such as `up` or `crashed`.
    #[serde(default)]
    pub state: String,
    /// When the pod started.
    #[serde(default)]
    pub started: String,
}

/// An app's pods plus the Procfile types that currently have none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessList {
    /// Pods in server order.
    pub pods: Vec<Pod>,
    /// Procfile process types with no running pods, sorted.
    pub idle_types: Vec<String>,
}

/// Pods grouped under one process type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodType {
    /// The process type.
    pub pod_type: String,
    /// Pods of this type, sorted by name.
    pub pods: Vec<Pod>,
}

/// Lists an app's pods.
///
/// The app itself is also fetched so that Procfile types scaled to zero
/// can be reported in [`ProcessList::idle_types`]. The count is the
/// server's pod count.
///
/// # Errors
///
/// Returns the first fatal [`ApiError`] from either request.
pub async fn list(
    client: &Client,
    app: &str,
    limit: i64,
) -> Result<ResourceResponse<ProcessList>, ApiError> {
    let path = build_path("/v2/apps/{app}/pods/", &[("app", app)]);
    let pods: ResourceResponse<Vec<Pod>> = resource::list(client, &path, limit).await?;

    let details: ResourceResponse<App> =
        resource::get(client, &build_path("/v2/apps/{app}/", &[("app", app)])).await?;
    let idle_types = details
        .procfile_structure
        .iter()
        .flat_map(BTreeMap::keys)
        .filter(|declared| !pods.iter().any(|pod| &pod.pod_type == *declared))
        .cloned()
        .collect();

    Ok(pods.map(|pods| ProcessList { pods, idle_types }))
}

/// Sets the replica count of each named process type.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn scale(
    client: &Client,
    app: &str,
    targets: &BTreeMap<String, u32>,
) -> Result<ResourceResponse<()>, ApiError> {
    let path = build_path("/v2/apps/{app}/scale/", &[("app", app)]);
    send_empty(client, HttpMethod::Post, &path, Some(targets)).await
}

/// Restarts pods and returns the replacements.
///
/// With no type every pod restarts; with a type and no name every pod of
/// that type restarts; with both only the named pod restarts. A name
/// without a type is ignored.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn restart(
    client: &Client,
    app: &str,
    pod_type: Option<&str>,
    name: Option<&str>,
) -> Result<ResourceResponse<Vec<Pod>>, ApiError> {
    let path = match (pod_type, name) {
        (None, _) => build_path("/v2/apps/{app}/pods/restart/", &[("app", app)]),
        (Some(pod_type), None) => build_path(
            "/v2/apps/{app}/pods/{type}/restart/",
            &[("app", app), ("type", pod_type)],
        ),
        (Some(pod_type), Some(name)) => build_path(
            "/v2/apps/{app}/pods/{type}/{name}/restart/",
            &[("app", app), ("type", pod_type), ("name", name)],
        ),
    };

    let response = resource::send_raw::<()>(client, HttpMethod::Post, &path, None).await?;
    resource::decode(&response)
}

/// Groups pods by process type.
///
/// Groups are sorted by type and pods within a group by name.
#[must_use]
pub fn by_type(pods: &[Pod]) -> Vec<PodType> {
    let mut groups: BTreeMap<&str, Vec<Pod>> = BTreeMap::new();
    for pod in pods {
        groups.entry(pod.pod_type.as_str()).or_default().push(pod.clone());
    }

    groups
        .into_iter()
        .map(|(pod_type, mut pods)| {
            pods.sort_by(|a, b| a.name.cmp(&b.name));
            PodType {
                pod_type: pod_type.to_string(),
                pods,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_pod(pod_type: &str, name: &str) -> Pod {
        Pod {
            release: "v2".to_string(),
            pod_type: pod_type.to_string(),
            name: name.to_string(),
            state: "up".to_string(),
            started: "2016-02-13T00:47:52Z".to_string(),
        }
    }

    #[test]
    fn test_by_type_groups_and_sorts() {
        let pods = vec![
            create_test_pod("web", "example-go-v2-web-b"),
            create_test_pod("worker", "example-go-v2-worker-a"),
            create_test_pod("web", "example-go-v2-web-a"),
        ];

        let groups = by_type(&pods);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].pod_type, "web");
        assert_eq!(
            groups[0]
                .pods
                .iter()
                .map(|pod| pod.name.as_str())
                .collect::<Vec<_>>(),
            vec!["example-go-v2-web-a", "example-go-v2-web-b"]
        );
        assert_eq!(groups[1].pod_type, "worker");
    }

    #[test]
    fn test_by_type_empty() {
        assert!(by_type(&[]).is_empty());
    }

    #[test]
    fn test_pod_type_field_renamed() {
        let pod: Pod = serde_json::from_str(
            r#"{"release":"v2","type":"web","name":"example-go-v2-web-45678","state":"up","started":"2016-02-13T00:47:52"}"#,
        )
        .unwrap();
        assert_eq!(pod.pod_type, "web");
    }
}
