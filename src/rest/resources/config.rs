//! App configuration: environment values, limits, tags and registry
//! credentials.
//!
//! Changes are sent as a merge patch over five namespaces. A key set to a
//! value is written, a key marked unset is deleted, and every other key is
//! left as it is.
//!
//! # Example
//!
//! ```rust,ignore
//! use controller_sdk::rest::resources::config::{self, ConfigPatch};
//!
//! let patch = ConfigPatch::new()
//!     .set_value("FOO", "bar")
//!     .unset_value("OLD_FLAG")
//!     .set_memory("web", "1G");
//!
//! let config = config::set(&client, "example-go", &patch).await?;
//! assert_eq!(config.values["FOO"], "bar");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::{ApiError, Client, HttpMethod};
use crate::rest::resource;
use crate::rest::{build_path, PatchDocument, PatchMap, PatchMode, ResourceResponse};

/// The configuration of an app.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Username of the app's owner.
    #[serde(default)]
    pub owner: String,
    /// The app this configuration belongs to.
    #[serde(default)]
    pub app: String,
    /// Environment variables.
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
    /// Memory limits per process type.
    #[serde(default)]
    pub memory: BTreeMap<String, Value>,
    /// CPU limits per process type.
    #[serde(default)]
    pub cpu: BTreeMap<String, Value>,
    /// Node selector tags.
    #[serde(default)]
    pub tags: BTreeMap<String, Value>,
    /// Private registry credentials.
    #[serde(default)]
    pub registry: BTreeMap<String, Value>,
    /// When the configuration was created.
    #[serde(default)]
    pub created: String,
    /// When the configuration was last changed.
    #[serde(default)]
    pub updated: String,
    /// Unique identifier, changes on every update.
    #[serde(default)]
    pub uuid: String,
}

/// A set of configuration changes.
///
/// Every namespace is always sent, even when it holds no changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    /// Changes to environment variables.
    pub values: PatchMap,
    /// Changes to memory limits.
    pub memory: PatchMap,
    /// Changes to CPU limits.
    pub cpu: PatchMap,
    /// Changes to node selector tags.
    pub tags: PatchMap,
    /// Changes to registry credentials.
    pub registry: PatchMap,
}

impl ConfigPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an environment variable.
    #[must_use]
    pub fn set_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values = self.values.set(key, value);
        self
    }

    /// Deletes an environment variable.
    #[must_use]
    pub fn unset_value(mut self, key: impl Into<String>) -> Self {
        self.values = self.values.unset(key);
        self
    }

    /// Sets the memory limit of a process type.
    #[must_use]
    pub fn set_memory(mut self, process_type: impl Into<String>, limit: impl Into<Value>) -> Self {
        self.memory = self.memory.set(process_type, limit);
        self
    }

    /// Removes the memory limit of a process type.
    #[must_use]
    pub fn unset_memory(mut self, process_type: impl Into<String>) -> Self {
        self.memory = self.memory.unset(process_type);
        self
    }

    /// Sets the CPU limit of a process type.
    #[must_use]
    pub fn set_cpu(mut self, process_type: impl Into<String>, limit: impl Into<Value>) -> Self {
        self.cpu = self.cpu.set(process_type, limit);
        self
    }

    /// Removes the CPU limit of a process type.
    #[must_use]
    pub fn unset_cpu(mut self, process_type: impl Into<String>) -> Self {
        self.cpu = self.cpu.unset(process_type);
        self
    }

    /// Sets a node selector tag.
    #[must_use]
    pub fn set_tag(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tags = self.tags.set(key, value);
        self
    }

    /// Removes a node selector tag.
    #[must_use]
    pub fn unset_tag(mut self, key: impl Into<String>) -> Self {
        self.tags = self.tags.unset(key);
        self
    }

    /// Sets a registry credential.
    #[must_use]
    pub fn set_registry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.registry = self.registry.set(key, value);
        self
    }

    /// Removes a registry credential.
    #[must_use]
    pub fn unset_registry(mut self, key: impl Into<String>) -> Self {
        self.registry = self.registry.unset(key);
        self
    }

    /// Returns `true` if no namespace holds a change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
            && self.memory.is_empty()
            && self.cpu.is_empty()
            && self.tags.is_empty()
            && self.registry.is_empty()
    }

    /// Builds the patch document in the order the controller expects.
    #[must_use]
    pub fn to_document(&self) -> PatchDocument {
        PatchDocument::new()
            .namespace("values", self.values.clone())
            .namespace("memory", self.memory.clone())
            .namespace("cpu", self.cpu.clone())
            .namespace("tags", self.tags.clone())
            .namespace("registry", self.registry.clone())
    }
}

fn config_path(app: &str) -> String {
    build_path("/v2/apps/{app}/config/", &[("app", app)])
}

/// Fetches an app's configuration.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the app does not exist.
pub async fn list(client: &Client, app: &str) -> Result<ResourceResponse<Config>, ApiError> {
    resource::get(client, &config_path(app)).await
}

/// Applies `patch` to an app's configuration and returns the result.
///
/// This creates a new release of the app.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn set(
    client: &Client,
    app: &str,
    patch: &ConfigPatch,
) -> Result<ResourceResponse<Config>, ApiError> {
    let body = patch.to_document().to_bytes(PatchMode::Mutation)?;
    let response = client
        .request(HttpMethod::Post, &config_path(app), Some(body))
        .await?;
    resource::decode(&response)
}
