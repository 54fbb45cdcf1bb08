//! Resource modules for the controller API.
//!
//! Each module covers one resource family and is a thin layer over the
//! request executor, the pagination walker and the patch builder. Every
//! operation takes a [`Client`](crate::Client) and returns a
//! [`ResourceResponse`](crate::rest::ResourceResponse), which carries any
//! API version mismatch next to the decoded data.
//!
//! List operations take a `limit`: negative fetches everything, zero
//! fetches only the count, and a positive value caps the results.
//!
//! # Available Resources
//!
//! - [`apps`]: create, inspect, transfer, run commands in and read logs of apps
//! - [`auth`]: register, log in, change passwords, regenerate tokens, cancel accounts
//! - [`builds`]: list and create builds
//! - [`config`]: read and patch app configuration
//! - [`keys`]: manage SSH keys
//! - [`perms`]: manage app collaborators and administrators
//! - [`ps`]: list, scale and restart processes
//! - [`services`]: route path patterns to process types
//! - [`volumes`]: manage and mount volumes
//! - [`sharedvolumes`]: manage and mount volumes shared from other apps
//!
//! # Example
//!
//! ```rust,ignore
//! use controller_sdk::rest::resources::{apps, config};
//! use controller_sdk::rest::resources::config::ConfigPatch;
//!
//! let listed = apps::list(&client, 100).await?;
//! if let Some(mismatch) = listed.version_mismatch() {
//!     eprintln!("{mismatch}");
//! }
//!
//! for app in listed.iter() {
//!     let patch = ConfigPatch::new().set_value("DEPLOYED_BY", "sdk");
//!     config::set(&client, &app.id, &patch).await?;
//! }
//! ```

pub mod apps;
pub mod auth;
pub mod builds;
pub mod config;
pub mod keys;
pub mod perms;
pub mod ps;
pub mod services;
pub mod sharedvolumes;
pub mod volumes;

pub use apps::{App, AppRunResponse};
pub use builds::{Build, BuildCreateRequest};
pub use config::{Config, ConfigPatch};
pub use keys::Key;
pub use perms::{AdminPerm, AppPerms};
pub use ps::{Pod, PodType, ProcessList};
pub use services::Service;
pub use sharedvolumes::SharedVolume;
pub use volumes::Volume;
