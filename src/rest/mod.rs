//! Resource layer for the controller API.
//!
//! This module provides the pieces resource modules are built from:
//!
//! - **[`PatchField`], [`PatchMap`], [`PatchDocument`]**: merge-patch documents
//!   with explicit deletes, used by config and volume updates
//! - **[`build_path`]**: path templates with percent-encoded identifiers
//! - **[`ResourceResponse<T>`]**: decoded data plus list count and any API
//!   version mismatch, with `Deref` to the data
//! - **[`resources`]**: one module per resource family
//!
//! # Example
//!
//! ```rust,ignore
//! use controller_sdk::rest::resources::volumes;
//! use controller_sdk::rest::PatchMap;
//!
//! // Mount for web, unmount for cmd, leave every other process type alone
//! let paths = PatchMap::new().set("web", "/data/web1").unset("cmd");
//! let volume = volumes::mount(&client, "example-go", "myvolume", &paths).await?;
//! ```

mod patch;
mod path;
mod resource;
mod response;

pub mod resources;

pub use patch::{build_patch, PatchDocument, PatchField, PatchMap, PatchMode};
pub use path::build_path;
pub use response::ResourceResponse;
