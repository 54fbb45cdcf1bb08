//! Merge-patch documents with explicit deletes.
//!
//! Config, volume and shared-volume updates are sent as partial documents
//! where each key is in one of three states:
//!
//! - present with a value: the field is set
//! - present with `null`: the field is deleted
//! - absent: the field is left untouched
//!
//! [`PatchField`] makes the three states explicit so that "unset" and
//! "leave alone" cannot be confused, [`PatchMap`] serializes a set of fields
//! under those rules, and [`PatchDocument`] combines several maps under
//! namespace keys such as `values` or `path`.
//!
//! # Example
//!
//! ```rust
//! use controller_sdk::rest::{PatchDocument, PatchMap, PatchMode};
//! use serde_json::json;
//!
//! let values = PatchMap::new().set("FOO", "bar").unset("TEST");
//! let document = PatchDocument::new()
//!     .namespace("values", values)
//!     .namespace("memory", PatchMap::new());
//!
//! assert_eq!(
//!     document.build(PatchMode::Mutation),
//!     json!({"values": {"FOO": "bar", "TEST": null}, "memory": {}})
//! );
//! assert_eq!(
//!     document.build(PatchMode::Read),
//!     json!({"values": {"FOO": "bar", "TEST": null}})
//! );
//! ```

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

/// The state of a single field in a patch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PatchField<T = Value> {
    /// Not part of the patch; the server keeps its current value.
    #[default]
    Absent,
    /// Set the field to this value.
    Set(T),
    /// Delete the field. Serialized as `null`.
    Unset,
}

impl<T> PatchField<T> {
    /// Returns `true` for [`PatchField::Absent`].
    ///
    /// Suitable for `#[serde(skip_serializing_if = "PatchField::is_absent")]`.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` for [`PatchField::Unset`].
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns the value being set, if any.
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Absent | Self::Unset => None,
        }
    }
}

/// `Some(v)` sets the field, `None` deletes it.
impl<T> From<Option<T>> for PatchField<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Set)
    }
}

/// Serializes `Set` as the value and both other states as `null`.
///
/// Pair with `skip_serializing_if = "PatchField::is_absent"` so absent
/// fields never reach the serializer.
impl<T: Serialize> Serialize for PatchField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(value) => value.serialize(serializer),
            Self::Absent | Self::Unset => serializer.serialize_none(),
        }
    }
}

/// A set of named patch fields.
///
/// Keys are kept sorted, so serialization is stable for a given set of
/// fields. Absent fields are never written; unset fields are written as
/// `null`.
///
/// # Example
///
/// ```rust
/// use controller_sdk::rest::PatchMap;
///
/// let mount: PatchMap = PatchMap::new()
///     .set("web", "/data/web1")
///     .set("cmd", "/data/cmd1")
///     .absent("worker");
///
/// assert_eq!(
///     serde_json::to_string(&mount).unwrap(),
///     r#"{"cmd":"/data/cmd1","web":"/data/web1"}"#
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchMap<T = Value> {
    fields: BTreeMap<String, PatchField<T>>,
}

impl<T> Default for PatchMap<T> {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }
}

impl<T> PatchMap<T> {
    /// Creates an empty patch map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<T>) -> Self {
        self.insert(key, PatchField::Set(value.into()));
        self
    }

    /// Marks `key` for deletion.
    #[must_use]
    pub fn unset(mut self, key: impl Into<String>) -> Self {
        self.insert(key, PatchField::Unset);
        self
    }

    /// Marks `key` as untouched, dropping any earlier `set` or `unset`.
    #[must_use]
    pub fn absent(mut self, key: impl Into<String>) -> Self {
        self.insert(key, PatchField::Absent);
        self
    }

    /// Records the state of `key`.
    pub fn insert(&mut self, key: impl Into<String>, field: PatchField<T>) {
        let key = key.into();
        if field.is_absent() {
            self.fields.remove(&key);
        } else {
            self.fields.insert(key, field);
        }
    }

    /// Returns the state of `key`; keys never recorded are absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PatchField<T>> {
        self.fields.get(key)
    }

    /// Returns the number of fields that will be serialized.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if nothing will be serialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the serialized fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatchField<T>)> {
        self.fields.iter().map(|(key, field)| (key.as_str(), field))
    }
}

impl<K: Into<String>, T> FromIterator<(K, PatchField<T>)> for PatchMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, PatchField<T>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, field) in iter {
            map.insert(key, field);
        }
        map
    }
}

impl<T: Serialize> Serialize for PatchMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, field) in &self.fields {
            match field {
                PatchField::Set(value) => map.serialize_entry(key, value)?,
                PatchField::Unset => map.serialize_entry(key, &Option::<()>::None)?,
                PatchField::Absent => {}
            }
        }
        map.end()
    }
}

/// How a [`PatchDocument`] treats namespaces with nothing to send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchMode {
    /// Every declared namespace is written, empty ones as `{}`.
    Mutation,
    /// Empty namespaces are dropped. Use this to preview or log what a
    /// patch would change without sending placeholder namespaces.
    Read,
}

/// A top-level patch document made of named [`PatchMap`]s.
///
/// Namespaces are written in the order they were declared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatchDocument {
    namespaces: Vec<(String, PatchMap)>,
}

impl PatchDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a namespace, replacing an earlier one with the same name.
    #[must_use]
    pub fn namespace(mut self, name: impl Into<String>, fields: PatchMap) -> Self {
        let name = name.into();
        if let Some(slot) = self.namespaces.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = fields;
        } else {
            self.namespaces.push((name, fields));
        }
        self
    }

    /// Returns the fields declared under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PatchMap> {
        self.namespaces
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, fields)| fields)
    }

    /// Builds the document as a JSON value.
    #[must_use]
    pub fn build(&self, mode: PatchMode) -> Value {
        let object = self
            .namespaces
            .iter()
            .filter(|(_, fields)| mode == PatchMode::Mutation || !fields.is_empty())
            .map(|(name, fields)| (name.clone(), patch_map_value(fields)))
            .collect();
        Value::Object(object)
    }

    /// Serializes the document, keeping the declared namespace order.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if a value cannot be written as JSON.
    pub fn to_bytes(&self, mode: PatchMode) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&DocumentView { document: self, mode })
    }
}

struct DocumentView<'a> {
    document: &'a PatchDocument,
    mode: PatchMode,
}

impl Serialize for DocumentView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, fields) in &self.document.namespaces {
            if self.mode == PatchMode::Mutation || !fields.is_empty() {
                map.serialize_entry(name, fields)?;
            }
        }
        map.end()
    }
}

fn patch_map_value(fields: &PatchMap) -> Value {
    Value::Object(
        fields
            .iter()
            .filter_map(|(key, field)| match field {
                PatchField::Set(value) => Some((key.to_string(), value.clone())),
                PatchField::Unset => Some((key.to_string(), Value::Null)),
                PatchField::Absent => None,
            })
            .collect(),
    )
}

/// Serializes a single flat patch map.
///
/// # Errors
///
/// Returns the serializer error if a value cannot be written as JSON.
pub fn build_patch<T: Serialize>(fields: &PatchMap<T>) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(fields)
}
