//! Updatable contact fields
//!
//! Automation pipelines calling this service often send placeholder strings
//! instead of omitting a field. A value only counts when it is present and,
//! after trimming and lowercasing, is none of [`SENTINEL_VALUES`].

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::fmt;

/// Values treated as "field not supplied"
pub const SENTINEL_VALUES: [&str; 4] = ["", "empty", "null", "none"];

/// Returns true if `value` is present and not a sentinel placeholder
pub fn is_real_value(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(raw) => {
            let normalized = raw.trim().to_lowercase();
            !SENTINEL_VALUES.contains(&normalized.as_str())
        }
    }
}

/// Contact fields that may be changed by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdatableField {
    Firstname,
    Lastname,
    Phone,
    Lifecyclestage,
}

impl UpdatableField {
    /// All fields in the order they are considered for an update
    pub const ALL: [UpdatableField; 4] = [
        UpdatableField::Firstname,
        UpdatableField::Lastname,
        UpdatableField::Phone,
        UpdatableField::Lifecyclestage,
    ];

    /// Upstream property name
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdatableField::Firstname => "firstname",
            UpdatableField::Lastname => "lastname",
            UpdatableField::Phone => "phone",
            UpdatableField::Lifecyclestage => "lifecyclestage",
        }
    }
}

impl fmt::Display for UpdatableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered set of field updates carrying only real values
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldUpdateSet {
    entries: Vec<(UpdatableField, String)>,
}

impl FieldUpdateSet {
    /// Creates an empty update set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` for `field` if it is a real value
    ///
    /// A second insert for the same field replaces the value in place.
    /// Returns whether the value was kept.
    pub fn insert_if_real(&mut self, field: UpdatableField, value: Option<&str>) -> bool {
        let value = match value {
            Some(v) if is_real_value(Some(v)) => v,
            _ => return false,
        };

        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((field, value.to_string())),
        }
        true
    }

    /// Returns the value set for `field`
    pub fn get(&self, field: UpdatableField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (UpdatableField, &str)> {
        self.entries.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Field names in insertion order
    pub fn field_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(f, _)| f.as_str()).collect()
    }
}

impl Serialize for FieldUpdateSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}
