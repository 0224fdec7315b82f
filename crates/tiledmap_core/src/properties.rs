//! Custom properties attached to maps, tilesets, layers and objects.
//!
//! Values are kept as the strings found in the document. Typed accessors
//! convert on read and fall back to a caller-supplied default instead of
//! failing, so a typo in the editor never aborts a load.

use crate::error::Result;
use crate::named::{Named, NamedList};

/// A single `<property name=".." value=".."/>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Named for Property {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered table of uniquely named string properties.
///
/// # Example
///
/// ```rust
/// use tiledmap_core::properties::Properties;
///
/// let mut props = Properties::new();
/// props.insert("floor", "2.5").unwrap();
/// props.insert("ignore", " FALSE ").unwrap();
///
/// assert_eq!(props.get_float("floor", 0.0), 2.5);
/// assert!(!props.get_bool("ignore", true));
/// assert_eq!(props.get_float("missing", 3.5), 3.5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: NamedList<Property>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new property. Fails with `DuplicateKey` when `name` is taken.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.entries.insert(Property::new(name, value))
    }

    /// Insert or overwrite, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.entries.get_mut(&name) {
            return Some(std::mem::replace(&mut existing.value, value));
        }
        self.entries.push_unchecked(Property { name, value });
        None
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name).map(|p| p.value)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|p| p.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains(name)
    }

    /// Parse the property as a float.
    ///
    /// Returns `default` when the property is missing or its value is not a
    /// number.
    pub fn get_float(&self, name: &str, default: f32) -> f32 {
        self.get(name)
            .and_then(|value| value.trim().parse::<f32>().ok())
            .unwrap_or(default)
    }

    /// [`Properties::get_float`] with a default of `0.0`.
    pub fn get_float_or_zero(&self, name: &str) -> f32 {
        self.get_float(name, 0.0)
    }

    pub fn get_int(&self, name: &str, default: i64) -> i64 {
        self.get(name)
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(default)
    }

    /// Interpret the property as a flag.
    ///
    /// A present property is `true` unless its trimmed, lowercased value is
    /// empty, `"0"` or `"false"`. A missing property yields `default`.
    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        let Some(value) = self.get(name) else {
            return default;
        };
        let value = value.trim().to_lowercase();
        !(value.is_empty() || value == "0" || value == "false")
    }

    /// [`Properties::get_bool`] with a default of `false`.
    pub fn get_bool_or_false(&self, name: &str) -> bool {
        self.get_bool(name, false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    /// Later duplicates overwrite earlier values.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (name, value) in iter {
            props.set(name, value);
        }
        props
    }
}
