use crate::PropValue;
use indexmap::IndexMap;
use std::{fmt, ops::Index, sync::Arc};
use thiserror::Error;

pub(crate) const KEY: &str = "key";
pub(crate) const REF: &str = "ref";
pub(crate) const CHILDREN: &str = "children";

/// The frozen, ordered props of an [`Element`](crate::Element).
///
/// `Props` has no mutating methods. Every change is expressed by deriving a new element with
/// [`ElementFactory::clone_element`](crate::ElementFactory::clone_element), so writes are rejected
/// before the program ever runs:
///
/// ```compile_fail
/// # use facsimile::{Props, PropValue};
/// let props: Props = [("color", "red")].into_iter().collect();
/// props["color"] = PropValue::from("blue");
/// ```
///
/// ```compile_fail
/// # use facsimile::Props;
/// let mut props: Props = [("color", "red")].into_iter().collect();
/// props.insert("color", "blue");
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct Props {
    entries: Arc<IndexMap<String, PropValue>>,
}

impl Props {
    pub(crate) fn from_map(entries: IndexMap<String, PropValue>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Copies the entries into a new mapping for assembling another element's props. Values are
    /// shallow copies.
    pub(crate) fn to_map(&self) -> IndexMap<String, PropValue> {
        (*self.entries).clone()
    }

    /// Returns the value of the given prop, if it has an entry.
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.get(name)
    }

    /// Returns `true` if there is an entry for the given prop, even if its value is `Undefined`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the `children` prop, if any children were supplied.
    pub fn children(&self) -> Option<&PropValue> {
        self.get(CHILDREN)
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the prop names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Index<&str> for Props {
    type Output = PropValue;

    /// # Panics
    ///
    /// Panics if there is no entry for the prop.
    fn index(&self, name: &str) -> &PropValue {
        &self.entries[name]
    }
}

impl<K, V> FromIterator<(K, V)> for Props
where
    K: Into<String>,
    V: Into<PropValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Errors produced while building a [`Config`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The source value has no own entries to read.
    #[error("configuration must be an object, found {found}")]
    NotAnObject {
        /// The JSON type that was found instead.
        found: &'static str,
    },
}

/// A configuration: a flat bag of own entries passed to
/// [`ElementFactory::create`](crate::ElementFactory::create) or
/// [`ElementFactory::clone_element`](crate::ElementFactory::clone_element).
///
/// The `key` and `ref` entries are reserved: they are extracted into the element's key and ref
/// and never become props. Every other entry, `children` included, becomes a prop.
///
/// A configuration only ever has own entries. Nothing is inherited, and reading an entry has no
/// side effects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    entries: IndexMap<String, PropValue>,
}

impl Config {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an entry, returning the configuration.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets an entry. An existing entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Returns `true` if the configuration has an own entry with the given name, whatever its
    /// value.
    pub fn has_own(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the own entry with the given name.
    pub fn get_own(&self, name: &str) -> Option<&PropValue> {
        self.entries.get(name)
    }

    /// The number of own entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no own entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a configuration from the own entries of a JSON object.
    ///
    /// ```
    /// # use facsimile::{Config, ConfigError};
    /// # use serde_json::json;
    /// let config = Config::from_json(json!({"key": 7, "color": "red"})).unwrap();
    /// assert!(config.has_own("key"));
    /// assert_eq!(
    ///     Config::from_json(json!([1, 2])),
    ///     Err(ConfigError::NotAnObject { found: "array" })
    /// );
    /// ```
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        use serde_json::Value;
        match value {
            Value::Object(entries) => Ok(entries.into_iter().collect()),
            Value::Null => Err(ConfigError::NotAnObject { found: "null" }),
            Value::Bool(_) => Err(ConfigError::NotAnObject { found: "boolean" }),
            Value::Number(_) => Err(ConfigError::NotAnObject { found: "number" }),
            Value::String(_) => Err(ConfigError::NotAnObject { found: "string" }),
            Value::Array(_) => Err(ConfigError::NotAnObject { found: "array" }),
        }
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (String, PropValue)> {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Config
where
    K: Into<String>,
    V: Into<PropValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl TryFrom<serde_json::Value> for Config {
    type Error = ConfigError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_json(value)
    }
}
