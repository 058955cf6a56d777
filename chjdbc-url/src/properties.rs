//! Ordered key/value configuration.

use crate::single::PASSWORD;
use crate::{ConnectionError, ConnectionResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Property bag: string keys to string values, in insertion order.
///
/// Setting an existing key replaces its value but keeps its position.
///
/// ```rust
/// use chjdbc_url::Properties;
///
/// let props = Properties::new()
///     .with("user", "default")
///     .with("socket_timeout", "30000");
///
/// assert_eq!(props.get("user"), Some("default"));
/// assert_eq!(props.get_parsed::<u64>("socket_timeout").unwrap(), Some(30000));
/// ```
///
/// `Debug` output masks the value of `password`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    entries: IndexMap<String, String>,
}

impl Properties {
    /// Create an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property (builder style).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a property, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Get a property.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// Check if a property is set.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a property.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every property of `other` into this bag; `other` wins on conflicts.
    pub fn merge(&mut self, other: &Properties) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Parse a property with [`FromStr`].
    pub fn get_parsed<T>(&self, key: &str) -> ConnectionResult<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|e| ConnectionError::invalid_option(key, format!("'{}': {}", raw, e)))
            })
            .transpose()
    }

    /// Parse a boolean property.
    ///
    /// Accepts `true`/`false`, `1`/`0` and `yes`/`no`, ignoring case.
    pub fn get_bool(&self, key: &str) -> ConnectionResult<Option<bool>> {
        self.get(key)
            .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(ConnectionError::invalid_option(
                    key,
                    format!("'{}' is not a boolean", raw),
                )),
            })
            .transpose()
    }

    /// Load properties from a flat TOML table.
    ///
    /// Scalar values are stored as strings; arrays and nested tables are
    /// rejected.
    ///
    /// ```rust
    /// use chjdbc_url::Properties;
    ///
    /// let props = Properties::from_toml(r#"
    ///     user = "default"
    ///     compress = true
    ///     max_threads = 4
    /// "#).unwrap();
    ///
    /// assert_eq!(props.get("compress"), Some("true"));
    /// assert_eq!(props.get("max_threads"), Some("4"));
    /// ```
    pub fn from_toml(input: &str) -> ConnectionResult<Self> {
        let table: toml::Table = input
            .parse()
            .map_err(|e: toml::de::Error| ConnectionError::Config(e.to_string()))?;

        let mut props = Self::new();
        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Datetime(d) => d.to_string(),
                toml::Value::Array(_) | toml::Value::Table(_) => {
                    return Err(ConnectionError::invalid_option(
                        key,
                        "expected a scalar value",
                    ));
                }
            };
            props.set(key, value);
        }
        Ok(props)
    }

    /// Load properties from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConnectionResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConnectionError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }
}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| {
                if key.eq_ignore_ascii_case(PASSWORD) {
                    (key, "***")
                } else {
                    (key, value)
                }
            }))
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (key, value) in iter {
            props.set(key, value);
        }
        props
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Properties {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_writer_wins_keeps_position() {
        let mut props = Properties::new().with("a", "1").with("b", "2");
        assert_eq!(props.set("a", "3"), Some("1".to_string()));

        let entries: Vec<_> = props.iter().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_debug_masks_password() {
        let props = Properties::new()
            .with("user", "u")
            .with("password", "s3cret")
            .with("PassWord", "other");
        let debug = format!("{:?}", props);

        assert!(!debug.contains("s3cret"), "{}", debug);
        assert!(!debug.contains("other"), "{}", debug);
        assert!(debug.contains("\"user\": \"u\""), "{}", debug);
    }

    #[test]
    fn test_merge() {
        let mut props = Properties::new().with("a", "1").with("b", "2");
        props.merge(&Properties::new().with("b", "x").with("c", "3"));

        assert_eq!(props.get("b"), Some("x"));
        assert_eq!(props.get("c"), Some("3"));
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn test_get_bool() {
        let props = Properties::new()
            .with("a", "TRUE")
            .with("b", "0")
            .with("c", "maybe");

        assert_eq!(props.get_bool("a").unwrap(), Some(true));
        assert_eq!(props.get_bool("b").unwrap(), Some(false));
        assert_eq!(props.get_bool("missing").unwrap(), None);
        assert!(matches!(
            props.get_bool("c"),
            Err(ConnectionError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_get_parsed_error_names_key() {
        let props = Properties::new().with("fetchSize", "lots");
        let err = props.get_parsed::<u32>("fetchSize").unwrap_err();
        assert!(err.to_string().contains("fetchSize"));
    }

    #[test]
    fn test_from_toml_rejects_nested() {
        let result = Properties::from_toml("[server]\nhost = \"h1\"");
        assert!(matches!(result, Err(ConnectionError::InvalidOption { .. })));

        let result = Properties::from_toml("not = [valid");
        assert!(matches!(result, Err(ConnectionError::Config(_))));
    }

    #[test]
    fn test_from_iter_and_remove() {
        let mut props: Properties = vec![("user", "u"), ("password", "p")].into_iter().collect();
        assert_eq!(props.remove("password"), Some("p".to_string()));
        assert!(!props.contains_key("password"));
        assert!(!props.is_empty());
    }
}
