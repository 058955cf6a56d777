//! Reading connection URLs from the environment.
//!
//! URLs stored in environment variables may reference other variables:
//!
//! - `${VAR}`: value of `VAR`, error if unset
//! - `${VAR:-default}`: value of `VAR`, or `default` if unset or empty
//! - `$VAR`: same as `${VAR}`
//! - `$$`: a literal `$`
//!
//! A `$` not followed by `{`, `$`, a letter or `_` is kept as is. Passwords
//! containing `$name` must be written with `$$`, e.g. `pa$$word`.

use crate::{ConnectionError, ConnectionResult};
use std::collections::HashMap;

/// Variable read by [`ConnectionInfo::from_default_env`](crate::ConnectionInfo::from_default_env).
pub const DEFAULT_URL_VAR: &str = "CLICKHOUSE_URL";

/// Where environment variables come from.
pub trait EnvSource: Send + Sync {
    /// Get a variable.
    fn get(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed set of variables, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Expands variable references in connection URLs.
#[derive(Debug, Clone, Default)]
pub struct EnvExpander<S = StdEnvSource> {
    source: S,
}

impl EnvExpander<StdEnvSource> {
    /// Expander over the process environment.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: EnvSource> EnvExpander<S> {
    /// Expander over a custom source.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Read variable `var` and expand the references it contains.
    pub fn read_url(&self, var: &str) -> ConnectionResult<String> {
        let raw = self
            .source
            .get(var)
            .ok_or_else(|| ConnectionError::EnvNotFound(var.to_string()))?;
        self.expand(&raw)
    }

    /// Expand variable references in `input`.
    ///
    /// ```rust
    /// use chjdbc_url::{EnvExpander, MapEnvSource};
    ///
    /// let expander = EnvExpander::with_source(MapEnvSource::new().set("HOSTS", "h1,h2"));
    /// assert_eq!(
    ///     expander.expand("jdbc:ch://$HOSTS/${DB:-default}").unwrap(),
    ///     "jdbc:ch://h1,h2/default"
    /// );
    /// ```
    pub fn expand(&self, input: &str) -> ConnectionResult<String> {
        let mut result = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(dollar) = rest.find('$') {
            result.push_str(&rest[..dollar]);
            let after = &rest[dollar + 1..];

            if let Some(escaped) = after.strip_prefix('$') {
                result.push('$');
                rest = escaped;
                continue;
            }

            if let Some(braced) = after.strip_prefix('{') {
                let end = braced
                    .find('}')
                    .ok_or_else(|| ConnectionError::InvalidEnvValue {
                        name: braced.to_string(),
                        message: "Unterminated '${'".to_string(),
                    })?;
                result.push_str(&self.lookup_braced(&braced[..end])?);
                rest = &braced[end + 1..];
                continue;
            }

            let name_len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let starts_like_name = after.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_');

            if name_len == 0 || !starts_like_name {
                // literal '$'
                result.push('$');
                rest = after;
            } else {
                let name = &after[..name_len];
                let value = self
                    .source
                    .get(name)
                    .ok_or_else(|| ConnectionError::EnvNotFound(name.to_string()))?;
                result.push_str(&value);
                rest = &after[name_len..];
            }
        }

        result.push_str(rest);
        Ok(result)
    }

    fn lookup_braced(&self, expr: &str) -> ConnectionResult<String> {
        let (name, default) = match expr.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (expr, None),
        };

        if name.is_empty() {
            return Err(ConnectionError::InvalidEnvValue {
                name: String::new(),
                message: "Empty variable name".to_string(),
            });
        }

        match (self.source.get(name), default) {
            (Some(value), Some(default)) if value.is_empty() => Ok(default.to_string()),
            (Some(value), _) => Ok(value),
            (None, Some(default)) => Ok(default.to_string()),
            (None, None) => Err(ConnectionError::EnvNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expander() -> EnvExpander<MapEnvSource> {
        EnvExpander::with_source(
            MapEnvSource::new()
                .set("HOST", "h1")
                .set("PORT", "9000")
                .set("EMPTY", ""),
        )
    }

    #[test]
    fn test_expand_simple_and_braced() {
        assert_eq!(
            expander().expand("jdbc:ch://$HOST:${PORT}/db").unwrap(),
            "jdbc:ch://h1:9000/db"
        );
    }

    #[test]
    fn test_expand_default() {
        let expander = expander();
        assert_eq!(expander.expand("${HOST:-x}").unwrap(), "h1");
        assert_eq!(expander.expand("${MISSING:-x}").unwrap(), "x");
        assert_eq!(expander.expand("${EMPTY:-x}").unwrap(), "x");
        assert_eq!(expander.expand("${EMPTY}").unwrap(), "");
    }

    #[test]
    fn test_expand_errors() {
        let expander = expander();
        assert!(matches!(
            expander.expand("${MISSING}"),
            Err(ConnectionError::EnvNotFound(name)) if name == "MISSING"
        ));
        assert!(matches!(
            expander.expand("$MISSING/db"),
            Err(ConnectionError::EnvNotFound(name)) if name == "MISSING"
        ));
        assert!(matches!(
            expander.expand("${HOST"),
            Err(ConnectionError::InvalidEnvValue { .. })
        ));
        assert!(matches!(
            expander.expand("${:-x}"),
            Err(ConnectionError::InvalidEnvValue { .. })
        ));
    }

    #[test]
    fn test_literal_dollar() {
        let expander = expander();
        assert_eq!(expander.expand("p$5w").unwrap(), "p$5w");
        assert_eq!(expander.expand("end$").unwrap(), "end$");
    }

    #[test]
    fn test_escaped_dollar() {
        let expander = expander();
        assert_eq!(expander.expand("pa$$word").unwrap(), "pa$word");
        assert_eq!(expander.expand("$$HOST$$").unwrap(), "$HOST$");
        assert_eq!(expander.expand("$$$HOST").unwrap(), "$h1");
        assert!(matches!(
            expander.expand("pa$word"),
            Err(ConnectionError::EnvNotFound(name)) if name == "word"
        ));
    }

    #[test]
    fn test_password_with_dollar_in_url() {
        let expander = EnvExpander::with_source(
            MapEnvSource::new().set(DEFAULT_URL_VAR, "jdbc:ch://u:pa$$word@${HOST:-h1}/db"),
        );
        assert_eq!(
            expander.read_url(DEFAULT_URL_VAR).unwrap(),
            "jdbc:ch://u:pa$word@h1/db"
        );
    }

    #[test]
    fn test_read_url() {
        let expander = EnvExpander::with_source(
            MapEnvSource::new()
                .set(DEFAULT_URL_VAR, "jdbc:ch://${HOST}/db")
                .set("HOST", "h1"),
        );
        assert_eq!(expander.read_url(DEFAULT_URL_VAR).unwrap(), "jdbc:ch://h1/db");
        assert!(expander.read_url("NOPE").is_err());
    }
}
