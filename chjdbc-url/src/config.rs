//! Typed JDBC configuration derived from a property bag.

use crate::{ConnectionResult, Properties};
use indexmap::IndexMap;
use tracing::warn;

/// Property key for auto-commit.
pub const AUTO_COMMIT: &str = "autoCommit";
/// Property key for continuing a batch after a failed statement.
pub const CONTINUE_BATCH_ON_ERROR: &str = "continueBatchOnError";
/// Property key for creating the database on first connect.
pub const CREATE_DATABASE_IF_NOT_EXIST: &str = "createDatabaseIfNotExist";
/// Property key for the default fetch size.
pub const FETCH_SIZE: &str = "fetchSize";
/// Property key for strict JDBC compliance.
pub const JDBC_COMPLIANT: &str = "jdbcCompliant";
/// Property key for named query parameters.
pub const NAMED_PARAMETER: &str = "namedParameter";
/// Property key for custom type mappings.
pub const TYPE_MAPPINGS: &str = "typeMappings";
/// Property key for returning wrapper objects for arrays and tuples.
pub const WRAPPER_OBJECT: &str = "wrapperObject";

/// Driver-level settings read from [`Properties`].
///
/// Values that cannot be parsed are logged and the default is kept, so
/// building a config never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdbcConfig {
    /// Commit after every statement.
    pub auto_commit: bool,
    /// Keep executing a batch after a statement fails.
    pub continue_batch_on_error: bool,
    /// Create the target database if it does not exist.
    pub create_database_if_not_exist: bool,
    /// Rows per fetch, 0 means driver default.
    pub fetch_size: u32,
    /// Behave strictly as the JDBC contract says.
    pub jdbc_compliant: bool,
    /// Accept `:name` parameters in queries.
    pub named_parameter: bool,
    /// Custom ClickHouse-to-JDBC type mappings.
    pub type_mappings: IndexMap<String, String>,
    /// Return wrapper objects instead of raw arrays.
    pub wrapper_object: bool,
}

impl Default for JdbcConfig {
    fn default() -> Self {
        Self {
            auto_commit: true,
            continue_batch_on_error: false,
            create_database_if_not_exist: false,
            fetch_size: 0,
            jdbc_compliant: true,
            named_parameter: false,
            type_mappings: IndexMap::new(),
            wrapper_object: false,
        }
    }
}

impl JdbcConfig {
    /// Build a config from a property bag.
    pub fn from_properties(props: &Properties) -> Self {
        let defaults = Self::default();

        Self {
            auto_commit: lenient(AUTO_COMMIT, props.get_bool(AUTO_COMMIT), defaults.auto_commit),
            continue_batch_on_error: lenient(
                CONTINUE_BATCH_ON_ERROR,
                props.get_bool(CONTINUE_BATCH_ON_ERROR),
                defaults.continue_batch_on_error,
            ),
            create_database_if_not_exist: lenient(
                CREATE_DATABASE_IF_NOT_EXIST,
                props.get_bool(CREATE_DATABASE_IF_NOT_EXIST),
                defaults.create_database_if_not_exist,
            ),
            fetch_size: lenient(FETCH_SIZE, props.get_parsed(FETCH_SIZE), defaults.fetch_size),
            jdbc_compliant: lenient(
                JDBC_COMPLIANT,
                props.get_bool(JDBC_COMPLIANT),
                defaults.jdbc_compliant,
            ),
            named_parameter: lenient(
                NAMED_PARAMETER,
                props.get_bool(NAMED_PARAMETER),
                defaults.named_parameter,
            ),
            type_mappings: props
                .get(TYPE_MAPPINGS)
                .map(parse_type_mappings)
                .unwrap_or_default(),
            wrapper_object: lenient(
                WRAPPER_OBJECT,
                props.get_bool(WRAPPER_OBJECT),
                defaults.wrapper_object,
            ),
        }
    }
}

fn lenient<T>(key: &str, value: ConnectionResult<Option<T>>, default: T) -> T {
    match value {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            warn!(key = key, error = %e, "Ignoring invalid JDBC option");
            default
        }
    }
}

// `typeMappings=UInt128=java.lang.String,Int8=java.lang.Byte`
fn parse_type_mappings(raw: &str) -> IndexMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (from, to) = pair.split_once('=')?;
            let (from, to) = (from.trim(), to.trim());
            if from.is_empty() || to.is_empty() {
                warn!(mapping = pair, "Ignoring malformed type mapping");
                return None;
            }
            Some((from.to_string(), to.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = JdbcConfig::from_properties(&Properties::new());
        assert_eq!(config, JdbcConfig::default());
        assert!(config.auto_commit);
        assert!(config.jdbc_compliant);
        assert_eq!(config.fetch_size, 0);
    }

    #[test]
    fn test_from_properties() {
        let props = Properties::new()
            .with(AUTO_COMMIT, "false")
            .with(FETCH_SIZE, "500")
            .with(NAMED_PARAMETER, "1")
            .with(TYPE_MAPPINGS, "UInt128=java.lang.String, Int8=java.lang.Byte");

        let config = JdbcConfig::from_properties(&props);
        assert!(!config.auto_commit);
        assert_eq!(config.fetch_size, 500);
        assert!(config.named_parameter);
        assert_eq!(
            config.type_mappings.get("UInt128").map(String::as_str),
            Some("java.lang.String")
        );
        assert_eq!(config.type_mappings.len(), 2);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let props = Properties::new()
            .with(AUTO_COMMIT, "sometimes")
            .with(FETCH_SIZE, "-1")
            .with(TYPE_MAPPINGS, "broken,=x,Int8=java.lang.Byte");

        let config = JdbcConfig::from_properties(&props);
        assert!(config.auto_commit);
        assert_eq!(config.fetch_size, 0);
        assert_eq!(config.type_mappings.len(), 1);
    }
}
