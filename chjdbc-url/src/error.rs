//! Error types for connection URL parsing.
//!
//! Every failure is reported as a [`ConnectionError`]. Each variant carries
//! the offending input so the caller can fix the URL, and maps to an
//! [`ErrorKind`] for programmatic handling.
//!
//! # Error Codes
//!
//! Codes follow the pattern `C{category}{number}`:
//! - 1xxx: multi-host syntax (authority, path separator, credentials, hosts)
//! - 2xxx: single-host syntax (prefix, protocol, port, URL)
//! - 3xxx: configuration (property values, TOML defaults)
//! - 4xxx: environment variables
//!
//! ```rust
//! use chjdbc_url::{ConnectionError, ErrorKind};
//!
//! let err = ConnectionError::MissingAuthority {
//!     url: "jdbc:ch:localhost/db".to_string(),
//! };
//! assert_eq!(err.kind(), ErrorKind::MissingAuthority);
//! assert_eq!(err.kind().code(), "C1001");
//! assert_eq!(err.url(), Some("jdbc:ch:localhost/db"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for connection URL operations.
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Reason codes for connection URL errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No `//` authority marker (C1001).
    MissingAuthority = 1001,
    /// No `/` after the host/port list (C1002).
    MissingPathSeparator = 1002,
    /// More than one `@` in the authority (C1003).
    AmbiguousCredentials = 1003,
    /// The authority names no host (C1004).
    MissingHost = 1004,
    /// One entry of a multi-host list was rejected (C1005).
    InvalidHostEntry = 1005,

    /// The URL does not start with a known JDBC prefix (C2001).
    UnsupportedPrefix = 2001,
    /// Unknown protocol between the prefix and `//` (C2002).
    UnknownProtocol = 2002,
    /// Port is not a valid 16-bit number (C2003).
    InvalidPort = 2003,
    /// The URL could not be composed or parsed (C2004).
    InvalidUrl = 2004,

    /// A property has an unusable value (C3001).
    InvalidOption = 3001,
    /// Configuration source could not be read (C3002).
    Config = 3002,

    /// Environment variable is not set (C4001).
    EnvNotFound = 4001,
    /// Environment variable reference is malformed or required (C4002).
    InvalidEnvValue = 4002,
}

impl ErrorKind {
    /// Get the error code string (e.g., "C1001").
    pub fn code(&self) -> String {
        format!("C{}", *self as u16)
    }

    /// Get a short description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            Self::MissingAuthority => "missing authority marker",
            Self::MissingPathSeparator => "missing path separator after host/port",
            Self::AmbiguousCredentials => "ambiguous credential separator",
            Self::MissingHost => "no host information present",
            Self::InvalidHostEntry => "invalid host entry",
            Self::UnsupportedPrefix => "unsupported URL prefix",
            Self::UnknownProtocol => "unknown protocol",
            Self::InvalidPort => "invalid port number",
            Self::InvalidUrl => "invalid URL",
            Self::InvalidOption => "invalid option value",
            Self::Config => "configuration error",
            Self::EnvNotFound => "environment variable not found",
            Self::InvalidEnvValue => "invalid environment variable",
        }
    }

    /// Whether this kind describes a syntax problem in the URL itself.
    pub fn is_syntax(&self) -> bool {
        (*self as u16) < 3000
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur while parsing a connection URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The URL has no `//` authority marker.
    #[error("Missing '//' from the given connection URL: {url}")]
    MissingAuthority { url: String },

    /// The authority is not followed by a `/`.
    #[error("Missing '/' after host or port: {url}")]
    MissingPathSeparator { url: String },

    /// The authority contains more than one `@`.
    #[error("Too many '@' in authority: {url}")]
    AmbiguousCredentials { url: String },

    /// The authority contains no host.
    #[error("URL doesn't contain host info: {url}")]
    MissingHost { url: String },

    /// One host of a multi-host URL failed to parse.
    #[error("Invalid host entry #{index} '{entry}' in {url}: {source}")]
    HostEntry {
        /// The full multi-host URL.
        url: String,
        /// Zero-based position of the entry in the host list.
        index: usize,
        /// The raw `host[:port]` text of the entry.
        entry: String,
        /// Why the synthesized single-host URL was rejected.
        #[source]
        source: Box<ConnectionError>,
    },

    /// The URL does not start with `jdbc:clickhouse:` or `jdbc:ch:`.
    #[error("Unsupported connection URL prefix, expected 'jdbc:clickhouse:' or 'jdbc:ch:': {url}")]
    UnsupportedPrefix { url: String },

    /// The protocol before `//` is unknown.
    #[error("Unknown protocol '{protocol}' in {url}")]
    UnknownProtocol { url: String, protocol: String },

    /// The port is not a number in 0..=65535.
    #[error("Invalid port '{port}' in {url}")]
    InvalidPort { url: String, port: String },

    /// The URL could not be parsed or composed.
    #[error("Invalid connection URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Invalid option value.
    #[error("Invalid option '{key}': {message}")]
    InvalidOption { key: String, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Environment variable not found.
    #[error("Environment variable not found: {0}")]
    EnvNotFound(String),

    /// Invalid environment variable value.
    #[error("Invalid environment variable '{name}': {message}")]
    InvalidEnvValue { name: String, message: String },
}

impl ConnectionError {
    /// Create an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an invalid option error.
    pub fn invalid_option(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Get the reason code of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingAuthority { .. } => ErrorKind::MissingAuthority,
            Self::MissingPathSeparator { .. } => ErrorKind::MissingPathSeparator,
            Self::AmbiguousCredentials { .. } => ErrorKind::AmbiguousCredentials,
            Self::MissingHost { .. } => ErrorKind::MissingHost,
            Self::HostEntry { .. } => ErrorKind::InvalidHostEntry,
            Self::UnsupportedPrefix { .. } => ErrorKind::UnsupportedPrefix,
            Self::UnknownProtocol { .. } => ErrorKind::UnknownProtocol,
            Self::InvalidPort { .. } => ErrorKind::InvalidPort,
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::InvalidOption { .. } => ErrorKind::InvalidOption,
            Self::Config(_) => ErrorKind::Config,
            Self::EnvNotFound(_) => ErrorKind::EnvNotFound,
            Self::InvalidEnvValue { .. } => ErrorKind::InvalidEnvValue,
        }
    }

    /// Get the URL that caused this error, if the error is about a URL.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::MissingAuthority { url }
            | Self::MissingPathSeparator { url }
            | Self::AmbiguousCredentials { url }
            | Self::MissingHost { url }
            | Self::HostEntry { url, .. }
            | Self::UnsupportedPrefix { url }
            | Self::UnknownProtocol { url, .. }
            | Self::InvalidPort { url, .. }
            | Self::InvalidUrl { url, .. } => Some(url),
            Self::InvalidOption { .. }
            | Self::Config(_)
            | Self::EnvNotFound(_)
            | Self::InvalidEnvValue { .. } => None,
        }
    }

    /// Follow [`ConnectionError::HostEntry`] wrappers down to the error
    /// reported by the single-host parser.
    pub fn root_cause(&self) -> &ConnectionError {
        let mut current = self;
        while let Self::HostEntry { source, .. } = current {
            current = source;
        }
        current
    }

    /// Index of the failing host entry, for multi-host failures.
    pub fn host_index(&self) -> Option<usize> {
        match self {
            Self::HostEntry { index, .. } => Some(*index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorKind::MissingAuthority.code(), "C1001");
        assert_eq!(ErrorKind::InvalidHostEntry.code(), "C1005");
        assert_eq!(ErrorKind::InvalidUrl.code(), "C2004");
        assert_eq!(ErrorKind::EnvNotFound.to_string(), "C4001");
    }

    #[test]
    fn test_syntax_kinds() {
        assert!(ErrorKind::AmbiguousCredentials.is_syntax());
        assert!(ErrorKind::InvalidPort.is_syntax());
        assert!(!ErrorKind::InvalidOption.is_syntax());
        assert!(!ErrorKind::EnvNotFound.is_syntax());
    }

    #[test]
    fn test_host_entry_root_cause() {
        let err = ConnectionError::HostEntry {
            url: "jdbc:ch://a,,b/db".to_string(),
            index: 1,
            entry: String::new(),
            source: Box::new(ConnectionError::MissingHost {
                url: "jdbc:ch:///db".to_string(),
            }),
        };

        assert_eq!(err.kind(), ErrorKind::InvalidHostEntry);
        assert_eq!(err.host_index(), Some(1));
        assert_eq!(err.url(), Some("jdbc:ch://a,,b/db"));
        assert_eq!(err.root_cause().kind(), ErrorKind::MissingHost);
        assert!(err.to_string().contains("#1"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display_names_missing_token() {
        let err = ConnectionError::MissingPathSeparator {
            url: "jdbc:ch://h1:9000".to_string(),
        };
        assert!(err.to_string().contains("'/'"));
        assert!(err.to_string().contains("jdbc:ch://h1:9000"));
        assert_eq!(err.url(), Some("jdbc:ch://h1:9000"));
    }
}
