//! Single-host URL parsing.
//!
//! The multi-host parser splits its input into single-host URLs and hands
//! each one to a [`SingleHostParser`]. [`JdbcUrlParser`] is the implementation
//! for ClickHouse JDBC URLs:
//!
//! ```text
//! jdbc:clickhouse:[protocol:]//[user[:password]@]host[:port]/[database][?key=value&...]
//! jdbc:ch:[protocol:]//[user[:password]@]host[:port]/[database][?key=value&...]
//! ```
//!
//! `protocol` is one of `http`, `https`, `grpc`, `grpcs`, `tcp`, `native`,
//! `tcps` and defaults to `http`.

use crate::{ConnectionError, ConnectionResult, Node, Properties, Protocol};
use percent_encoding::percent_decode_str;
use std::net::Ipv6Addr;
use tracing::trace;
use url::Url;

/// Accepted JDBC URL prefixes, matched ignoring ASCII case.
pub const JDBC_PREFIXES: &[&str] = &["jdbc:clickhouse:", "jdbc:ch:"];

/// Prefix used when rebuilding node URIs.
pub const JDBC_URI_PREFIX: &str = "jdbc:clickhouse:";

/// Property key for the user name.
pub const USER: &str = "user";
/// Property key for the password.
pub const PASSWORD: &str = "password";
/// Property key for the database, used when the URL path is empty.
pub const DATABASE: &str = "database";
/// Property key set to `true` for TLS protocols.
pub const SSL: &str = "ssl";

/// Result of parsing one single-host URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleHostInfo {
    /// The endpoint.
    pub node: Node,
    /// The parsed URL, without the JDBC prefix.
    pub uri: Url,
    /// Defaults merged with credentials and query parameters.
    pub properties: Properties,
}

impl SingleHostInfo {
    /// Raw (still percent-encoded) query of the URL.
    pub fn raw_query(&self) -> Option<&str> {
        self.uri.query()
    }
}

/// Parses a URL naming exactly one host.
pub trait SingleHostParser: Send + Sync {
    /// Parse `url`, merging its settings over `defaults`.
    ///
    /// `defaults` is never modified; every call starts from the same bag.
    fn parse_one(&self, url: &str, defaults: &Properties) -> ConnectionResult<SingleHostInfo>;
}

/// Single-host parser for `jdbc:clickhouse:` and `jdbc:ch:` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct JdbcUrlParser;

impl JdbcUrlParser {
    /// Create a parser.
    pub fn new() -> Self {
        Self
    }
}

impl SingleHostParser for JdbcUrlParser {
    fn parse_one(&self, url: &str, defaults: &Properties) -> ConnectionResult<SingleHostInfo> {
        let rest = strip_jdbc_prefix(url).ok_or_else(|| ConnectionError::UnsupportedPrefix {
            url: url.to_string(),
        })?;

        let (scheme, after) =
            rest.split_once("//")
                .ok_or_else(|| ConnectionError::MissingAuthority {
                    url: url.to_string(),
                })?;

        let (protocol, secure) = parse_protocol(url, scheme)?;

        // `Url` would drop tabs and newlines silently
        if let Some(c) = after.chars().find(char::is_ascii_control) {
            return Err(ConnectionError::invalid_url(
                url,
                format!("Control character {:?} in URL", c),
            ));
        }

        // Authority ends at the first path, query or fragment delimiter
        let authority_end = after.find(['/', '?', '#']).unwrap_or(after.len());
        let authority = &after[..authority_end];

        let (user_info, host_port) = match authority.rsplit_once('@') {
            Some((user_info, host_port)) => (Some(user_info), host_port),
            None => (None, authority),
        };

        let (host, port) = split_host_port(url, host_port)?;

        let uri = Url::parse(&format!("{}://{}", protocol.name(), after))
            .map_err(|e| ConnectionError::invalid_url(url, e.to_string()))?;

        let mut properties = defaults.clone();

        if let Some(user_info) = user_info {
            let (user, password) = match user_info.split_once(':') {
                Some((user, password)) => (user, Some(password)),
                None => (user_info, None),
            };
            if !user.is_empty() {
                properties.set(USER, decode(user));
            }
            if let Some(password) = password {
                properties.set(PASSWORD, decode(password));
            }
        }

        if secure {
            properties.set(SSL, "true");
        }

        properties.extend(uri.query_pairs());

        let database = uri
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .map(decode)
            .or_else(|| {
                properties
                    .get(DATABASE)
                    .filter(|db| !db.is_empty())
                    .map(String::from)
            });

        let mut node = Node::new(
            protocol,
            host,
            port.unwrap_or_else(|| protocol.default_port(secure)),
        )
        .with_secure(secure);
        if let Some(database) = database {
            node = node.with_database(database);
        }

        trace!(node = %node, "Parsed single-host URL");

        Ok(SingleHostInfo {
            node,
            uri,
            properties,
        })
    }
}

fn strip_jdbc_prefix(url: &str) -> Option<&str> {
    JDBC_PREFIXES.iter().find_map(|prefix| {
        let head = url.get(..prefix.len())?;
        head.eq_ignore_ascii_case(prefix)
            .then(|| &url[prefix.len()..])
    })
}

fn parse_protocol(url: &str, scheme: &str) -> ConnectionResult<(Protocol, bool)> {
    if scheme.is_empty() {
        return Ok((Protocol::default(), false));
    }

    scheme
        .strip_suffix(':')
        .and_then(Protocol::from_scheme)
        .ok_or_else(|| ConnectionError::UnknownProtocol {
            url: url.to_string(),
            protocol: scheme.trim_end_matches(':').to_string(),
        })
}

fn split_host_port<'a>(url: &str, host_port: &'a str) -> ConnectionResult<(&'a str, Option<u16>)> {
    let ipv6 = host_port.starts_with('[');
    let (host, port) = if let Some(bracketed) = host_port.strip_prefix('[') {
        // IPv6 literal, optionally followed by :port
        let (host, tail) = bracketed
            .split_once(']')
            .ok_or_else(|| ConnectionError::invalid_url(url, "Invalid IPv6 address"))?;
        if tail.is_empty() {
            (host, None)
        } else {
            let port = tail.strip_prefix(':').ok_or_else(|| {
                ConnectionError::invalid_url(url, "Unexpected characters after IPv6 address")
            })?;
            (host, Some(port))
        }
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    if host.is_empty() {
        return Err(ConnectionError::MissingHost {
            url: url.to_string(),
        });
    }

    let valid = if ipv6 {
        host.parse::<Ipv6Addr>().is_ok()
    } else {
        is_host_name(host)
    };
    if !valid {
        return Err(ConnectionError::invalid_url(
            url,
            format!("Invalid host '{}'", host),
        ));
    }

    let port = port
        .map(|port| {
            port.parse::<u16>()
                .map_err(|_| ConnectionError::InvalidPort {
                    url: url.to_string(),
                    port: port.to_string(),
                })
        })
        .transpose()?;

    Ok((host, port))
}

/// DNS name or IPv4 address: dot-separated, non-empty labels of ASCII
/// letters, digits, `-` and `_`.
fn is_host_name(host: &str) -> bool {
    host.split('.').all(|label| {
        !label.is_empty()
            && label
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    })
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}
