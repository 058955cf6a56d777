//! Multi-host URL splitting and aggregation.
//!
//! A multi-host URL lists several candidate servers that share everything
//! except the host and port:
//!
//! ```text
//! jdbc:ch://user:pass@h1:9000,h2:9000,h3/db?compress=1
//! ```
//!
//! [`MultiHostUrl::split`] turns it into one single-host URL per entry and
//! [`MultiHostUrlParser`] runs a [`SingleHostParser`] over each of them.

use crate::{
    ConnectionError, ConnectionInfo, ConnectionResult, JdbcUrlParser, Properties,
    SingleHostInfo, SingleHostParser,
};
use tracing::{debug, trace};

/// A multi-host URL split into the parts every host shares and the host list.
///
/// Borrows from the input; nothing is decoded or trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiHostUrl<'a> {
    prefix: &'a str,
    user_info: &'a str,
    hosts: Vec<&'a str>,
    path_and_query: &'a str,
}

impl<'a> MultiHostUrl<'a> {
    /// Split a multi-host URL.
    ///
    /// Empty host entries (`h1,,h2` or a trailing comma) are kept; the
    /// single-host parser rejects them later.
    ///
    /// ```rust
    /// use chjdbc_url::MultiHostUrl;
    ///
    /// let split = MultiHostUrl::split("jdbc:ch://u:p@h1:9000,h2/db?x=1").unwrap();
    /// assert_eq!(split.prefix(), "jdbc:ch:");
    /// assert_eq!(split.user_info(), "u:p@");
    /// assert_eq!(split.hosts(), ["h1:9000", "h2"]);
    /// assert_eq!(split.path_and_query(), "db?x=1");
    /// assert_eq!(split.host_url("h2"), "jdbc:ch://u:p@h2/db?x=1");
    /// ```
    pub fn split(url: &'a str) -> ConnectionResult<Self> {
        let (prefix, rest) =
            url.split_once("//")
                .ok_or_else(|| ConnectionError::MissingAuthority {
                    url: url.to_string(),
                })?;

        let (authority, path_and_query) =
            rest.split_once('/')
                .ok_or_else(|| ConnectionError::MissingPathSeparator {
                    url: url.to_string(),
                })?;

        let (user_info, host_list) = match authority.split_once('@') {
            None => ("", authority),
            Some((_, hosts)) if hosts.contains('@') => {
                return Err(ConnectionError::AmbiguousCredentials {
                    url: url.to_string(),
                });
            }
            // user info keeps its trailing '@'
            Some((user, hosts)) => (&authority[..=user.len()], hosts),
        };

        if host_list.is_empty() {
            return Err(ConnectionError::MissingHost {
                url: url.to_string(),
            });
        }

        Ok(Self {
            prefix,
            user_info,
            hosts: host_list.split(',').collect(),
            path_and_query,
        })
    }

    /// Everything before `//`, e.g. `jdbc:ch:` or `jdbc:clickhouse:https:`.
    pub fn prefix(&self) -> &'a str {
        self.prefix
    }

    /// User info including the trailing `@`, or empty.
    pub fn user_info(&self) -> &'a str {
        self.user_info
    }

    /// Host entries in input order.
    pub fn hosts(&self) -> &[&'a str] {
        &self.hosts
    }

    /// Everything after the `/` that ends the authority.
    pub fn path_and_query(&self) -> &'a str {
        self.path_and_query
    }

    /// Number of host entries.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Always `false`: splitting fails when there is no host.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Build the single-host URL for one entry.
    pub fn host_url(&self, entry: &str) -> String {
        format!(
            "{}//{}{}/{}",
            self.prefix, self.user_info, entry, self.path_and_query
        )
    }

    /// Single-host URLs for every entry, paired with the entry, in input order.
    pub fn host_urls(&self) -> impl Iterator<Item = (&'a str, String)> + '_ {
        self.hosts.iter().map(|entry| (*entry, self.host_url(entry)))
    }
}

/// Parses multi-host URLs by delegating each host to a [`SingleHostParser`].
#[derive(Debug, Clone, Default)]
pub struct MultiHostUrlParser<P = JdbcUrlParser> {
    parser: P,
}

impl MultiHostUrlParser<JdbcUrlParser> {
    /// Create a parser for ClickHouse JDBC URLs.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: SingleHostParser> MultiHostUrlParser<P> {
    /// Create a parser with a custom single-host parser.
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    /// Get the single-host parser.
    pub fn single_host_parser(&self) -> &P {
        &self.parser
    }

    /// Parse a multi-host URL.
    ///
    /// Every host is parsed with the same `defaults`, in input order. The
    /// first failure aborts the parse and is returned wrapped in
    /// [`ConnectionError::HostEntry`]; no nodes are returned.
    pub fn parse(&self, url: &str, defaults: &Properties) -> ConnectionResult<ConnectionInfo> {
        debug!(url_len = url.len(), "MultiHostUrlParser::parse()");
        let split = MultiHostUrl::split(url)?;

        let (nodes, last) = split.host_urls().enumerate().try_fold(
            (Vec::with_capacity(split.len()), None),
            |(mut nodes, _), (index, (entry, host_url))| {
                trace!(index, entry, "Parsing host entry");
                let SingleHostInfo {
                    node,
                    uri,
                    properties,
                } = self.parser.parse_one(&host_url, defaults).map_err(|source| {
                    ConnectionError::HostEntry {
                        url: url.to_string(),
                        index,
                        entry: entry.to_string(),
                        source: Box::new(source),
                    }
                })?;
                nodes.push(node);
                // Only the final host's query and properties survive the fold
                Ok::<_, ConnectionError>((nodes, Some((uri, properties))))
            },
        )?;

        let (uri, properties) = last.ok_or_else(|| ConnectionError::MissingHost {
            url: url.to_string(),
        })?;
        let query = uri.query().map(String::from);

        debug!(hosts = nodes.len(), "Multi-host URL parsed");
        Ok(ConnectionInfo::new(query, nodes, properties))
    }
}

/// Parse a multi-host ClickHouse JDBC URL with [`JdbcUrlParser`].
///
/// ```rust
/// use chjdbc_url::{parse, Properties};
///
/// let info = parse("jdbc:ch://h1:9000,h2:9000/db", &Properties::new()).unwrap();
/// assert_eq!(info.nodes().len(), 2);
/// assert_eq!(info.nodes()[1].address(), "h2:9000");
/// ```
pub fn parse(url: &str, defaults: &Properties) -> ConnectionResult<ConnectionInfo> {
    MultiHostUrlParser::new().parse(url, defaults)
}
