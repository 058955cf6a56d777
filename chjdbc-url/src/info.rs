//! The result of a multi-host parse and per-node URI reconstruction.

use crate::env::{DEFAULT_URL_VAR, EnvExpander, EnvSource, StdEnvSource};
use crate::single::JDBC_URI_PREFIX;
use crate::{
    ConnectionError, ConnectionResult, JdbcConfig, Node, Properties,
    remove_credentials_from_query,
};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::fmt;
use tracing::info;
use url::{Position, Url};

// Characters escaped in the database path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Connection URI of a single node, without credentials.
///
/// Renders as `jdbc:clickhouse:<protocol>://host:port/database[?query]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeUri {
    uri: String,
    url: Url,
    port: u16,
}

impl NodeUri {
    /// Scheme including the JDBC prefix, e.g. `jdbc:clickhouse:http`.
    pub fn scheme(&self) -> String {
        format!("{}{}", JDBC_URI_PREFIX, self.url.scheme())
    }

    /// Host of the node.
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Port of the node; always explicit, even when it matches the scheme default.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path: `/` followed by the database, if any.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Query with credentials removed.
    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// The URI without the JDBC prefix.
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// The full URI string.
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for NodeUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Build the credential-free URI of `node`.
///
/// `raw_query` is the query shared by all nodes of a multi-host URL;
/// credential parameters are removed before it is attached. The rendered
/// string is taken from the normalized URL, so it always agrees with the
/// accessors. A `#` in the query is rejected. Pure: the result depends only
/// on the arguments.
///
/// ```rust
/// use chjdbc_url::{node_uri, Node, Protocol};
///
/// let node = Node::new(Protocol::Http, "h1", 9000).with_database("db");
/// let uri = node_uri(Some("user=u&password=p&x=1"), &node).unwrap();
/// assert_eq!(uri.to_string(), "jdbc:clickhouse:http://h1:9000/db?x=1");
/// ```
pub fn node_uri(raw_query: Option<&str>, node: &Node) -> ConnectionResult<NodeUri> {
    let database = node
        .database()
        .map(|db| utf8_percent_encode(db, PATH_SEGMENT).to_string())
        .unwrap_or_default();

    let mut inner = format!(
        "{}://{}/{}",
        node.protocol().name(),
        node.address(),
        database
    );
    if let Some(query) = remove_credentials_from_query(raw_query) {
        inner.push('?');
        inner.push_str(&query);
    }

    let invalid = |message: String| {
        ConnectionError::invalid_url(format!("{}{}", JDBC_URI_PREFIX, inner), message)
    };
    let url = Url::parse(&inner).map_err(|e| invalid(e.to_string()))?;
    if url.fragment().is_some() {
        return Err(invalid("Query must not contain '#'".to_string()));
    }
    let host = url.host().ok_or_else(|| invalid("Missing host".to_string()))?;

    // Rendered from the normalized URL; the port is written even when it is
    // the scheme default, which `Url` would elide
    let uri = format!(
        "{}{}://{}:{}{}",
        JDBC_URI_PREFIX,
        url.scheme(),
        host,
        node.port(),
        &url[Position::BeforePath..]
    );

    Ok(NodeUri {
        uri,
        url,
        port: node.port(),
    })
}

/// Everything a multi-host URL resolves to.
///
/// Nodes keep the order of the URL, duplicates included. The property bag
/// and query are those of the last host; all hosts share them by
/// construction. The query is stored with credential parameters removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    query: Option<String>,
    nodes: Vec<Node>,
    config: JdbcConfig,
    properties: Properties,
}

impl ConnectionInfo {
    /// Assemble connection info. The config is derived from `properties`
    /// and credential parameters are removed from `query`.
    pub fn new(query: Option<String>, nodes: Vec<Node>, properties: Properties) -> Self {
        Self {
            query: remove_credentials_from_query(query.as_deref()),
            nodes,
            config: JdbcConfig::from_properties(&properties),
            properties,
        }
    }

    /// Parse a multi-host URL with the default single-host parser.
    pub fn parse(url: &str, defaults: &Properties) -> ConnectionResult<Self> {
        crate::parse(url, defaults)
    }

    /// Parse the URL stored in an environment variable, expanding `${VAR}`
    /// references inside it first.
    pub fn from_env(var: &str, defaults: &Properties) -> ConnectionResult<Self> {
        Self::from_env_source(&EnvExpander::<StdEnvSource>::new(), var, defaults)
    }

    /// Parse the URL in `CLICKHOUSE_URL`.
    pub fn from_default_env(defaults: &Properties) -> ConnectionResult<Self> {
        Self::from_env(DEFAULT_URL_VAR, defaults)
    }

    /// Like [`ConnectionInfo::from_env`], reading variables through `expander`.
    pub fn from_env_source<S: EnvSource>(
        expander: &EnvExpander<S>,
        var: &str,
        defaults: &Properties,
    ) -> ConnectionResult<Self> {
        info!(var = var, "Loading connection URL from environment");
        let url = expander.read_url(var)?;
        Self::parse(&url, defaults)
    }

    /// Nodes in URL order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Driver configuration.
    pub fn config(&self) -> &JdbcConfig {
        &self.config
    }

    /// Merged property bag.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Query shared by all nodes, credential parameters removed.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Credential-free URI for `node`. See [`node_uri`].
    pub fn uri_for(&self, node: &Node) -> ConnectionResult<NodeUri> {
        node_uri(self.query(), node)
    }

    /// URIs for all nodes, in order.
    pub fn uris(&self) -> ConnectionResult<Vec<NodeUri>> {
        self.nodes.iter().map(|node| self.uri_for(node)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Protocol;
    use crate::env::MapEnvSource;

    #[test]
    fn test_node_uri_parts() {
        let node = Node::new(Protocol::Tcp, "h1", 9000).with_database("db");
        let uri = node_uri(Some("x=1&password=secret"), &node).unwrap();

        assert_eq!(uri.scheme(), "jdbc:clickhouse:tcp");
        assert_eq!(uri.host(), Some("h1"));
        assert_eq!(uri.port(), 9000);
        assert_eq!(uri.path(), "/db");
        assert_eq!(uri.query(), Some("x=1"));
        assert_eq!(uri.as_str(), "jdbc:clickhouse:tcp://h1:9000/db?x=1");
    }

    #[test]
    fn test_node_uri_without_database_or_query() {
        let node = Node::new(Protocol::Http, "h1", 8123);
        let uri = node_uri(None, &node).unwrap();
        assert_eq!(uri.to_string(), "jdbc:clickhouse:http://h1:8123/");
        assert_eq!(uri.query(), None);
    }

    #[test]
    fn test_node_uri_keeps_default_port() {
        let node = Node::new(Protocol::Http, "h1", 80);
        let uri = node_uri(None, &node).unwrap();
        assert_eq!(uri.port(), 80);
        assert_eq!(uri.to_string(), "jdbc:clickhouse:http://h1:80/");
    }

    #[test]
    fn test_node_uri_encodes_database() {
        let node = Node::new(Protocol::Http, "h1", 8123).with_database("my db/x");
        let uri = node_uri(None, &node).unwrap();
        assert_eq!(uri.path(), "/my%20db%2Fx");
    }

    #[test]
    fn test_node_uri_ipv6() {
        let node = Node::new(Protocol::Http, "::1", 8123);
        let uri = node_uri(None, &node).unwrap();
        assert_eq!(uri.host(), Some("[::1]"));
    }

    #[test]
    fn test_node_uri_string_matches_parts() {
        let node = Node::new(Protocol::Http, "H1.Example", 9000).with_database("db");
        let uri = node_uri(Some("a b=1"), &node).unwrap();

        assert_eq!(uri.host(), Some("h1.example"));
        assert_eq!(uri.query(), Some("a%20b=1"));
        assert_eq!(uri.as_str(), "jdbc:clickhouse:http://h1.example:9000/db?a%20b=1");
    }

    #[test]
    fn test_node_uri_rejects_fragment_in_query() {
        let node = Node::new(Protocol::Http, "h1", 9000);
        let err = node_uri(Some("x=1#frag"), &node).unwrap_err();
        assert!(matches!(err, ConnectionError::InvalidUrl { .. }));
    }

    #[test]
    fn test_node_uri_rejects_bad_host() {
        let node = Node::new(Protocol::Http, "bad host", 8123);
        let err = node_uri(None, &node).unwrap_err();
        assert!(matches!(err, ConnectionError::InvalidUrl { .. }));
    }

    #[test]
    fn test_query_stored_without_credentials() {
        let info = ConnectionInfo::new(
            Some("user=u&x=1&Password=p".to_string()),
            vec![Node::new(Protocol::Http, "h1", 8123)],
            Properties::new().with("password", "p"),
        );
        assert_eq!(info.query(), Some("x=1"));
        assert!(!format!("{:?}", info).contains("=p"));

        let info = ConnectionInfo::new(Some("password=p".to_string()), Vec::new(), Properties::new());
        assert_eq!(info.query(), None);
    }

    #[test]
    fn test_config_follows_properties() {
        let props = Properties::new().with("autoCommit", "false");
        let info = ConnectionInfo::new(None, vec![Node::new(Protocol::Http, "h1", 8123)], props);
        assert!(!info.config().auto_commit);
    }

    #[test]
    fn test_from_env_source() {
        let expander = EnvExpander::with_source(
            MapEnvSource::new()
                .set("CH_URL", "jdbc:ch://${CH_HOSTS}/db")
                .set("CH_HOSTS", "h1:9000,h2:9000"),
        );
        let info = ConnectionInfo::from_env_source(&expander, "CH_URL", &Properties::new()).unwrap();
        assert_eq!(info.nodes().len(), 2);

        let err =
            ConnectionInfo::from_env_source(&expander, "MISSING", &Properties::new()).unwrap_err();
        assert!(matches!(err, ConnectionError::EnvNotFound(_)));
    }
}
