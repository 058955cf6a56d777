//! Data source over a multi-host URL.

use crate::url::{
    ConnectionInfo, ConnectionResult, MultiHostUrlParser, Node, Properties, SingleHostParser,
};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Parsed connection settings for a set of ClickHouse servers.
///
/// The URL is parsed when the data source is created, so a bad URL is
/// reported immediately. Opening connections is left to the caller.
///
/// `Debug` output leaves out the URL, which may carry a password.
#[derive(Clone)]
pub struct DataSource {
    url: String,
    info: ConnectionInfo,
    login_timeout: Option<Duration>,
}

impl DataSource {
    /// Create a data source with no default properties.
    pub fn new(url: impl Into<String>) -> ConnectionResult<Self> {
        Self::with_properties(url, &Properties::new())
    }

    /// Create a data source; `properties` are the defaults for every host.
    pub fn with_properties(url: impl Into<String>, properties: &Properties) -> ConnectionResult<Self> {
        Self::with_parser(url, properties, &MultiHostUrlParser::new())
    }

    /// Create a data source using a custom parser.
    pub fn with_parser<P: SingleHostParser>(
        url: impl Into<String>,
        properties: &Properties,
        parser: &MultiHostUrlParser<P>,
    ) -> ConnectionResult<Self> {
        let url = url.into();
        let info = parser.parse(&url, properties)?;
        debug!(nodes = info.nodes().len(), "DataSource created");
        Ok(Self {
            url,
            info,
            login_timeout: None,
        })
    }

    /// The URL this data source was created from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Parsed connection info.
    pub fn connection_info(&self) -> &ConnectionInfo {
        &self.info
    }

    /// Candidate nodes in URL order.
    pub fn nodes(&self) -> &[Node] {
        self.info.nodes()
    }

    /// Login timeout; `None` means wait indefinitely.
    pub fn login_timeout(&self) -> Option<Duration> {
        self.login_timeout
    }

    /// Set the login timeout. A zero duration clears it.
    pub fn set_login_timeout(&mut self, timeout: Duration) {
        self.login_timeout = (!timeout.is_zero()).then_some(timeout);
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("info", &self.info)
            .field("login_timeout", &self.login_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_new_parses_eagerly() {
        let ds = DataSource::new("jdbc:ch://h1:9000,h2:9000/db").unwrap();
        assert_eq!(ds.url(), "jdbc:ch://h1:9000,h2:9000/db");
        assert_eq!(ds.nodes().len(), 2);

        let err = DataSource::new("jdbc:ch://h1:9000").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingPathSeparator);
    }

    #[test]
    fn test_login_timeout() {
        let mut ds = DataSource::new("jdbc:ch://h1/db").unwrap();
        assert_eq!(ds.login_timeout(), None);

        ds.set_login_timeout(Duration::from_secs(5));
        assert_eq!(ds.login_timeout(), Some(Duration::from_secs(5)));

        ds.set_login_timeout(Duration::ZERO);
        assert_eq!(ds.login_timeout(), None);
    }

    #[test]
    fn test_debug_hides_password() {
        let ds = DataSource::new("jdbc:ch://u:s3cret@h1,h2/db?password=other").unwrap();
        let debug = format!("{:?}", ds);

        assert!(!debug.contains("s3cret"), "{}", debug);
        assert!(!debug.contains("other"), "{}", debug);
        assert!(debug.contains("h2"), "{}", debug);
    }

    #[test]
    fn test_with_properties() {
        let defaults = Properties::new().with("fetchSize", "100");
        let ds = DataSource::with_properties("jdbc:ch://h1/db", &defaults).unwrap();
        assert_eq!(ds.connection_info().config().fetch_size, 100);
    }
}
