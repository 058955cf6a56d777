//! # chjdbc-url
//!
//! Parsing of ClickHouse JDBC connection URLs that name several servers.
//!
//! ```text
//! jdbc:clickhouse:[protocol:]//[user[:password]@]host1[:port1][,host2[:port2]...]/[database][?query]
//! ```
//!
//! The URL is split into one single-host URL per entry, each entry is parsed
//! by a [`SingleHostParser`], and the results are gathered into a
//! [`ConnectionInfo`] holding the nodes in URL order, the merged
//! [`Properties`] and a typed [`JdbcConfig`]. Any bad entry fails the whole
//! parse.
//!
//! ```rust
//! use chjdbc_url::{ConnectionInfo, Properties};
//!
//! let info = ConnectionInfo::parse(
//!     "jdbc:ch://u:p@h1:9000,h2:9000/db?compress=1",
//!     &Properties::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(info.nodes().len(), 2);
//! assert_eq!(info.nodes()[0].address(), "h1:9000");
//! assert_eq!(info.nodes()[0].database(), Some("db"));
//! assert_eq!(info.properties().get("user"), Some("u"));
//!
//! // Node URIs never carry credentials
//! let uri = info.uri_for(&info.nodes()[1]).unwrap();
//! assert_eq!(uri.to_string(), "jdbc:clickhouse:http://h2:9000/db?compress=1");
//! ```
//!
//! # Errors
//!
//! ```rust
//! use chjdbc_url::{parse, ErrorKind, Properties};
//!
//! let err = parse("jdbc:ch://h1:9000,,h2:9000/db", &Properties::new()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidHostEntry);
//! assert_eq!(err.host_index(), Some(1));
//! assert_eq!(err.root_cause().kind(), ErrorKind::MissingHost);
//! ```

pub mod config;
pub mod credentials;
pub mod env;
pub mod error;
pub mod info;
pub mod logging;
pub mod multihost;
pub mod node;
pub mod properties;
pub mod protocol;
pub mod single;

pub use config::JdbcConfig;
pub use credentials::remove_credentials_from_query;
pub use env::{EnvExpander, EnvSource, MapEnvSource, StdEnvSource};
pub use error::{ConnectionError, ConnectionResult, ErrorKind};
pub use info::{ConnectionInfo, NodeUri, node_uri};
pub use multihost::{MultiHostUrl, MultiHostUrlParser, parse};
pub use node::Node;
pub use properties::Properties;
pub use protocol::Protocol;
pub use single::{JdbcUrlParser, SingleHostInfo, SingleHostParser};
