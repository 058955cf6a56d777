//! # chjdbc
//!
//! Connection setup for ClickHouse JDBC-style URLs with several candidate
//! servers.
//!
//! chjdbc provides:
//! - Splitting of multi-host URLs such as `jdbc:ch://h1:9000,h2:9000/db`
//! - Per-host parsing into ordered [`Node`]s with precise errors
//! - Merged [`Properties`] and a typed [`JdbcConfig`]
//! - Credential-free node URIs for logging and reconnection
//! - A [`DataSource`] that parses its URL once, up front
//!
//! It does not resolve hosts, choose between them or open connections.
//!
//! ## Quick Start
//!
//! ```rust
//! use chjdbc::prelude::*;
//!
//! let ds = DataSource::new("jdbc:ch://default:secret@h1:9000,h2:9000/analytics?compress=1")?;
//!
//! for node in ds.nodes() {
//!     let uri = ds.connection_info().uri_for(node)?;
//!     assert!(!uri.to_string().contains("secret"));
//! }
//! # Ok::<(), chjdbc::ConnectionError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod datasource;

/// URL parsing building blocks.
pub mod url {
    pub use chjdbc_url::*;
}

pub use chjdbc_url::logging;

pub use datasource::DataSource;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::DataSource;
    pub use crate::url::{
        ConnectionError, ConnectionInfo, ConnectionResult, JdbcConfig, Node, NodeUri,
        Properties, Protocol,
    };
}

// Re-export key types at the crate root
pub use chjdbc_url::{
    ConnectionError, ConnectionInfo, ConnectionResult, ErrorKind, JdbcConfig, Node, NodeUri,
    Properties, Protocol, parse,
};
