//! Endpoint descriptors.

use crate::Protocol;
use std::fmt;

/// One resolved ClickHouse server: where to connect and how.
///
/// Nodes are produced by a [`SingleHostParser`](crate::SingleHostParser)
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    protocol: Protocol,
    host: String,
    port: u16,
    database: Option<String>,
    secure: bool,
}

impl Node {
    /// Create a node.
    ///
    /// IPv6 hosts are given without brackets.
    pub fn new(protocol: Protocol, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol,
            host: host.into(),
            port,
            database: None,
            secure: false,
        }
    }

    /// Set the database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Mark the node as requiring TLS.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Get the protocol.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Get the host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the database name.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Whether connections to this node use TLS.
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Host formatted for use in a URL authority (IPv6 in brackets).
    pub fn url_host(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        }
    }

    /// `host:port` of this node.
    pub fn address(&self) -> String {
        format!("{}:{}", self.url_host(), self.port)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.protocol, self.address())?;
        if let Some(ref db) = self.database {
            write!(f, "/{}", db)?;
        }
        Ok(())
    }
}
