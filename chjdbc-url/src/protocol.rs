//! Wire protocols a ClickHouse endpoint can be reached with.

use std::fmt;

/// Protocol used to talk to a ClickHouse server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Protocol {
    /// HTTP interface.
    #[default]
    Http,
    /// gRPC interface.
    Grpc,
    /// Native TCP interface.
    Tcp,
}

impl Protocol {
    /// Get the default port for this protocol.
    pub fn default_port(&self, secure: bool) -> u16 {
        match (self, secure) {
            (Self::Http, false) => 8123,
            (Self::Http, true) => 8443,
            (Self::Grpc, false) => 9100,
            (Self::Grpc, true) => 9101,
            (Self::Tcp, false) => 9000,
            (Self::Tcp, true) => 9440,
        }
    }

    /// Get the lowercase protocol name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Grpc => "grpc",
            Self::Tcp => "tcp",
        }
    }

    /// Parse a protocol from a URL scheme.
    ///
    /// Returns the protocol and whether the scheme asks for TLS.
    ///
    /// ```rust
    /// use chjdbc_url::Protocol;
    ///
    /// assert_eq!(Protocol::from_scheme("http"), Some((Protocol::Http, false)));
    /// assert_eq!(Protocol::from_scheme("HTTPS"), Some((Protocol::Http, true)));
    /// assert_eq!(Protocol::from_scheme("native"), Some((Protocol::Tcp, false)));
    /// assert_eq!(Protocol::from_scheme("mysql"), None);
    /// ```
    pub fn from_scheme(scheme: &str) -> Option<(Self, bool)> {
        match scheme.to_ascii_lowercase().as_str() {
            "http" => Some((Self::Http, false)),
            "https" => Some((Self::Http, true)),
            "grpc" => Some((Self::Grpc, false)),
            "grpcs" => Some((Self::Grpc, true)),
            "tcp" | "native" => Some((Self::Tcp, false)),
            "tcps" => Some((Self::Tcp, true)),
            _ => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
