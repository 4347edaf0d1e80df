//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use ballot_core::OptionSet;

/// Configuration for the vote server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Path of the append-only audit log.
    pub audit_path: PathBuf,
    /// The ballot options, fixed for the process lifetime.
    pub options: OptionSet,
}

impl ServerConfig {
    /// Creates a config with the default audit path and option set.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            audit_path: PathBuf::from("audit.log"),
            options: OptionSet::default(),
        }
    }

    /// Sets the audit log path.
    #[must_use]
    pub fn with_audit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.audit_path = path.into();
        self
    }

    /// Sets the ballot options.
    #[must_use]
    pub fn with_options(mut self, options: OptionSet) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let addr: SocketAddr = "127.0.0.1:5050".parse().unwrap();
        let config = ServerConfig::new(addr);
        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.audit_path, PathBuf::from("audit.log"));
        assert_eq!(config.options.to_csv(), "A,B,C");
    }

    #[test]
    fn test_config_builders() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let config = ServerConfig::new(addr)
            .with_audit_path("/tmp/votes.log")
            .with_options(OptionSet::new(["YES", "NO"]).unwrap());
        assert_eq!(config.audit_path, PathBuf::from("/tmp/votes.log"));
        assert_eq!(config.options.to_csv(), "YES,NO");
    }
}
