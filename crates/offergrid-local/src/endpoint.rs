//! Master endpoint parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::{LocalError, LocalResult};

/// Where the framework's resource manager lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MasterEndpoint {
    /// In-process resource manager with `slaves` simulated worker nodes.
    Local { slaves: usize },
    /// A remote master. Recognised, but no transport exists for it.
    Remote { host: String, port: u16 },
}

impl MasterEndpoint {
    /// Parse `local`, `local://<n>`, `offergrid://host:port` or `host:port`.
    pub fn parse(s: &str) -> LocalResult<Self> {
        let s = s.trim();
        if s == "local" {
            return Ok(MasterEndpoint::Local { slaves: 1 });
        }
        if let Some(count) = s.strip_prefix("local://") {
            let slaves: usize = count
                .parse()
                .map_err(|_| LocalError::InvalidEndpoint(s.to_string()))?;
            if slaves == 0 {
                return Err(LocalError::InvalidEndpoint(format!(
                    "{s}: at least one slave is required"
                )));
            }
            return Ok(MasterEndpoint::Local { slaves });
        }

        let addr = s.strip_prefix("offergrid://").unwrap_or(s);
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| LocalError::InvalidEndpoint(s.to_string()))?;
        let port: u16 = port
            .parse()
            .map_err(|_| LocalError::InvalidEndpoint(s.to_string()))?;
        if host.is_empty() || host.contains('/') {
            return Err(LocalError::InvalidEndpoint(s.to_string()));
        }
        Ok(MasterEndpoint::Remote {
            host: host.to_string(),
            port,
        })
    }
}

impl FromStr for MasterEndpoint {
    type Err = LocalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MasterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasterEndpoint::Local { slaves } => write!(f, "local://{slaves}"),
            MasterEndpoint::Remote { host, port } => write!(f, "offergrid://{host}:{port}"),
        }
    }
}
