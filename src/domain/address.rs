//! Monitor endpoint addresses.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::{DomainError, DomainResult};

/// A monitor endpoint: an IP literal plus a non-zero port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    ip: IpAddr,
    port: u16,
}

impl Address {
    /// Build an address from its parts. Port 0 is rejected.
    pub fn new(ip: IpAddr, port: u16) -> DomainResult<Self> {
        if port == 0 {
            return Err(DomainError::InvalidParameter("port"));
        }
        Ok(Self { ip, port })
    }

    /// Parse every host in order, failing on the first invalid one.
    pub fn parse_all<S: AsRef<str>>(hosts: &[S]) -> DomainResult<Vec<Self>> {
        hosts.iter().map(|h| h.as_ref().parse()).collect()
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for Address {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // SocketAddr only accepts IP literals, which is exactly the rule for monitors.
        let addr: SocketAddr = s
            .parse()
            .map_err(|_| DomainError::InvalidParameter("address"))?;
        // Scope ids are link-local only and are not carried in the stored form.
        if let SocketAddr::V6(v6) = addr {
            if v6.scope_id() != 0 {
                return Err(DomainError::InvalidParameter("address"));
            }
        }
        Self::new(addr.ip(), addr.port()).map_err(|_| DomainError::InvalidParameter("address"))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        SocketAddr::new(self.ip, self.port).fmt(f)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
