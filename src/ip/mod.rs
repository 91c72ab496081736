mod external;

pub use external::HttpResolver;

use std::fmt;
use std::net::IpAddr;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub const ALL: [AddressFamily; 2] = [AddressFamily::V4, AddressFamily::V6];

    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// Source of the current public address for a family.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, family: AddressFamily) -> Result<IpAddr, ResolveError>;
}

/// Public addresses found in one pass. A family is `None` when its lookup failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedAddresses {
    pub v4: Option<IpAddr>,
    pub v6: Option<IpAddr>,
}

impl ResolvedAddresses {
    pub fn get(&self, family: AddressFamily) -> Option<IpAddr> {
        match family {
            AddressFamily::V4 => self.v4,
            AddressFamily::V6 => self.v6,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.v4.is_none() && self.v6.is_none()
    }

    /// Resolved families with their address, IPv4 first.
    pub fn iter(&self) -> impl Iterator<Item = (AddressFamily, IpAddr)> + '_ {
        AddressFamily::ALL
            .into_iter()
            .filter_map(move |family| self.get(family).map(|ip| (family, ip)))
    }
}

/// Resolve both families one after the other. A failing family is logged and
/// left empty without affecting the other.
pub async fn resolve_all(resolver: &dyn AddressResolver) -> ResolvedAddresses {
    let mut resolved = ResolvedAddresses::default();

    for family in AddressFamily::ALL {
        match resolver.resolve(family).await {
            Ok(ip) => {
                debug!("Found public {} address: {}", family, ip);
                match family {
                    AddressFamily::V4 => resolved.v4 = Some(ip),
                    AddressFamily::V6 => resolved.v6 = Some(ip),
                }
            }
            Err(e) => {
                warn!("Could not resolve public {} address: {}", family, e);
            }
        }
    }

    resolved
}
