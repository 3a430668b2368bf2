use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV6},
    time::Duration,
};

use socket2::{Domain, Socket, Type};
use tokio::{net::lookup_host, time::timeout};
use tracing::trace;

use crate::utils::PBF;

use super::{IpFamily, Resolve, ResolveError, ResolveFlags, ResolveResult};

/// System resolver (`getaddrinfo` through tokio) for one host/port pair.
#[derive(Debug, Clone)]
pub struct DnsResolver {
    host: String,
    port: String,
    family: IpFamily,
    flags: ResolveFlags,
}

impl DnsResolver {
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        family: IpFamily,
        flags: ResolveFlags,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            family,
            flags,
        }
    }

    /// Get the target in the format of host:port.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn parse_port(&self) -> Result<u16, ResolveError> {
        self.port
            .parse()
            .map_err(|_| ResolveError::InvalidPort(self.port.clone()))
    }

    async fn lookup(&self, port: u16) -> ResolveResult {
        if self.flags.numeric_host {
            // Accept bracketed IPv6 literals as well, e.g. "[::1]".
            let literal = self.host.trim_start_matches('[').trim_end_matches(']');
            return match literal.parse::<IpAddr>() {
                Ok(ip) => Ok(vec![SocketAddr::new(ip, port)]),
                Err(_) => Err(ResolveError::NotNumericHost(self.host.clone())),
            };
        }
        match lookup_host((self.host.as_str(), port)).await {
            Ok(addrs) => Ok(addrs.collect()),
            Err(e) => Err(ResolveError::lookup(self.target(), &e)),
        }
    }

    /// Apply family preference and resolve flags to raw lookup results.
    fn filter(&self, mut addrs: Vec<SocketAddr>) -> Vec<SocketAddr> {
        if self.family == IpFamily::Ipv6
            && self.flags.v4_mapped
            && !addrs.iter().any(SocketAddr::is_ipv6)
        {
            addrs = addrs.into_iter().map(map_to_v6).collect();
        }

        addrs.retain(|addr| self.family.admits(addr));

        if self.flags.address_configured {
            let v4 = family_configured(Domain::IPV4);
            let v6 = family_configured(Domain::IPV6);
            // A host without any route still gets its loopback and literal answers.
            if v4 || v6 {
                addrs.retain(|addr| {
                    addr.ip().is_loopback() || if addr.is_ipv4() { v4 } else { v6 }
                });
            }
        }

        // Keep the resolver's order but drop repeated answers.
        let mut seen = Vec::with_capacity(addrs.len());
        addrs.retain(|addr| {
            if seen.contains(addr) {
                false
            } else {
                seen.push(*addr);
                true
            }
        });
        addrs
    }
}

impl Resolve for DnsResolver {
    fn resolve(&self, limit: Duration) -> PBF<'_, ResolveResult> {
        Box::pin(async move {
            let port = self.parse_port()?;

            let raw = match timeout(limit, self.lookup(port)).await {
                Ok(result) => result?,
                Err(_) => return Err(ResolveError::Timeout(self.target())),
            };
            trace!(target_addr = %self.target(), ?raw, "lookup finished");

            let endpoints = self.filter(raw);
            if endpoints.is_empty() {
                return Err(ResolveError::NoEndpoints(self.target()));
            }
            Ok(endpoints)
        })
    }
}

fn map_to_v6(addr: SocketAddr) -> SocketAddr {
    match addr {
        SocketAddr::V4(v4) => {
            SocketAddr::V6(SocketAddrV6::new(v4.ip().to_ipv6_mapped(), v4.port(), 0, 0))
        }
        v6 => v6,
    }
}

/// Whether the local host can route datagrams of the given family.
///
/// Connecting a UDP socket only performs a route lookup, nothing is sent.
fn family_configured(domain: Domain) -> bool {
    let remote: SocketAddr = if domain == Domain::IPV4 {
        (Ipv4Addr::new(192, 0, 2, 1), 9).into()
    } else {
        (Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1), 9).into()
    };
    Socket::new(domain, Type::DGRAM, None)
        .and_then(|socket| socket.connect(&remote.into()))
        .is_ok()
}
