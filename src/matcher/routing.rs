//! Routing Token Field Extraction
//!
//! A routing token value has the form `<address>.<port>.<reserved>`, all
//! decimal. Both numbers are the little-endian image of the network-order
//! field: the address `127.0.0.1` travels as `16777343` (`0x0100007F`) and
//! port 3389 (`0x0D3D`) as `15629` (`0x3D0D`). The reserved component is
//! ignored.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;

use crate::error::{RdpMatchError, RdpResult};

/// Backend address and port carried by a routing token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoutingAddress {
    /// Backend IPv4 address
    pub address: Ipv4Addr,
    /// Backend TCP port
    pub port: u16,
}

impl RoutingAddress {
    /// Create a routing address
    pub fn new(address: Ipv4Addr, port: u16) -> Self {
        Self { address, port }
    }

    /// Extract the address and port from a token value
    pub fn from_token_value(value: &str) -> RdpResult<Self> {
        let mut parts = value.splitn(3, '.');
        let address: u32 = parse_component(parts.next(), "address", value)?;
        let port: u16 = parse_component(parts.next(), "port", value)?;

        Ok(Self {
            address: Ipv4Addr::from(address.to_le_bytes()),
            port: port.swap_bytes(),
        })
    }

    /// Token value for this address, with a zero reserved component
    pub fn to_token_value(&self) -> String {
        let address = u32::from_le_bytes(self.address.octets());
        format!("{}.{}.0000", address, self.port.swap_bytes())
    }

    /// Address and port as a socket address
    pub fn socket_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.address, self.port)
    }
}

impl FromStr for RoutingAddress {
    type Err = RdpMatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token_value(s)
    }
}

impl fmt::Display for RoutingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

fn parse_component<T: FromStr>(part: Option<&str>, name: &str, value: &str) -> RdpResult<T> {
    let part = part.filter(|p| !p.is_empty()).ok_or_else(|| {
        RdpMatchError::InvalidRoutingAddress(format!("missing {} component in {:?}", name, value))
    })?;
    // `str::parse` would also take a leading '+'
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RdpMatchError::InvalidRoutingAddress(format!(
            "non-numeric {} component {:?}",
            name, part
        )));
    }
    part.parse().map_err(|_| {
        RdpMatchError::InvalidRoutingAddress(format!("{} component {} out of range", name, part))
    })
}
