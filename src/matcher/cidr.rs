//! IPv4 CIDR blocks for the routing address filter.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::CriteriaError;

/// IPv4 network prefix
///
/// Host bits given in the textual form are masked off, so `127.0.0.1/8`
/// is the block `127.0.0.0/8`. An address without a prefix length is a
/// single-host block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Cidr {
    network: u32,
    prefix_len: u8,
}

impl Ipv4Cidr {
    /// Create a block, masking host bits of `address`
    pub fn new(address: Ipv4Addr, prefix_len: u8) -> Result<Self, CriteriaError> {
        if prefix_len > 32 {
            return Err(CriteriaError::InvalidCidr(format!(
                "{}/{}: prefix length above 32",
                address, prefix_len
            )));
        }
        Ok(Self {
            network: u32::from(address) & Self::mask(prefix_len),
            prefix_len,
        })
    }

    fn mask(prefix_len: u8) -> u32 {
        // /0 matches everything; shifting a u32 by 32 would overflow
        match prefix_len {
            0 => 0,
            n => u32::MAX << (32 - u32::from(n)),
        }
    }

    /// Network address of the block
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.network)
    }

    /// Prefix length in bits
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Whether `address` lies inside the block
    pub fn contains(&self, address: Ipv4Addr) -> bool {
        u32::from(address) & Self::mask(self.prefix_len) == self.network
    }
}

impl FromStr for Ipv4Cidr {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr, prefix_len) = match s.split_once('/') {
            Some((addr, len)) => {
                let len = len
                    .parse::<u8>()
                    .map_err(|_| CriteriaError::InvalidCidr(format!("{}: bad prefix length", s)))?;
                (addr, len)
            }
            None => (s, 32),
        };
        let address = addr
            .parse::<Ipv4Addr>()
            .map_err(|_| CriteriaError::InvalidCidr(format!("{}: not an IPv4 address", s)))?;
        Self::new(address, prefix_len)
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix_len)
    }
}
