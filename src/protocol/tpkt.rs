//! TPKT transport header (RFC 1006).

use bytes::{Buf, BufMut};

use crate::error::{RdpMatchError, RdpResult};

/// Encoded size of the TPKT header
pub const TPKT_HEADER_LEN: usize = 4;

/// The only TPKT version in use
pub const TPKT_VERSION: u8 = 3;

/// TPKT header preceding every X.224 PDU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TpktHeader {
    /// Protocol version, always [`TPKT_VERSION`]
    pub version: u8,
    /// Reserved byte, carried through unchanged
    pub reserved: u8,
    /// Length of the whole PDU including this header
    pub total_length: u16,
}

impl TpktHeader {
    /// Create a version 3 header for a PDU of `total_length` bytes
    pub fn new(total_length: u16) -> Self {
        Self {
            version: TPKT_VERSION,
            reserved: 0,
            total_length,
        }
    }

    /// Decode the header from the first four bytes of `buf`
    pub fn decode(buf: &[u8]) -> RdpResult<Self> {
        if buf.len() < TPKT_HEADER_LEN {
            return Err(RdpMatchError::MalformedHeader(format!(
                "TPKT header needs {} bytes, got {}",
                TPKT_HEADER_LEN,
                buf.len()
            )));
        }

        let mut cur = &buf[..TPKT_HEADER_LEN];
        let header = Self {
            version: cur.get_u8(),
            reserved: cur.get_u8(),
            total_length: cur.get_u16(),
        };

        if header.version != TPKT_VERSION {
            return Err(RdpMatchError::MalformedHeader(format!(
                "TPKT version {} (expected {})",
                header.version, TPKT_VERSION
            )));
        }
        if usize::from(header.total_length) < TPKT_HEADER_LEN {
            return Err(RdpMatchError::MalformedHeader(format!(
                "TPKT length {} is shorter than the header itself",
                header.total_length
            )));
        }

        Ok(header)
    }

    /// Append the encoded header to `dst`
    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_u8(self.version);
        dst.put_u8(self.reserved);
        dst.put_u16(self.total_length);
    }

    /// Encoded header bytes
    pub fn to_bytes(&self) -> [u8; TPKT_HEADER_LEN] {
        let mut out = [0u8; TPKT_HEADER_LEN];
        self.encode(&mut &mut out[..]);
        out
    }
}
