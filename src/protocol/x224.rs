//! X.224 Connection Request TPDU header (ITU-T X.224 13.3).

use bytes::{Buf, BufMut};

use crate::error::{RdpMatchError, RdpResult};

/// Encoded size of the Connection Request header
pub const X224_HEADER_LEN: usize = 7;

/// TPDU code of a Connection Request (CR, credit 0)
pub const X224_TPDU_CONNECTION_REQUEST: u8 = 0xE0;

/// Length indicator of a Connection Request with no variable part.
///
/// The indicator counts every byte after itself, so the six remaining
/// header bytes are its floor.
pub const X224_MIN_LENGTH_INDICATOR: u8 = (X224_HEADER_LEN - 1) as u8;

/// Fixed part of an X.224 Connection Request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionRequestHeader {
    /// Number of bytes following this field up to the end of the TPDU
    pub length_indicator: u8,
    /// TPDU code, always [`X224_TPDU_CONNECTION_REQUEST`]
    pub pdu_type: u8,
    /// Destination reference
    pub dst_ref: u16,
    /// Source reference
    pub src_ref: u16,
    /// Class and option bits
    pub class_option: u8,
}

impl ConnectionRequestHeader {
    /// Create a class 0 Connection Request header
    pub fn new(length_indicator: u8) -> Self {
        Self {
            length_indicator,
            pdu_type: X224_TPDU_CONNECTION_REQUEST,
            dst_ref: 0,
            src_ref: 0,
            class_option: 0,
        }
    }

    /// Decode the header from the first seven bytes of `buf`
    pub fn decode(buf: &[u8]) -> RdpResult<Self> {
        if buf.len() < X224_HEADER_LEN {
            return Err(RdpMatchError::MalformedHeader(format!(
                "X.224 header needs {} bytes, got {}",
                X224_HEADER_LEN,
                buf.len()
            )));
        }

        let mut cur = &buf[..X224_HEADER_LEN];
        let header = Self {
            length_indicator: cur.get_u8(),
            pdu_type: cur.get_u8(),
            dst_ref: cur.get_u16(),
            src_ref: cur.get_u16(),
            class_option: cur.get_u8(),
        };

        if header.pdu_type != X224_TPDU_CONNECTION_REQUEST {
            return Err(RdpMatchError::MalformedHeader(format!(
                "X.224 TPDU code {:#04x} (expected {:#04x})",
                header.pdu_type, X224_TPDU_CONNECTION_REQUEST
            )));
        }

        Ok(header)
    }

    /// Append the encoded header to `dst`
    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_u8(self.length_indicator);
        dst.put_u8(self.pdu_type);
        dst.put_u16(self.dst_ref);
        dst.put_u16(self.src_ref);
        dst.put_u8(self.class_option);
    }

    /// Encoded header bytes
    pub fn to_bytes(&self) -> [u8; X224_HEADER_LEN] {
        let mut out = [0u8; X224_HEADER_LEN];
        self.encode(&mut &mut out[..]);
        out
    }
}
