//! RDP Negotiation Request and Correlation Info
//!
//! The two fixed-size structures that may close a Connection Request
//! ([MS-RDPBCGR] 2.2.1.1.1 and 2.2.1.1.2). Correlation info is only valid
//! after a negotiation request, which [`FixedTail`] encodes in its variants.

use bytes::{Buf, BufMut};

use crate::error::{RdpMatchError, RdpResult};

/// Encoded size of [`NegotiationRequest`]
pub const NEGOTIATION_REQUEST_LEN: usize = 8;

/// Encoded size of [`CorrelationInfo`]
pub const CORRELATION_INFO_LEN: usize = 36;

/// Type code of an RDP Negotiation Request
pub const TYPE_RDP_NEG_REQ: u8 = 0x01;

/// Type code of RDP Correlation Info
pub const TYPE_RDP_CORRELATION_INFO: u8 = 0x06;

/// Negotiation flag announcing that correlation info follows
pub const CORRELATION_INFO_PRESENT: u8 = 0x08;

/// Standard RDP security
pub const PROTOCOL_RDP: u32 = 0x0000_0000;
/// TLS 1.0, 1.1 or 1.2
pub const PROTOCOL_SSL: u32 = 0x0000_0001;
/// CredSSP
pub const PROTOCOL_HYBRID: u32 = 0x0000_0002;
/// RDSTLS
pub const PROTOCOL_RDSTLS: u32 = 0x0000_0004;
/// CredSSP with Early User Authorization Result PDU
pub const PROTOCOL_HYBRID_EX: u32 = 0x0000_0008;
/// RDS AAD Auth
pub const PROTOCOL_RDSAAD: u32 = 0x0000_0010;

/// RDP Negotiation Request
///
/// The type code and length field are fixed and only validated, so the
/// struct keeps the two fields that actually vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NegotiationRequest {
    /// Request flags
    pub flags: u8,
    /// Bitmask of `PROTOCOL_*` values the client supports
    pub requested_protocols: u32,
}

impl NegotiationRequest {
    /// Create a request for the given protocols
    pub fn new(flags: u8, requested_protocols: u32) -> Self {
        Self {
            flags,
            requested_protocols,
        }
    }

    /// Decode from exactly [`NEGOTIATION_REQUEST_LEN`] bytes
    pub fn decode(buf: &[u8]) -> RdpResult<Self> {
        if buf.len() != NEGOTIATION_REQUEST_LEN {
            return Err(RdpMatchError::MalformedNegotiation(format!(
                "expected {} bytes, got {}",
                NEGOTIATION_REQUEST_LEN,
                buf.len()
            )));
        }

        let mut cur = buf;
        let kind = cur.get_u8();
        let flags = cur.get_u8();
        let length = cur.get_u16_le();
        let requested_protocols = cur.get_u32_le();

        if kind != TYPE_RDP_NEG_REQ {
            return Err(RdpMatchError::MalformedNegotiation(format!(
                "type {:#04x} (expected {:#04x})",
                kind, TYPE_RDP_NEG_REQ
            )));
        }
        if usize::from(length) != NEGOTIATION_REQUEST_LEN {
            return Err(RdpMatchError::MalformedNegotiation(format!(
                "length field {} (expected {})",
                length, NEGOTIATION_REQUEST_LEN
            )));
        }

        Ok(Self {
            flags,
            requested_protocols,
        })
    }

    /// Append the encoded request to `dst`
    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_u8(TYPE_RDP_NEG_REQ);
        dst.put_u8(self.flags);
        dst.put_u16_le(NEGOTIATION_REQUEST_LEN as u16);
        dst.put_u32_le(self.requested_protocols);
    }

    /// Whether the client offers `protocol` (one of the `PROTOCOL_*` bits)
    pub fn requests(&self, protocol: u32) -> bool {
        if protocol == PROTOCOL_RDP {
            return self.requested_protocols == PROTOCOL_RDP;
        }
        self.requested_protocols & protocol == protocol
    }

    /// Whether the flags announce a following correlation info block
    pub fn announces_correlation_info(&self) -> bool {
        self.flags & CORRELATION_INFO_PRESENT != 0
    }
}

/// RDP Correlation Info
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CorrelationInfo {
    /// Flags, unused by the protocol
    pub flags: u8,
    /// Identifier used to trace the connection across front-ends
    pub correlation_id: [u8; 16],
    /// Reserved bytes, carried through unchanged
    pub reserved: [u8; 16],
}

impl CorrelationInfo {
    /// Create correlation info for the given identifier
    pub fn new(correlation_id: [u8; 16]) -> Self {
        Self {
            flags: 0,
            correlation_id,
            reserved: [0; 16],
        }
    }

    /// Decode from exactly [`CORRELATION_INFO_LEN`] bytes
    pub fn decode(buf: &[u8]) -> RdpResult<Self> {
        if buf.len() != CORRELATION_INFO_LEN {
            return Err(RdpMatchError::MalformedCorrelation(format!(
                "expected {} bytes, got {}",
                CORRELATION_INFO_LEN,
                buf.len()
            )));
        }

        let mut cur = buf;
        let kind = cur.get_u8();
        let flags = cur.get_u8();
        let length = cur.get_u16_le();

        if kind != TYPE_RDP_CORRELATION_INFO {
            return Err(RdpMatchError::MalformedCorrelation(format!(
                "type {:#04x} (expected {:#04x})",
                kind, TYPE_RDP_CORRELATION_INFO
            )));
        }
        if usize::from(length) != CORRELATION_INFO_LEN {
            return Err(RdpMatchError::MalformedCorrelation(format!(
                "length field {} (expected {})",
                length, CORRELATION_INFO_LEN
            )));
        }

        let mut info = Self {
            flags,
            ..Self::default()
        };
        cur.copy_to_slice(&mut info.correlation_id);
        cur.copy_to_slice(&mut info.reserved);
        Ok(info)
    }

    /// Append the encoded correlation info to `dst`
    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_u8(TYPE_RDP_CORRELATION_INFO);
        dst.put_u8(self.flags);
        dst.put_u16_le(CORRELATION_INFO_LEN as u16);
        dst.put_slice(&self.correlation_id);
        dst.put_slice(&self.reserved);
    }
}

/// Fixed-size structures following the variable payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixedTail {
    /// Nothing follows the variable payload
    #[default]
    Absent,
    /// A negotiation request alone
    Negotiation(NegotiationRequest),
    /// A negotiation request followed by correlation info
    Correlated(NegotiationRequest, CorrelationInfo),
}

impl FixedTail {
    /// Decode the tail from the bytes left after the variable payload.
    ///
    /// Only 0, 8 and 44 bytes are valid tail sizes.
    pub fn decode(buf: &[u8]) -> RdpResult<Self> {
        match buf.len() {
            0 => Ok(Self::Absent),
            NEGOTIATION_REQUEST_LEN => Ok(Self::Negotiation(NegotiationRequest::decode(buf)?)),
            len if len == NEGOTIATION_REQUEST_LEN + CORRELATION_INFO_LEN => {
                let (neg, corr) = buf.split_at(NEGOTIATION_REQUEST_LEN);
                Ok(Self::Correlated(
                    NegotiationRequest::decode(neg)?,
                    CorrelationInfo::decode(corr)?,
                ))
            }
            len => Err(RdpMatchError::LengthMismatch(format!(
                "{} bytes after the variable payload (expected 0, {} or {})",
                len,
                NEGOTIATION_REQUEST_LEN,
                NEGOTIATION_REQUEST_LEN + CORRELATION_INFO_LEN
            ))),
        }
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Absent => 0,
            Self::Negotiation(_) => NEGOTIATION_REQUEST_LEN,
            Self::Correlated(..) => NEGOTIATION_REQUEST_LEN + CORRELATION_INFO_LEN,
        }
    }

    /// Append the encoded tail to `dst`
    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        match self {
            Self::Absent => {}
            Self::Negotiation(neg) => neg.encode(dst),
            Self::Correlated(neg, corr) => {
                neg.encode(dst);
                corr.encode(dst);
            }
        }
    }

    /// Whether nothing follows the variable payload
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The negotiation request, if present
    pub fn negotiation(&self) -> Option<&NegotiationRequest> {
        match self {
            Self::Absent => None,
            Self::Negotiation(neg) | Self::Correlated(neg, _) => Some(neg),
        }
    }

    /// The correlation info, if present
    pub fn correlation(&self) -> Option<&CorrelationInfo> {
        match self {
            Self::Correlated(_, corr) => Some(corr),
            _ => None,
        }
    }
}
