//! Connection Request Protocol Layer
//!
//! Decoding and encoding of the first PDU an RDP client sends: the X.224
//! Connection Request wrapped in a TPKT header ([MS-RDPBCGR] 2.2.1.1).
//!
//! # Wire Layout
//!
//! ```text
//! ┌──────────┬──────────────┬──────────────────────────┬──────────┬─────────────┐
//! │ TPKT (4) │ X.224 CR (7) │ cookie | token | custom  │ NEG (8)  │ CORR (36)   │
//! │          │              │ (optional, CR LF ended)  │ optional │ optional    │
//! └──────────┴──────────────┴──────────────────────────┴──────────┴─────────────┘
//! ```
//!
//! - [`tpkt`] and [`x224`] - the two fixed headers
//! - [`payload`] - classification of the variable, CR LF terminated payload
//! - [`negotiation`] - negotiation request and correlation info
//! - [`request`] - the complete PDU and its length cross-checks
//!
//! TPKT and X.224 fields are big-endian. The negotiation structures that
//! follow are little-endian, as everything defined by MS-RDPBCGR.

pub mod negotiation;
pub mod payload;
pub mod request;
pub mod tpkt;
pub mod x224;

pub use negotiation::{CorrelationInfo, FixedTail, NegotiationRequest};
pub use payload::{CustomInfo, RoutingCookie, RoutingToken, VariablePayload};
pub use request::ConnectionRequest;
pub use tpkt::TpktHeader;
pub use x224::ConnectionRequestHeader;

/// Terminator of the cookie, token and custom payloads
pub const CRLF: &[u8; 2] = b"\r\n";

/// Combined size of the TPKT header and the X.224 Connection Request header
pub const CR_HEADERS_LEN: usize = tpkt::TPKT_HEADER_LEN + x224::X224_HEADER_LEN;

/// Position of the first CR LF pair in `buf` at or after `from`
pub(crate) fn find_crlf(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .windows(CRLF.len())
        .position(|w| w == CRLF)
        .map(|pos| pos + from)
}
