//! Variable Payload Classification
//!
//! Between the X.224 header and the fixed tail a Connection Request may carry
//! one CR LF terminated payload:
//!
//! - **Cookie** - `Cookie: mstshash=<hash>\r\n`, the session broker hash
//!   ([MS-RDPBCGR] 2.2.1.1)
//! - **Token** - a nested TPKT + X.224 header pair followed by
//!   `Cookie: msts=<value>\r\n`, the load-balancer routing token
//! - **Custom** - any other CR LF terminated bytes
//!
//! # Precedence
//!
//! [`classify`] tries the cookie prefix, then the nested token shape, then
//! custom info, in that order. Bytes that decode as nested TPKT + X.224
//! headers but lack the `Cookie: msts=` prefix are rejected as an invalid
//! token and never reinterpreted as custom info. Each attempt only borrows
//! the input, so a failed attempt leaves nothing behind.

use std::borrow::Cow;

use bytes::BufMut;

use super::negotiation::{CORRELATION_INFO_LEN, NEGOTIATION_REQUEST_LEN, TYPE_RDP_NEG_REQ};
use super::tpkt::{TpktHeader, TPKT_HEADER_LEN};
use super::x224::ConnectionRequestHeader;
use super::{find_crlf, CRLF, CR_HEADERS_LEN};
use crate::error::{RdpMatchError, RdpResult};
use crate::matcher::routing::RoutingAddress;

/// Prefix of a session broker cookie
pub const COOKIE_PREFIX: &[u8] = b"Cookie: mstshash=";

/// Prefix of a routing token value, after the nested headers
pub const TOKEN_PREFIX: &[u8] = b"Cookie: msts=";

/// Session broker cookie
///
/// The hash is kept as raw bytes: clients are free to send any encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingCookie {
    hash: Vec<u8>,
}

impl RoutingCookie {
    /// Create a cookie, rejecting hashes that cannot be framed
    pub fn new(hash: impl Into<Vec<u8>>) -> RdpResult<Self> {
        let hash = hash.into();
        validate_cookie_hash(&hash)?;
        Ok(Self { hash })
    }

    /// The `mstshash` value
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// The `mstshash` value as text, with invalid UTF-8 replaced
    pub fn hash_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.hash)
    }

    /// Parse a cookie at the start of `buf`, returning it and its encoded length
    fn parse(buf: &[u8]) -> RdpResult<(Self, usize)> {
        let end = find_crlf(buf, COOKIE_PREFIX.len()).ok_or_else(|| {
            RdpMatchError::InvalidCookie("missing CR LF terminator".to_string())
        })?;
        let raw = &buf[COOKIE_PREFIX.len()..end];
        validate_cookie_hash(raw)?;

        Ok((
            Self {
                hash: raw.to_vec(),
            },
            end + CRLF.len(),
        ))
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        COOKIE_PREFIX.len() + self.hash.len() + CRLF.len()
    }

    /// Append the encoded cookie to `dst`
    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_slice(COOKIE_PREFIX);
        dst.put_slice(&self.hash);
        dst.put_slice(CRLF);
    }
}

fn validate_cookie_hash(raw: &[u8]) -> RdpResult<()> {
    if raw.is_empty() {
        return Err(RdpMatchError::InvalidCookie("empty hash".to_string()));
    }
    if raw.iter().any(|b| matches!(b, b'\r' | b'\n')) {
        return Err(RdpMatchError::InvalidCookie(
            "hash contains a line break".to_string(),
        ));
    }
    Ok(())
}

/// Load-balancer routing token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingToken {
    tpkt: TpktHeader,
    x224: ConnectionRequestHeader,
    value: Vec<u8>,
}

impl RoutingToken {
    /// Create a token with nested headers sized for `value`
    pub fn new(value: impl Into<Vec<u8>>) -> RdpResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(RdpMatchError::InvalidToken("empty value".to_string()));
        }
        if find_crlf(&value, 0).is_some() {
            return Err(RdpMatchError::InvalidToken(
                "value contains a CR LF pair".to_string(),
            ));
        }

        let total = CR_HEADERS_LEN + TOKEN_PREFIX.len() + value.len() + CRLF.len();
        let total_length = u16::try_from(total)
            .map_err(|_| RdpMatchError::InvalidToken(format!("{} bytes do not fit a TPKT", total)))?;
        let length_indicator = u8::try_from(total - 5).map_err(|_| {
            RdpMatchError::InvalidToken(format!("{} bytes do not fit an X.224 TPDU", total))
        })?;

        Ok(Self {
            tpkt: TpktHeader::new(total_length),
            x224: ConnectionRequestHeader::new(length_indicator),
            value,
        })
    }

    /// Token built from a routing address in the `<ip>.<port>.0000` form
    pub fn for_address(address: &RoutingAddress) -> RdpResult<Self> {
        Self::new(address.to_token_value())
    }

    /// The `msts` value
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Nested TPKT header
    pub fn tpkt(&self) -> &TpktHeader {
        &self.tpkt
    }

    /// Nested X.224 header
    pub fn x224(&self) -> &ConnectionRequestHeader {
        &self.x224
    }

    /// Address and port the token routes to
    pub fn routing_address(&self) -> RdpResult<RoutingAddress> {
        let value = std::str::from_utf8(&self.value).map_err(|_| {
            RdpMatchError::InvalidRoutingAddress("value is not ASCII".to_string())
        })?;
        RoutingAddress::from_token_value(value)
    }

    /// Nested headers at the start of `buf`, if they decode structurally
    fn nested_headers(buf: &[u8]) -> Option<(TpktHeader, ConnectionRequestHeader)> {
        if buf.len() < CR_HEADERS_LEN {
            return None;
        }
        let tpkt = TpktHeader::decode(&buf[..TPKT_HEADER_LEN]).ok()?;
        let x224 = ConnectionRequestHeader::decode(&buf[TPKT_HEADER_LEN..CR_HEADERS_LEN]).ok()?;
        Some((tpkt, x224))
    }

    /// Parse the token whose nested headers were already decoded from `buf`
    fn parse(
        tpkt: TpktHeader,
        x224: ConnectionRequestHeader,
        buf: &[u8],
    ) -> RdpResult<(Self, usize)> {
        if !buf[CR_HEADERS_LEN..].starts_with(TOKEN_PREFIX) {
            return Err(RdpMatchError::InvalidToken(
                "nested headers are not followed by the msts prefix".to_string(),
            ));
        }

        let value_start = CR_HEADERS_LEN + TOKEN_PREFIX.len();
        let end = find_crlf(buf, value_start)
            .ok_or_else(|| RdpMatchError::InvalidToken("missing CR LF terminator".to_string()))?;
        let raw = &buf[value_start..end];
        if raw.is_empty() {
            return Err(RdpMatchError::InvalidToken("empty value".to_string()));
        }

        let consumed = end + CRLF.len();
        if usize::from(tpkt.total_length) != consumed {
            return Err(RdpMatchError::InvalidToken(format!(
                "nested TPKT length {} but token spans {} bytes",
                tpkt.total_length, consumed
            )));
        }
        if usize::from(x224.length_indicator) + 5 != consumed {
            return Err(RdpMatchError::InvalidToken(format!(
                "nested length indicator {} but token spans {} bytes",
                x224.length_indicator, consumed
            )));
        }

        Ok((
            Self {
                tpkt,
                x224,
                value: raw.to_vec(),
            },
            consumed,
        ))
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        CR_HEADERS_LEN + TOKEN_PREFIX.len() + self.value.len() + CRLF.len()
    }

    /// Append the encoded token to `dst`
    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        self.tpkt.encode(dst);
        self.x224.encode(dst);
        dst.put_slice(TOKEN_PREFIX);
        dst.put_slice(&self.value);
        dst.put_slice(CRLF);
    }
}

/// Custom payload: arbitrary bytes up to the CR LF terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomInfo {
    text: Vec<u8>,
}

impl CustomInfo {
    /// Create custom info from raw bytes
    pub fn new(text: impl Into<Vec<u8>>) -> RdpResult<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(RdpMatchError::InvalidCustomInfo("empty text".to_string()));
        }
        if find_crlf(&text, 0).is_some() {
            return Err(RdpMatchError::InvalidCustomInfo(
                "text contains a CR LF pair".to_string(),
            ));
        }
        Ok(Self { text })
    }

    /// Raw payload bytes, without the terminator
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Payload as text, with invalid UTF-8 replaced
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    fn parse(buf: &[u8]) -> RdpResult<(Self, usize)> {
        let end = find_crlf(buf, 0).ok_or_else(|| {
            RdpMatchError::InvalidCustomInfo("missing CR LF terminator".to_string())
        })?;
        if end == 0 {
            return Err(RdpMatchError::InvalidCustomInfo("empty text".to_string()));
        }

        Ok((
            Self {
                text: buf[..end].to_vec(),
            },
            end + CRLF.len(),
        ))
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        self.text.len() + CRLF.len()
    }

    /// Append the encoded payload to `dst`
    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_slice(&self.text);
        dst.put_slice(CRLF);
    }
}

/// The optional payload between the X.224 header and the fixed tail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariablePayload {
    /// `Cookie: mstshash=` session broker cookie
    Cookie(RoutingCookie),
    /// Nested headers plus `Cookie: msts=` routing token
    Token(RoutingToken),
    /// Any other CR LF terminated bytes
    Custom(CustomInfo),
}

impl VariablePayload {
    /// Encoded size in bytes, including the terminator
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Cookie(cookie) => cookie.encoded_len(),
            Self::Token(token) => token.encoded_len(),
            Self::Custom(custom) => custom.encoded_len(),
        }
    }

    /// Append the encoded payload to `dst`
    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        match self {
            Self::Cookie(cookie) => cookie.encode(dst),
            Self::Token(token) => token.encode(dst),
            Self::Custom(custom) => custom.encode(dst),
        }
    }

    /// Variant name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cookie(_) => "cookie",
            Self::Token(_) => "token",
            Self::Custom(_) => "custom",
        }
    }
}

/// Whether `body` is nothing but a negotiation request, optionally with
/// correlation info.
///
/// A body of the same size that is one CR LF terminated line is custom info
/// whose first byte happens to be the negotiation type code.
fn is_bare_fixed_tail(body: &[u8]) -> bool {
    let len = body.len();
    if len != NEGOTIATION_REQUEST_LEN && len != NEGOTIATION_REQUEST_LEN + CORRELATION_INFO_LEN {
        return false;
    }
    if body[0] != TYPE_RDP_NEG_REQ {
        return false;
    }
    find_crlf(body, 0) != Some(len - CRLF.len())
}

/// Split the bytes after the X.224 header into the variable payload and the
/// remaining fixed-tail bytes.
///
/// `body` must end where the TPKT-declared PDU ends.
pub fn classify(body: &[u8]) -> RdpResult<(Option<VariablePayload>, &[u8])> {
    if body.is_empty() || is_bare_fixed_tail(body) {
        return Ok((None, body));
    }

    let (payload, consumed) = if body.starts_with(COOKIE_PREFIX) {
        let (cookie, used) = RoutingCookie::parse(body)?;
        (VariablePayload::Cookie(cookie), used)
    } else if let Some((tpkt, x224)) = RoutingToken::nested_headers(body) {
        let (token, used) = RoutingToken::parse(tpkt, x224, body)?;
        (VariablePayload::Token(token), used)
    } else {
        let (custom, used) = CustomInfo::parse(body)?;
        (VariablePayload::Custom(custom), used)
    };

    Ok((Some(payload), &body[consumed..]))
}
