//! Complete Connection Request PDU
//!
//! [`ConnectionRequest`] is only ever built from bytes that passed every
//! structural check:
//!
//! - the capture holds at least the TPKT-declared `total_length`
//! - `total_length == 5 + length_indicator`
//! - `length_indicator == 6 + payload length + tail length`, with a tail of
//!   0, 8 or 44 bytes
//! - nothing follows the declared PDU
//! - a payload or a tail is present

use bytes::BufMut;
use tracing::trace;

use super::negotiation::FixedTail;
use super::payload::{classify, VariablePayload};
use super::tpkt::{TpktHeader, TPKT_HEADER_LEN};
use super::x224::{ConnectionRequestHeader, X224_MIN_LENGTH_INDICATOR};
use super::CR_HEADERS_LEN;
use crate::error::{RdpMatchError, RdpResult};
use crate::stream::PrefixSource;

/// X.224 Connection Request with its optional RDP payload and tail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    tpkt: TpktHeader,
    x224: ConnectionRequestHeader,
    payload: Option<VariablePayload>,
    tail: FixedTail,
}

impl ConnectionRequest {
    /// Build a request around `payload` and `tail`, sizing both headers.
    pub fn new(payload: Option<VariablePayload>, tail: FixedTail) -> RdpResult<Self> {
        if payload.is_none() && tail.is_absent() {
            return Err(RdpMatchError::Unidentifiable);
        }

        let total = CR_HEADERS_LEN
            + payload.as_ref().map_or(0, VariablePayload::encoded_len)
            + tail.encoded_len();
        let length_indicator = u8::try_from(total - 5).map_err(|_| {
            RdpMatchError::LengthMismatch(format!(
                "{} bytes exceed the X.224 length indicator range",
                total
            ))
        })?;

        Ok(Self {
            // a u8 length indicator keeps the total well below u16::MAX
            tpkt: TpktHeader::new(total as u16),
            x224: ConnectionRequestHeader::new(length_indicator),
            payload,
            tail,
        })
    }

    /// Decode a complete capture.
    ///
    /// `buf` must hold exactly one PDU: fewer bytes than declared is a
    /// malformed header, more is trailing data.
    pub fn from_bytes(buf: &[u8]) -> RdpResult<Self> {
        let tpkt = TpktHeader::decode(buf)?;
        let x224 = ConnectionRequestHeader::decode(buf.get(TPKT_HEADER_LEN..).unwrap_or_default())?;
        check_header_lengths(&tpkt, &x224)?;

        let total = usize::from(tpkt.total_length);
        if buf.len() < total {
            return Err(RdpMatchError::MalformedHeader(format!(
                "capture holds {} of {} declared bytes",
                buf.len(),
                total
            )));
        }
        if buf.len() > total {
            return Err(RdpMatchError::TrailingData { declared: total });
        }

        Self::decode_body(tpkt, x224, &buf[CR_HEADERS_LEN..total])
    }

    /// Read and decode a request from the start of a connection.
    ///
    /// Reads the TPKT header, then the X.224 header, then the declared
    /// remainder, and finally checks whether a byte past the PDU has
    /// already arrived. That last check never waits: a client that sent its
    /// request and now waits for the confirm still gets a verdict.
    pub async fn read_from<P>(source: &mut P) -> RdpResult<Self>
    where
        P: PrefixSource + ?Sized,
    {
        let got = source.fill_to(TPKT_HEADER_LEN).await?;
        let tpkt = TpktHeader::decode(&source.buffered()[..got])?;

        let got = source.fill_to(CR_HEADERS_LEN).await?;
        let x224 = ConnectionRequestHeader::decode(&source.buffered()[TPKT_HEADER_LEN..got])?;
        check_header_lengths(&tpkt, &x224)?;

        let total = usize::from(tpkt.total_length);
        let got = source.fill_to(total).await?;
        if got < total {
            return Err(RdpMatchError::MalformedHeader(format!(
                "stream ended after {} of {} declared bytes",
                got, total
            )));
        }
        if source.fill_available(total + 1).await? > total {
            return Err(RdpMatchError::TrailingData { declared: total });
        }

        Self::decode_body(tpkt, x224, &source.buffered()[CR_HEADERS_LEN..total])
    }

    fn decode_body(
        tpkt: TpktHeader,
        x224: ConnectionRequestHeader,
        body: &[u8],
    ) -> RdpResult<Self> {
        let (payload, rest) = classify(body)?;
        let tail = FixedTail::decode(rest)?;

        if payload.is_none() && tail.is_absent() {
            return Err(RdpMatchError::Unidentifiable);
        }

        let request = Self {
            tpkt,
            x224,
            payload,
            tail,
        };
        trace!(
            total_length = tpkt.total_length,
            payload = request.payload.as_ref().map(VariablePayload::kind),
            tail_len = request.tail.encoded_len(),
            "decoded connection request"
        );
        Ok(request)
    }

    /// TPKT header
    pub fn tpkt(&self) -> &TpktHeader {
        &self.tpkt
    }

    /// X.224 Connection Request header
    pub fn x224(&self) -> &ConnectionRequestHeader {
        &self.x224
    }

    /// Cookie, token or custom payload, if any
    pub fn payload(&self) -> Option<&VariablePayload> {
        self.payload.as_ref()
    }

    /// Negotiation request and correlation info
    pub fn tail(&self) -> &FixedTail {
        &self.tail
    }

    /// Size of the whole PDU in bytes
    pub fn total_length(&self) -> usize {
        usize::from(self.tpkt.total_length)
    }

    /// Append the encoded PDU to `dst`
    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        self.tpkt.encode(dst);
        self.x224.encode(dst);
        if let Some(payload) = &self.payload {
            payload.encode(dst);
        }
        self.tail.encode(dst);
    }

    /// Encoded PDU bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_length());
        self.encode(&mut out);
        out
    }
}

fn check_header_lengths(tpkt: &TpktHeader, x224: &ConnectionRequestHeader) -> RdpResult<()> {
    if x224.length_indicator < X224_MIN_LENGTH_INDICATOR {
        return Err(RdpMatchError::LengthMismatch(format!(
            "length indicator {} below the X.224 header size",
            x224.length_indicator
        )));
    }
    if usize::from(tpkt.total_length) != 5 + usize::from(x224.length_indicator) {
        return Err(RdpMatchError::LengthMismatch(format!(
            "TPKT length {} but X.224 length indicator {}",
            tpkt.total_length, x224.length_indicator
        )));
    }
    Ok(())
}
