//! Error types for Connection Request inspection.
//!
//! Every variant except [`RdpMatchError::Io`] is a classification failure: the
//! bytes on the wire are not an RDP Connection Request this crate is willing
//! to vouch for. Callers fold them into a "does not match" verdict and keep
//! the error for diagnostics.

use thiserror::Error;

/// Result type for inspection operations
pub type RdpResult<T> = std::result::Result<T, RdpMatchError>;

/// Errors that can occur while decoding and matching a Connection Request
#[derive(Error, Debug)]
pub enum RdpMatchError {
    /// Not enough bytes, or a wrong TPKT version / X.224 PDU code
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// Cookie without CR LF terminator, or with an empty hash
    #[error("invalid routing cookie: {0}")]
    InvalidCookie(String),

    /// Token without CR LF terminator, empty value, or inconsistent nested headers
    #[error("invalid routing token: {0}")]
    InvalidToken(String),

    /// Custom payload without CR LF terminator, or empty
    #[error("invalid custom info: {0}")]
    InvalidCustomInfo(String),

    /// Negotiation request with a wrong type code or length field
    #[error("malformed negotiation request: {0}")]
    MalformedNegotiation(String),

    /// Correlation info with a wrong type code or length field
    #[error("malformed correlation info: {0}")]
    MalformedCorrelation(String),

    /// Declared lengths disagree with each other or with the payload layout
    #[error("length mismatch: {0}")]
    LengthMismatch(String),

    /// The stream carried more bytes than the TPKT header declared
    #[error("trailing data after {declared}-byte PDU")]
    TrailingData {
        /// Length declared by the TPKT header
        declared: usize,
    },

    /// Bare Connection Request with neither variable payload nor fixed tail
    #[error("connection request carries no RDP-specific data")]
    Unidentifiable,

    /// Token value is not `<address>.<port>.<reserved>` with numeric components
    #[error("invalid routing address: {0}")]
    InvalidRoutingAddress(String),

    /// I/O error while reading the connection prefix
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RdpMatchError {
    /// Returns true if the underlying stream failed rather than the bytes
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Returns true if this error concerns framing and declared lengths
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MalformedHeader(_)
                | Self::LengthMismatch(_)
                | Self::TrailingData { .. }
                | Self::Unidentifiable
        )
    }

    /// Returns true if this error concerns the variable payload or its fields
    pub fn is_payload(&self) -> bool {
        matches!(
            self,
            Self::InvalidCookie(_)
                | Self::InvalidToken(_)
                | Self::InvalidCustomInfo(_)
                | Self::InvalidRoutingAddress(_)
        )
    }

    /// Short, stable name of the error kind for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedHeader(_) => "malformed_header",
            Self::InvalidCookie(_) => "invalid_cookie",
            Self::InvalidToken(_) => "invalid_token",
            Self::InvalidCustomInfo(_) => "invalid_custom_info",
            Self::MalformedNegotiation(_) => "malformed_negotiation",
            Self::MalformedCorrelation(_) => "malformed_correlation",
            Self::LengthMismatch(_) => "length_mismatch",
            Self::TrailingData { .. } => "trailing_data",
            Self::Unidentifiable => "unidentifiable",
            Self::InvalidRoutingAddress(_) => "invalid_routing_address",
            Self::Io(_) => "io",
        }
    }
}

/// Errors raised while turning configured criteria into a matcher
#[derive(Error, Debug)]
pub enum CriteriaError {
    /// A regular expression failed to compile
    #[error("invalid regular expression for {field}: {source}")]
    InvalidRegex {
        /// Configuration field holding the pattern
        field: &'static str,
        /// Compilation error
        #[source]
        source: regex::Error,
    },

    /// An address or CIDR block could not be parsed
    #[error("invalid address or CIDR block: {0}")]
    InvalidCidr(String),
}
