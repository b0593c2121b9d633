//! # lamco-rdp-match
//!
//! Classifier for the first PDU of an RDP connection: the X.224 Connection
//! Request carried in a TPKT packet.
//!
//! A router in front of several RDP hosts can peek at that request, decide
//! whether a connection belongs to a given backend, and hand the untouched
//! byte stream onwards.
//!
//! # Architecture
//!
//! ```text
//! lamco-rdp-match
//!   ├─> stream    (bounded prefix reads, replay of the inspected bytes)
//!   ├─> protocol  (TPKT, X.224, cookie/token/custom payload, negotiation)
//!   ├─> matcher   (criteria, routing address extraction, CIDR blocks)
//!   └─> config    (TOML/JSON configuration for the binary)
//! ```
//!
//! # Data Flow
//!
//! **Inspection:** Client → RewindStream → ConnectionRequest → RdpMatcher → Verdict
//!
//! **Handoff:** RewindStream replays the prefix, then reads from the client

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Matcher configuration
pub mod config;

/// Error types
pub mod error;

/// Criteria and verdicts
pub mod matcher;

/// Connection Request wire format
pub mod protocol;

/// Rewindable connection prefixes
pub mod stream;

pub use error::{CriteriaError, RdpMatchError, RdpResult};
pub use matcher::{Ipv4Cidr, MatchCriteria, RdpMatcher, RoutingAddress, Verdict};
pub use protocol::ConnectionRequest;
pub use stream::{PrefixSource, RewindStream};
