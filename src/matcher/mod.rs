//! Connection Request Matching
//!
//! Turns a set of configured criteria into a verdict over a decoded
//! [`ConnectionRequest`].
//!
//! # Criteria
//!
//! | Field | Requires payload | Predicate |
//! |-------|------------------|-----------|
//! | `cookie_hash` | Cookie | hash equals the string |
//! | `cookie_hash_regexp` | Cookie | hash matches the pattern |
//! | `cookie_ports` | Token | extracted port is in the list |
//! | `cookie_ips` | Token | extracted address is in one of the blocks |
//! | `custom_info` | Custom | text equals the string |
//! | `custom_info_regexp` | Custom | text matches the pattern |
//!
//! Empty criteria are ignored; all configured ones must hold. A request
//! that fails structural decoding never matches.
//!
//! # Example
//!
//! ```rust
//! use lamco_rdp_match::matcher::MatchCriteria;
//!
//! let matcher = MatchCriteria {
//!     cookie_hash: Some("a0123".to_string()),
//!     ..Default::default()
//! }
//! .provision()
//! .unwrap();
//!
//! let mut pdu = vec![0x03, 0x00, 0x00, 0x23, 0x1E, 0xE0, 0, 0, 0, 0, 0];
//! pdu.extend_from_slice(b"Cookie: mstshash=a0123\r\n");
//! assert!(matcher.match_bytes(&pdu).unwrap());
//! ```

pub mod cidr;
pub mod routing;

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{CriteriaError, RdpMatchError, RdpResult};
use crate::protocol::{ConnectionRequest, VariablePayload};
use crate::stream::PrefixSource;

pub use cidr::Ipv4Cidr;
pub use routing::RoutingAddress;

/// Match criteria as configured
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchCriteria {
    /// Exact cookie hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_hash: Option<String>,

    /// Regular expression over the cookie hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_hash_regexp: Option<String>,

    /// Allowed token ports
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cookie_ports: Vec<u16>,

    /// Allowed token addresses, as IPv4 addresses or CIDR blocks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cookie_ips: Vec<String>,

    /// Exact custom info text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_info: Option<String>,

    /// Regular expression over the custom info bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_info_regexp: Option<String>,
}

impl MatchCriteria {
    /// Compile the criteria into a matcher
    pub fn provision(&self) -> Result<RdpMatcher, CriteriaError> {
        let cookie_hash_regexp = non_empty(&self.cookie_hash_regexp)
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| CriteriaError::InvalidRegex {
                    field: "cookie_hash_regexp",
                    source,
                })
            })
            .transpose()?;

        let custom_info_regexp = non_empty(&self.custom_info_regexp)
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| CriteriaError::InvalidRegex {
                    field: "custom_info_regexp",
                    source,
                })
            })
            .transpose()?;

        let cookie_ips = self
            .cookie_ips
            .iter()
            .map(|entry| entry.parse::<Ipv4Cidr>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut cookie_ports = self.cookie_ports.clone();
        cookie_ports.sort_unstable();
        cookie_ports.dedup();

        Ok(RdpMatcher {
            cookie_hash: non_empty(&self.cookie_hash).map(|s| s.as_bytes().to_vec()),
            cookie_hash_regexp,
            cookie_ports,
            cookie_ips,
            custom_info: non_empty(&self.custom_info).map(|s| s.as_bytes().to_vec()),
            custom_info_regexp,
        })
    }

    /// Pairs of configured criteria that require different payload kinds
    /// and therefore can never hold at the same time
    pub fn conflicts(&self) -> Vec<(&'static str, &'static str)> {
        let cookie = if non_empty(&self.cookie_hash).is_some() {
            Some("cookie_hash")
        } else if non_empty(&self.cookie_hash_regexp).is_some() {
            Some("cookie_hash_regexp")
        } else {
            None
        };
        let token = if !self.cookie_ports.is_empty() {
            Some("cookie_ports")
        } else if !self.cookie_ips.is_empty() {
            Some("cookie_ips")
        } else {
            None
        };
        let custom = if non_empty(&self.custom_info).is_some() {
            Some("custom_info")
        } else if non_empty(&self.custom_info_regexp).is_some() {
            Some("custom_info_regexp")
        } else {
            None
        };

        let mut conflicts = Vec::new();
        for (a, b) in [(cookie, token), (cookie, custom), (token, custom)] {
            if let (Some(a), Some(b)) = (a, b) {
                conflicts.push((a, b));
            }
        }
        conflicts
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Result of inspecting one connection
#[derive(Debug)]
pub struct Verdict {
    /// Whether the connection should be routed by this matcher
    pub matched: bool,
    /// Why decoding failed, when it did
    pub error: Option<RdpMatchError>,
}

impl From<RdpResult<bool>> for Verdict {
    fn from(result: RdpResult<bool>) -> Self {
        match result {
            Ok(matched) => Self {
                matched,
                error: None,
            },
            Err(error) => Self {
                matched: false,
                error: Some(error),
            },
        }
    }
}

/// Provisioned, immutable matcher
///
/// Holds no per-connection state; one instance can serve any number of
/// concurrent evaluations.
#[derive(Debug, Clone, Default)]
pub struct RdpMatcher {
    cookie_hash: Option<Vec<u8>>,
    cookie_hash_regexp: Option<Regex>,
    cookie_ports: Vec<u16>,
    cookie_ips: Vec<Ipv4Cidr>,
    custom_info: Option<Vec<u8>>,
    custom_info_regexp: Option<Regex>,
}

impl RdpMatcher {
    /// Matcher without criteria: any well-formed Connection Request matches
    pub fn new() -> Self {
        Self::default()
    }

    fn filters_cookie(&self) -> bool {
        self.cookie_hash.is_some() || self.cookie_hash_regexp.is_some()
    }

    fn filters_token(&self) -> bool {
        !self.cookie_ports.is_empty() || !self.cookie_ips.is_empty()
    }

    fn filters_custom(&self) -> bool {
        self.custom_info.is_some() || self.custom_info_regexp.is_some()
    }

    /// Evaluate the criteria against a decoded request
    pub fn evaluate(&self, request: &ConnectionRequest) -> RdpResult<bool> {
        let payload = request.payload();

        if self.filters_cookie() {
            let Some(VariablePayload::Cookie(cookie)) = payload else {
                trace!("hash filter configured but no cookie present");
                return Ok(false);
            };
            if let Some(expected) = &self.cookie_hash {
                if cookie.hash() != expected.as_slice() {
                    return Ok(false);
                }
            }
            if let Some(re) = &self.cookie_hash_regexp {
                if !re.is_match(cookie.hash()) {
                    return Ok(false);
                }
            }
        }

        if self.filters_token() {
            let Some(VariablePayload::Token(token)) = payload else {
                trace!("address filter configured but no token present");
                return Ok(false);
            };
            let route = token.routing_address()?;
            if !self.cookie_ports.is_empty() && self.cookie_ports.binary_search(&route.port).is_err()
            {
                return Ok(false);
            }
            if !self.cookie_ips.is_empty()
                && !self.cookie_ips.iter().any(|cidr| cidr.contains(route.address))
            {
                return Ok(false);
            }
        }

        if self.filters_custom() {
            let Some(VariablePayload::Custom(custom)) = payload else {
                trace!("custom info filter configured but no custom info present");
                return Ok(false);
            };
            if let Some(expected) = &self.custom_info {
                if custom.text() != expected.as_slice() {
                    return Ok(false);
                }
            }
            if let Some(re) = &self.custom_info_regexp {
                if !re.is_match(custom.text()) {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }

    /// Decode a complete capture and evaluate it
    pub fn match_bytes(&self, buf: &[u8]) -> RdpResult<bool> {
        let request = ConnectionRequest::from_bytes(buf)?;
        self.evaluate(&request)
    }

    /// Read the request from the start of a connection and evaluate it
    pub async fn match_stream<P>(&self, source: &mut P) -> RdpResult<bool>
    where
        P: PrefixSource + ?Sized,
    {
        let request = ConnectionRequest::read_from(source).await?;
        self.evaluate(&request)
    }

    /// Like [`match_stream`](Self::match_stream), folding failures into a
    /// non-matching verdict
    pub async fn verdict<P>(&self, source: &mut P) -> Verdict
    where
        P: PrefixSource + ?Sized,
    {
        let verdict = Verdict::from(self.match_stream(source).await);
        if let Some(err) = &verdict.error {
            debug!(kind = err.kind(), error = %err, "connection request rejected");
        }
        verdict
    }
}
