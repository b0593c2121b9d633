//! Captured Connection Requests shared by the integration tests

#![allow(dead_code)]

/// TPKT header only
pub const PACKET_TOO_SHORT: &[u8] = &[
    0x00, 0x00, 0x00, 0x00, // TPKT
];

/// All-zero headers
pub const PACKET_INVALID_1: &[u8] = &[
    0x00, 0x00, 0x00, 0x00, // TPKT
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
];

/// Valid TPKT, all-zero X.224
pub const PACKET_INVALID_2: &[u8] = &[
    0x03, 0x00, 0x00, 0x0B, // TPKT
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
];

/// Negotiation request with a zero type code
pub const PACKET_INVALID_3: &[u8] = &[
    0x03, 0x00, 0x00, 0x13, // TPKT
    0x0E, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
];

/// Zeroed correlation info
pub const PACKET_INVALID_4: &[u8] = &[
    0x03, 0x00, 0x00, 0x37, // TPKT
    0x32, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x01, 0x08, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
    0x00, 0x00, 0x00, 0x00, // correlation info
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Cookie with an empty hash
pub const PACKET_INVALID_5: &[u8] = &[
    0x03, 0x00, 0x00, 0x4F, // TPKT
    0x4A, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x43, 0x6F, 0x6F, 0x6B, 0x69, 0x65, 0x3A, 0x20, 0x6D, 0x73, 0x74, 0x73, 0x68, 0x61, 0x73, 0x68,
    0x3D, // "Cookie: mstshash="
    0x0D, 0x0A, // CR LF
    0x01, 0x08, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
    0x06, 0x00, 0x24, 0x00, // correlation info
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Zero bytes where a token would be
pub const PACKET_INVALID_6: &[u8] = &[
    0x03, 0x00, 0x00, 0x1E, // TPKT
    0x19, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // token
    0x01, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
];

/// Bare X.224 Connection Request, nothing RDP-specific
pub const PACKET_SEMI_VALID_1: &[u8] = &[
    0x03, 0x00, 0x00, 0x0B, // TPKT
    0x06, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
];

/// Cookie with an empty hash
pub const PACKET_SEMI_VALID_2: &[u8] = PACKET_INVALID_5;

/// Custom info with no text
pub const PACKET_SEMI_VALID_3: &[u8] = &[
    0x03, 0x00, 0x00, 0x39, // TPKT
    0x34, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x0D, 0x0A, // CR LF
    0x01, 0x08, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
    0x06, 0x00, 0x24, 0x00, // correlation info
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Token with nested headers but no value
pub const PACKET_SEMI_VALID_4: &[u8] = &[
    0x03, 0x00, 0x00, 0x1E, // TPKT
    0x19, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x03, 0x00, 0x00, 0x0B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // token
    0x01, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
];

/// Negotiation request only
pub const PACKET_VALID_1: &[u8] = &[
    0x03, 0x00, 0x00, 0x13, // TPKT
    0x0E, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x01, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
];

/// Negotiation request and correlation info
pub const PACKET_VALID_2: &[u8] = &[
    0x03, 0x00, 0x00, 0x37, // TPKT
    0x32, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x01, 0x08, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
    0x06, 0x00, 0x24, 0x00, // correlation info
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Cookie "a0123", negotiation request and correlation info
pub const PACKET_VALID_3: &[u8] = &[
    0x03, 0x00, 0x00, 0x4F, // TPKT
    0x4A, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x43, 0x6F, 0x6F, 0x6B, 0x69, 0x65, 0x3A, 0x20, 0x6D, 0x73, 0x74, 0x73, 0x68, 0x61, 0x73, 0x68,
    0x3D, // "Cookie: mstshash="
    0x61, 0x30, 0x31, 0x32, 0x33, // "a0123"
    0x0D, 0x0A, // CR LF
    0x01, 0x08, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
    0x06, 0x00, 0x24, 0x00, // correlation info
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Cookie "a0123" and negotiation request
pub const PACKET_VALID_4: &[u8] = &[
    0x03, 0x00, 0x00, 0x2B, // TPKT
    0x26, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x43, 0x6F, 0x6F, 0x6B, 0x69, 0x65, 0x3A, 0x20, 0x6D, 0x73, 0x74, 0x73, 0x68, 0x61, 0x73, 0x68,
    0x3D, // "Cookie: mstshash="
    0x61, 0x30, 0x31, 0x32, 0x33, // "a0123"
    0x0D, 0x0A, // CR LF
    0x01, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
];

/// Token for 127.0.0.1:3389 and negotiation request
pub const PACKET_VALID_5: &[u8] = &[
    0x03, 0x00, 0x00, 0x40, // TPKT
    0x3B, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x03, 0x00, 0x00, 0x2D, 0x28, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // nested headers
    0x43, 0x6F, 0x6F, 0x6B, 0x69, 0x65, 0x3A, 0x20, 0x6D, 0x73, 0x74, 0x73, 0x3D, // "Cookie: msts="
    0x31, 0x36, 0x37, 0x37, 0x37, 0x33, 0x34, 0x33, // "16777343"
    0x2E, 0x31, 0x35, 0x36, 0x32, 0x39, // ".15629"
    0x2E, 0x30, 0x30, 0x30, 0x30, // ".0000"
    0x0D, 0x0A, // CR LF
    0x01, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
];

/// Cookie "a0123" only
pub const PACKET_VALID_6: &[u8] = &[
    0x03, 0x00, 0x00, 0x23, // TPKT
    0x1E, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x43, 0x6F, 0x6F, 0x6B, 0x69, 0x65, 0x3A, 0x20, 0x6D, 0x73, 0x74, 0x73, 0x68, 0x61, 0x73, 0x68,
    0x3D, // "Cookie: mstshash="
    0x61, 0x30, 0x31, 0x32, 0x33, // "a0123"
    0x0D, 0x0A, // CR LF
];

/// Token for 127.0.0.1:3389 only
pub const PACKET_VALID_7: &[u8] = &[
    0x03, 0x00, 0x00, 0x38, // TPKT
    0x33, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x03, 0x00, 0x00, 0x2D, 0x28, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // nested headers
    0x43, 0x6F, 0x6F, 0x6B, 0x69, 0x65, 0x3A, 0x20, 0x6D, 0x73, 0x74, 0x73, 0x3D, // "Cookie: msts="
    0x31, 0x36, 0x37, 0x37, 0x37, 0x33, 0x34, 0x33, // "16777343"
    0x2E, 0x31, 0x35, 0x36, 0x32, 0x39, // ".15629"
    0x2E, 0x30, 0x30, 0x30, 0x30, // ".0000"
    0x0D, 0x0A, // CR LF
];

/// Token, negotiation request and correlation info
pub const PACKET_VALID_8: &[u8] = &[
    0x03, 0x00, 0x00, 0x64, // TPKT
    0x5F, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x03, 0x00, 0x00, 0x2D, 0x28, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // nested headers
    0x43, 0x6F, 0x6F, 0x6B, 0x69, 0x65, 0x3A, 0x20, 0x6D, 0x73, 0x74, 0x73, 0x3D, // "Cookie: msts="
    0x31, 0x36, 0x37, 0x37, 0x37, 0x33, 0x34, 0x33, // "16777343"
    0x2E, 0x31, 0x35, 0x36, 0x32, 0x39, // ".15629"
    0x2E, 0x30, 0x30, 0x30, 0x30, // ".0000"
    0x0D, 0x0A, // CR LF
    0x01, 0x08, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
    0x06, 0x00, 0x24, 0x00, // correlation info
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Custom info "anything could be here" only
pub const PACKET_VALID_9: &[u8] = &[
    0x03, 0x00, 0x00, 0x23, // TPKT
    0x1E, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x61, 0x6E, 0x79, 0x74, 0x68, 0x69, 0x6E, 0x67, 0x20, 0x63, 0x6F, 0x75, 0x6C, 0x64, 0x20,
    0x62, 0x65, 0x20, 0x68, 0x65, 0x72, 0x65, // "anything could be here"
    0x0D, 0x0A, // CR LF
];

/// [`PACKET_VALID_8`] followed by one extra byte
pub const PACKET_EXTRA_BYTE: &[u8] = &[
    0x03, 0x00, 0x00, 0x64, // TPKT
    0x5F, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // X.224
    0x03, 0x00, 0x00, 0x2D, 0x28, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, // nested headers
    0x43, 0x6F, 0x6F, 0x6B, 0x69, 0x65, 0x3A, 0x20, 0x6D, 0x73, 0x74, 0x73, 0x3D, // "Cookie: msts="
    0x31, 0x36, 0x37, 0x37, 0x37, 0x33, 0x34, 0x33, // "16777343"
    0x2E, 0x31, 0x35, 0x36, 0x32, 0x39, // ".15629"
    0x2E, 0x30, 0x30, 0x30, 0x30, // ".0000"
    0x0D, 0x0A, // CR LF
    0x01, 0x08, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, // negotiation request
    0x06, 0x00, 0x24, 0x00, // correlation info
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, // extra
];

/// Every request that decodes successfully
pub const VALID_PACKETS: &[&[u8]] = &[
    PACKET_VALID_1,
    PACKET_VALID_2,
    PACKET_VALID_3,
    PACKET_VALID_4,
    PACKET_VALID_5,
    PACKET_VALID_6,
    PACKET_VALID_7,
    PACKET_VALID_8,
    PACKET_VALID_9,
];

/// Every request that must never match
pub const REJECTED_PACKETS: &[&[u8]] = &[
    PACKET_TOO_SHORT,
    PACKET_INVALID_1,
    PACKET_INVALID_2,
    PACKET_INVALID_3,
    PACKET_INVALID_4,
    PACKET_INVALID_5,
    PACKET_INVALID_6,
    PACKET_SEMI_VALID_1,
    PACKET_SEMI_VALID_2,
    PACKET_SEMI_VALID_3,
    PACKET_SEMI_VALID_4,
    PACKET_EXTRA_BYTE,
];
