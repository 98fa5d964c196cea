//! Protocol status codes delivered to RPC callers
//!
//! Numeric values follow the canonical RPC status code table so clients
//! that already understand those codes can interpret responses directly.

use serde::{Serialize, Serializer};

/// Subset of RPC status codes the bridge can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolStatus {
    Ok,
    InvalidArgument,
    NotFound,
    Internal,
    Unavailable,
}

impl ProtocolStatus {
    /// Numeric status code
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::InvalidArgument => 3,
            Self::NotFound => 5,
            Self::Internal => 13,
            Self::Unavailable => 14,
        }
    }

    /// Canonical upper-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL",
            Self::Unavailable => "UNAVAILABLE",
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl std::fmt::Display for ProtocolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProtocolStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
