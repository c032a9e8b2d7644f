//! # Address — Participant Identity
//!
//! Every participant in an escrow — funder, recipient, administrator, the
//! vault itself — is identified by an [`Address`]. The escrow crate treats
//! addresses as opaque: it never parses them, never derives them, never
//! verifies signatures against them. Identity *semantics* belong to the
//! network layer; this crate only needs equality and one distinguished
//! value.
//!
//! That distinguished value is the **null identity**: the empty string.
//! It exists so that API boundaries can reject "nobody" explicitly instead
//! of letting a default-constructed identity slip into a grant record.
//! Inside the registry, absence is expressed by `Option`, never by storing
//! a null address.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque participant identity.
///
/// Wraps the owned address string (e.g. `nova:<hex-pubkey>`). Two addresses
/// are the same participant iff the strings are byte-equal. The empty
/// string is the null identity and is rejected wherever a real participant
/// is required.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Creates an address from its string form.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Returns the null identity.
    ///
    /// Useful as an explicit "nobody" in negative tests. Never a valid
    /// participant.
    pub fn null() -> Self {
        Self(String::new())
    }

    /// Returns `true` if this is the null identity.
    pub fn is_null(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "<null>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_address_is_null() {
        assert!(Address::null().is_null());
        assert!(Address::new("").is_null());
    }

    #[test]
    fn real_address_is_not_null() {
        let addr = Address::new("nova:aabbcc");
        assert!(!addr.is_null());
        assert_eq!(addr.as_str(), "nova:aabbcc");
    }

    #[test]
    fn equality_is_byte_equality() {
        assert_eq!(Address::new("nova:01"), Address::from("nova:01"));
        assert_ne!(Address::new("nova:01"), Address::new("nova:02"));
    }

    #[test]
    fn display_marks_the_null_identity() {
        assert_eq!(Address::null().to_string(), "<null>");
        assert_eq!(Address::new("nova:01").to_string(), "nova:01");
    }

    #[test]
    fn address_serialization_roundtrip() {
        let addr = Address::new("nova:deadbeef");
        let json = serde_json::to_string(&addr).expect("serialize");
        let recovered: Address = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(recovered, addr);
    }
}
