//! # Identifiers
//!
//! Fixed-width identities used throughout the dispatch core:
//!
//! - [`Address`] - a principal, an object or a deployed module
//! - [`Signature`] - one operation a module exposes
//! - [`CapabilityId`] - a group of signatures managed together
//!
//! Signatures are derived from a canonical declaration name such as
//! `"extend(address)"`: the first four bytes of its SHA-256 digest. A
//! capability id defaults to the XOR of the signatures it groups, so two
//! modules exposing the same set of operations share the same id.

use sha2::{Digest, Sha256};
use std::fmt;

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("0x")?;
    for byte in bytes {
        write!(f, "{byte:02x}")?;
    }
    Ok(())
}

// ============================================================================
// Address
// ============================================================================

/// A 20-byte identity for principals, objects and modules.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null identity. Never a valid owner.
    pub const ZERO: Address = Address([0; 20]);

    /// Sentinel stored as owner once ownership has been renounced.
    pub const RENOUNCED: Address = Address([
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xde, 0xad,
    ]);

    /// Build an address whose trailing eight bytes hold `value` (big-endian).
    pub const fn from_low_u64(value: u64) -> Self {
        let low = value.to_be_bytes();
        let mut bytes = [0u8; 20];
        let mut i = 0;
        while i < 8 {
            bytes[12 + i] = low[i];
            i += 1;
        }
        Address(bytes)
    }

    /// Whether this is the null identity.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

// ============================================================================
// Signature
// ============================================================================

/// Stable 4-byte identifier of one operation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature(pub [u8; 4]);

impl Signature {
    /// Derive the signature of a canonical declaration name, e.g. `"extend(address)"`.
    pub fn of(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        Signature([digest[0], digest[1], digest[2], digest[3]])
    }

    /// The raw value as a big-endian integer.
    pub const fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl From<u32> for Signature {
    fn from(value: u32) -> Self {
        Signature(value.to_be_bytes())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}

// ============================================================================
// CapabilityId
// ============================================================================

/// Identifier of a capability: a group of signatures added and removed together.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapabilityId(pub [u8; 4]);

impl CapabilityId {
    /// Reserved id. Never registered, never supported.
    pub const INVALID: CapabilityId = CapabilityId([0xff; 4]);

    /// XOR of the given signatures.
    pub fn from_signatures<'a>(signatures: impl IntoIterator<Item = &'a Signature>) -> Self {
        let mut acc = [0u8; 4];
        for signature in signatures {
            for (slot, byte) in acc.iter_mut().zip(signature.0) {
                *slot ^= byte;
            }
        }
        CapabilityId(acc)
    }

    /// Whether this is the reserved [`CapabilityId::INVALID`] value.
    pub fn is_invalid(&self) -> bool {
        *self == Self::INVALID
    }

    /// The raw value as a big-endian integer.
    pub const fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl From<u32> for CapabilityId {
    fn from(value: u32) -> Self {
        CapabilityId(value.to_be_bytes())
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Debug for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapabilityId({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display_is_lowercase_hex() {
        let address = Address::from_low_u64(0xabcd);
        assert_eq!(
            address.to_string(),
            "0x000000000000000000000000000000000000abcd"
        );
        assert!(Address::ZERO.is_zero());
        assert!(!Address::RENOUNCED.is_zero());
    }

    #[test]
    fn test_signature_is_stable_and_name_sensitive() {
        let a = Signature::of("extend(address)");
        assert_eq!(a, Signature::of("extend(address)"));
        assert_ne!(a, Signature::of("retract(address)"));
    }

    #[test]
    fn test_capability_of_single_signature_equals_signature() {
        let signature = Signature::of("retract(address)");
        let capability = CapabilityId::from_signatures([&signature]);
        assert_eq!(capability.0, signature.0);
    }

    #[test]
    fn test_capability_xor_is_order_independent() {
        let a = Signature::from(0x0000_00ff);
        let b = Signature::from(0x0f0f_0000);
        assert_eq!(
            CapabilityId::from_signatures([&a, &b]),
            CapabilityId::from_signatures([&b, &a])
        );
        assert_eq!(
            CapabilityId::from_signatures([&a, &b]),
            CapabilityId::from(0x0f0f_00ff)
        );
    }
}
