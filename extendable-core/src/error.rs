//! Error types for extendable objects.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`ExtendableError`] - Top-level error type for every operation
//! - [`AuthorizationError`] - Caller is not allowed to perform the operation
//! - [`CollisionError`] - Signature or capability already owned
//! - [`ValidationError`] - Malformed module reference, interface or argument
//! - [`CompatibilityError`] - Replacement rejected by the active policy
//! - [`ReentrancyError`] - A guard tier rejected re-entry
//!
//! Errors propagate verbatim to the external caller; nothing in the core
//! retries or recovers.

use crate::guard::GuardTier;
use crate::id::{Address, CapabilityId, Signature};
use thiserror::Error;

/// A boxed error type for module-defined failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used across the crate.
pub type Result<T, E = ExtendableError> = std::result::Result<T, E>;

/// Top-level error type for all extendable operations.
#[derive(Error, Debug)]
pub enum ExtendableError {
    /// The caller may not perform this operation.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    /// The referenced module is not currently registered.
    #[error("module {0} is not registered")]
    NotFound(Address),

    /// A signature or capability is already owned.
    #[error(transparent)]
    Collision(#[from] CollisionError),

    /// A module reference, interface or argument is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A replacement violates the active compatibility policy.
    #[error(transparent)]
    Compatibility(#[from] CompatibilityError),

    /// A reentrancy guard tier rejected the call.
    #[error(transparent)]
    Reentrancy(#[from] ReentrancyError),

    /// No module owns the dispatched signature.
    #[error("no module implements {0}")]
    NotImplemented(Signature),

    /// The host's computation budget ran out.
    #[error("call depth budget of {limit} exhausted")]
    BudgetExhausted {
        /// The configured depth limit.
        limit: usize,
    },

    /// Object state was touched while a running operation still borrows it.
    #[error("object state is already borrowed by a running operation")]
    StateBorrowed,

    /// A failure raised by module logic itself.
    #[error(transparent)]
    Module(BoxError),
}

impl ExtendableError {
    /// Wrap an arbitrary module-level failure.
    pub fn module(err: impl Into<BoxError>) -> Self {
        ExtendableError::Module(err.into())
    }

    /// The guard tier that rejected the call, if this is a reentrancy error.
    pub fn reentrancy_tier(&self) -> Option<GuardTier> {
        match self {
            ExtendableError::Reentrancy(err) => Some(err.tier),
            _ => None,
        }
    }
}

/// Errors raised by access control.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The caller is not the current owner.
    #[error("unauthorised: {caller} is not the owner")]
    NotOwner {
        /// The rejected caller.
        caller: Address,
    },

    /// Ownership has already been initialised.
    #[error("ownership already initialised")]
    AlreadyInitialized,

    /// Ownership was renounced; nothing can be mutated any more.
    #[error("ownership has been renounced")]
    Renounced,

    /// The operation may only be reached by the object calling itself.
    #[error("external caller not allowed: {caller}")]
    ExternalCaller {
        /// The rejected caller.
        caller: Address,
    },
}

/// Errors raised when an identifier is already owned by a module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollisionError {
    /// The signature is already implemented.
    #[error("function {signature} is already implemented by {owner}")]
    Signature {
        /// The colliding signature.
        signature: Signature,
        /// The module currently owning it.
        owner: Address,
    },

    /// The capability is already implemented.
    #[error("capability {capability} is already implemented by {owner}")]
    Capability {
        /// The colliding capability id.
        capability: CapabilityId,
        /// The module currently owning it.
        owner: Address,
    },
}

/// Errors raised for malformed inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The address does not resolve to an executable module.
    #[error("{0} is not a module")]
    NotAModule(Address),

    /// The address does not resolve to an extendable object.
    #[error("{0} is not an extendable object")]
    UnknownTarget(Address),

    /// The null identity was supplied where an owner is required.
    #[error("owner cannot be the null address")]
    NullOwner,

    /// The reserved capability id was used.
    #[error("invalid capability id {0}")]
    InvalidCapability(CapabilityId),

    /// A module declared no capabilities.
    #[error("module interface declares no capabilities")]
    EmptyInterface,

    /// A capability declared no functions.
    #[error("capability {0} declares no functions")]
    EmptyCapability(CapabilityId),

    /// The same signature appears twice in one interface.
    #[error("function {0} is declared more than once")]
    DuplicateSignature(Signature),

    /// The same capability appears twice in one interface.
    #[error("capability {0} is declared more than once")]
    DuplicateCapability(CapabilityId),

    /// A module address is already registered with a different handle.
    #[error("{0} is already registered with a different handle")]
    HandleMismatch(Address),

    /// A call argument is missing or has the wrong shape.
    #[error("argument {index} is missing or not a {expected}")]
    BadArgument {
        /// Position of the argument.
        index: usize,
        /// Expected value kind.
        expected: &'static str,
    },
}

/// Errors raised by replacement compatibility policies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompatibilityError {
    /// Strict replacement requires identical interfaces.
    #[error("interface of {new} does not match {old}, only identical interfaces may replace each other")]
    InterfaceMismatch {
        /// The module being replaced.
        old: Address,
        /// The rejected replacement.
        new: Address,
    },

    /// The module carrying a registry-mutation capability must keep its interface.
    #[error("{old} implements mutation capability {capability}, its replacement {new} must expose an identical interface")]
    ProtectedInterfaceMismatch {
        /// The module being replaced.
        old: Address,
        /// The rejected replacement.
        new: Address,
        /// The protected capability held by `old`.
        capability: CapabilityId,
    },
}

/// A guard tier rejected re-entry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{tier} re-entrancy disallowed")]
pub struct ReentrancyError {
    /// The tier that was violated.
    pub tier: GuardTier,
}

// Convenience conversions
impl From<BoxError> for ExtendableError {
    fn from(err: BoxError) -> Self {
        ExtendableError::Module(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_message_names_owner() {
        let err = ExtendableError::from(CollisionError::Capability {
            capability: CapabilityId::from(0x2300_1c73),
            owner: Address::from_low_u64(7),
        });
        assert_eq!(
            err.to_string(),
            "capability 0x23001c73 is already implemented by 0x0000000000000000000000000000000000000007"
        );
    }

    #[test]
    fn test_reentrancy_error_is_tagged() {
        let err = ExtendableError::from(ReentrancyError {
            tier: GuardTier::Strict,
        });
        assert_eq!(err.reentrancy_tier(), Some(GuardTier::Strict));
        assert_eq!(err.to_string(), "strict re-entrancy disallowed");
        assert_eq!(ExtendableError::NotFound(Address::ZERO).reentrancy_tier(), None);
    }

    #[test]
    fn test_module_error_is_transparent() {
        let err = ExtendableError::module("normal reversion");
        assert_eq!(err.to_string(), "normal reversion");
    }
}
