//! Single-owner access control.

use crate::error::{AuthorizationError, Result, ValidationError};
use crate::id::Address;

/// Lifecycle of the owner slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnerState {
    /// Never initialised.
    #[default]
    Uninitialized,
    /// Owned by a principal.
    Owned(Address),
    /// Irreversibly given up.
    Renounced,
}

/// The owner of one object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ownership {
    state: OwnerState,
}

impl Ownership {
    /// An uninitialised owner slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> OwnerState {
        self.state
    }

    /// The owner as an address: [`Address::ZERO`] before initialisation,
    /// [`Address::RENOUNCED`] after renouncing.
    pub fn owner(&self) -> Address {
        match self.state {
            OwnerState::Uninitialized => Address::ZERO,
            OwnerState::Owned(owner) => owner,
            OwnerState::Renounced => Address::RENOUNCED,
        }
    }

    /// Fail unless `caller` is the current owner.
    pub fn require(&self, caller: Address) -> Result<(), AuthorizationError> {
        match self.state {
            OwnerState::Owned(owner) if owner == caller => Ok(()),
            OwnerState::Renounced => Err(AuthorizationError::Renounced),
            _ => Err(AuthorizationError::NotOwner { caller }),
        }
    }

    /// Make `caller` the owner. Only possible once.
    pub fn initialize(&mut self, caller: Address) -> Result<()> {
        if self.state != OwnerState::Uninitialized {
            return Err(AuthorizationError::AlreadyInitialized.into());
        }
        if caller.is_zero() {
            return Err(ValidationError::NullOwner.into());
        }
        self.state = OwnerState::Owned(caller);

        #[cfg(feature = "tracing")]
        tracing::debug!(owner = %caller, "ownership initialised");
        Ok(())
    }

    /// Hand ownership from `caller` to `new`.
    pub fn update(&mut self, caller: Address, new: Address) -> Result<()> {
        self.require(caller)?;
        if new.is_zero() {
            return Err(ValidationError::NullOwner.into());
        }
        self.state = OwnerState::Owned(new);

        #[cfg(feature = "tracing")]
        tracing::debug!(previous = %caller, owner = %new, "ownership transferred");
        Ok(())
    }

    /// Give up ownership for good.
    pub fn renounce(&mut self, caller: Address) -> Result<()> {
        self.require(caller)?;
        self.state = OwnerState::Renounced;

        #[cfg(feature = "tracing")]
        tracing::debug!(previous = %caller, "ownership renounced");
        Ok(())
    }
}
