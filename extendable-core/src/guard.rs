//! # Reentrancy Guard
//!
//! Three independent lock tiers scoped to one object:
//!
//! - **atomic**: one lock shared by every atomic-guarded operation. Entering
//!   while it is held fails, whoever attempts it.
//! - **intra**: while any tier is held, only the object itself may enter
//!   (direct or indirect self-recursion). Re-entry routed through another
//!   object fails.
//! - **strict**: while any tier is held, nothing may enter.
//!
//! Entering a tier returns a [`TierLock`]. Each tier counts its live locks
//! and stays held until the last one is dropped, in whatever order they are
//! released. A failing nested call never leaves a tier locked and a nested
//! self-call never releases its caller's lock.

use crate::error::ReentrancyError;
use crate::id::Address;
use bitflags::bitflags;
use std::cell::Cell;
use std::fmt;

/// One reentrancy protection scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardTier {
    /// Single lock shared by all atomic-guarded operations.
    Atomic,
    /// Only self-calls may re-enter.
    Intra,
    /// No re-entry at all.
    Strict,
}

impl GuardTier {
    /// All tiers, in declaration order.
    pub const ALL: [GuardTier; 3] = [GuardTier::Atomic, GuardTier::Intra, GuardTier::Strict];

    /// The flag backing this tier.
    pub const fn flag(self) -> GuardTiers {
        match self {
            GuardTier::Atomic => GuardTiers::ATOMIC,
            GuardTier::Intra => GuardTiers::INTRA,
            GuardTier::Strict => GuardTiers::STRICT,
        }
    }

    const fn index(self) -> usize {
        match self {
            GuardTier::Atomic => 0,
            GuardTier::Intra => 1,
            GuardTier::Strict => 2,
        }
    }

    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            GuardTier::Atomic => "atomic",
            GuardTier::Intra => "intra",
            GuardTier::Strict => "strict",
        }
    }
}

impl fmt::Display for GuardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// The set of tiers currently locked on an object.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GuardTiers: u8 {
        /// Atomic tier locked.
        const ATOMIC = 0b001;
        /// Intra tier locked.
        const INTRA = 0b010;
        /// Strict tier locked.
        const STRICT = 0b100;
    }
}

/// Per-object guard state. Created with every tier free.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    holds: Cell<[usize; 3]>,
}

impl ReentrancyGuard {
    /// Create a guard with every tier free.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiers currently held.
    pub fn locked(&self) -> GuardTiers {
        let holds = self.holds.get();
        GuardTier::ALL
            .into_iter()
            .filter(|tier| holds[tier.index()] > 0)
            .fold(GuardTiers::empty(), |set, tier| set | tier.flag())
    }

    /// Whether no tier is held.
    pub fn is_free(&self) -> bool {
        self.holds.get().iter().all(|&count| count == 0)
    }

    fn adjust(&self, tier: GuardTier, f: impl FnOnce(usize) -> usize) {
        let mut holds = self.holds.get();
        holds[tier.index()] = f(holds[tier.index()]);
        self.holds.set(holds);
    }

    /// Check whether `tier` may be entered by `caller` on the object `this`.
    pub fn check(&self, tier: GuardTier, caller: Address, this: Address) -> Result<(), ReentrancyError> {
        let locked = self.locked();
        let allowed = match tier {
            GuardTier::Atomic => !locked.contains(GuardTiers::ATOMIC),
            GuardTier::Intra => locked.is_empty() || caller == this,
            GuardTier::Strict => locked.is_empty(),
        };
        if allowed {
            Ok(())
        } else {
            Err(ReentrancyError { tier })
        }
    }

    /// Enter `tier`, locking it until the returned lock is dropped.
    pub fn enter(
        &self,
        tier: GuardTier,
        caller: Address,
        this: Address,
    ) -> Result<TierLock<'_>, ReentrancyError> {
        if let Err(err) = self.check(tier, caller, this) {
            #[cfg(feature = "tracing")]
            tracing::warn!(%tier, %caller, object = %this, "re-entry rejected");
            return Err(err);
        }
        self.adjust(tier, |count| count + 1);
        Ok(TierLock { guard: self, tier })
    }
}

/// Scoped hold on a guard tier. Released on drop.
#[must_use = "the tier is released as soon as the lock is dropped"]
#[derive(Debug)]
pub struct TierLock<'a> {
    guard: &'a ReentrancyGuard,
    tier: GuardTier,
}

impl TierLock<'_> {
    /// The tier this lock holds.
    pub fn tier(&self) -> GuardTier {
        self.tier
    }
}

impl Drop for TierLock<'_> {
    fn drop(&mut self) {
        self.guard.adjust(self.tier, |count| count.saturating_sub(1));
    }
}
