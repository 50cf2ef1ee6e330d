//! Compatibility policies for in-place module replacement.

use crate::error::CompatibilityError;
use crate::id::Address;
use crate::interface::Interface;

/// Decides whether `new` may take the place of `old` in a registry.
///
/// Collision checks against other modules are done by the registry itself;
/// a policy only compares the outgoing and incoming interfaces.
pub trait CompatibilityPolicy: Send + Sync {
    /// Accept or reject the replacement.
    ///
    /// `current` is the interface `old` is registered with, `replacement`
    /// the interface `new` declares.
    fn check(
        &self,
        old: Address,
        current: &Interface,
        new: Address,
        replacement: &Interface,
    ) -> Result<(), CompatibilityError>;
}

impl<P: CompatibilityPolicy + ?Sized> CompatibilityPolicy for &P {
    fn check(
        &self,
        old: Address,
        current: &Interface,
        new: Address,
        replacement: &Interface,
    ) -> Result<(), CompatibilityError> {
        (**self).check(old, current, new, replacement)
    }
}

impl<P: CompatibilityPolicy + ?Sized> CompatibilityPolicy for std::sync::Arc<P> {
    fn check(
        &self,
        old: Address,
        current: &Interface,
        new: Address,
        replacement: &Interface,
    ) -> Result<(), CompatibilityError> {
        (**self).check(old, current, new, replacement)
    }
}
