//! Replacement compatibility policies.
//!
//! - [`SimpleReplace`]: anything goes, except that a module holding a
//!   protected capability (by default EXTEND, RETRACT and REPLACE) may only
//!   be replaced by one exposing an identical interface. An object can then
//!   never lose the ability to mutate itself through a replace.
//! - [`StrictReplace`]: every replacement must expose an identical
//!   interface, turning replace into a pure behaviour swap.
//!
//! "Identical" means the same capabilities with the same signatures, in the
//! same order. Declaration text is not compared.

use crate::modules::{ExtendModule, ReplaceModule, RetractModule};
use extendable_core::{Address, CapabilityId, CompatibilityError, CompatibilityPolicy, Interface};

/// Allows any replacement that does not touch a protected capability's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleReplace {
    protected: Vec<CapabilityId>,
}

impl Default for SimpleReplace {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleReplace {
    /// Protect the EXTEND, RETRACT and REPLACE capabilities.
    pub fn new() -> Self {
        Self {
            protected: vec![
                ExtendModule::capability_id(),
                RetractModule::capability_id(),
                ReplaceModule::capability_id(),
            ],
        }
    }

    /// Protect nothing.
    pub fn unprotected() -> Self {
        Self {
            protected: Vec::new(),
        }
    }

    /// Also protect `capability`.
    pub fn protect(mut self, capability: CapabilityId) -> Self {
        if !self.protected.contains(&capability) {
            self.protected.push(capability);
        }
        self
    }

    /// Protected capabilities.
    pub fn protected(&self) -> &[CapabilityId] {
        &self.protected
    }
}

impl CompatibilityPolicy for SimpleReplace {
    fn check(
        &self,
        old: Address,
        current: &Interface,
        new: Address,
        replacement: &Interface,
    ) -> Result<(), CompatibilityError> {
        let protected = self
            .protected
            .iter()
            .copied()
            .find(|capability| current.declares(*capability));
        match protected {
            Some(capability) if !current.same_surface(replacement) => {
                Err(CompatibilityError::ProtectedInterfaceMismatch {
                    old,
                    new,
                    capability,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Only allows replacements with an identical interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrictReplace;

impl CompatibilityPolicy for StrictReplace {
    fn check(
        &self,
        old: Address,
        current: &Interface,
        new: Address,
        replacement: &Interface,
    ) -> Result<(), CompatibilityError> {
        if current.same_surface(replacement) {
            Ok(())
        } else {
            Err(CompatibilityError::InterfaceMismatch { old, new })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::PermissioningModule;
    use extendable_core::{CapabilityDecl, FunctionDecl};

    const OLD: Address = Address::from_low_u64(1);
    const NEW: Address = Address::from_low_u64(2);

    fn other() -> Interface {
        Interface::single(CapabilityDecl::from_functions([FunctionDecl::new(
            "other()",
            "fn other()",
        )]))
    }

    #[test]
    fn test_simple_allows_unprotected_shape_change() {
        let current = Interface::single(PermissioningModule::capability());
        assert!(SimpleReplace::new().check(OLD, &current, NEW, &other()).is_ok());
    }

    #[test]
    fn test_simple_protects_mutation_capabilities() {
        for capability in [
            ExtendModule::capability(),
            RetractModule::capability(),
            ReplaceModule::capability(),
        ] {
            let current = Interface::single(capability.clone());
            let err = SimpleReplace::new()
                .check(OLD, &current, NEW, &other())
                .unwrap_err();
            assert_eq!(
                err,
                CompatibilityError::ProtectedInterfaceMismatch {
                    old: OLD,
                    new: NEW,
                    capability: capability.id,
                }
            );
            assert!(
                SimpleReplace::new()
                    .check(OLD, &current, NEW, &current.clone())
                    .is_ok()
            );
        }
    }

    #[test]
    fn test_simple_protect_adds_capability() {
        let current = Interface::single(PermissioningModule::capability());
        let policy = SimpleReplace::unprotected().protect(PermissioningModule::capability_id());
        assert!(policy.check(OLD, &current, NEW, &other()).is_err());
        assert!(
            SimpleReplace::unprotected()
                .check(OLD, &Interface::single(ExtendModule::capability()), NEW, &other())
                .is_ok()
        );
    }

    #[test]
    fn test_strict_requires_identical_surface() {
        let current = Interface::single(PermissioningModule::capability());
        assert!(StrictReplace.check(OLD, &current, NEW, &current.clone()).is_ok());
        assert_eq!(
            StrictReplace.check(OLD, &current, NEW, &other()),
            Err(CompatibilityError::InterfaceMismatch { old: OLD, new: NEW })
        );
    }
}
