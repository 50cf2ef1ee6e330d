//! The replace module: swaps one installed module for another in place.

use super::{Operation, operations};
use crate::policy::{SimpleReplace, StrictReplace};
use extendable_core::{
    Address, Call, CapabilityDecl, CapabilityId, CompatibilityPolicy, Context, ExtendableError,
    Interface, Module, Result, Value,
};
use std::fmt;
use std::sync::Arc;

operations! {
    enum ReplaceOp {
        Replace => ("replace(address,address)", "fn replace(old: Address, new: Address)"),
    }
}

/// Replaces an installed module, keeping its position in the registry.
///
/// Owner-only. The new module is loaded through the host and must not
/// collide with any module other than the one it replaces; the configured
/// [`CompatibilityPolicy`] decides whether its interface may differ.
#[derive(Clone)]
pub struct ReplaceModule {
    policy: Arc<dyn CompatibilityPolicy>,
}

impl Default for ReplaceModule {
    fn default() -> Self {
        Self::simple()
    }
}

impl ReplaceModule {
    /// Replace under [`SimpleReplace`] with its default protections.
    pub fn simple() -> Self {
        Self::with_policy(SimpleReplace::new())
    }

    /// Replace under [`StrictReplace`].
    pub fn strict() -> Self {
        Self::with_policy(StrictReplace)
    }

    /// Replace under any policy.
    pub fn with_policy(policy: impl CompatibilityPolicy + 'static) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// The REPLACE capability.
    pub fn capability() -> CapabilityDecl {
        ReplaceOp::capability()
    }

    /// Id of the REPLACE capability.
    pub fn capability_id() -> CapabilityId {
        ReplaceOp::capability_id()
    }

    fn replace(&self, ctx: &Context<'_>, old: Address, new: Address) -> Result<()> {
        ctx.require_owner()?;
        let handle = ctx.load_module(new)?;
        let interface = handle.interface();
        ctx.with_registry_mut(|registry| {
            registry.replace(old, new, handle, interface, self.policy.as_ref())
        })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(object = %ctx.this(), %old, %new, "replaced");
        Ok(())
    }
}

impl fmt::Debug for ReplaceModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplaceModule").finish_non_exhaustive()
    }
}

impl Module for ReplaceModule {
    fn interface(&self) -> Interface {
        Interface::single(Self::capability())
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        match ReplaceOp::resolve(call.signature) {
            Some(ReplaceOp::Replace) => self
                .replace(ctx, call.arg(0)?, call.arg(1)?)
                .map(|()| Value::Unit),
            None => Err(ExtendableError::NotImplemented(call.signature)),
        }
    }
}
