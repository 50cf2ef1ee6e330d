//! The retract module: removes an installed module.

use super::{Operation, operations};
use extendable_core::{
    Address, Call, CapabilityDecl, CapabilityId, Context, ExtendableError, Interface, Module,
    Result, Value,
};

operations! {
    enum RetractOp {
        Retract => ("retract(address)", "fn retract(module: Address)"),
    }
}

/// Removes a module and every capability it contributed.
///
/// Owner-only. Retracting a module that is not installed fails with
/// [`ExtendableError::NotFound`] unless the module was built with
/// [`RetractModule::tolerant`], in which case it does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetractModule {
    tolerant: bool,
}

impl RetractModule {
    /// Fail when the module is not installed.
    pub fn new() -> Self {
        Self { tolerant: false }
    }

    /// Do nothing when the module is not installed.
    pub fn tolerant() -> Self {
        Self { tolerant: true }
    }

    /// Whether unknown modules are ignored.
    pub fn is_tolerant(&self) -> bool {
        self.tolerant
    }

    /// The RETRACT capability.
    pub fn capability() -> CapabilityDecl {
        RetractOp::capability()
    }

    /// Id of the RETRACT capability.
    pub fn capability_id() -> CapabilityId {
        RetractOp::capability_id()
    }

    fn retract(&self, ctx: &Context<'_>, module: Address) -> Result<()> {
        ctx.require_owner()?;
        match ctx.with_registry_mut(|registry| registry.unregister(module)) {
            Ok(_entry) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(object = %ctx.this(), %module, "retracted");
                Ok(())
            }
            Err(ExtendableError::NotFound(_)) if self.tolerant => Ok(()),
            Err(err) => Err(err),
        }
    }
}

impl Module for RetractModule {
    fn interface(&self) -> Interface {
        Interface::single(Self::capability())
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        match RetractOp::resolve(call.signature) {
            Some(RetractOp::Retract) => self.retract(ctx, call.arg(0)?).map(|()| Value::Unit),
            None => Err(ExtendableError::NotImplemented(call.signature)),
        }
    }
}
