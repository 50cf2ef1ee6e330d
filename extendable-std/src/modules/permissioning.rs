//! The permissioning module: owner lifecycle operations.

use super::{Operation, operations};
use extendable_core::{
    Address, Call, CapabilityDecl, CapabilityId, Context, ExtendableError, Interface, Module,
    Result, Value,
};

operations! {
    enum PermissioningOp {
        Init => ("init()", "fn init()"),
        UpdateOwner => ("updateOwner(address)", "fn updateOwner(new_owner: Address)"),
        RenounceOwnership => ("renounceOwnership()", "fn renounceOwnership()"),
        Owner => ("owner()", "fn owner() -> Address"),
    }
}

/// Exposes the object's [`Ownership`](extendable_core::Ownership) slot.
///
/// - `init()` makes the caller the owner, once.
/// - `updateOwner(new)` and `renounceOwnership()` are owner-only.
/// - `owner()` reads the current owner.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissioningModule;

impl PermissioningModule {
    /// Create the module.
    pub fn new() -> Self {
        Self
    }

    /// The PERMISSIONING capability.
    pub fn capability() -> CapabilityDecl {
        PermissioningOp::capability()
    }

    /// Id of the PERMISSIONING capability.
    pub fn capability_id() -> CapabilityId {
        PermissioningOp::capability_id()
    }
}

impl Module for PermissioningModule {
    fn interface(&self) -> Interface {
        Interface::single(Self::capability())
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        let op = PermissioningOp::resolve(call.signature)
            .ok_or(ExtendableError::NotImplemented(call.signature))?;
        let caller = ctx.current_caller();
        match op {
            PermissioningOp::Init => {
                ctx.with_ownership_mut(|ownership| ownership.initialize(caller))?;
            }
            PermissioningOp::UpdateOwner => {
                let new_owner: Address = call.arg(0)?;
                ctx.require_owner()?;
                ctx.with_ownership_mut(|ownership| ownership.update(caller, new_owner))?;
            }
            PermissioningOp::RenounceOwnership => {
                ctx.require_owner()?;
                ctx.with_ownership_mut(|ownership| ownership.renounce(caller))?;
            }
            PermissioningOp::Owner => return Ok(Value::Address(ctx.owner()?)),
        }
        Ok(Value::Unit)
    }
}
