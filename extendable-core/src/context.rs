//! # Execution Context
//!
//! [`Context`] is what a module sees while it runs: the dispatching object's
//! registry, owner, caller stack and guard, plus a way back into the host to
//! issue further calls. It only borrows; nothing is copied.
//!
//! Registry and ownership access is closure-scoped. A nested call made from
//! inside a `with_registry_mut` or `with_ownership_mut` closure still sees
//! the borrow and fails with [`ExtendableError::StateBorrowed`].
//!
//! ```rust,ignore
//! fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
//!     ctx.require_owner()?;
//!     let _lock = ctx.enter(GuardTier::Strict)?;
//!     ctx.with_registry_mut(|registry| registry.unregister(call.arg(0)?))?;
//!     Ok(Value::Unit)
//! }
//! ```

use crate::call::{Call, Value};
use crate::error::{AuthorizationError, ExtendableError, Result, ValidationError};
use crate::guard::{GuardTier, TierLock};
use crate::id::Address;
use crate::module::{Hop, Host, Module};
use crate::object::Extendable;
use crate::owner::Ownership;
use crate::registry::Registry;
use std::sync::Arc;

/// The view a module receives during [`Module::invoke`].
#[derive(Clone, Copy)]
pub struct Context<'a> {
    object: &'a Extendable,
    host: &'a dyn Host,
    origin: Address,
}

impl<'a> Context<'a> {
    pub(crate) fn new(object: &'a Extendable, host: &'a dyn Host, origin: Address) -> Self {
        Self {
            object,
            host,
            origin,
        }
    }

    // ========================================================================
    // Identity
    // ========================================================================

    /// The dispatching object's own address.
    pub fn this(&self) -> Address {
        self.object.address()
    }

    /// Immediate invoker of the current hop.
    pub fn current_caller(&self) -> Address {
        self.object.callers().current_caller().unwrap_or_default()
    }

    /// The external identity behind the current call chain.
    pub fn last_external_caller(&self) -> Address {
        self.object
            .callers()
            .last_external_caller(self.this())
            .unwrap_or(self.origin)
    }

    /// Identity that started the external invocation.
    pub fn origin(&self) -> Address {
        self.origin
    }

    /// Callers of every hop into this object, bottom to top.
    pub fn caller_stack(&self) -> Vec<Address> {
        self.object.callers().callers()
    }

    // ========================================================================
    // State
    // ========================================================================

    /// Read the registry.
    pub fn with_registry<R>(&self, f: impl FnOnce(&Registry) -> R) -> Result<R> {
        self.object.with_registry(f)
    }

    /// Mutate the registry.
    pub fn with_registry_mut<R, E>(
        &self,
        f: impl FnOnce(&mut Registry) -> Result<R, E>,
    ) -> Result<R>
    where
        E: Into<ExtendableError>,
    {
        self.object.with_registry_mut(f)
    }

    /// Current owner.
    pub fn owner(&self) -> Result<Address> {
        self.object.owner()
    }

    /// Mutate the owner slot.
    pub fn with_ownership_mut<R, E>(
        &self,
        f: impl FnOnce(&mut Ownership) -> Result<R, E>,
    ) -> Result<R>
    where
        E: Into<ExtendableError>,
    {
        self.object.with_ownership_mut(f)
    }

    /// Fail unless the current caller is the owner.
    pub fn require_owner(&self) -> Result<()> {
        let caller = self.current_caller();
        if let Err(err) = self.object.with_ownership(|ownership| ownership.require(caller))? {
            #[cfg(feature = "tracing")]
            tracing::warn!(%caller, object = %self.this(), "unauthorised mutation attempt");
            return Err(err.into());
        }
        Ok(())
    }

    /// Fail unless the object is calling itself.
    pub fn require_internal(&self) -> Result<()> {
        let caller = self.current_caller();
        if caller != self.this() {
            #[cfg(feature = "tracing")]
            tracing::warn!(%caller, object = %self.this(), "external call to internal operation");
            return Err(AuthorizationError::ExternalCaller { caller }.into());
        }
        Ok(())
    }

    /// Lock `tier` on this object until the returned lock is dropped.
    pub fn enter(&self, tier: GuardTier) -> Result<TierLock<'a>> {
        let object: &'a Extendable = self.object;
        Ok(object
            .guard()
            .enter(tier, self.current_caller(), self.this())?)
    }

    // ========================================================================
    // Host
    // ========================================================================

    /// Dispatch `call` to `target` with this object as the caller.
    pub fn call(&self, target: Address, call: &Call) -> Result<Value> {
        let hop = Hop {
            caller: self.this(),
            target,
            origin: self.origin,
        };
        self.host.call(hop, call)
    }

    /// Dispatch `call` back into this object.
    pub fn call_self(&self, call: &Call) -> Result<Value> {
        self.call(self.this(), call)
    }

    /// Resolve a module address through the host.
    pub fn load_module(&self, address: Address) -> Result<Arc<dyn Module>> {
        self.host
            .load_module(address)
            .ok_or_else(|| ValidationError::NotAModule(address).into())
    }

    /// The host this call runs in.
    pub fn host(&self) -> &'a dyn Host {
        self.host
    }
}
