//! # Extendable Object
//!
//! An [`Extendable`] owns the state every module works against: the
//! [`Registry`], the [`Ownership`] slot, the [`CallerStack`] and the
//! [`ReentrancyGuard`]. [`Extendable::dispatch`] is the single entry point:
//!
//! 1. resolve the signature to its module (`NotImplemented` if none)
//! 2. push a caller frame
//! 3. invoke the module with a [`Context`] over this object
//! 4. pop the frame on every exit path
//!
//! No borrow of the object's state is held while a module runs, so modules
//! are free to dispatch back into the same object. State accessed while a
//! closure-scoped borrow is still live fails with
//! [`ExtendableError::StateBorrowed`].

use crate::call::{Call, Value};
use crate::caller::{CallerStack, Frame};
use crate::context::Context;
use crate::error::{ExtendableError, Result};
use crate::guard::{GuardTiers, ReentrancyGuard};
use crate::id::Address;
use crate::module::{Host, Module};
use crate::owner::Ownership;
use crate::registry::Registry;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

/// A long-lived object whose operations are supplied by modules.
pub struct Extendable {
    address: Address,
    registry: RefCell<Registry>,
    ownership: RefCell<Ownership>,
    callers: CallerStack,
    guard: ReentrancyGuard,
}

impl Extendable {
    /// Create an object owned by `deployer` with the extend module installed.
    ///
    /// The extend module becomes the first registry entry so the owner can
    /// grow the object further.
    pub fn new(
        address: Address,
        deployer: Address,
        extend_address: Address,
        extend_module: Arc<dyn Module>,
    ) -> Result<Self> {
        let object = Self::bare(address);
        object.with_ownership_mut(|ownership| ownership.initialize(deployer))?;
        let interface = extend_module.interface();
        object.with_registry_mut(|registry| {
            registry.install(extend_address, extend_module, interface)
        })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(object = %address, owner = %deployer, extend = %extend_address, "extendable created");
        Ok(object)
    }

    /// Create an object with no owner and no modules.
    pub fn bare(address: Address) -> Self {
        Self {
            address,
            registry: RefCell::new(Registry::new()),
            ownership: RefCell::new(Ownership::new()),
            callers: CallerStack::new(),
            guard: ReentrancyGuard::new(),
        }
    }

    /// Route `call` to the module owning its signature.
    pub fn dispatch(&self, host: &dyn Host, frame: Frame, call: &Call) -> Result<Value> {
        let handle = self
            .with_registry(|registry| registry.resolve(call.signature))?
            .ok_or(ExtendableError::NotImplemented(call.signature))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            object = %self.address,
            signature = %call.signature,
            caller = %frame.caller,
            depth = self.callers.depth() + 1,
            "dispatch"
        );

        let _frame = self.callers.push(frame);
        let ctx = Context::new(self, host, frame.origin);
        let result = handle.invoke(&ctx, call);

        #[cfg(feature = "tracing")]
        {
            if let Err(err) = &result {
                tracing::debug!(object = %self.address, signature = %call.signature, error = %err, "dispatch failed");
            }
        }
        result
    }

    /// The object's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current owner.
    pub fn owner(&self) -> Result<Address> {
        self.with_ownership(Ownership::owner)
    }

    /// Read the registry.
    pub fn with_registry<R>(&self, f: impl FnOnce(&Registry) -> R) -> Result<R> {
        let registry = self
            .registry
            .try_borrow()
            .map_err(|_| ExtendableError::StateBorrowed)?;
        Ok(f(&registry))
    }

    /// Mutate the registry.
    pub fn with_registry_mut<R, E>(
        &self,
        f: impl FnOnce(&mut Registry) -> Result<R, E>,
    ) -> Result<R>
    where
        E: Into<ExtendableError>,
    {
        let mut registry = self
            .registry
            .try_borrow_mut()
            .map_err(|_| ExtendableError::StateBorrowed)?;
        f(&mut registry).map_err(Into::into)
    }

    /// Read the owner slot.
    pub fn with_ownership<R>(&self, f: impl FnOnce(&Ownership) -> R) -> Result<R> {
        let ownership = self
            .ownership
            .try_borrow()
            .map_err(|_| ExtendableError::StateBorrowed)?;
        Ok(f(&ownership))
    }

    /// Mutate the owner slot.
    pub fn with_ownership_mut<R, E>(
        &self,
        f: impl FnOnce(&mut Ownership) -> Result<R, E>,
    ) -> Result<R>
    where
        E: Into<ExtendableError>,
    {
        let mut ownership = self
            .ownership
            .try_borrow_mut()
            .map_err(|_| ExtendableError::StateBorrowed)?;
        f(&mut ownership).map_err(Into::into)
    }

    /// The caller stack.
    pub fn callers(&self) -> &CallerStack {
        &self.callers
    }

    /// Callers of the hops in progress, bottom to top.
    pub fn caller_stack(&self) -> Vec<Address> {
        self.callers.callers()
    }

    /// The reentrancy guard.
    pub fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }

    /// Tiers currently locked.
    pub fn locked_tiers(&self) -> GuardTiers {
        self.guard.locked()
    }
}

impl fmt::Debug for Extendable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extendable")
            .field("address", &self.address)
            .field("owner", &self.owner().ok())
            .field("registry", &self.registry.try_borrow().ok())
            .field("callers", &self.callers)
            .field("guard", &self.guard)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::GuardTier;
    use crate::interface::{CapabilityDecl, FunctionDecl, Interface};
    use crate::module::{Hop, ModuleLoader};

    const OBJECT: Address = Address::from_low_u64(0x100);
    const DEPLOYER: Address = Address::from_low_u64(0x1);
    const MODULE: Address = Address::from_low_u64(0x200);

    /// Answers `callers()` with the stack and `again()` by calling itself once.
    struct SelfCaller;

    impl Module for SelfCaller {
        fn interface(&self) -> Interface {
            Interface::single(CapabilityDecl::from_functions([
                FunctionDecl::new("callers()", "fn callers() -> Vec<Address>"),
                FunctionDecl::new("again()", "fn again() -> Vec<Address>"),
                FunctionDecl::new("locked()", "fn locked()"),
                FunctionDecl::new("whileMutating()", "fn whileMutating()"),
            ]))
        }

        fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
            if call.signature == crate::id::Signature::of("callers()") {
                Ok(Value::Addresses(ctx.caller_stack()))
            } else if call.signature == crate::id::Signature::of("again()") {
                ctx.call_self(&Call::named("callers()"))
            } else if call.signature == crate::id::Signature::of("whileMutating()") {
                ctx.with_registry_mut(|_| ctx.call_self(&Call::named("callers()")))
            } else {
                let _lock = ctx.enter(GuardTier::Strict)?;
                ctx.call_self(&Call::named("locked()"))
            }
        }
    }

    /// Host with a single object and no budget.
    struct Solo<'a>(&'a Extendable);

    impl ModuleLoader for Solo<'_> {
        fn load_module(&self, _address: Address) -> Option<Arc<dyn Module>> {
            None
        }
    }

    impl Host for Solo<'_> {
        fn call(&self, hop: Hop, call: &Call) -> Result<Value> {
            let frame = Frame {
                caller: hop.caller,
                origin: hop.origin,
            };
            self.0.dispatch(self, frame, call)
        }
    }

    fn object() -> Extendable {
        Extendable::new(OBJECT, DEPLOYER, MODULE, Arc::new(SelfCaller)).unwrap()
    }

    fn external() -> Frame {
        Frame {
            caller: DEPLOYER,
            origin: DEPLOYER,
        }
    }

    #[test]
    fn test_new_installs_module_and_owner() {
        let object = object();
        assert_eq!(object.owner().unwrap(), DEPLOYER);
        assert_eq!(
            object.with_registry(|r| r.module_addresses()).unwrap(),
            vec![MODULE]
        );
    }

    #[test]
    fn test_unknown_signature_is_not_implemented() {
        let object = object();
        let err = object
            .dispatch(&Solo(&object), external(), &Call::named("missing()"))
            .unwrap_err();
        assert!(matches!(err, ExtendableError::NotImplemented(_)));
        assert!(object.callers().is_empty());
    }

    #[test]
    fn test_self_call_stacks_frames_and_unwinds() {
        let object = object();
        let host = Solo(&object);
        let value = object
            .dispatch(&host, external(), &Call::named("again()"))
            .unwrap();
        assert_eq!(value, Value::Addresses(vec![DEPLOYER, OBJECT]));
        assert!(object.callers().is_empty());
    }

    #[test]
    fn test_failed_nested_call_releases_guard_and_frames() {
        let object = object();
        let host = Solo(&object);
        let err = object
            .dispatch(&host, external(), &Call::named("locked()"))
            .unwrap_err();
        assert_eq!(err.reentrancy_tier(), Some(GuardTier::Strict));
        assert!(object.locked_tiers().is_empty());
        assert!(object.callers().is_empty());
    }

    #[test]
    fn test_dispatch_while_registry_borrowed_fails() {
        let object = object();
        let host = Solo(&object);
        let err = object
            .dispatch(&host, external(), &Call::named("whileMutating()"))
            .unwrap_err();
        assert!(matches!(err, ExtendableError::StateBorrowed));
        assert!(object.callers().is_empty());
        assert_eq!(object.with_registry(|r| r.len()).unwrap(), 1);
    }

    #[test]
    fn test_nested_state_access_fails_instead_of_panicking() {
        let object = object();
        let err = object
            .with_registry_mut(|_| object.with_registry(|r| r.len()))
            .unwrap_err();
        assert!(matches!(err, ExtendableError::StateBorrowed));

        let err = object
            .with_ownership_mut(|_| object.owner())
            .unwrap_err();
        assert!(matches!(err, ExtendableError::StateBorrowed));
        assert_eq!(object.owner().unwrap(), DEPLOYER);
    }
}
