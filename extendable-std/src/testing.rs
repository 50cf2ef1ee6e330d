//! Testing utilities for extendable objects.
//!
//! Mock modules exercising the dispatch core end to end.
//!
//! # Features
//!
//! - [`MockModule`]: `test()` succeeds, `reverts()` fails with [`Reverted`]
//! - [`RecordingModule`]: any capability, records every call it receives
//! - [`MockCallerContextModule`]: reports the caller context of its own hop
//! - [`MockDeepCallerContextModule`]: reports the caller context one self-call deeper
//! - [`MockChainModule`]: relays a call along a list of objects
//! - [`MockReentrancyModule`]: guarded operations for every tier combination
//! - [`MockInternalModule`]: an operation only the object itself may reach
//! - [`MockRegistrarModule`]: declares capabilities through the object's own introspection

use extendable_core::{
    Address, Call, CapabilityDecl, CapabilityId, Context, ExtendableError, FunctionDecl,
    GuardTier, Interface, Module, Result, Signature, ValidationError, Value,
};
use std::sync::{Arc, Mutex};
use thiserror::Error;

fn unknown(call: &Call) -> ExtendableError {
    ExtendableError::NotImplemented(call.signature)
}

fn capability(functions: &[(&str, &'static str)]) -> CapabilityDecl {
    CapabilityDecl::from_functions(
        functions
            .iter()
            .map(|(name, declaration)| FunctionDecl::new(name, *declaration)),
    )
}

fn single_capability(functions: &[(&str, &'static str)]) -> Interface {
    Interface::single(capability(functions))
}

// ============================================================================
// Mock Module
// ============================================================================

/// The failure raised by [`MockModule`]'s `reverts()`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("normal reversion")]
pub struct Reverted;

/// A module with one succeeding and one failing operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockModule;

impl MockModule {
    const FUNCTIONS: &'static [(&'static str, &'static str)] =
        &[("test()", "fn test()"), ("reverts()", "fn reverts()")];

    /// Id of the mock capability.
    pub fn capability_id() -> CapabilityId {
        capability(Self::FUNCTIONS).id
    }
}

impl Module for MockModule {
    fn interface(&self) -> Interface {
        single_capability(Self::FUNCTIONS)
    }

    fn invoke(&self, _ctx: &Context<'_>, call: &Call) -> Result<Value> {
        if call.signature == Signature::of("test()") {
            Ok(Value::Unit)
        } else if call.signature == Signature::of("reverts()") {
            Err(ExtendableError::module(Reverted))
        } else {
            Err(unknown(call))
        }
    }
}

// ============================================================================
// Recording Module
// ============================================================================

/// One call seen by a [`RecordingModule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The object the call was dispatched on.
    pub object: Address,
    /// Immediate caller of the hop.
    pub caller: Address,
    /// The invoked operation.
    pub signature: Signature,
    /// Call arguments.
    pub args: Vec<Value>,
}

/// A module implementing an arbitrary capability that records every call.
///
/// Useful for checking routing, and for building modules whose interface
/// collides with another one.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingModule::new(ExtendModule::capability());
/// let handle = recorder.clone();
/// let address = world.deploy_module(recorder);
///
/// // Use in an object...
///
/// assert_eq!(handle.count(), 1);
/// ```
#[derive(Clone)]
pub struct RecordingModule {
    interface: Interface,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    result: Value,
}

impl RecordingModule {
    /// Record calls to `capability`, answering `Unit`.
    pub fn new(capability: CapabilityDecl) -> Self {
        Self::with_interface(Interface::single(capability))
    }

    /// Record calls to every capability of `interface`.
    pub fn with_interface(interface: Interface) -> Self {
        Self {
            interface,
            calls: Arc::new(Mutex::new(Vec::new())),
            result: Value::Unit,
        }
    }

    /// Answer every call with `result`.
    pub fn returning(mut self, result: Value) -> Self {
        self.result = result;
        self
    }

    /// Get a clone of the recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Module for RecordingModule {
    fn interface(&self) -> Interface {
        self.interface.clone()
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        if !self.interface.signatures().any(|s| s == call.signature) {
            return Err(unknown(call));
        }
        self.calls.lock().unwrap().push(RecordedCall {
            object: ctx.this(),
            caller: ctx.current_caller(),
            signature: call.signature,
            args: call.args.clone(),
        });
        Ok(self.result.clone())
    }
}

// ============================================================================
// Caller Context Mocks
// ============================================================================

/// Reports the caller context of its own hop.
///
/// - `currentCaller()` → `Address`
/// - `lastExternalCaller()` → `Address`
/// - `callerStack()` → `Vec<Address>`
#[derive(Debug, Clone, Copy, Default)]
pub struct MockCallerContextModule;

impl MockCallerContextModule {
    const FUNCTIONS: &'static [(&'static str, &'static str)] = &[
        ("callerStack()", "fn callerStack() -> Vec<Address>"),
        ("currentCaller()", "fn currentCaller() -> Address"),
        ("lastExternalCaller()", "fn lastExternalCaller() -> Address"),
    ];
}

impl Module for MockCallerContextModule {
    fn interface(&self) -> Interface {
        single_capability(Self::FUNCTIONS)
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        if call.signature == Signature::of("callerStack()") {
            Ok(Value::Addresses(ctx.caller_stack()))
        } else if call.signature == Signature::of("currentCaller()") {
            Ok(Value::Address(ctx.current_caller()))
        } else if call.signature == Signature::of("lastExternalCaller()") {
            Ok(Value::Address(ctx.last_external_caller()))
        } else {
            Err(unknown(call))
        }
    }
}

/// Calls back into its object and reports [`MockCallerContextModule`]'s
/// answer from there.
///
/// Requires [`MockCallerContextModule`] to be installed on the same object.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDeepCallerContextModule;

impl MockDeepCallerContextModule {
    const FUNCTIONS: &'static [(&'static str, &'static str)] = &[
        ("deepCallerStack()", "fn deepCallerStack() -> Vec<Address>"),
        ("deepCurrentCaller()", "fn deepCurrentCaller() -> Address"),
        ("deepLastExternalCaller()", "fn deepLastExternalCaller() -> Address"),
    ];
}

impl Module for MockDeepCallerContextModule {
    fn interface(&self) -> Interface {
        single_capability(Self::FUNCTIONS)
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        let inner = if call.signature == Signature::of("deepCallerStack()") {
            "callerStack()"
        } else if call.signature == Signature::of("deepCurrentCaller()") {
            "currentCaller()"
        } else if call.signature == Signature::of("deepLastExternalCaller()") {
            "lastExternalCaller()"
        } else {
            return Err(unknown(call));
        };
        ctx.call_self(&Call::named(inner))
    }
}

/// Relays a call along a list of objects.
///
/// `chain(hops)` forwards `chain(rest)` to `hops[0]`. The last object answers
/// `[current caller, last external caller]`, and every object on the way back
/// appends the last external caller it observed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockChainModule;

impl MockChainModule {
    /// Build a `chain` call through `hops`.
    pub fn call(hops: Vec<Address>) -> Call {
        Call::named("chain(address[])").with_arg(hops)
    }
}

impl Module for MockChainModule {
    fn interface(&self) -> Interface {
        single_capability(&[(
            "chain(address[])",
            "fn chain(hops: Vec<Address>) -> Vec<Address>",
        )])
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        if call.signature != Signature::of("chain(address[])") {
            return Err(unknown(call));
        }
        let hops: Vec<Address> = call.arg(0)?;
        let Some((next, rest)) = hops.split_first() else {
            return Ok(Value::Addresses(vec![
                ctx.current_caller(),
                ctx.last_external_caller(),
            ]));
        };
        let mut observed: Vec<Address> = ctx
            .call(*next, &Self::call(rest.to_vec()))?
            .into_typed()
            .ok_or(ValidationError::BadArgument {
                index: 0,
                expected: "address list",
            })?;
        observed.push(ctx.last_external_caller());
        Ok(Value::Addresses(observed))
    }
}

// ============================================================================
// Reentrancy Mock
// ============================================================================

/// Guarded operations covering every tier combination.
///
/// Tiers are passed by name (`GuardTier` converts to and from a value).
///
/// - `single(tier)`: lock `tier` and return
/// - `relay(tier,address,tier)`: lock the first tier on this object, then
///   call `single(inner)` on `target`
/// - `bounce(tier,address,tier)`: lock the first tier, then ask `target` to
///   call `single(inner)` back on this object
/// - `forward(address,tier)`: unguarded, calls `single(tier)` on `target`
/// - `recurse(tier,address)`: lock `tier`, then call `recurse(tier, this)` on
///   `target`. Alternates between two objects, or recurses on one object
///   when `target` is the object itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockReentrancyModule;

impl MockReentrancyModule {
    const FUNCTIONS: &'static [(&'static str, &'static str)] = &[
        ("single(tier)", "fn single(tier: GuardTier)"),
        (
            "relay(tier,address,tier)",
            "fn relay(outer: GuardTier, target: Address, inner: GuardTier)",
        ),
        (
            "bounce(tier,address,tier)",
            "fn bounce(outer: GuardTier, target: Address, inner: GuardTier)",
        ),
        ("forward(address,tier)", "fn forward(target: Address, tier: GuardTier)"),
        ("recurse(tier,address)", "fn recurse(tier: GuardTier, target: Address)"),
    ];

    /// `single(tier)`.
    pub fn single(tier: GuardTier) -> Call {
        Call::named("single(tier)").with_arg(tier)
    }

    /// `relay(outer, target, inner)`.
    pub fn relay(outer: GuardTier, target: Address, inner: GuardTier) -> Call {
        Call::named("relay(tier,address,tier)")
            .with_arg(outer)
            .with_arg(target)
            .with_arg(inner)
    }

    /// `bounce(outer, target, inner)`.
    pub fn bounce(outer: GuardTier, target: Address, inner: GuardTier) -> Call {
        Call::named("bounce(tier,address,tier)")
            .with_arg(outer)
            .with_arg(target)
            .with_arg(inner)
    }

    /// `forward(target, tier)`.
    pub fn forward(target: Address, tier: GuardTier) -> Call {
        Call::named("forward(address,tier)")
            .with_arg(target)
            .with_arg(tier)
    }

    /// `recurse(tier, target)`.
    pub fn recurse(tier: GuardTier, target: Address) -> Call {
        Call::named("recurse(tier,address)")
            .with_arg(tier)
            .with_arg(target)
    }
}

impl Module for MockReentrancyModule {
    fn interface(&self) -> Interface {
        single_capability(Self::FUNCTIONS)
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        let signature = call.signature;
        if signature == Signature::of("single(tier)") {
            let _lock = ctx.enter(call.arg(0)?)?;
        } else if signature == Signature::of("relay(tier,address,tier)") {
            let _lock = ctx.enter(call.arg(0)?)?;
            ctx.call(call.arg(1)?, &Self::single(call.arg(2)?))?;
        } else if signature == Signature::of("bounce(tier,address,tier)") {
            let _lock = ctx.enter(call.arg(0)?)?;
            ctx.call(call.arg(1)?, &Self::forward(ctx.this(), call.arg(2)?))?;
        } else if signature == Signature::of("forward(address,tier)") {
            ctx.call(call.arg(0)?, &Self::single(call.arg(1)?))?;
        } else if signature == Signature::of("recurse(tier,address)") {
            let tier: GuardTier = call.arg(0)?;
            let _lock = ctx.enter(tier)?;
            ctx.call(call.arg(1)?, &Self::recurse(tier, ctx.this()))?;
        } else {
            return Err(unknown(call));
        }
        Ok(Value::Unit)
    }
}

// ============================================================================
// Internal-Only Mock
// ============================================================================

/// An operation only reachable by the object calling itself.
///
/// - `callInternalFunction()`: calls `internalFunction()` on its own object
/// - `internalFunction()`: fails unless the caller is the object
#[derive(Debug, Clone, Copy, Default)]
pub struct MockInternalModule;

impl MockInternalModule {
    const FUNCTIONS: &'static [(&'static str, &'static str)] = &[
        ("callInternalFunction()", "fn callInternalFunction()"),
        ("internalFunction()", "fn internalFunction()"),
    ];
}

impl Module for MockInternalModule {
    fn interface(&self) -> Interface {
        single_capability(Self::FUNCTIONS)
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        if call.signature == Signature::of("callInternalFunction()") {
            ctx.call_self(&Call::named("internalFunction()"))
        } else if call.signature == Signature::of("internalFunction()") {
            ctx.require_internal()?;
            Ok(Value::Unit)
        } else {
            Err(unknown(call))
        }
    }
}

// ============================================================================
// Registrar Module
// ============================================================================

/// Declares capabilities on its object through a self-call.
///
/// - `declareCapability(capability)`: calls `registerCapability(capability)`
///   on its own object, which needs the introspection module installed
#[derive(Debug, Clone, Copy, Default)]
pub struct MockRegistrarModule;

impl MockRegistrarModule {
    const FUNCTIONS: &'static [(&'static str, &'static str)] = &[(
        "declareCapability(capability)",
        "fn declareCapability(capability: CapabilityId)",
    )];

    /// A `declareCapability(capability)` call.
    pub fn declare(capability: CapabilityId) -> Call {
        Call::named("declareCapability(capability)").with_arg(capability)
    }
}

impl Module for MockRegistrarModule {
    fn interface(&self) -> Interface {
        single_capability(Self::FUNCTIONS)
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        if call.signature != Signature::of("declareCapability(capability)") {
            return Err(unknown(call));
        }
        let capability: CapabilityId = call.arg(0)?;
        ctx.call_self(&Call::named("registerCapability(capability)").with_arg(capability))
    }
}
