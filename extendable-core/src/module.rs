//! # Module and Host Seams
//!
//! A [`Module`] is an addressable, stateless unit of behaviour. It declares
//! an [`Interface`] and executes calls against the [`Context`] of whichever
//! object dispatched to it. Everything a module reads or writes lives on
//! that object, so the same module instance can serve many objects.
//!
//! The [`Host`] is the environment objects live in. It resolves module
//! addresses ([`ModuleLoader`]) and routes calls between objects, enforcing
//! whatever computation bound it chooses.

use crate::call::{Call, Value};
use crate::context::Context;
use crate::error::Result;
use crate::id::Address;
use crate::interface::Interface;
use std::sync::Arc;

/// A pluggable unit of behaviour.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Module`",
    label = "missing `Module` implementation",
    note = "Implement `interface` and `invoke`, or annotate an impl block with `#[module]`."
)]
pub trait Module: Send + Sync + 'static {
    /// The capabilities this module implements.
    fn interface(&self) -> Interface;

    /// Execute `call` against the dispatching object.
    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value>;
}

impl<M: Module + ?Sized> Module for Arc<M> {
    fn interface(&self) -> Interface {
        (**self).interface()
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        (**self).invoke(ctx, call)
    }
}

/// Resolves a module address to an invocable handle.
pub trait ModuleLoader {
    /// The module deployed at `address`, if any.
    fn load_module(&self, address: Address) -> Option<Arc<dyn Module>>;
}

/// One dispatch hop between objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hop {
    /// Immediate invoker.
    pub caller: Address,
    /// Object being called.
    pub target: Address,
    /// Identity that started the external invocation.
    pub origin: Address,
}

impl Hop {
    /// An external entry: `from` is both caller and origin.
    pub fn external(from: Address, target: Address) -> Self {
        Self {
            caller: from,
            target,
            origin: from,
        }
    }
}

/// The environment objects execute in.
pub trait Host: ModuleLoader {
    /// Route `call` to `hop.target`.
    fn call(&self, hop: Hop, call: &Call) -> Result<Value>;
}
