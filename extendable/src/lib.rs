//! # extendable - Dynamically Extensible Objects
//!
//! `extendable` lets a long-lived object grow, shrink and swap its callable
//! surface at runtime. Functionality lives in [`Module`]s; an
//! [`Extendable`] keeps a registry of installed modules and routes every
//! call to the module owning its [`Signature`], with one shared state,
//! one owner and one caller context across all of them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use extendable::prelude::*;
//!
//! let world = World::new();
//! let admin = world.account();
//!
//! let extend = world.deploy_module(ExtendModule::new());
//! let object = world.deploy_extendable(admin, extend)?;
//!
//! let retract = world.deploy_module(RetractModule::new());
//! world.call(admin, object, &Call::named("extend(address)").with_arg(retract))?;
//!
//! let described = world.call(admin, object, &Call::named("currentInterface()"))?;
//! ```
//!
//! ## Crates
//!
//! - `extendable-core`: registry, ownership, caller context, reentrancy
//!   guard and the dispatcher
//! - `extendable-std`: the standard modules, replacement policies and the
//!   in-process [`World`] host
//! - `extendable-macros` (`macros` feature): `#[module]` for writing modules
//!   as plain impl blocks

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use extendable_core::{
    // Identifiers
    Address,
    // Errors
    AuthorizationError,
    BoxError,
    // Call model
    Call,
    // Caller context
    CallerStack,
    // Interfaces
    COMPOSED_INTERFACE_NAME,
    CapabilityDecl,
    CapabilityId,
    CollisionError,
    CompatibilityError,
    // Policies
    CompatibilityPolicy,
    // Dispatch
    Context,
    Extendable,
    ExtendableError,
    Frame,
    FrameGuard,
    FromValue,
    FunctionDecl,
    // Reentrancy
    GuardTier,
    GuardTiers,
    Hop,
    Host,
    Interface,
    IntoValue,
    Module,
    ModuleEntry,
    ModuleLoader,
    // Ownership
    OwnerState,
    Ownership,
    ReentrancyError,
    ReentrancyGuard,
    // Registry
    Registry,
    Result,
    Signature,
    TierLock,
    ValidationError,
    Value,
    canonical_name,
    render_composed,
    render_functions,
};

pub use extendable_std::{
    DEFAULT_MAX_CALL_DEPTH, ExtendModule, IntrospectionModule, PermissioningModule,
    ReplaceModule, RetractModule, SimpleReplace, StrictReplace, World, WorldBuilder, WorldConfig,
};

/// Standard modules.
pub mod modules {
    pub use extendable_std::modules::{
        ExtendModule, IntrospectionModule, PermissioningModule, ReplaceModule, RetractModule,
    };
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use extendable_std::testing::*;
}

/// Link-time module catalog.
#[cfg(feature = "inventory")]
pub mod catalog {
    pub use extendable_std::catalog::{ModuleRegistration, registrations};
}

/// Prelude module - common imports for extendable.
///
/// # Usage
///
/// ```rust,ignore
/// use extendable::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Address, Call, CapabilityDecl, CapabilityId, Context, ExtendModule, Extendable,
        ExtendableError, FunctionDecl, GuardTier, Interface, IntoValue, IntrospectionModule,
        Module, PermissioningModule, ReplaceModule, Result, RetractModule, Signature, Value,
        World,
    };
}

#[cfg(feature = "macros")]
pub use extendable_macros::module;

#[cfg(feature = "inventory")]
pub use extendable_std::{inventory, register_module};
