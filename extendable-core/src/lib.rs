//! # extendable-core
//!
//! Core types for dynamically extensible objects.
//!
//! An [`Extendable`] is a long-lived object whose operations are not fixed
//! at creation. They are supplied at runtime by [`Module`]s, each exposing a
//! set of [`Signature`]s grouped into capabilities ([`CapabilityId`]). A
//! single dispatcher routes every call to the module currently owning its
//! signature, and every module runs against the same object state.
//!
//! This crate has minimal dependencies and is meant to be imported by module
//! authors who don't need the standard modules or the in-process host from
//! `extendable-std`.
//!
//! # Building Blocks
//!
//! ## Registry ([`Registry`])
//!
//! Ordered modules plus `signature → module` and `capability → module`
//! indexes. Mutations are all-or-nothing; removal and replacement keep the
//! relative order of the other modules.
//!
//! ## Ownership ([`Ownership`])
//!
//! A single owner gating all registry mutation, transferable and
//! irreversibly renounceable.
//!
//! ## Caller Context ([`CallerStack`])
//!
//! One frame per dispatch hop, exposing the immediate caller and the
//! external identity behind a chain of nested dispatch.
//!
//! ## Reentrancy Guard ([`ReentrancyGuard`])
//!
//! Three scoped lock tiers (atomic, intra, strict) released on every exit
//! path.
//!
//! ## Dispatcher ([`Extendable::dispatch`])
//!
//! Resolves, pushes a frame, invokes the module with a [`Context`], pops.
//!
//! # Error Types
//!
//! - [`ExtendableError`] - Top-level error type
//! - [`AuthorizationError`], [`CollisionError`], [`ValidationError`],
//!   [`CompatibilityError`], [`ReentrancyError`] - Categorised failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod call;
mod caller;
mod context;
mod error;
mod guard;
mod id;
mod interface;
mod module;
mod object;
mod owner;
mod policy;
mod registry;

// Re-exports
pub use call::{Call, FromValue, IntoValue, Value, canonical_name};
pub use caller::{CallerStack, Frame, FrameGuard};
pub use context::Context;
pub use error::{
    AuthorizationError, BoxError, CollisionError, CompatibilityError, ExtendableError,
    ReentrancyError, Result, ValidationError,
};
pub use guard::{GuardTier, GuardTiers, ReentrancyGuard, TierLock};
pub use id::{Address, CapabilityId, Signature};
pub use interface::{
    COMPOSED_INTERFACE_NAME, CapabilityDecl, FunctionDecl, Interface, render_composed,
    render_functions,
};
pub use module::{Hop, Host, Module, ModuleLoader};
pub use object::Extendable;
pub use owner::{OwnerState, Ownership};
pub use policy::CompatibilityPolicy;
pub use registry::{ModuleEntry, Registry};
