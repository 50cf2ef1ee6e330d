//! # extendable-std
//!
//! Standard modules and the in-process host for extendable objects.
//!
//! This crate provides:
//! - **Standard modules**: [`ExtendModule`], [`PermissioningModule`],
//!   [`RetractModule`], [`ReplaceModule`], [`IntrospectionModule`]
//! - **Replacement policies**: [`SimpleReplace`], [`StrictReplace`]
//! - **Host**: [`World`], configured through [`WorldBuilder`]
//! - **Module catalog** (`inventory` feature): [`catalog::ModuleRegistration`]
//! - **Testing utilities**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use extendable_core;

// Modules
#[cfg(feature = "inventory")]
pub mod catalog;
pub mod modules;
pub mod policy;
pub mod testing;
pub mod world;

pub use modules::{
    ExtendModule, IntrospectionModule, PermissioningModule, ReplaceModule, RetractModule,
};
pub use policy::{SimpleReplace, StrictReplace};
pub use world::{DEFAULT_MAX_CALL_DEPTH, World, WorldBuilder, WorldConfig};

#[cfg(feature = "inventory")]
pub use inventory;
