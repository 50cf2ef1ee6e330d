//! Procedural macros for extendable modules.
//!
//! Most users reach these through the `extendable` facade with the `macros`
//! feature enabled.

use proc_macro::TokenStream;

mod module;

/// Turn an inherent impl block into a `Module`.
///
/// Every `pub fn` becomes one operation of a single capability. Operations
/// take `&self`, then the dispatch context, then typed arguments, and return
/// `Result<T>`:
///
/// ```rust,ignore
/// use extendable::prelude::*;
///
/// struct Counter;
///
/// #[extendable::module]
/// impl Counter {
///     /// Registered as `bump(u64)`.
///     pub fn bump(&self, ctx: &Context<'_>, by: u64) -> Result<u64> {
///         ctx.require_owner()?;
///         Ok(by + 1)
///     }
/// }
/// ```
///
/// Argument types must implement `FromValue` and return types `IntoValue`.
/// Private helpers in the same block are left alone.
///
/// # Attributes
///
/// - `capability = 0x…` pins the capability id instead of XOR-ing the
///   signatures.
/// - `crate = path` names the crate the core types are reached through
///   (default `::extendable`).
#[proc_macro_attribute]
pub fn module(attr: TokenStream, item: TokenStream) -> TokenStream {
    module::module_impl(attr, item)
}
