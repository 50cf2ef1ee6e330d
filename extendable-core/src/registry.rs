//! # Module Registry
//!
//! Maps signatures and capability ids to installed modules and keeps the
//! modules in insertion order.
//!
//! Three views are kept in step:
//!
//! - the ordered module list, each entry carrying the capabilities it
//!   contributed (module → {signatures, capabilities})
//! - `signature → module`
//! - `capability → module` (the signatures of a capability live on the entry)
//!
//! Capabilities may also be declared directly, without a module behind them.
//! Declared capabilities count for [`Registry::supports`] only and outlive
//! module removal.
//!
//! Every mutation validates first and only then writes, so a failing call
//! leaves all three views exactly as they were.

use crate::error::{CollisionError, ExtendableError, Result, ValidationError};
use crate::id::{Address, CapabilityId, Signature};
use crate::interface::{CapabilityDecl, FunctionDecl, Interface, render_composed};
use crate::module::Module;
use crate::policy::CompatibilityPolicy;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A registered module and what it contributed.
#[derive(Clone)]
pub struct ModuleEntry {
    handle: Arc<dyn Module>,
    capabilities: Vec<CapabilityDecl>,
}

impl ModuleEntry {
    /// The invocable handle.
    pub fn handle(&self) -> &Arc<dyn Module> {
        &self.handle
    }

    /// Registered capabilities in registration order.
    pub fn capabilities(&self) -> &[CapabilityDecl] {
        &self.capabilities
    }

    /// The registered surface as an [`Interface`].
    pub fn interface(&self) -> Interface {
        Interface::new(self.capabilities.iter().cloned())
    }

    fn signatures(&self) -> impl Iterator<Item = Signature> + '_ {
        self.capabilities.iter().flat_map(|c| c.signatures())
    }
}

impl fmt::Debug for ModuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleEntry")
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

/// Installed modules of one object.
#[derive(Default, Clone)]
pub struct Registry {
    modules: IndexMap<Address, ModuleEntry>,
    signatures: HashMap<Signature, Address>,
    capabilities: HashMap<CapabilityId, Address>,
    declared: IndexSet<CapabilityId>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Register one capability for `module`.
    ///
    /// Appends the module to the ordered list if it is not present yet.
    pub fn register(
        &mut self,
        module: Address,
        handle: Arc<dyn Module>,
        capability: CapabilityDecl,
    ) -> Result<()> {
        self.install(module, handle, Interface::single(capability))
    }

    /// Register every capability of `interface` for `module` as one unit.
    ///
    /// A module already present must be installed again with the same handle.
    pub fn install(
        &mut self,
        module: Address,
        handle: Arc<dyn Module>,
        interface: Interface,
    ) -> Result<()> {
        interface.validate()?;
        if let Some(existing) = self.modules.get(&module) {
            if !Arc::ptr_eq(&existing.handle, &handle) {
                return Err(ValidationError::HandleMismatch(module).into());
            }
        }
        self.check_collisions(&interface, None)?;

        for capability in &interface.capabilities {
            self.index(module, capability);
        }
        self.modules
            .entry(module)
            .or_insert_with(|| ModuleEntry {
                handle,
                capabilities: Vec::new(),
            })
            .capabilities
            .extend(interface.capabilities);

        #[cfg(feature = "tracing")]
        tracing::debug!(%module, modules = self.modules.len(), "module registered");
        Ok(())
    }

    /// Mark `capability` as supported without a module implementing it.
    pub fn declare_capability(&mut self, capability: CapabilityId) -> Result<()> {
        if capability.is_invalid() {
            return Err(ValidationError::InvalidCapability(capability).into());
        }
        self.declared.insert(capability);

        #[cfg(feature = "tracing")]
        tracing::debug!(%capability, "capability declared");
        Ok(())
    }

    /// Remove `module` and everything it contributed.
    ///
    /// The relative order of the remaining modules is kept.
    pub fn unregister(&mut self, module: Address) -> Result<ModuleEntry> {
        let entry = self
            .modules
            .shift_remove(&module)
            .ok_or(ExtendableError::NotFound(module))?;
        self.unindex(&entry);

        #[cfg(feature = "tracing")]
        tracing::debug!(%module, modules = self.modules.len(), "module unregistered");
        Ok(entry)
    }

    /// Swap `old` for `new` at the same position, as one unit.
    ///
    /// `new` may not collide with any module other than `old`, and `policy`
    /// must accept the change of interface.
    pub fn replace(
        &mut self,
        old: Address,
        new: Address,
        handle: Arc<dyn Module>,
        interface: Interface,
        policy: &dyn CompatibilityPolicy,
    ) -> Result<()> {
        let position = self
            .modules
            .get_index_of(&old)
            .ok_or(ExtendableError::NotFound(old))?;
        interface.validate()?;
        if new != old {
            if let Some(existing) = self.modules.get(&new) {
                let capability = existing
                    .capabilities
                    .first()
                    .map(|c| c.id)
                    .unwrap_or(CapabilityId::INVALID);
                return Err(CollisionError::Capability {
                    capability,
                    owner: new,
                }
                .into());
            }
        }
        self.check_collisions(&interface, Some(old))?;
        let current = self.modules[position].interface();
        policy.check(old, &current, new, &interface)?;

        let previous = self.modules[position].clone();
        self.unindex(&previous);
        for capability in &interface.capabilities {
            self.index(new, capability);
        }
        let entry = ModuleEntry {
            handle,
            capabilities: interface.capabilities,
        };
        if new == old {
            self.modules[position] = entry;
        } else {
            self.modules.shift_remove_index(position);
            self.modules.shift_insert(position, new, entry);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(%old, %new, position, "module replaced");
        Ok(())
    }

    fn check_collisions(&self, interface: &Interface, replacing: Option<Address>) -> Result<()> {
        let foreign = |owner: &Address| Some(*owner) != replacing;
        for capability in &interface.capabilities {
            if let Some(owner) = self.capabilities.get(&capability.id).filter(|o| foreign(o)) {
                return Err(CollisionError::Capability {
                    capability: capability.id,
                    owner: *owner,
                }
                .into());
            }
            for signature in capability.signatures() {
                if let Some(owner) = self.signatures.get(&signature).filter(|o| foreign(o)) {
                    return Err(CollisionError::Signature {
                        signature,
                        owner: *owner,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn index(&mut self, module: Address, capability: &CapabilityDecl) {
        self.capabilities.insert(capability.id, module);
        for signature in capability.signatures() {
            self.signatures.insert(signature, module);
        }
    }

    fn unindex(&mut self, entry: &ModuleEntry) {
        for capability in &entry.capabilities {
            self.capabilities.remove(&capability.id);
        }
        for signature in entry.signatures() {
            self.signatures.remove(&signature);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Handle of the module owning `signature`.
    pub fn resolve(&self, signature: Signature) -> Option<Arc<dyn Module>> {
        let owner = self.signatures.get(&signature)?;
        self.modules.get(owner).map(|entry| Arc::clone(&entry.handle))
    }

    /// Address of the module owning `signature`.
    pub fn owner_of(&self, signature: Signature) -> Option<Address> {
        self.signatures.get(&signature).copied()
    }

    /// Address of the module owning `capability`.
    pub fn capability_owner(&self, capability: CapabilityId) -> Option<Address> {
        self.capabilities.get(&capability).copied()
    }

    /// The entry registered for `module`.
    pub fn entry(&self, module: Address) -> Option<&ModuleEntry> {
        self.modules.get(&module)
    }

    /// Whether `module` is registered.
    pub fn contains(&self, module: Address) -> bool {
        self.modules.contains_key(&module)
    }

    /// Whether some module currently implements `capability`.
    ///
    /// Declared capabilities count as well. [`CapabilityId::INVALID`] is
    /// never supported.
    pub fn supports(&self, capability: CapabilityId) -> bool {
        !capability.is_invalid()
            && (self.capabilities.contains_key(&capability) || self.declared.contains(&capability))
    }

    /// Capabilities declared without a module, in declaration order.
    pub fn declared_capabilities(&self) -> Vec<CapabilityId> {
        self.declared.iter().copied().collect()
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module addresses in insertion order.
    pub fn module_addresses(&self) -> Vec<Address> {
        self.modules.keys().copied().collect()
    }

    /// Capability ids, module by module, in insertion order.
    pub fn capability_ids(&self) -> Vec<CapabilityId> {
        self.modules
            .values()
            .flat_map(|entry| entry.capabilities.iter().map(|c| c.id))
            .collect()
    }

    /// Signatures, module by module, in insertion order.
    pub fn signatures(&self) -> Vec<Signature> {
        self.modules
            .values()
            .flat_map(ModuleEntry::signatures)
            .collect()
    }

    /// Per-module signature lists, parallel to [`Registry::module_addresses`].
    pub fn signatures_by_module(&self) -> Vec<Vec<Signature>> {
        self.modules
            .values()
            .map(|entry| entry.signatures().collect())
            .collect()
    }

    /// Per-module capability lists, parallel to [`Registry::module_addresses`].
    pub fn capabilities_by_module(&self) -> Vec<Vec<CapabilityId>> {
        self.modules
            .values()
            .map(|entry| entry.capabilities.iter().map(|c| c.id).collect())
            .collect()
    }

    /// The composed `interface IExtended { ... }` description.
    pub fn describe(&self) -> String {
        render_composed(self.functions())
    }

    fn functions(&self) -> impl Iterator<Item = &FunctionDecl> + '_ {
        self.modules
            .values()
            .flat_map(|entry| entry.capabilities.iter().flat_map(|c| c.functions.iter()))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.modules.iter()).finish()
    }
}

impl PartialEq for Registry {
    /// Same modules, in the same order, with the same registered surface.
    fn eq(&self, other: &Self) -> bool {
        self.modules.len() == other.modules.len()
            && self
                .modules
                .iter()
                .zip(&other.modules)
                .all(|((a, ea), (b, eb))| a == b && ea.capabilities == eb.capabilities)
            && self.signatures == other.signatures
            && self.capabilities == other.capabilities
            && self.declared == other.declared
    }
}
