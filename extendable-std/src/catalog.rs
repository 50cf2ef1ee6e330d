//! Link-time module catalog.
//!
//! Modules submitted with [`register_module!`](crate::register_module) are
//! collected by `inventory` and can be deployed into a [`World`] in one go:
//!
//! ```rust,ignore
//! extendable_std::register_module!("permissioning", PermissioningModule::new());
//!
//! let world = World::new();
//! let addresses = world.deploy_registered();
//! let permissioning = addresses["permissioning"];
//! ```

use crate::world::World;
use extendable_core::{Address, Module};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A module submitted to the catalog.
pub struct ModuleRegistration {
    /// Name the module is deployed under.
    pub name: &'static str,
    /// Constructs a fresh instance.
    pub build: fn() -> Arc<dyn Module>,
}

inventory::collect!(ModuleRegistration);

/// Every registration, sorted by name.
pub fn registrations() -> Vec<&'static ModuleRegistration> {
    let mut registrations: Vec<_> = inventory::iter::<ModuleRegistration>().collect();
    registrations.sort_by_key(|registration| registration.name);
    registrations
}

/// Submit a module to the catalog under `name`.
#[macro_export]
macro_rules! register_module {
    ($name:expr, $module:expr) => {
        $crate::inventory::submit! {
            $crate::catalog::ModuleRegistration {
                name: $name,
                build: || -> ::std::sync::Arc<dyn $crate::extendable_core::Module> {
                    ::std::sync::Arc::new($module)
                },
            }
        }
    };
}

impl World {
    /// Deploy every catalogued module, returning name → address.
    ///
    /// Names registered more than once keep the last deployment.
    pub fn deploy_registered(&self) -> BTreeMap<&'static str, Address> {
        registrations()
            .into_iter()
            .map(|registration| {
                let address = self.deploy_shared((registration.build)());

                #[cfg(feature = "tracing")]
                tracing::debug!(name = registration.name, %address, "catalogued module deployed");
                (registration.name, address)
            })
            .collect()
    }
}
