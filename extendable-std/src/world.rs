//! # In-Process Host
//!
//! [`World`] is a single-threaded [`Host`]: it deploys modules and objects at
//! fresh addresses, hands out plain account identities, routes calls between
//! objects and bounds how deep one external invocation may nest.
//!
//! ```rust,ignore
//! let world = World::new();
//! let admin = world.account();
//! let extend = world.deploy_module(ExtendModule::new());
//! let object = world.deploy_extendable(admin, extend)?;
//!
//! let permissioning = world.deploy_module(PermissioningModule::new());
//! world.call(admin, object, &Call::named("extend(address)").with_arg(permissioning))?;
//! ```

use extendable_core::{
    Address, Call, Extendable, ExtendableError, Frame, Hop, Host, Module, ModuleLoader, Result,
    ValidationError, Value,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

/// Default bound on nested dispatch within one external invocation.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

/// Configuration for a [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldConfig {
    /// Maximum number of nested hops in one external invocation.
    pub max_call_depth: usize,
    /// Numeric value of the first address handed out.
    pub address_seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            address_seed: 0x1000,
        }
    }
}

/// Builder for constructing a [`World`].
#[derive(Debug, Clone, Default)]
pub struct WorldBuilder {
    config: WorldConfig,
}

impl WorldBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound nested dispatch to `depth` hops.
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.config.max_call_depth = depth;
        self
    }

    /// Start handing out addresses from `seed`.
    pub fn address_seed(mut self, seed: u64) -> Self {
        self.config.address_seed = seed;
        self
    }

    /// Build the world.
    pub fn build(self) -> World {
        World {
            config: self.config,
            next_address: Cell::new(self.config.address_seed),
            depth: Cell::new(0),
            modules: RefCell::new(HashMap::new()),
            objects: RefCell::new(HashMap::new()),
        }
    }
}

/// An in-process host for extendable objects.
pub struct World {
    config: WorldConfig,
    next_address: Cell<u64>,
    depth: Cell<usize>,
    modules: RefCell<HashMap<Address, Arc<dyn Module>>>,
    objects: RefCell<HashMap<Address, Rc<Extendable>>>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// A world with the default configuration.
    pub fn new() -> Self {
        WorldBuilder::new().build()
    }

    /// Start configuring a world.
    pub fn builder() -> WorldBuilder {
        WorldBuilder::new()
    }

    /// The active configuration.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    fn allocate(&self) -> Address {
        let value = self.next_address.get();
        self.next_address.set(value.wrapping_add(1));
        Address::from_low_u64(value)
    }

    // ========================================================================
    // Deployment
    // ========================================================================

    /// A fresh identity with no code behind it.
    pub fn account(&self) -> Address {
        self.allocate()
    }

    /// Deploy `module` at a fresh address.
    pub fn deploy_module(&self, module: impl Module) -> Address {
        self.deploy_shared(Arc::new(module))
    }

    /// Deploy an already shared module at a fresh address.
    pub fn deploy_shared(&self, module: Arc<dyn Module>) -> Address {
        let address = self.allocate();
        self.modules.borrow_mut().insert(address, module);

        #[cfg(feature = "tracing")]
        tracing::debug!(%address, "module deployed");
        address
    }

    /// Deploy an object owned by `deployer`, with the module at `extend`
    /// installed as its first entry.
    pub fn deploy_extendable(&self, deployer: Address, extend: Address) -> Result<Address> {
        let handle = self
            .load_module(extend)
            .ok_or(ValidationError::NotAModule(extend))?;
        let address = self.allocate();
        let object = Extendable::new(address, deployer, extend, handle)?;
        self.objects.borrow_mut().insert(address, Rc::new(object));
        Ok(address)
    }

    /// The object deployed at `address`.
    pub fn object(&self, address: Address) -> Option<Rc<Extendable>> {
        self.objects.borrow().get(&address).cloned()
    }

    /// Whether `address` holds a module.
    pub fn is_module(&self, address: Address) -> bool {
        self.modules.borrow().contains_key(&address)
    }

    // ========================================================================
    // Invocation
    // ========================================================================

    /// External entry: `from` calls `to`.
    pub fn call(&self, from: Address, to: Address, call: &Call) -> Result<Value> {
        self.route(Hop::external(from, to), call)
    }

    /// Current nesting depth. Zero between external invocations.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    fn route(&self, hop: Hop, call: &Call) -> Result<Value> {
        let object = self
            .object(hop.target)
            .ok_or(ValidationError::UnknownTarget(hop.target))?;
        let _depth = self.descend()?;
        let frame = Frame {
            caller: hop.caller,
            origin: hop.origin,
        };
        object.dispatch(self, frame, call)
    }

    fn descend(&self) -> Result<DepthGuard<'_>> {
        let depth = self.depth.get();
        if depth >= self.config.max_call_depth {
            #[cfg(feature = "tracing")]
            tracing::warn!(limit = self.config.max_call_depth, "call depth budget exhausted");
            return Err(ExtendableError::BudgetExhausted {
                limit: self.config.max_call_depth,
            });
        }
        self.depth.set(depth + 1);
        Ok(DepthGuard { depth: &self.depth })
    }
}

struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

impl ModuleLoader for World {
    fn load_module(&self, address: Address) -> Option<Arc<dyn Module>> {
        self.modules.borrow().get(&address).cloned()
    }
}

impl Host for World {
    fn call(&self, hop: Hop, call: &Call) -> Result<Value> {
        self.route(hop, call)
    }
}
