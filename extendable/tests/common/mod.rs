#![allow(dead_code)]

use extendable::{
    Address, Call, ExtendModule, ExtendableError, GuardTiers, Module, Result, Value, World,
};

// ============================================================================
// Calls
// ============================================================================

pub fn extend_call(module: Address) -> Call {
    Call::named("extend(address)").with_arg(module)
}

pub fn retract_call(module: Address) -> Call {
    Call::named("retract(address)").with_arg(module)
}

pub fn replace_call(old: Address, new: Address) -> Call {
    Call::named("replace(address,address)")
        .with_arg(old)
        .with_arg(new)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// ============================================================================
// Fixture
// ============================================================================

/// A world holding one object owned by `admin`, with EXTEND installed.
pub struct Fixture {
    pub world: World,
    pub admin: Address,
    pub stranger: Address,
    pub extend: Address,
    pub object: Address,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_world(World::new())
    }

    pub fn with_world(world: World) -> Self {
        init_tracing();
        let admin = world.account();
        let stranger = world.account();
        let extend = world.deploy_module(ExtendModule::new());
        let object = world
            .deploy_extendable(admin, extend)
            .expect("deploy extendable");
        Self {
            world,
            admin,
            stranger,
            extend,
            object,
        }
    }

    /// Call the object as `admin`.
    pub fn call(&self, call: &Call) -> Result<Value> {
        self.world.call(self.admin, self.object, call)
    }

    /// Call the object as `from`.
    pub fn call_as(&self, from: Address, call: &Call) -> Result<Value> {
        self.world.call(from, self.object, call)
    }

    /// Deploy `module` and extend the object with it.
    pub fn install(&self, module: impl Module) -> Address {
        let address = self.world.deploy_module(module);
        self.call(&extend_call(address)).expect("extend");
        address
    }

    pub fn modules(&self) -> Vec<Address> {
        self.call(&Call::named("moduleAddresses()"))
            .expect("moduleAddresses")
            .into_typed()
            .expect("address list")
    }

    pub fn describe(&self) -> String {
        self.call(&Call::named("currentInterface()"))
            .expect("currentInterface")
            .into_typed()
            .expect("text")
    }

    /// No tier held, no frame left, no hop in flight.
    pub fn assert_idle(&self) {
        let object = self.world.object(self.object).expect("object");
        assert_eq!(object.locked_tiers(), GuardTiers::empty());
        assert!(object.caller_stack().is_empty());
        assert_eq!(self.world.depth(), 0);
    }
}

pub fn is_not_owner(err: &ExtendableError) -> bool {
    matches!(
        err,
        ExtendableError::Authorization(extendable::AuthorizationError::NotOwner { .. })
    )
}
