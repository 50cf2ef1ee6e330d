mod common;

use common::{Fixture, extend_call};
use extendable::testing::MockReentrancyModule;
use extendable::{
    Address, Call, CapabilityDecl, Context, ExtendableError, FunctionDecl, GuardTier, GuardTiers,
    Interface, Module, Result, Value, World,
};

struct Pair {
    fixture: Fixture,
    a: Address,
    b: Address,
}

impl Pair {
    fn new() -> Self {
        let fixture = Fixture::with_world(World::builder().max_call_depth(32).build());
        fixture.install(MockReentrancyModule);

        let b = fixture
            .world
            .deploy_extendable(fixture.admin, fixture.extend)
            .unwrap();
        let mock = fixture.world.deploy_module(MockReentrancyModule);
        fixture
            .world
            .call(fixture.admin, b, &extend_call(mock))
            .unwrap();

        let a = fixture.object;
        Self { fixture, a, b }
    }

    fn call(&self, call: &Call) -> Result<Value> {
        self.fixture.call(call)
    }

    fn assert_idle(&self) {
        self.fixture.assert_idle();
        let b = self.fixture.world.object(self.b).unwrap();
        assert_eq!(b.locked_tiers(), GuardTiers::empty());
        assert!(b.caller_stack().is_empty());
    }
}

/// Tier the nested `inner` entry is refused under, if any, while `held` is
/// locked on the same object.
fn refused(held: GuardTier, inner: GuardTier, from_self: bool) -> Option<GuardTier> {
    let refuse = match inner {
        GuardTier::Atomic => held == GuardTier::Atomic,
        GuardTier::Intra => !from_self,
        GuardTier::Strict => true,
    };
    refuse.then_some(inner)
}

fn outcome(result: Result<Value>) -> Option<GuardTier> {
    match result {
        Ok(value) => {
            assert_eq!(value, Value::Unit);
            None
        }
        Err(err) => Some(
            err.reentrancy_tier()
                .unwrap_or_else(|| panic!("unexpected error: {err}")),
        ),
    }
}

#[test]
fn test_single_guarded_call_succeeds() {
    let pair = Pair::new();
    for tier in GuardTier::ALL {
        pair.call(&MockReentrancyModule::single(tier)).unwrap();
        pair.assert_idle();
    }
}

#[test]
fn test_guards_are_per_object() {
    let pair = Pair::new();
    for outer in GuardTier::ALL {
        for inner in GuardTier::ALL {
            pair.call(&MockReentrancyModule::relay(outer, pair.b, inner))
                .unwrap();
            pair.assert_idle();
        }
    }
}

#[test]
fn test_self_reentry_matrix() {
    let pair = Pair::new();
    for outer in GuardTier::ALL {
        for inner in GuardTier::ALL {
            let result = pair.call(&MockReentrancyModule::relay(outer, pair.a, inner));
            assert_eq!(
                outcome(result),
                refused(outer, inner, true),
                "outer {outer}, inner {inner}"
            );
            pair.assert_idle();
        }
    }
}

#[test]
fn test_reentry_through_other_object_matrix() {
    let pair = Pair::new();
    for outer in GuardTier::ALL {
        for inner in GuardTier::ALL {
            let result = pair.call(&MockReentrancyModule::bounce(outer, pair.b, inner));
            assert_eq!(
                outcome(result),
                refused(outer, inner, false),
                "outer {outer}, inner {inner}"
            );
            pair.assert_idle();
        }
    }
}

#[test]
fn test_mutual_recursion_is_refused_for_every_tier() {
    let pair = Pair::new();
    for tier in GuardTier::ALL {
        let result = pair.call(&MockReentrancyModule::recurse(tier, pair.b));
        assert_eq!(outcome(result), Some(tier));
        pair.assert_idle();
    }
}

#[test]
fn test_strict_refuses_any_nested_guard() {
    let pair = Pair::new();
    let err = pair
        .call(&MockReentrancyModule::relay(
            GuardTier::Strict,
            pair.a,
            GuardTier::Strict,
        ))
        .unwrap_err();
    assert_eq!(err.to_string(), "strict re-entrancy disallowed");
    pair.assert_idle();

    // Released: the same call shape succeeds unguarded afterwards.
    pair.call(&MockReentrancyModule::single(GuardTier::Strict))
        .unwrap();
    pair.call(&MockReentrancyModule::forward(pair.a, GuardTier::Strict))
        .unwrap();
    pair.assert_idle();
}

#[test]
fn test_self_recursion_under_atomic_and_strict_is_refused() {
    let pair = Pair::new();
    for tier in [GuardTier::Atomic, GuardTier::Strict] {
        let result = pair.call(&MockReentrancyModule::recurse(tier, pair.a));
        assert_eq!(outcome(result), Some(tier));
        pair.assert_idle();
    }
}

#[test]
fn test_self_recursion_under_intra_hits_depth_budget() {
    let pair = Pair::new();
    let err = pair
        .call(&MockReentrancyModule::recurse(GuardTier::Intra, pair.a))
        .unwrap_err();
    assert!(matches!(err, ExtendableError::BudgetExhausted { limit: 32 }));
    pair.assert_idle();
}

/// Holds an intra lock and an atomic lock that are released oldest first.
struct OverlappingLocks;

impl Module for OverlappingLocks {
    fn interface(&self) -> Interface {
        Interface::single(CapabilityDecl::from_functions([FunctionDecl::new(
            "overlap()",
            "fn overlap()",
        )]))
    }

    fn invoke(&self, ctx: &Context<'_>, _call: &Call) -> Result<Value> {
        let _locks = (ctx.enter(GuardTier::Intra)?, ctx.enter(GuardTier::Atomic)?);
        Ok(Value::Unit)
    }
}

#[test]
fn test_locks_released_out_of_order_leave_object_unlocked() {
    let pair = Pair::new();
    pair.fixture.install(OverlappingLocks);

    assert_eq!(pair.call(&Call::named("overlap()")).unwrap(), Value::Unit);
    pair.assert_idle();
    assert_eq!(
        pair.call(&MockReentrancyModule::single(GuardTier::Strict))
            .unwrap(),
        Value::Unit
    );
    assert_eq!(pair.call(&Call::named("overlap()")).unwrap(), Value::Unit);
    pair.assert_idle();
}
