mod common;

use common::Fixture;
use extendable::testing::MockInternalModule;
use extendable::{AuthorizationError, Call, ExtendableError, Value};

#[test]
fn test_internal_function_reachable_from_the_object() {
    let fixture = Fixture::new();
    fixture.install(MockInternalModule);
    assert_eq!(
        fixture.call(&Call::named("callInternalFunction()")).unwrap(),
        Value::Unit
    );
    fixture.assert_idle();
}

#[test]
fn test_internal_function_refuses_external_callers() {
    let fixture = Fixture::new();
    fixture.install(MockInternalModule);

    for caller in [fixture.admin, fixture.stranger] {
        let err = fixture
            .call_as(caller, &Call::named("internalFunction()"))
            .unwrap_err();
        assert!(matches!(
            err,
            ExtendableError::Authorization(AuthorizationError::ExternalCaller { caller: c })
                if c == caller
        ));
        assert_eq!(
            err.to_string(),
            format!("external caller not allowed: {caller}")
        );
    }
    fixture.assert_idle();
}
