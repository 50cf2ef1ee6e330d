mod common;

use common::{Fixture, retract_call};
use extendable::testing::{MockModule, MockRegistrarModule};
use extendable::{
    AuthorizationError, Call, CapabilityId, ExtendModule, ExtendableError, IntrospectionModule,
    Module, RetractModule, ValidationError, Value,
};

fn declared() -> CapabilityId {
    CapabilityId::from(0x5ca1_ab1e_u32)
}

fn register_capability_call(capability: CapabilityId) -> Call {
    Call::named("registerCapability(capability)").with_arg(capability)
}

fn supports(fixture: &Fixture, capability: CapabilityId) -> bool {
    match fixture
        .call(&Call::named("supportsCapability(capability)").with_arg(capability))
        .unwrap()
    {
        Value::Bool(answer) => answer,
        other => panic!("expected bool, got {other:?}"),
    }
}

#[test]
fn test_installed_capabilities_are_supported() {
    let fixture = Fixture::new();
    fixture.install(IntrospectionModule::new());

    assert!(supports(&fixture, ExtendModule::capability_id()));
    assert!(supports(&fixture, IntrospectionModule::capability_id()));
    assert!(!supports(&fixture, MockModule::capability_id()));
}

#[test]
fn test_invalid_capability_is_never_supported() {
    let fixture = Fixture::new();
    fixture.install(IntrospectionModule::new());
    assert!(!supports(&fixture, CapabilityId::INVALID));
}

#[test]
fn test_support_follows_extend_and_retract() {
    let fixture = Fixture::new();
    fixture.install(IntrospectionModule::new());
    fixture.install(RetractModule::new());

    let mock = fixture.install(MockModule);
    assert!(supports(&fixture, MockModule::capability_id()));

    fixture.call(&retract_call(mock)).unwrap();
    assert!(!supports(&fixture, MockModule::capability_id()));
}

#[test]
fn test_capability_declared_through_self_call_is_supported() {
    let fixture = Fixture::new();
    fixture.install(IntrospectionModule::new());
    fixture.install(MockRegistrarModule);
    assert!(!supports(&fixture, declared()));

    fixture.call(&MockRegistrarModule::declare(declared())).unwrap();
    assert!(supports(&fixture, declared()));
    fixture.assert_idle();
}

#[test]
fn test_declared_capability_survives_retract() {
    let fixture = Fixture::new();
    fixture.install(IntrospectionModule::new());
    fixture.install(RetractModule::new());
    let registrar = fixture.install(MockRegistrarModule);

    fixture.call(&MockRegistrarModule::declare(declared())).unwrap();
    fixture.call(&retract_call(registrar)).unwrap();
    assert!(supports(&fixture, declared()));
    assert!(!supports(&fixture, MockRegistrarModule.interface().capabilities[0].id));
}

#[test]
fn test_register_capability_refuses_external_callers() {
    let fixture = Fixture::new();
    fixture.install(IntrospectionModule::new());

    for caller in [fixture.admin, fixture.stranger] {
        let err = fixture
            .call_as(caller, &register_capability_call(declared()))
            .unwrap_err();
        assert!(matches!(
            err,
            ExtendableError::Authorization(AuthorizationError::ExternalCaller { caller: c })
                if c == caller
        ));
    }
    assert!(!supports(&fixture, declared()));
    fixture.assert_idle();
}

#[test]
fn test_register_invalid_capability_rejected() {
    let fixture = Fixture::new();
    fixture.install(IntrospectionModule::new());
    fixture.install(MockRegistrarModule);

    let err = fixture
        .call(&MockRegistrarModule::declare(CapabilityId::INVALID))
        .unwrap_err();
    assert!(matches!(
        err,
        ExtendableError::Validation(ValidationError::InvalidCapability(id)) if id.is_invalid()
    ));
    assert!(!supports(&fixture, CapabilityId::INVALID));
    fixture.assert_idle();
}
