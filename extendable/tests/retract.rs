mod common;

use common::{Fixture, is_not_owner, retract_call};
use extendable::testing::MockModule;
use extendable::{
    Call, ExtendableError, IntrospectionModule, PermissioningModule, RetractModule, Signature,
};

#[test]
fn test_retract_removes_module_and_its_signatures() {
    let fixture = Fixture::new();
    let retract = fixture.install(RetractModule::new());
    let mock = fixture.install(MockModule);
    fixture.call(&Call::named("test()")).unwrap();

    fixture.call(&retract_call(mock)).unwrap();

    assert_eq!(fixture.modules(), vec![fixture.extend, retract]);
    assert!(matches!(
        fixture.call(&Call::named("test()")).unwrap_err(),
        ExtendableError::NotImplemented(signature) if signature == Signature::of("test()")
    ));
    fixture.assert_idle();
}

#[test]
fn test_retract_keeps_relative_order() {
    let fixture = Fixture::new();
    let retract = fixture.install(RetractModule::new());
    let permissioning = fixture.install(PermissioningModule::new());
    let introspection = fixture.install(IntrospectionModule::new());
    let mock = fixture.install(MockModule);

    fixture.call(&retract_call(permissioning)).unwrap();
    assert_eq!(
        fixture.modules(),
        vec![fixture.extend, retract, introspection, mock]
    );
}

#[test]
fn test_retracted_module_can_be_installed_again() {
    let fixture = Fixture::new();
    fixture.install(RetractModule::new());
    let mock = fixture.install(MockModule);

    fixture.call(&retract_call(mock)).unwrap();
    fixture.call(&common::extend_call(mock)).unwrap();
    fixture.call(&Call::named("test()")).unwrap();
}

#[test]
fn test_retract_unknown_module_is_not_found() {
    let fixture = Fixture::new();
    fixture.install(RetractModule::new());
    let loose = fixture.world.deploy_module(MockModule);
    let before = fixture.modules();

    let err = fixture.call(&retract_call(loose)).unwrap_err();
    assert!(matches!(err, ExtendableError::NotFound(address) if address == loose));
    assert_eq!(fixture.modules(), before);
}

#[test]
fn test_tolerant_retract_ignores_unknown_module() {
    let fixture = Fixture::new();
    fixture.install(RetractModule::tolerant());
    let loose = fixture.world.deploy_module(MockModule);
    let before = fixture.modules();

    fixture.call(&retract_call(loose)).unwrap();
    assert_eq!(fixture.modules(), before);
}

#[test]
fn test_retract_requires_owner() {
    let fixture = Fixture::new();
    fixture.install(RetractModule::new());
    let mock = fixture.install(MockModule);

    let err = fixture
        .call_as(fixture.stranger, &retract_call(mock))
        .unwrap_err();
    assert!(is_not_owner(&err));
    fixture.call(&Call::named("test()")).unwrap();
}

#[test]
fn test_retracting_retract_disables_retraction() {
    let fixture = Fixture::new();
    let retract = fixture.install(RetractModule::new());
    let mock = fixture.install(MockModule);

    fixture.call(&retract_call(retract)).unwrap();
    assert!(matches!(
        fixture.call(&retract_call(mock)).unwrap_err(),
        ExtendableError::NotImplemented(_)
    ));
    assert_eq!(fixture.modules(), vec![fixture.extend, mock]);
}
