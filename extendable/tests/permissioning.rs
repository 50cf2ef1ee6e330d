mod common;

use common::{Fixture, extend_call, is_not_owner};
use extendable::testing::MockModule;
use extendable::{
    Address, AuthorizationError, Call, ExtendableError, PermissioningModule, ValidationError,
};

fn owner(fixture: &Fixture) -> Address {
    fixture
        .call(&Call::named("owner()"))
        .unwrap()
        .into_typed()
        .unwrap()
}

fn update_owner(new_owner: Address) -> Call {
    Call::named("updateOwner(address)").with_arg(new_owner)
}

#[test]
fn test_deployer_owns_the_object() {
    let fixture = Fixture::new();
    fixture.install(PermissioningModule::new());
    assert_eq!(owner(&fixture), fixture.admin);
}

#[test]
fn test_init_after_deployment_fails() {
    let fixture = Fixture::new();
    fixture.install(PermissioningModule::new());
    let err = fixture
        .call_as(fixture.stranger, &Call::named("init()"))
        .unwrap_err();
    assert!(matches!(
        err,
        ExtendableError::Authorization(AuthorizationError::AlreadyInitialized)
    ));
    assert_eq!(owner(&fixture), fixture.admin);
}

#[test]
fn test_update_owner_transfers_control() {
    let fixture = Fixture::new();
    fixture.install(PermissioningModule::new());

    fixture.call(&update_owner(fixture.stranger)).unwrap();
    assert_eq!(owner(&fixture), fixture.stranger);

    // The previous owner lost control of the registry.
    let mock = fixture.world.deploy_module(MockModule);
    assert!(is_not_owner(&fixture.call(&extend_call(mock)).unwrap_err()));
    fixture
        .call_as(fixture.stranger, &extend_call(mock))
        .unwrap();
}

#[test]
fn test_update_owner_requires_owner() {
    let fixture = Fixture::new();
    fixture.install(PermissioningModule::new());
    let err = fixture
        .call_as(fixture.stranger, &update_owner(fixture.stranger))
        .unwrap_err();
    assert!(is_not_owner(&err));
    assert_eq!(owner(&fixture), fixture.admin);
}

#[test]
fn test_update_owner_rejects_null_address() {
    let fixture = Fixture::new();
    fixture.install(PermissioningModule::new());
    let err = fixture.call(&update_owner(Address::ZERO)).unwrap_err();
    assert!(matches!(
        err,
        ExtendableError::Validation(ValidationError::NullOwner)
    ));
    assert_eq!(owner(&fixture), fixture.admin);
}

#[test]
fn test_renounce_is_irreversible() {
    let fixture = Fixture::new();
    fixture.install(PermissioningModule::new());

    fixture.call(&Call::named("renounceOwnership()")).unwrap();
    assert_eq!(owner(&fixture), Address::RENOUNCED);

    let mock = fixture.world.deploy_module(MockModule);
    let err = fixture.call(&extend_call(mock)).unwrap_err();
    assert!(matches!(
        err,
        ExtendableError::Authorization(AuthorizationError::Renounced)
    ));
    assert!(fixture.call(&update_owner(fixture.admin)).is_err());
    assert!(fixture.call(&Call::named("init()")).is_err());
}

#[test]
fn test_renounce_requires_owner() {
    let fixture = Fixture::new();
    fixture.install(PermissioningModule::new());
    let err = fixture
        .call_as(fixture.stranger, &Call::named("renounceOwnership()"))
        .unwrap_err();
    assert!(is_not_owner(&err));
}
