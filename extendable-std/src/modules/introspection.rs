//! The introspection module: capability negotiation.

use super::{Operation, operations};
use extendable_core::{
    Call, CapabilityDecl, CapabilityId, Context, ExtendableError, Interface, Module, Result, Value,
};

operations! {
    enum IntrospectionOp {
        SupportsCapability => ("supportsCapability(capability)", "fn supportsCapability(capability: CapabilityId) -> bool"),
        RegisterCapability => ("registerCapability(capability)", "fn registerCapability(capability: CapabilityId)"),
    }
}

/// Answers whether a capability is currently installed on the object.
///
/// `registerCapability(capability)` declares support for a capability no
/// module implements. Only the object itself may call it, so other modules
/// reach it through a self-call. [`CapabilityId::INVALID`] is never
/// supported and cannot be declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrospectionModule;

impl IntrospectionModule {
    /// Create the module.
    pub fn new() -> Self {
        Self
    }

    /// The INTROSPECTION capability.
    pub fn capability() -> CapabilityDecl {
        IntrospectionOp::capability()
    }

    /// Id of the INTROSPECTION capability.
    pub fn capability_id() -> CapabilityId {
        IntrospectionOp::capability_id()
    }
}

impl Module for IntrospectionModule {
    fn interface(&self) -> Interface {
        Interface::single(Self::capability())
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        match IntrospectionOp::resolve(call.signature) {
            Some(IntrospectionOp::SupportsCapability) => {
                let capability: CapabilityId = call.arg(0)?;
                ctx.with_registry(|r| Value::Bool(r.supports(capability)))
            }
            Some(IntrospectionOp::RegisterCapability) => {
                ctx.require_internal()?;
                let capability: CapabilityId = call.arg(0)?;
                ctx.with_registry_mut(|r| r.declare_capability(capability))?;

                #[cfg(feature = "tracing")]
                tracing::debug!(object = %ctx.this(), %capability, "capability declared");
                Ok(Value::Unit)
            }
            None => Err(ExtendableError::NotImplemented(call.signature)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extendable_core::Signature;

    #[test]
    fn test_interface_lists_every_operation() {
        let interface = IntrospectionModule.interface();
        assert_eq!(
            interface.signatures().collect::<Vec<_>>(),
            vec![
                Signature::of("supportsCapability(capability)"),
                Signature::of("registerCapability(capability)"),
            ]
        );
        assert_eq!(
            interface.render_functions(),
            "fn supportsCapability(capability: CapabilityId) -> bool;\n\
             fn registerCapability(capability: CapabilityId);\n"
        );
    }
}
