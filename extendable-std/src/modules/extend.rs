//! The extend module: grows an object and describes what it currently is.

use super::{Operation, operations};
use extendable_core::{
    Address, Call, CapabilityDecl, CapabilityId, Context, ExtendableError, Interface, Module,
    Result, Value,
};

operations! {
    enum ExtendOp {
        Extend => ("extend(address)", "fn extend(module: Address)"),
        CurrentInterface => ("currentInterface()", "fn currentInterface() -> String"),
        CapabilityIds => ("capabilityIds()", "fn capabilityIds() -> Vec<CapabilityId>"),
        Signatures => ("signatures()", "fn signatures() -> Vec<Signature>"),
        ModuleAddresses => ("moduleAddresses()", "fn moduleAddresses() -> Vec<Address>"),
    }
}

/// Installs modules and answers registry queries.
///
/// `extend(module)` is owner-only. It loads `module` through the host,
/// validates its interface and installs every capability as one unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendModule;

impl ExtendModule {
    /// Create the module.
    pub fn new() -> Self {
        Self
    }

    /// The EXTEND capability.
    pub fn capability() -> CapabilityDecl {
        ExtendOp::capability()
    }

    /// Id of the EXTEND capability.
    pub fn capability_id() -> CapabilityId {
        ExtendOp::capability_id()
    }

    fn extend(&self, ctx: &Context<'_>, module: Address) -> Result<()> {
        ctx.require_owner()?;
        let handle = ctx.load_module(module)?;
        let interface = handle.interface();
        ctx.with_registry_mut(|registry| registry.install(module, handle, interface))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(object = %ctx.this(), %module, "extended");
        Ok(())
    }
}

impl Module for ExtendModule {
    fn interface(&self) -> Interface {
        Interface::single(Self::capability())
    }

    fn invoke(&self, ctx: &Context<'_>, call: &Call) -> Result<Value> {
        let op =
            ExtendOp::resolve(call.signature).ok_or(ExtendableError::NotImplemented(call.signature))?;
        match op {
            ExtendOp::Extend => self.extend(ctx, call.arg(0)?).map(|()| Value::Unit),
            ExtendOp::CurrentInterface => ctx.with_registry(|r| Value::Text(r.describe())),
            ExtendOp::CapabilityIds => ctx.with_registry(|r| Value::Capabilities(r.capability_ids())),
            ExtendOp::Signatures => ctx.with_registry(|r| Value::Signatures(r.signatures())),
            ExtendOp::ModuleAddresses => {
                ctx.with_registry(|r| Value::Addresses(r.module_addresses()))
            }
        }
    }
}
