//! Standard modules.
//!
//! Each module implements exactly one capability:
//!
//! | Module                  | Operations                                                                      |
//! |-------------------------|---------------------------------------------------------------------------------|
//! | [`ExtendModule`]        | `extend`, `currentInterface`, `capabilityIds`, `signatures`, `moduleAddresses`  |
//! | [`PermissioningModule`] | `init`, `updateOwner`, `renounceOwnership`, `owner`                             |
//! | [`RetractModule`]       | `retract`                                                                       |
//! | [`ReplaceModule`]       | `replace`                                                                       |
//! | [`IntrospectionModule`] | `supportsCapability`, `registerCapability` (internal only)                      |

use extendable_core::{CapabilityDecl, CapabilityId, FunctionDecl, Signature};

/// The fixed operation set of a module.
pub(crate) trait Operation: Copy + Sized + 'static {
    /// Every operation, in declaration order.
    const ALL: &'static [Self];

    /// Canonical name the signature is derived from.
    fn name(self) -> &'static str;

    /// Human-readable declaration line.
    fn declaration(self) -> &'static str;

    fn signature(self) -> Signature {
        Signature::of(self.name())
    }

    fn resolve(signature: Signature) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.signature() == signature)
    }

    fn capability() -> CapabilityDecl {
        CapabilityDecl::from_functions(
            Self::ALL
                .iter()
                .map(|op| FunctionDecl::new(op.name(), op.declaration())),
        )
    }

    fn capability_id() -> CapabilityId {
        Self::capability().id
    }
}

/// Declare an operation enum and its [`Operation`] impl.
macro_rules! operations {
    (
        $(#[$meta:meta])*
        enum $name:ident {
            $($variant:ident => ($canonical:literal, $declaration:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub(crate) enum $name {
            $($variant),+
        }

        impl $crate::modules::Operation for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $canonical),+
                }
            }

            fn declaration(self) -> &'static str {
                match self {
                    $($name::$variant => $declaration),+
                }
            }
        }
    };
}

pub(crate) use operations;

pub mod extend;
pub mod introspection;
pub mod permissioning;
pub mod replace;
pub mod retract;

pub use extend::ExtendModule;
pub use introspection::IntrospectionModule;
pub use permissioning::PermissioningModule;
pub use replace::ReplaceModule;
pub use retract::RetractModule;
