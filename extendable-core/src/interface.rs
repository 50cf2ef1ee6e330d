//! # Interface Declarations
//!
//! What a module says it implements: an ordered list of capabilities, each
//! grouping one or more functions. Declarations carry a human-readable line
//! used to render the composed interface of an object:
//!
//! ```text
//! interface IExtended {
//! fn extend(module: Address);
//! fn currentInterface() -> String;
//! }
//! ```

use crate::error::ValidationError;
use crate::id::{CapabilityId, Signature};
use std::borrow::Cow;
use std::collections::HashSet;

/// Name used when rendering the composed interface of an object.
pub const COMPOSED_INTERFACE_NAME: &str = "IExtended";

/// One operation and its human-readable declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionDecl {
    /// The operation's signature.
    pub signature: Signature,
    /// Declaration line, without trailing `;`.
    pub declaration: Cow<'static, str>,
}

impl FunctionDecl {
    /// Declare a function from its canonical name and declaration line.
    ///
    /// `name` is hashed into the signature (`"extend(address)"`), while
    /// `declaration` is only used for rendering.
    pub fn new(name: &str, declaration: impl Into<Cow<'static, str>>) -> Self {
        Self {
            signature: Signature::of(name),
            declaration: declaration.into(),
        }
    }

    /// Declare a function with an explicit signature.
    pub fn with_signature(signature: Signature, declaration: impl Into<Cow<'static, str>>) -> Self {
        Self {
            signature,
            declaration: declaration.into(),
        }
    }
}

/// A capability: one id grouping the functions that must be managed together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityDecl {
    /// The capability id.
    pub id: CapabilityId,
    /// Functions in declaration order.
    pub functions: Vec<FunctionDecl>,
}

impl CapabilityDecl {
    /// Group functions under the XOR of their signatures.
    pub fn from_functions(functions: impl IntoIterator<Item = FunctionDecl>) -> Self {
        let functions: Vec<_> = functions.into_iter().collect();
        let id = CapabilityId::from_signatures(functions.iter().map(|f| &f.signature));
        Self { id, functions }
    }

    /// Group functions under an explicit id.
    pub fn with_id(id: CapabilityId, functions: impl IntoIterator<Item = FunctionDecl>) -> Self {
        Self {
            id,
            functions: functions.into_iter().collect(),
        }
    }

    /// Signatures in declaration order.
    pub fn signatures(&self) -> impl Iterator<Item = Signature> + '_ {
        self.functions.iter().map(|f| f.signature)
    }
}

/// Everything a module implements, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Interface {
    /// Declared capabilities.
    pub capabilities: Vec<CapabilityDecl>,
}

impl Interface {
    /// An interface with a single capability.
    pub fn single(capability: CapabilityDecl) -> Self {
        Self {
            capabilities: vec![capability],
        }
    }

    /// Build from any list of capabilities.
    pub fn new(capabilities: impl IntoIterator<Item = CapabilityDecl>) -> Self {
        Self {
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// Capability ids in declaration order.
    pub fn capability_ids(&self) -> impl Iterator<Item = CapabilityId> + '_ {
        self.capabilities.iter().map(|c| c.id)
    }

    /// Every signature, capability by capability.
    pub fn signatures(&self) -> impl Iterator<Item = Signature> + '_ {
        self.capabilities.iter().flat_map(|c| c.signatures())
    }

    /// Every function declaration, capability by capability.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> + '_ {
        self.capabilities.iter().flat_map(|c| c.functions.iter())
    }

    /// Whether the interface declares `capability`.
    pub fn declares(&self, capability: CapabilityId) -> bool {
        self.capabilities.iter().any(|c| c.id == capability)
    }

    /// Whether both interfaces expose the same capabilities with the same
    /// signatures, in the same order.
    pub fn same_surface(&self, other: &Interface) -> bool {
        self.capabilities.len() == other.capabilities.len()
            && self
                .capabilities
                .iter()
                .zip(&other.capabilities)
                .all(|(a, b)| a.id == b.id && a.signatures().eq(b.signatures()))
    }

    /// Check the declaration-level invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.capabilities.is_empty() {
            return Err(ValidationError::EmptyInterface);
        }
        let mut capabilities = HashSet::new();
        let mut signatures = HashSet::new();
        for capability in &self.capabilities {
            if capability.id.is_invalid() {
                return Err(ValidationError::InvalidCapability(capability.id));
            }
            if capability.functions.is_empty() {
                return Err(ValidationError::EmptyCapability(capability.id));
            }
            if !capabilities.insert(capability.id) {
                return Err(ValidationError::DuplicateCapability(capability.id));
            }
            for signature in capability.signatures() {
                if !signatures.insert(signature) {
                    return Err(ValidationError::DuplicateSignature(signature));
                }
            }
        }
        Ok(())
    }

    /// Declarations, one per line, each terminated by `;`.
    pub fn render_functions(&self) -> String {
        render_functions(self.functions())
    }
}

/// Render declarations one per line, each terminated by `;`.
pub fn render_functions<'a>(functions: impl IntoIterator<Item = &'a FunctionDecl>) -> String {
    let mut out = String::new();
    for function in functions {
        out.push_str(&function.declaration);
        out.push_str(";\n");
    }
    out
}

/// Wrap rendered declarations into the composed `interface IExtended { ... }` form.
pub fn render_composed<'a>(functions: impl IntoIterator<Item = &'a FunctionDecl>) -> String {
    format!(
        "interface {COMPOSED_INTERFACE_NAME} {{\n{}}}",
        render_functions(functions)
    )
}
