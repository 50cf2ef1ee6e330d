//! # Call Model
//!
//! The in-memory shape of an invocation: a [`Signature`] plus positional
//! [`Value`] arguments, and a [`Value`] result. How calls travel on a wire is
//! left to whoever embeds the core.
//!
//! [`FromValue`] and [`IntoValue`] convert between `Value` and plain Rust
//! types so modules can work with typed arguments:
//!
//! ```rust,ignore
//! let module: Address = call.arg(0)?;
//! Ok(true.into_value())
//! ```

use crate::error::{Result, ValidationError};
use crate::guard::GuardTier;
use crate::id::{Address, CapabilityId, Signature};

/// An argument or result value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// No value.
    #[default]
    Unit,
    /// A boolean.
    Bool(bool),
    /// An unsigned integer.
    U64(u64),
    /// One identity.
    Address(Address),
    /// An ordered list of identities.
    Addresses(Vec<Address>),
    /// One signature.
    Signature(Signature),
    /// An ordered list of signatures.
    Signatures(Vec<Signature>),
    /// One capability id.
    Capability(CapabilityId),
    /// An ordered list of capability ids.
    Capabilities(Vec<CapabilityId>),
    /// Free-form text.
    Text(String),
}

impl Value {
    /// Short name of the variant, used in argument errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::U64(_) => "u64",
            Value::Address(_) => "address",
            Value::Addresses(_) => "address list",
            Value::Signature(_) => "signature",
            Value::Signatures(_) => "signature list",
            Value::Capability(_) => "capability",
            Value::Capabilities(_) => "capability list",
            Value::Text(_) => "text",
        }
    }

    /// Convert into a typed value.
    pub fn into_typed<T: FromValue>(self) -> Option<T> {
        T::from_value(self)
    }
}

/// A single invocation: which operation, with which arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// The operation being invoked.
    pub signature: Signature,
    /// Positional arguments.
    pub args: Vec<Value>,
}

impl Call {
    /// Create a call without arguments.
    pub fn new(signature: Signature) -> Self {
        Self {
            signature,
            args: Vec::new(),
        }
    }

    /// Create a call to the operation with canonical name `name`.
    pub fn named(name: &str) -> Self {
        Self::new(Signature::of(name))
    }

    /// Append an argument.
    pub fn with_arg(mut self, value: impl IntoValue) -> Self {
        self.args.push(value.into_value());
        self
    }

    /// Decode argument `index` as `T`.
    pub fn arg<T: FromValue>(&self, index: usize) -> Result<T> {
        self.args
            .get(index)
            .cloned()
            .and_then(T::from_value)
            .ok_or_else(|| {
                ValidationError::BadArgument {
                    index,
                    expected: T::KIND,
                }
                .into()
            })
    }
}

/// Join an operation name and its parameter types into the canonical form
/// signatures are derived from.
///
/// `canonical_name("replace", &["address", "address"])` is
/// `"replace(address,address)"`.
pub fn canonical_name(name: &str, params: &[&str]) -> String {
    format!("{}({})", name, params.join(","))
}

/// Conversion from a [`Value`].
pub trait FromValue: Sized {
    /// Kind name reported when the conversion fails.
    const KIND: &'static str;

    /// Type name used inside canonical operation names, as in `extend(address)`.
    const CANONICAL: &'static str;

    /// Attempt the conversion.
    fn from_value(value: Value) -> Option<Self>;
}

/// Conversion into a [`Value`].
pub trait IntoValue {
    /// Perform the conversion.
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    const KIND: &'static str = "value";
    const CANONICAL: &'static str = "value";

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

/// Macro to implement both conversions for a type carried by one variant.
macro_rules! impl_value_conversions {
    ($($ty:ty => $variant:ident, $kind:literal, $canonical:literal;)+) => {
        $(
            impl FromValue for $ty {
                const KIND: &'static str = $kind;
                const CANONICAL: &'static str = $canonical;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )+
    };
}

impl_value_conversions! {
    bool => Bool, "bool", "bool";
    u64 => U64, "u64", "u64";
    Address => Address, "address", "address";
    Vec<Address> => Addresses, "address list", "address[]";
    Signature => Signature, "signature", "signature";
    Vec<Signature> => Signatures, "signature list", "signature[]";
    CapabilityId => Capability, "capability", "capability";
    Vec<CapabilityId> => Capabilities, "capability list", "capability[]";
    String => Text, "text", "string";
}

impl FromValue for () {
    const KIND: &'static str = "unit";
    const CANONICAL: &'static str = "unit";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Unit => Some(()),
            _ => None,
        }
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Unit
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_owned())
    }
}

// Tiers travel as their lowercase name.
impl FromValue for GuardTier {
    const KIND: &'static str = "guard tier";
    const CANONICAL: &'static str = "tier";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(name) => GuardTier::ALL.into_iter().find(|tier| tier.as_str() == name),
            _ => None,
        }
    }
}

impl IntoValue for GuardTier {
    fn into_value(self) -> Value {
        Value::Text(self.as_str().to_owned())
    }
}
