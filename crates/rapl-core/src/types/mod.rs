//! Scalar type registry.
//!
//! A type converts one wire scalar into a domain [`Value`] and back. Types are
//! looked up by the name a field mapping declares (`"integer"`, `"datetime"`, …).
//!
//! Registries are plain values so mappers can be handed an isolated one; the
//! process-wide registry in [`global`] is only written during start-up.

mod boolean;
mod datetime;
mod float;
mod global;
mod integer;
mod string;

use crate::{
    error::ErrorClass,
    value::{Value, WireValue},
};
use std::{any::TypeId, collections::HashMap, fmt};
use thiserror::Error as ThisError;

// re-exports
pub use boolean::BooleanType;
pub use datetime::DateTimeType;
pub use float::FloatType;
pub use global::{global, install_global};
pub use integer::IntegerType;
pub use string::StringType;

///
/// TypeError
///

#[derive(Debug, ThisError)]
pub enum TypeError {
    #[error("unknown type '{name}'")]
    UnknownType { name: String },

    #[error("type '{name}' already registered with a different implementation")]
    AlreadyRegistered { name: String },

    #[error("invalid value for type '{type_name}': {value}")]
    InvalidValue {
        type_name: &'static str,
        value: String,
    },

    #[error("type '{type_name}' cannot convert a {kind} domain value to the wire")]
    UnexpectedDomainValue {
        type_name: &'static str,
        kind: &'static str,
    },
}

impl TypeError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownType { .. } => ErrorClass::Unsupported,
            Self::AlreadyRegistered { .. } => ErrorClass::Conflict,
            Self::InvalidValue { .. } | Self::UnexpectedDomainValue { .. } => {
                ErrorClass::InvalidValue
            }
        }
    }

    pub fn invalid(type_name: &'static str, wire: &WireValue) -> Self {
        Self::InvalidValue {
            type_name,
            value: wire.to_string(),
        }
    }

    pub const fn unexpected(type_name: &'static str, value: &Value) -> Self {
        Self::UnexpectedDomainValue {
            type_name,
            kind: value.kind_label(),
        }
    }
}

///
/// ScalarType
///
/// Converter between one wire scalar representation and a domain value.
///
/// `convert_to_domain_value` must be deterministic. For every value `v` it
/// produces, `convert_to_domain_value(convert_to_wire_value(v)) == v`.
/// Null converts to [`Value::Null`] in both directions.
///

pub trait ScalarType: Send + Sync + 'static {
    /// Registry name declared by field mappings.
    fn name(&self) -> &'static str;

    fn convert_to_domain_value(&self, wire: &WireValue) -> Result<Value, TypeError>;

    fn convert_to_wire_value(&self, value: &Value) -> Result<WireValue, TypeError>;

    /// Value of a field slot that has not been hydrated yet.
    fn default_value(&self) -> Value {
        Value::Null
    }
}

struct Registration {
    impl_id: TypeId,
    ty: Box<dyn ScalarType>,
}

///
/// TypeRegistry
///

#[derive(Default)]
pub struct TypeRegistry {
    types: HashMap<&'static str, Registration>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in types.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert(IntegerType);
        registry.insert(FloatType);
        registry.insert(StringType);
        registry.insert(BooleanType);
        registry.insert(DateTimeType);

        registry
    }

    // Built-ins have distinct names; insertion cannot conflict.
    fn insert<T: ScalarType>(&mut self, ty: T) {
        self.types.insert(
            ty.name(),
            Registration {
                impl_id: TypeId::of::<T>(),
                ty: Box::new(ty),
            },
        );
    }

    /// Register a type under its name.
    ///
    /// Re-registering the same implementation is a no-op; a different
    /// implementation under a taken name is rejected.
    pub fn register<T: ScalarType>(&mut self, ty: T) -> Result<(), TypeError> {
        let name = ty.name();

        if let Some(existing) = self.types.get(name) {
            if existing.impl_id == TypeId::of::<T>() {
                return Ok(());
            }

            return Err(TypeError::AlreadyRegistered {
                name: name.to_string(),
            });
        }

        self.insert(ty);
        Ok(())
    }

    /// Look up a type by name.
    pub fn get_type(&self, name: &str) -> Result<&dyn ScalarType, TypeError> {
        self.types
            .get(name)
            .map(|reg| reg.ty.as_ref())
            .ok_or_else(|| TypeError::UnknownType {
                name: name.to_string(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.types.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}
