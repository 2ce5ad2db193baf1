mod key;

use crate::entity::EntityRef;
use derive_more::From;
use time::OffsetDateTime;

// re-exports
pub use key::{IdentityKey, KeyValue};

///
/// WireValue
///
/// Generic decoded wire structure (maps, sequences, scalars).
/// Object key order follows the payload.
///

pub type WireValue = serde_json::Value;

///
/// WireRecord
///

pub type WireRecord = serde_json::Map<String, WireValue>;

///
/// Value
///
/// Domain-side field value produced by a scalar type conversion or by
/// hydrating an embedded association.
///
/// Null   → the field is absent on the wire or explicitly null.
/// Entity → a hydrated embedded entity (shared handle).
///

#[derive(Clone, Debug, From, PartialEq)]
pub enum Value {
    #[from(ignore)]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(OffsetDateTime),
    Entity(EntityRef),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_datetime(&self) -> Option<OffsetDateTime> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            Self::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// Project into a hashable identity component.
    ///
    /// Null, floats, and embedded entities are not keyable.
    #[must_use]
    pub fn as_key(&self) -> Option<KeyValue> {
        match self {
            Self::Bool(b) => Some(KeyValue::Bool(*b)),
            Self::Int(i) => Some(KeyValue::Int(*i)),
            Self::Text(s) => Some(KeyValue::Text(s.clone())),
            Self::DateTime(dt) => Some(KeyValue::DateTime(*dt)),
            Self::Null | Self::Float(_) | Self::Entity(_) => None,
        }
    }

    /// Short variant label used in diagnostics.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::DateTime(_) => "datetime",
            Self::Entity(_) => "entity",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Self>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_none_maps_to_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(7i64)), Value::Int(7));
    }

    #[test]
    fn only_scalar_non_float_values_are_keyable() {
        assert_eq!(Value::Int(3).as_key(), Some(KeyValue::Int(3)));
        assert_eq!(
            Value::from("abc").as_key(),
            Some(KeyValue::Text("abc".to_string()))
        );
        assert_eq!(Value::Null.as_key(), None);
        assert_eq!(Value::Float(1.5).as_key(), None);
    }

    #[test]
    fn accessors_match_only_their_variant() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());

        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(1).as_bool(), None);

        assert_eq!(Value::Int(-4).as_int(), Some(-4));
        assert_eq!(Value::Float(4.0).as_int(), None);

        assert_eq!(Value::Float(0.5).as_float(), Some(0.5));
        assert_eq!(Value::Int(1).as_float(), None);

        assert_eq!(Value::from("x").as_text(), Some("x"));
        assert_eq!(Value::Null.as_text(), None);
    }
}
