use crate::model::EntityClass;
use derive_more::From;
use std::fmt::{self, Display};
use time::OffsetDateTime;

///
/// KeyValue
///
/// Hashable projection of a domain value that may take part in an identity.
///

#[derive(Clone, Debug, Eq, From, Hash, Ord, PartialEq, PartialOrd)]
pub enum KeyValue {
    Bool(bool),
    Int(i64),
    Text(String),
    DateTime(OffsetDateTime),
}

impl From<&str> for KeyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

///
/// IdentityKey
///
/// (entity class, identifier value tuple). Tuple order follows the
/// metadata's identifier field order.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct IdentityKey {
    class: EntityClass,
    values: Vec<KeyValue>,
}

impl IdentityKey {
    #[must_use]
    pub fn new(class: impl Into<EntityClass>, values: Vec<KeyValue>) -> Self {
        Self {
            class: class.into(),
            values,
        }
    }

    /// Single-column identity.
    #[must_use]
    pub fn single(class: impl Into<EntityClass>, value: impl Into<KeyValue>) -> Self {
        Self::new(class, vec![value.into()])
    }

    #[must_use]
    pub const fn class(&self) -> &EntityClass {
        &self.class
    }

    #[must_use]
    pub fn values(&self) -> &[KeyValue] {
        &self.values
    }
}

impl Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.class)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}
