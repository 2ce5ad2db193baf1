//! Entity metadata read contract.
//!
//! Metadata describes one entity class: its fields, the serialized names they
//! map to on the wire, which fields form the identity, and the wire format.
//! How metadata is authored is up to the caller; the builder here is the
//! in-memory form everything else reads from.

pub mod entity;
pub mod field;
pub mod registry;

use crate::error::ErrorClass;
use derive_more::{Deref, Display};
use std::sync::Arc;
use thiserror::Error as ThisError;

// re-exports
pub use entity::{EntityMetadata, EntityMetadataBuilder};
pub use field::{AssociationKind, FieldKind, FieldMapping, WireFormat};
pub use registry::{MetadataFactory, MetadataRegistry};

///
/// EntityClass
///
/// Stable name of an entity class, used as the metadata lookup key and as the
/// class half of an identity.
///

#[derive(Clone, Debug, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EntityClass(Arc<str>);

impl EntityClass {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityClass {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for EntityClass {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&Self> for EntityClass {
    fn from(class: &Self) -> Self {
        class.clone()
    }
}

///
/// MetadataError
///

#[derive(Debug, ThisError)]
pub enum MetadataError {
    #[error("no metadata registered for entity '{class}'")]
    UnknownEntity { class: String },

    #[error("metadata for entity '{class}' already registered")]
    AlreadyRegistered { class: String },

    #[error("entity '{class}' declares field '{field}' more than once")]
    DuplicateField { class: String, field: String },

    #[error("entity '{class}' maps serialized name '{serialized}' to more than one field")]
    DuplicateSerializedName { class: String, serialized: String },

    #[error("entity '{class}' identifier field '{field}' is not a mapped field")]
    UnknownIdentifierField { class: String, field: String },

    #[error("entity '{class}' identifier field '{field}' is an association")]
    AssociationIdentifier { class: String, field: String },

    #[error("entity '{class}' field '{field}' declares unknown type '{type_name}'")]
    UnknownFieldType {
        class: String,
        field: String,
        type_name: String,
    },

    #[error("entity '{class}' field '{field}' embeds unregistered entity '{target}'")]
    UnknownAssociationTarget {
        class: String,
        field: String,
        target: String,
    },
}

impl MetadataError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownEntity { .. } => ErrorClass::NotFound,
            Self::AlreadyRegistered { .. } => ErrorClass::Conflict,
            Self::UnknownFieldType { .. } | Self::UnknownAssociationTarget { .. } => {
                ErrorClass::Unsupported
            }
            Self::DuplicateField { .. }
            | Self::DuplicateSerializedName { .. }
            | Self::UnknownIdentifierField { .. }
            | Self::AssociationIdentifier { .. } => ErrorClass::InvariantViolation,
        }
    }
}
