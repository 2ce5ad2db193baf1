use crate::model::EntityClass;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// WireFormat
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    #[default]
    Json,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
        }
    }
}

///
/// AssociationKind
///
/// Only single embedded objects are supported.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AssociationKind {
    EmbedOne,
}

///
/// FieldKind
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    /// Scalar converted through the type registry.
    Scalar { type_name: String },

    /// Nested record hydrated as an entity of `target`.
    Association {
        kind: AssociationKind,
        target: EntityClass,
    },
}

///
/// FieldMapping
/// One mapped field: domain name, wire name, and how its value is produced.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMapping {
    pub name: String,
    pub serialized_name: String,
    pub kind: FieldKind,
}

impl FieldMapping {
    #[must_use]
    pub fn scalar(
        name: impl Into<String>,
        serialized_name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            serialized_name: serialized_name.into(),
            kind: FieldKind::Scalar {
                type_name: type_name.into(),
            },
        }
    }

    #[must_use]
    pub fn embed_one(
        name: impl Into<String>,
        serialized_name: impl Into<String>,
        target: impl Into<EntityClass>,
    ) -> Self {
        Self {
            name: name.into(),
            serialized_name: serialized_name.into(),
            kind: FieldKind::Association {
                kind: AssociationKind::EmbedOne,
                target: target.into(),
            },
        }
    }

    #[must_use]
    pub const fn is_association(&self) -> bool {
        matches!(self.kind, FieldKind::Association { .. })
    }

    /// Declared scalar type name, if this is a scalar mapping.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Scalar { type_name } => Some(type_name),
            FieldKind::Association { .. } => None,
        }
    }
}
