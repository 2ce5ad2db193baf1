use crate::{
    error::InternalError,
    mapper::MapperError,
    model::{EntityClass, EntityMetadata, FieldKind},
    types::TypeRegistry,
    value::Value,
};
use std::sync::Arc;

///
/// EntityLayout
///
/// Slot table for one entity class, built once from its metadata.
/// Slot `i` holds the value of `metadata.fields()[i]`; `defaults` is what a
/// freshly allocated entity starts with.
///

#[derive(Debug)]
pub struct EntityLayout {
    metadata: Arc<EntityMetadata>,
    defaults: Vec<Value>,
}

impl EntityLayout {
    /// Build the layout, resolving every scalar type's default.
    ///
    /// Fails with `UnknownFieldType` if a scalar mapping names a type the
    /// registry does not know.
    pub fn new(metadata: Arc<EntityMetadata>, types: &TypeRegistry) -> Result<Self, InternalError> {
        let defaults = metadata
            .fields()
            .iter()
            .map(|field| match &field.kind {
                FieldKind::Scalar { type_name } => types
                    .get_type(type_name)
                    .map(|ty| ty.default_value())
                    .map_err(|_| {
                        InternalError::from(MapperError::UnknownFieldType {
                            class: metadata.entity_class_name().to_string(),
                            field: field.name.clone(),
                            type_name: type_name.clone(),
                        })
                    }),
                FieldKind::Association { .. } => Ok(Value::Null),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { metadata, defaults })
    }

    #[must_use]
    pub const fn metadata(&self) -> &Arc<EntityMetadata> {
        &self.metadata
    }

    #[must_use]
    pub fn class(&self) -> &EntityClass {
        self.metadata.entity_class_name()
    }

    #[must_use]
    pub fn slot(&self, field: &str) -> Option<usize> {
        self.metadata.field_index(field)
    }

    pub(crate) fn default_slots(&self) -> Vec<Value> {
        self.defaults.clone()
    }
}
