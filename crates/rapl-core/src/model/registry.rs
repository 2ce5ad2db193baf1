use crate::{
    error::InternalError,
    model::{EntityClass, EntityMetadata, FieldKind, MetadataError},
    types::TypeRegistry,
};
use std::{collections::HashMap, sync::Arc};

///
/// MetadataFactory
///
/// Resolves entity metadata by class name. Used by the mapper to find the
/// target metadata of an embedded association.
///

pub trait MetadataFactory: Send + Sync {
    fn metadata_for(&self, class: &str) -> Result<Arc<EntityMetadata>, InternalError>;
}

///
/// MetadataRegistry
///
/// In-memory metadata factory keyed by entity class.
///

#[derive(Debug, Default)]
pub struct MetadataRegistry {
    entries: HashMap<EntityClass, Arc<EntityMetadata>>,
}

impl MetadataRegistry {
    /// Create an empty metadata registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata under its entity class.
    pub fn register(&mut self, metadata: EntityMetadata) -> Result<(), InternalError> {
        let class = metadata.entity_class_name().clone();

        if self.entries.contains_key(&class) {
            return Err(MetadataError::AlreadyRegistered {
                class: class.to_string(),
            }
            .into());
        }

        self.entries.insert(class, Arc::new(metadata));
        Ok(())
    }

    /// Builder-style [`Self::register`].
    pub fn with(mut self, metadata: EntityMetadata) -> Result<Self, InternalError> {
        self.register(metadata)?;
        Ok(self)
    }

    /// Iterate registered metadata.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<EntityMetadata>> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every scalar mapping against `types` and every association
    /// target against this registry.
    ///
    /// Hydration reports the same defects lazily; this surfaces them at
    /// start-up instead.
    pub fn validate(&self, types: &TypeRegistry) -> Result<(), InternalError> {
        let mut classes: Vec<_> = self.entries.keys().collect();
        classes.sort();

        for class in classes {
            let metadata = &self.entries[class];

            for field in metadata.fields() {
                match &field.kind {
                    FieldKind::Scalar { type_name } if !types.contains(type_name) => {
                        return Err(MetadataError::UnknownFieldType {
                            class: class.to_string(),
                            field: field.name.clone(),
                            type_name: type_name.clone(),
                        }
                        .into());
                    }
                    FieldKind::Association { target, .. } if !self.entries.contains_key(target) => {
                        return Err(MetadataError::UnknownAssociationTarget {
                            class: class.to_string(),
                            field: field.name.clone(),
                            target: target.to_string(),
                        }
                        .into());
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }
}

impl MetadataFactory for MetadataRegistry {
    fn metadata_for(&self, class: &str) -> Result<Arc<EntityMetadata>, InternalError> {
        self.entries
            .get(&EntityClass::from(class))
            .cloned()
            .ok_or_else(|| {
                MetadataError::UnknownEntity {
                    class: class.to_string(),
                }
                .into()
            })
    }
}
