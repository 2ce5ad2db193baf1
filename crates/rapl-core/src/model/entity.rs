use crate::model::{EntityClass, FieldKind, FieldMapping, MetadataError, WireFormat};
use std::collections::HashMap;

///
/// EntityMetadata
///
/// Read-only description of one entity class.
/// Field names and serialized names are each unique, so the mapping between
/// them is a bijection over the mapped fields.
///

#[derive(Debug)]
pub struct EntityMetadata {
    class: EntityClass,
    format: WireFormat,
    fields: Vec<FieldMapping>,
    by_name: HashMap<String, usize>,
    by_serialized: HashMap<String, usize>,
    identifier: Vec<String>,
}

impl EntityMetadata {
    #[must_use]
    pub fn builder(class: impl Into<EntityClass>) -> EntityMetadataBuilder {
        EntityMetadataBuilder::new(class)
    }

    #[must_use]
    pub const fn entity_class_name(&self) -> &EntityClass {
        &self.class
    }

    #[must_use]
    pub const fn wire_format(&self) -> WireFormat {
        self.format
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Resolve a serialized (wire) name to its field name.
    #[must_use]
    pub fn field_name(&self, serialized_name: &str) -> Option<&str> {
        self.by_serialized
            .get(serialized_name)
            .map(|&i| self.fields[i].name.as_str())
    }

    #[must_use]
    pub fn field_mapping(&self, name: &str) -> Option<&FieldMapping> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Mapping for a serialized name, skipping the intermediate field name.
    #[must_use]
    pub fn mapping_for_serialized(&self, serialized_name: &str) -> Option<&FieldMapping> {
        self.by_serialized
            .get(serialized_name)
            .map(|&i| &self.fields[i])
    }

    /// Position of a field in [`Self::fields`].
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Ordered field list.
    #[must_use]
    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    /// Identifier field names, in identity tuple order. Empty for value objects.
    #[must_use]
    pub fn identifier_field_names(&self) -> &[String] {
        &self.identifier
    }

    #[must_use]
    pub const fn is_identified(&self) -> bool {
        !self.identifier.is_empty()
    }
}

///
/// EntityMetadataBuilder
///

#[derive(Debug)]
pub struct EntityMetadataBuilder {
    class: EntityClass,
    format: WireFormat,
    fields: Vec<FieldMapping>,
    identifier: Vec<String>,
}

impl EntityMetadataBuilder {
    #[must_use]
    pub fn new(class: impl Into<EntityClass>) -> Self {
        Self {
            class: class.into(),
            format: WireFormat::default(),
            fields: Vec::new(),
            identifier: Vec::new(),
        }
    }

    #[must_use]
    pub const fn format(mut self, format: WireFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn field(mut self, mapping: FieldMapping) -> Self {
        self.fields.push(mapping);
        self
    }

    /// Scalar field whose serialized name equals its field name.
    #[must_use]
    pub fn scalar(self, name: &str, type_name: &str) -> Self {
        self.field(FieldMapping::scalar(name, name, type_name))
    }

    /// Scalar field with a distinct serialized name.
    #[must_use]
    pub fn scalar_as(self, name: &str, serialized_name: &str, type_name: &str) -> Self {
        self.field(FieldMapping::scalar(name, serialized_name, type_name))
    }

    #[must_use]
    pub fn embed_one(self, name: &str, target: impl Into<EntityClass>) -> Self {
        self.field(FieldMapping::embed_one(name, name, target))
    }

    #[must_use]
    pub fn embed_one_as(
        self,
        name: &str,
        serialized_name: &str,
        target: impl Into<EntityClass>,
    ) -> Self {
        self.field(FieldMapping::embed_one(name, serialized_name, target))
    }

    #[must_use]
    pub fn identifier<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifier = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<EntityMetadata, MetadataError> {
        let class = self.class.to_string();
        let mut by_name = HashMap::with_capacity(self.fields.len());
        let mut by_serialized = HashMap::with_capacity(self.fields.len());

        for (i, field) in self.fields.iter().enumerate() {
            if by_name.insert(field.name.clone(), i).is_some() {
                return Err(MetadataError::DuplicateField {
                    class,
                    field: field.name.clone(),
                });
            }
            if by_serialized
                .insert(field.serialized_name.clone(), i)
                .is_some()
            {
                return Err(MetadataError::DuplicateSerializedName {
                    class,
                    serialized: field.serialized_name.clone(),
                });
            }
        }

        for id_field in &self.identifier {
            let Some(&i) = by_name.get(id_field) else {
                return Err(MetadataError::UnknownIdentifierField {
                    class,
                    field: id_field.clone(),
                });
            };
            if matches!(self.fields[i].kind, FieldKind::Association { .. }) {
                return Err(MetadataError::AssociationIdentifier {
                    class,
                    field: id_field.clone(),
                });
            }
        }

        Ok(EntityMetadata {
            class: self.class,
            format: self.format,
            fields: self.fields,
            by_name,
            by_serialized,
            identifier: self.identifier,
        })
    }
}
