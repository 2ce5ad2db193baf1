//! Wire payload → entity hydration.
//!
//! A [`Mapper`] is bound to one entity class. `hydrate` runs
//! decode → unwrap → normalize → map each record → reconcile, preserving
//! record order. Embedded associations recurse through a mapper bound to the
//! target class that shares the same session and identity map.

use crate::{
    codec::{WirePayload, decode_bounded},
    config::InvalidValuePolicy,
    entity::{EntityLayout, EntityRef, FieldSet},
    error::{ErrorClass, InternalError},
    model::{AssociationKind, EntityClass, EntityMetadata, FieldKind, FieldMapping},
    obs::{MetricsEvent, sink::HydrateSpan},
    session::Session,
    types::TypeError,
    value::{Value, WireRecord, WireValue},
};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// MapperError
///

#[derive(Debug, ThisError)]
pub enum MapperError {
    #[error("entity '{class}' field '{field}' declares unknown type '{type_name}'")]
    UnknownFieldType {
        class: String,
        field: String,
        type_name: String,
    },

    #[error("entity '{class}' field '{field}': {source}")]
    InvalidField {
        class: String,
        field: String,
        #[source]
        source: TypeError,
    },

    #[error("entity '{class}' expected a record, found {found}")]
    NotARecord { class: String, found: &'static str },

    #[error("entity '{class}' collection expected a sequence, found {found}")]
    NotASequence { class: String, found: &'static str },
}

impl MapperError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownFieldType { .. } => ErrorClass::Unsupported,
            Self::InvalidField { .. } | Self::NotARecord { .. } | Self::NotASequence { .. } => {
                ErrorClass::InvalidValue
            }
        }
    }
}

// Short label for a wire value's shape.
const fn wire_kind(value: &WireValue) -> &'static str {
    match value {
        WireValue::Null => "null",
        WireValue::Bool(_) => "bool",
        WireValue::Number(_) => "number",
        WireValue::String(_) => "string",
        WireValue::Array(_) => "sequence",
        WireValue::Object(_) => "record",
    }
}

/// Walk `envelopes` key by key.
///
/// Returns `None` as soon as a key is missing, holds null, or the current
/// value is not a record.
#[must_use]
pub fn unwrap_envelopes(mut value: WireValue, envelopes: &[&str]) -> Option<WireValue> {
    for key in envelopes {
        value = match value {
            WireValue::Object(mut record) => match record.remove(*key) {
                None | Some(WireValue::Null) => return None,
                Some(inner) => inner,
            },
            _ => return None,
        };
    }

    Some(value)
}

///
/// Mapper
///
/// Stateless hydrator bound to one entity class. Cheap to create; all shared
/// state lives in the [`Session`].
///

#[derive(Clone)]
pub struct Mapper<'s> {
    session: &'s Session,
    layout: Arc<EntityLayout>,
}

impl<'s> Mapper<'s> {
    #[must_use]
    pub const fn new(session: &'s Session, layout: Arc<EntityLayout>) -> Self {
        Self { session, layout }
    }

    #[must_use]
    pub fn metadata(&self) -> &EntityMetadata {
        self.layout.metadata()
    }

    #[must_use]
    pub fn class(&self) -> &EntityClass {
        self.layout.class()
    }

    /// Hydrate a wire payload into entities of the bound class.
    ///
    /// Missing envelope keys yield an empty result. With `is_collection`
    /// false the unwrapped value is one record; with it true the unwrapped
    /// value must be a sequence of records.
    pub fn hydrate<'p>(
        &self,
        payload: impl Into<WirePayload<'p>>,
        is_collection: bool,
        envelopes: &[&str],
    ) -> Result<Vec<EntityRef>, InternalError> {
        let class = self.class().as_str();
        let sink = self.session.sink();
        let mut span = HydrateSpan::new(sink, class);

        let decoded = self.decode(payload.into())?;

        let Some(unwrapped) = unwrap_envelopes(decoded, envelopes) else {
            tracing::debug!(
                entity = class,
                ?envelopes,
                "envelope missing; nothing to hydrate"
            );
            sink.record(MetricsEvent::EnvelopeMiss { entity: class });
            return Ok(Vec::new());
        };

        let records = self.normalize(unwrapped, is_collection)?;
        let policy = self.session.config().invalid_value;

        let mut entities = Vec::with_capacity(records.len());
        for record in records {
            let result = match &record {
                WireValue::Object(record) => self.hydrate_record(record),
                other => Err(MapperError::NotARecord {
                    class: class.to_string(),
                    found: wire_kind(other),
                }
                .into()),
            };

            match result {
                Ok(entity) => entities.push(entity),
                Err(err) if err.is_invalid_value() && policy == InvalidValuePolicy::SkipRecord => {
                    tracing::warn!(entity = class, error = %err, "skipping invalid record");
                    sink.record(MetricsEvent::RecordSkipped { entity: class });
                }
                Err(err) => return Err(err),
            }
        }

        span.set_records(entities.len() as u64);
        tracing::debug!(entity = class, records = entities.len(), "hydrated");

        Ok(entities)
    }

    /// Translate one wire record into a field set.
    ///
    /// Keys with no field mapping are dropped. Embedded associations are
    /// hydrated (and reconciled) as part of mapping.
    pub fn map_record(&self, record: &WireRecord) -> Result<FieldSet, InternalError> {
        let metadata = self.metadata();
        let mut fields = FieldSet::new();

        for (serialized_name, wire) in record {
            let Some(mapping) = metadata.mapping_for_serialized(serialized_name) else {
                tracing::trace!(
                    entity = %self.class(),
                    key = serialized_name,
                    "unmapped key dropped"
                );
                continue;
            };

            let value = match &mapping.kind {
                FieldKind::Scalar { type_name } => self.convert_scalar(mapping, type_name, wire)?,
                FieldKind::Association {
                    kind: AssociationKind::EmbedOne,
                    target,
                } => self.hydrate_embedded(target, wire)?,
            };

            fields.insert(mapping.name.as_str(), value);
        }

        Ok(fields)
    }

    /// Map one record and reconcile it through the session's identity map.
    pub fn hydrate_record(&self, record: &WireRecord) -> Result<EntityRef, InternalError> {
        let fields = self.map_record(record)?;
        let (entity, outcome) = self
            .session
            .identity_map()
            .reconcile_with_outcome(&self.layout, fields)?;

        self.session.sink().record(MetricsEvent::Reconciled {
            entity: self.class().as_str(),
            outcome,
        });

        Ok(entity)
    }

    fn decode(&self, payload: WirePayload<'_>) -> Result<WireValue, InternalError> {
        match payload {
            WirePayload::Raw(bytes) => Ok(decode_bounded(
                self.metadata().wire_format(),
                bytes,
                self.session.config().max_payload_bytes,
            )?),
            WirePayload::Decoded(value) => Ok(value),
        }
    }

    // Records to hydrate, in payload order.
    fn normalize(
        &self,
        value: WireValue,
        is_collection: bool,
    ) -> Result<Vec<WireValue>, InternalError> {
        match (value, is_collection) {
            (WireValue::Null, false) => Ok(Vec::new()),
            (single, false) => Ok(vec![single]),
            (WireValue::Array(items), true) => Ok(items),
            (other, true) => {
                if self.session.config().strict_collections {
                    return Err(MapperError::NotASequence {
                        class: self.class().to_string(),
                        found: wire_kind(&other),
                    }
                    .into());
                }

                tracing::warn!(
                    entity = %self.class(),
                    found = wire_kind(&other),
                    "collection payload is not a sequence; hydrating nothing"
                );
                Ok(Vec::new())
            }
        }
    }

    fn convert_scalar(
        &self,
        mapping: &FieldMapping,
        type_name: &str,
        wire: &WireValue,
    ) -> Result<Value, InternalError> {
        let Ok(ty) = self.session.types().get_type(type_name) else {
            return Err(MapperError::UnknownFieldType {
                class: self.class().to_string(),
                field: mapping.name.clone(),
                type_name: type_name.to_string(),
            }
            .into());
        };

        ty.convert_to_domain_value(wire).map_err(|source| {
            MapperError::InvalidField {
                class: self.class().to_string(),
                field: mapping.name.clone(),
                source,
            }
            .into()
        })
    }

    // Non-record values (absent, null, scalars, sequences) embed as null.
    fn hydrate_embedded(
        &self,
        target: &EntityClass,
        wire: &WireValue,
    ) -> Result<Value, InternalError> {
        let WireValue::Object(record) = wire else {
            return Ok(Value::Null);
        };

        let nested = self.session.mapper(target.as_str())?;
        nested.hydrate_record(record).map(Value::Entity)
    }
}
