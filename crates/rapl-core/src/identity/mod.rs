//! Identity map.
//!
//! Guarantees at most one live instance per (entity class, identity) for the
//! lifetime of the owning session. Repeated hydration of a known identity
//! writes into the existing instance instead of allocating a new one.
//!
//! Lookup and insert happen under one lock, so concurrent reconciliation of
//! the same identity cannot produce two instances. An update releases the map
//! lock before taking the entity's write lock.
//!
//! Embedded entities are strong handles and may form cycles (a record that
//! embeds its own identity, or two identities embedding each other). Dropping
//! the map clears the association slots of every tracked entity, which breaks
//! those cycles once the owning session ends.

use crate::{
    entity::{Entity, EntityLayout, EntityRef, FieldSet},
    error::{ErrorClass, InternalError},
    value::{IdentityKey, Value},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use thiserror::Error as ThisError;

///
/// IdentityError
///

#[derive(Debug, ThisError)]
pub enum IdentityError {
    #[error("entity '{class}' identifier field '{field}' holds a non-keyable {kind} value")]
    UnkeyableIdentifier {
        class: String,
        field: String,
        kind: &'static str,
    },

    #[error("entity '{class}' has no field '{field}'")]
    UnknownField { class: String, field: String },
}

impl IdentityError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::UnkeyableIdentifier { .. } => ErrorClass::Unsupported,
            Self::UnknownField { .. } => ErrorClass::InvariantViolation,
        }
    }
}

///
/// Reconciliation
///
/// What `reconcile` did with a field set.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reconciliation {
    /// New identity; a tracked instance was allocated.
    Created,
    /// Known identity; the tracked instance was updated in place.
    Updated,
    /// No complete identity; a fresh untracked instance was allocated.
    Untracked,
}

/// Extract the identity of a field set.
///
/// Returns `None` when the class has no identifier fields or any identifier
/// field is absent or null.
pub fn identity_of(
    layout: &EntityLayout,
    fields: &FieldSet,
) -> Result<Option<IdentityKey>, IdentityError> {
    let id_fields = layout.metadata().identifier_field_names();
    if id_fields.is_empty() {
        return Ok(None);
    }

    let mut values = Vec::with_capacity(id_fields.len());
    for field in id_fields {
        let value = match fields.get(field) {
            None | Some(Value::Null) => return Ok(None),
            Some(value) => value,
        };
        let key = value
            .as_key()
            .ok_or_else(|| IdentityError::UnkeyableIdentifier {
                class: layout.class().to_string(),
                field: field.clone(),
                kind: value.kind_label(),
            })?;
        values.push(key);
    }

    Ok(Some(IdentityKey::new(layout.class(), values)))
}

///
/// IdentityMap
///

#[derive(Debug, Default)]
pub struct IdentityMap {
    entries: Mutex<HashMap<IdentityKey, EntityRef>>,
}

impl IdentityMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical instance for `fields`.
    pub fn reconcile(
        &self,
        layout: &Arc<EntityLayout>,
        fields: FieldSet,
    ) -> Result<EntityRef, InternalError> {
        self.reconcile_with_outcome(layout, fields)
            .map(|(entity, _)| entity)
    }

    /// [`Self::reconcile`], also reporting whether the instance was created,
    /// updated, or left untracked.
    pub fn reconcile_with_outcome(
        &self,
        layout: &Arc<EntityLayout>,
        fields: FieldSet,
    ) -> Result<(EntityRef, Reconciliation), InternalError> {
        let Some(key) = identity_of(layout, &fields)? else {
            let mut entity = Entity::new(Arc::clone(layout));
            entity.populate(fields)?;

            tracing::trace!(entity = %layout.class(), "untracked entity allocated");
            return Ok((EntityRef::new(entity), Reconciliation::Untracked));
        };

        let mut entries = self.lock();

        if let Some(existing) = entries.get(&key).cloned() {
            // the map lock is not held while waiting on the entity
            drop(entries);
            existing.write().populate(fields)?;

            tracing::trace!(identity = %key, "identity map hit");
            return Ok((existing, Reconciliation::Updated));
        }

        let mut entity = Entity::new(Arc::clone(layout));
        entity.populate(fields)?;
        let entity = EntityRef::new(entity);
        entries.insert(key.clone(), entity.clone());

        tracing::trace!(identity = %key, "identity map miss");
        Ok((entity, Reconciliation::Created))
    }

    /// Look up a tracked instance.
    #[must_use]
    pub fn try_get(&self, key: &IdentityKey) -> Option<EntityRef> {
        self.lock().get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.lock().contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<IdentityKey, EntityRef>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for IdentityMap {
    fn drop(&mut self) {
        let entries = self
            .entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);

        for (key, entity) in entries.drain() {
            if !entity.clear_associations() {
                tracing::debug!(
                    identity = %key,
                    "entity locked at session end; associations kept"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests;
