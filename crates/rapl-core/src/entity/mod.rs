//! Entity instances.
//!
//! An [`Entity`] is a slot table laid out by its class's [`EntityLayout`].
//! Hydrated entities are always handed out as [`EntityRef`] handles so that
//! every holder observes in-place updates made by the identity map.

mod field_set;
mod layout;

use crate::{
    error::InternalError,
    identity::IdentityError,
    model::{EntityClass, EntityMetadata},
    value::Value,
};
use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError},
};

// re-exports
pub use field_set::FieldSet;
pub use layout::EntityLayout;

///
/// FieldAccessible
///
/// Read and write access to an entity's fields by field name.
///

pub trait FieldAccessible {
    fn get_value(&self, field: &str) -> Option<&Value>;

    fn set_value(&mut self, field: &str, value: Value) -> Result<(), InternalError>;
}

///
/// Entity
///

pub struct Entity {
    layout: Arc<EntityLayout>,
    slots: Vec<Value>,
}

impl Entity {
    /// Allocate an entity with every slot at its type's default.
    #[must_use]
    pub fn new(layout: Arc<EntityLayout>) -> Self {
        let slots = layout.default_slots();

        Self { layout, slots }
    }

    #[must_use]
    pub fn class(&self) -> &EntityClass {
        self.layout.class()
    }

    #[must_use]
    pub fn metadata(&self) -> &EntityMetadata {
        self.layout.metadata()
    }

    /// Assign every field in `fields`; fields not present are left untouched.
    ///
    /// Unknown field names are rejected before any slot is written.
    pub fn populate(&mut self, fields: FieldSet) -> Result<(), InternalError> {
        if let Some(unknown) = fields.keys().find(|name| self.layout.slot(name).is_none()) {
            return Err(IdentityError::UnknownField {
                class: self.class().to_string(),
                field: unknown.clone(),
            }
            .into());
        }

        for (name, value) in fields {
            self.set_value(&name, value)?;
        }

        Ok(())
    }

    /// Reset every embedded-entity slot to null.
    pub fn clear_associations(&mut self) {
        for slot in &mut self.slots {
            if matches!(slot, Value::Entity(_)) {
                *slot = Value::Null;
            }
        }
    }

    /// Iterate `(field name, value)` in field declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.layout
            .metadata()
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.slots.iter())
    }
}

impl FieldAccessible for Entity {
    fn get_value(&self, field: &str) -> Option<&Value> {
        self.layout.slot(field).map(|i| &self.slots[i])
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<(), InternalError> {
        let Some(i) = self.layout.slot(field) else {
            return Err(IdentityError::UnknownField {
                class: self.class().to_string(),
                field: field.to_string(),
            }
            .into());
        };
        self.slots[i] = value;

        Ok(())
    }
}

impl fmt::Debug for Entity {
    // Embedded entities print as handles, so this never recurses into a cycle.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.class().as_str());
        for (name, value) in self.fields() {
            s.field(name, value);
        }
        s.finish()
    }
}

///
/// EntityRef
///
/// Shared handle to a live entity. Equality is reference identity.
///

#[derive(Clone)]
pub struct EntityRef(Arc<RwLock<Entity>>);

impl EntityRef {
    #[must_use]
    pub fn new(entity: Entity) -> Self {
        Self(Arc::new(RwLock::new(entity)))
    }

    /// True if both handles point at the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Borrow the entity for reading.
    ///
    /// # Deadlocks
    ///
    /// Hydrating the same identity writes into this entity. Doing so on the
    /// thread that holds the guard blocks forever; drop the guard first.
    pub fn read(&self) -> RwLockReadGuard<'_, Entity> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Borrow the entity for writing.
    ///
    /// # Deadlocks
    ///
    /// Same as [`Self::read`]: do not hydrate this identity while the guard
    /// is alive on the current thread.
    pub fn write(&self) -> RwLockWriteGuard<'_, Entity> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    // Returns false if the entity is currently locked.
    pub(crate) fn clear_associations(&self) -> bool {
        match self.0.try_write() {
            Ok(mut entity) => entity.clear_associations(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().clear_associations(),
            Err(TryLockError::WouldBlock) => return false,
        }

        true
    }

    #[cfg(test)]
    pub(crate) fn downgrade(&self) -> std::sync::Weak<RwLock<Entity>> {
        Arc::downgrade(&self.0)
    }

    /// Clone one field's current value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<Value> {
        self.read().get_value(field).cloned()
    }

    #[must_use]
    pub fn class(&self) -> EntityClass {
        self.read().class().clone()
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(entity) = self.0.try_read() else {
            return write!(f, "EntityRef(<locked> @ {:p})", Arc::as_ptr(&self.0));
        };

        let ids = entity.metadata().identifier_field_names();
        write!(f, "EntityRef({}", entity.class())?;
        for id in ids {
            if let Some(value) = entity.get_value(id) {
                write!(f, " {id}={value:?}")?;
            }
        }
        write!(f, " @ {:p})", Arc::as_ptr(&self.0))
    }
}
