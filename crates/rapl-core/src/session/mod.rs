//! Session: one logical unit of work.
//!
//! Owns the identity map for its lifetime and the collaborators mappers
//! need (metadata factory, type registry, config, metrics sink).

use crate::{
    codec::WirePayload,
    config::SessionConfig,
    entity::{EntityLayout, EntityRef},
    error::InternalError,
    identity::IdentityMap,
    mapper::Mapper,
    model::{EntityClass, MetadataFactory},
    obs::{MetricsSink, sink::GLOBAL_METRICS_SINK},
    source::{LoadRequest, WireSource},
    types::{self, TypeRegistry},
};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

///
/// Session
///
/// Session-scoped hydration context. Entities hydrated through the same
/// session share one identity map; separate sessions never share instances.
///

pub struct Session {
    metadata: Arc<dyn MetadataFactory>,
    types: Arc<TypeRegistry>,
    identity_map: IdentityMap,
    layouts: RwLock<HashMap<EntityClass, Arc<EntityLayout>>>,
    config: SessionConfig,
    metrics: Option<Arc<dyn MetricsSink>>,
}

impl Session {
    /// Create a session using the process-wide type registry.
    #[must_use]
    pub fn new(metadata: Arc<dyn MetadataFactory>) -> Self {
        Self {
            metadata,
            types: types::global(),
            identity_map: IdentityMap::new(),
            layouts: RwLock::new(HashMap::new()),
            config: SessionConfig::default(),
            metrics: None,
        }
    }

    /// Use an isolated type registry instead of the process-wide one.
    #[must_use]
    pub fn types_registry(mut self, types: Arc<TypeRegistry>) -> Self {
        self.types = types;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Route this session's metrics to `sink` instead of the global counters.
    #[must_use]
    pub fn metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn identity_map(&self) -> &IdentityMap {
        &self.identity_map
    }

    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub(crate) fn sink(&self) -> &dyn MetricsSink {
        match &self.metrics {
            Some(sink) => sink.as_ref(),
            None => &GLOBAL_METRICS_SINK,
        }
    }

    /// Slot layout for `class`, built on first use and cached.
    pub fn layout(&self, class: &str) -> Result<Arc<EntityLayout>, InternalError> {
        let key = EntityClass::from(class);

        if let Some(layout) = self
            .layouts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(layout));
        }

        let metadata = self.metadata.metadata_for(class)?;
        let built = Arc::new(EntityLayout::new(metadata, &self.types)?);

        let mut layouts = self.layouts.write().unwrap_or_else(PoisonError::into_inner);
        let layout = layouts.entry(key).or_insert(built);

        Ok(Arc::clone(layout))
    }

    /// Mapper bound to `class`.
    pub fn mapper(&self, class: &str) -> Result<Mapper<'_>, InternalError> {
        Ok(Mapper::new(self, self.layout(class)?))
    }

    /// Shorthand for `self.mapper(class)?.hydrate(..)`.
    pub fn hydrate<'p>(
        &self,
        class: &str,
        payload: impl Into<WirePayload<'p>>,
        is_collection: bool,
        envelopes: &[&str],
    ) -> Result<Vec<EntityRef>, InternalError> {
        self.mapper(class)?
            .hydrate(payload, is_collection, envelopes)
    }

    /// Fetch a payload from `source` and hydrate it.
    pub fn load(
        &self,
        source: &dyn WireSource,
        request: &LoadRequest,
    ) -> Result<Vec<EntityRef>, InternalError> {
        let response = source.fetch(request)?;
        let envelopes: Vec<&str> = response.envelopes.iter().map(String::as_str).collect();

        self.hydrate(
            request.class.as_str(),
            response.body.as_slice(),
            response.is_collection,
            &envelopes,
        )
    }

    /// [`Self::load`], keeping the first entity.
    pub fn load_one(
        &self,
        source: &dyn WireSource,
        request: &LoadRequest,
    ) -> Result<Option<EntityRef>, InternalError> {
        Ok(self.load(source, request)?.into_iter().next())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("types", &self.types)
            .field("tracked", &self.identity_map.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::metadata_registry;

    #[test]
    fn layouts_are_built_once_per_class() {
        let session = Session::new(Arc::new(metadata_registry()));

        let first = session.layout("Book").expect("book layout");
        let second = session.layout("Book").expect("book layout");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_class_fails_mapper_creation() {
        let session = Session::new(Arc::new(metadata_registry()));
        let err = session
            .mapper("Ghost")
            .err()
            .expect("unregistered class should fail");

        assert!(err.is_not_found());
    }

    #[test]
    fn sessions_do_not_share_identity_maps() {
        let registry: Arc<dyn MetadataFactory> = Arc::new(metadata_registry());
        let a = Session::new(Arc::clone(&registry));
        let b = Session::new(registry);
        let payload = r#"{"id": 1, "name": "A"}"#;

        let from_a = a.hydrate("Author", payload, false, &[]).expect("hydrate");
        let from_b = b.hydrate("Author", payload, false, &[]).expect("hydrate");

        assert!(!from_a[0].ptr_eq(&from_b[0]));
        assert_eq!(a.identity_map().len(), 1);
        assert_eq!(b.identity_map().len(), 1);
    }
}
