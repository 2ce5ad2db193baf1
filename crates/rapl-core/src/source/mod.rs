//! Entity loading service contract.
//!
//! A [`WireSource`] turns a [`LoadRequest`] into a raw wire response; how it
//! does so (HTTP routes, query strings, paging) is its own business. The
//! session only feeds the response into a mapper.

use crate::{
    error::{ErrorClass, InternalError},
    model::EntityClass,
    value::WireValue,
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// SourceError
///
/// Failures a source implementation may report.
///

#[derive(Debug, ThisError)]
pub enum SourceError {
    #[error("no route for entity '{class}'")]
    UnknownRoute { class: String },

    #[error("source unavailable for entity '{class}': {message}")]
    Unavailable { class: String, message: String },
}

impl SourceError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownRoute { .. } => ErrorClass::NotFound,
            Self::Unavailable { .. } => ErrorClass::Internal,
        }
    }
}

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

///
/// Criteria
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Criteria {
    #[default]
    All,
    /// Field conditions, keyed by field name.
    Conditions(BTreeMap<String, WireValue>),
    /// Identifier values, keyed by identifier field name.
    Identifier(BTreeMap<String, WireValue>),
}

///
/// LoadRequest
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoadRequest {
    pub class: EntityClass,
    pub criteria: Criteria,
    pub order_by: Vec<(String, SortDirection)>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl LoadRequest {
    /// Every entity of `class`.
    #[must_use]
    pub fn all(class: impl Into<EntityClass>) -> Self {
        Self {
            class: class.into(),
            criteria: Criteria::All,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Entities of `class` matching `conditions`.
    #[must_use]
    pub fn by<I, K>(class: impl Into<EntityClass>, conditions: I) -> Self
    where
        I: IntoIterator<Item = (K, WireValue)>,
        K: Into<String>,
    {
        Self {
            criteria: Criteria::Conditions(
                conditions.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ),
            ..Self::all(class)
        }
    }

    /// The entity of `class` with the given identifier values.
    #[must_use]
    pub fn by_id<I, K>(class: impl Into<EntityClass>, identifier: I) -> Self
    where
        I: IntoIterator<Item = (K, WireValue)>,
        K: Into<String>,
    {
        Self {
            criteria: Criteria::Identifier(
                identifier.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ),
            ..Self::all(class)
        }
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push((field.into(), direction));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

///
/// WireResponse
///
/// Raw payload plus how to read it: whether it carries a collection and
/// which envelope keys wrap the records.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WireResponse {
    pub body: Vec<u8>,
    pub is_collection: bool,
    pub envelopes: Vec<String>,
}

impl WireResponse {
    #[must_use]
    pub fn single(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            is_collection: false,
            envelopes: Vec::new(),
        }
    }

    #[must_use]
    pub fn collection(body: impl Into<Vec<u8>>) -> Self {
        Self {
            is_collection: true,
            ..Self::single(body)
        }
    }

    #[must_use]
    pub fn envelope<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.envelopes = keys.into_iter().map(Into::into).collect();
        self
    }
}

///
/// WireSource
///

pub trait WireSource: Send + Sync {
    fn fetch(&self, request: &LoadRequest) -> Result<WireResponse, InternalError>;
}
