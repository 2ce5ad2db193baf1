//! Core runtime for RAPL: maps REST API responses onto entities and keeps one
//! canonical in-memory instance per entity identity for the life of a session.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod codec;
pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod mapper;
pub mod model;
pub mod obs;
pub mod session;
pub mod source;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, codecs, sinks, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        entity::{EntityRef, FieldAccessible, FieldSet},
        model::{EntityMetadata, MetadataRegistry},
        session::Session,
        value::Value,
    };
}
