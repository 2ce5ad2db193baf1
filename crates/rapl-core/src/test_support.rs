//! Shared fixtures: a small `Book` / `Author` / `Address` schema.

use crate::{
    entity::EntityLayout,
    model::{EntityMetadata, MetadataFactory, MetadataRegistry},
    types::TypeRegistry,
};
use std::sync::Arc;

pub(crate) fn author_metadata() -> EntityMetadata {
    EntityMetadata::builder("Author")
        .scalar("id", "integer")
        .scalar("name", "string")
        .embed_one("address", "Address")
        .identifier(["id"])
        .build()
        .expect("author metadata should build")
}

pub(crate) fn book_metadata() -> EntityMetadata {
    EntityMetadata::builder("Book")
        .scalar("id", "integer")
        .scalar("title", "string")
        .scalar_as("published_at", "publishedAt", "datetime")
        .scalar_as("in_print", "inPrint", "boolean")
        .embed_one("author", "Author")
        .identifier(["id"])
        .build()
        .expect("book metadata should build")
}

/// Value object: no identifier fields.
pub(crate) fn address_metadata() -> EntityMetadata {
    EntityMetadata::builder("Address")
        .scalar("city", "string")
        .scalar("zip", "string")
        .build()
        .expect("address metadata should build")
}

/// Composite identity.
pub(crate) fn edition_metadata() -> EntityMetadata {
    EntityMetadata::builder("Edition")
        .scalar("isbn", "string")
        .scalar("printing", "integer")
        .scalar("copies", "integer")
        .identifier(["isbn", "printing"])
        .build()
        .expect("edition metadata should build")
}

pub(crate) fn metadata_registry() -> MetadataRegistry {
    let mut registry = MetadataRegistry::new();
    for meta in [
        author_metadata(),
        book_metadata(),
        address_metadata(),
        edition_metadata(),
    ] {
        registry
            .register(meta)
            .expect("fixture metadata should register");
    }

    registry
}

pub(crate) fn layout(class: &str) -> Arc<EntityLayout> {
    let metadata = metadata_registry()
        .metadata_for(class)
        .expect("fixture class should resolve");

    Arc::new(
        EntityLayout::new(metadata, &TypeRegistry::with_builtins())
            .expect("fixture layout should build"),
    )
}
