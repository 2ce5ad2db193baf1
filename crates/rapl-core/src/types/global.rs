use crate::{error::InternalError, types::TypeRegistry};
use std::sync::{Arc, OnceLock};

static GLOBAL_TYPES: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

/// Process-wide registry. Initialised with the built-in types on first use
/// unless [`install_global`] ran before.
pub fn global() -> Arc<TypeRegistry> {
    Arc::clone(GLOBAL_TYPES.get_or_init(|| Arc::new(TypeRegistry::with_builtins())))
}

/// Install the process-wide registry. Must run during start-up, before the
/// first call to [`global`]; later calls are rejected.
pub fn install_global(registry: TypeRegistry) -> Result<(), InternalError> {
    GLOBAL_TYPES
        .set(Arc::new(registry))
        .map_err(|_| {
            InternalError::config_unsupported("global type registry already initialised")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_registry_is_shared_and_frozen_after_first_use() {
        let first = global();
        let second = global();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.contains("integer"));

        let err = install_global(TypeRegistry::new()).expect_err("install after use should fail");
        assert!(err.message.contains("already initialised"));
    }
}
