//! Session configuration.

use crate::error::InternalError;
use serde::{Deserialize, Serialize};

///
/// CONSTANTS
///

/// Default upper bound on a single wire payload.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 8 * 1024 * 1024;

///
/// InvalidValuePolicy
///
/// What to do with a record whose value fails its declared type conversion.
/// Neither policy substitutes a default value.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidValuePolicy {
    /// Fail the whole hydrate call.
    #[default]
    FailBatch,

    /// Drop the offending record and keep going.
    SkipRecord,
}

///
/// SessionConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Payloads larger than this fail to decode.
    pub max_payload_bytes: usize,

    pub invalid_value: InvalidValuePolicy,

    /// Reject collection hydration when the unwrapped value is not a
    /// sequence. When false such payloads hydrate to nothing.
    pub strict_collections: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            invalid_value: InvalidValuePolicy::default(),
            strict_collections: false,
        }
    }
}

impl SessionConfig {
    /// Parse a JSON config document; absent keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, InternalError> {
        serde_json::from_str(text).map_err(|err| {
            InternalError::config_unsupported(format!("invalid session config: {err}"))
        })
    }
}
