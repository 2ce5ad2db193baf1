//! Wire decoding.
//!
//! Format-level only: turns payload bytes into a generic [`WireValue`]. Which
//! decoder runs is chosen by the entity metadata's declared [`WireFormat`];
//! nothing downstream of decode depends on the format.

mod json;

use crate::{error::ErrorClass, model::WireFormat, value::WireValue};
use thiserror::Error as ThisError;

// re-exports
pub use json::JsonDecoder;

///
/// DecodeError
///

#[derive(Debug, ThisError)]
pub enum DecodeError {
    #[error("malformed {format} payload: {message}")]
    Malformed { format: WireFormat, message: String },

    #[error("payload size limit exceeded: {len} bytes (limit {max_bytes})")]
    SizeLimitExceeded { len: usize, max_bytes: usize },
}

impl DecodeError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::Malformed { .. } => ErrorClass::Internal,
            Self::SizeLimitExceeded { .. } => ErrorClass::Unsupported,
        }
    }
}

///
/// WireDecoder
///

pub trait WireDecoder: Send + Sync {
    fn format(&self) -> WireFormat;

    fn decode(&self, bytes: &[u8]) -> Result<WireValue, DecodeError>;
}

/// Decoder for a declared wire format.
#[must_use]
pub fn decoder_for(format: WireFormat) -> &'static dyn WireDecoder {
    match format {
        WireFormat::Json => &JsonDecoder,
    }
}

/// Decode `bytes` as `format`, rejecting payloads above `max_bytes`.
///
/// Size limits are caller policy, not format policy.
pub fn decode_bounded(
    format: WireFormat,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<WireValue, DecodeError> {
    if bytes.len() > max_bytes {
        return Err(DecodeError::SizeLimitExceeded {
            len: bytes.len(),
            max_bytes,
        });
    }

    decoder_for(format).decode(bytes)
}

///
/// WirePayload
///
/// Input to hydration: raw bytes still to be decoded, or an already decoded
/// structure (e.g. from a cache).
///

#[derive(Clone, Debug)]
pub enum WirePayload<'a> {
    Raw(&'a [u8]),
    Decoded(WireValue),
}

impl<'a> From<&'a [u8]> for WirePayload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Raw(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for WirePayload<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Raw(bytes)
    }
}

impl<'a> From<&'a str> for WirePayload<'a> {
    fn from(text: &'a str) -> Self {
        Self::Raw(text.as_bytes())
    }
}

impl From<WireValue> for WirePayload<'_> {
    fn from(value: WireValue) -> Self {
        Self::Decoded(value)
    }
}
