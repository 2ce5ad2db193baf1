use crate::{
    codec::DecodeError, identity::IdentityError, mapper::MapperError, model::MetadataError,
    source::SourceError, types::TypeError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable classification.
/// Subsystem errors convert into this type at module boundaries; the typed
/// original is kept in `detail` so callers can still match on it.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    #[must_use]
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    fn with_detail(class: ErrorClass, origin: ErrorOrigin, detail: ErrorDetail) -> Self {
        Self {
            class,
            origin,
            message: detail.to_string(),
            detail: Some(detail),
        }
    }

    /// Construct a config-origin unsupported error.
    pub(crate) fn config_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Config, message)
    }

    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self.detail, Some(ErrorDetail::Decode(_)))
    }

    #[must_use]
    pub const fn is_unknown_type(&self) -> bool {
        matches!(
            self.detail,
            Some(
                ErrorDetail::Type(TypeError::UnknownType { .. })
                    | ErrorDetail::Mapper(MapperError::UnknownFieldType { .. })
                    | ErrorDetail::Metadata(MetadataError::UnknownFieldType { .. })
            )
        )
    }

    #[must_use]
    pub const fn is_invalid_value(&self) -> bool {
        matches!(self.class, ErrorClass::InvalidValue)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Type(TypeError),
    #[error("{0}")]
    Decode(DecodeError),
    #[error("{0}")]
    Metadata(MetadataError),
    #[error("{0}")]
    Mapper(MapperError),
    #[error("{0}")]
    Identity(IdentityError),
    #[error("{0}")]
    Source(SourceError),
}

impl From<TypeError> for InternalError {
    fn from(err: TypeError) -> Self {
        Self::with_detail(err.class(), ErrorOrigin::Type, ErrorDetail::Type(err))
    }
}

impl From<DecodeError> for InternalError {
    fn from(err: DecodeError) -> Self {
        Self::with_detail(err.class(), ErrorOrigin::Decode, ErrorDetail::Decode(err))
    }
}

impl From<MetadataError> for InternalError {
    fn from(err: MetadataError) -> Self {
        Self::with_detail(
            err.class(),
            ErrorOrigin::Metadata,
            ErrorDetail::Metadata(err),
        )
    }
}

impl From<MapperError> for InternalError {
    fn from(err: MapperError) -> Self {
        Self::with_detail(err.class(), ErrorOrigin::Mapper, ErrorDetail::Mapper(err))
    }
}

impl From<IdentityError> for InternalError {
    fn from(err: IdentityError) -> Self {
        Self::with_detail(
            err.class(),
            ErrorOrigin::Identity,
            ErrorDetail::Identity(err),
        )
    }
}

impl From<SourceError> for InternalError {
    fn from(err: SourceError) -> Self {
        Self::with_detail(err.class(), ErrorOrigin::Source, ErrorDetail::Source(err))
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Internal,
    NotFound,
    Conflict,
    Unsupported,
    InvariantViolation,
    /// A concrete wire value failed its declared conversion.
    InvalidValue,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Internal => "internal",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
            Self::InvalidValue => "invalid_value",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Subsystem that raised the error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Type,
    Decode,
    Metadata,
    Mapper,
    Identity,
    Source,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Type => "type",
            Self::Decode => "decode",
            Self::Metadata => "metadata",
            Self::Mapper => "mapper",
            Self::Identity => "identity",
            Self::Source => "source",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}
