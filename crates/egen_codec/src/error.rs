use alloc::string::String;

use egen_io::IoError;
use thiserror::Error;

// -----------------------------------------------------------------------------
// ConfigError

/// A field cannot be resolved or emitted.
///
/// Fatal for that field: no partial operations are returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("field `{field}` is coded as Delta but carries no Delta annotation")]
    MissingDeltaAnnotation { field: String },

    #[error("field `{field}`: the Delta `value` argument must be a string")]
    MalformedDeltaArgument { field: String },

    #[error("field `{field}`: Delta baseline `{value}` is neither a field reference nor an integer of the declared width")]
    InvalidDeltaBaseline { field: String, value: String },

    #[error("field `{field}`: Delta baseline refers to `{reference}`, which is not a field of the class")]
    UnknownBaselineField { field: String, reference: String },

    #[error("field `{field}` of type `{ty}` must declare exactly {expected} type parameter(s)")]
    MalformedContainerType {
        field: String,
        ty: String,
        expected: usize,
    },

    #[error("field `{field}` of type `{ty}` is not a class type")]
    NotAClass { field: String, ty: String },

    #[error("strategy {strategy} does not apply to field `{field}` of type `{ty}`")]
    Inapplicable {
        field: String,
        strategy: &'static str,
        ty: String,
    },
}

// -----------------------------------------------------------------------------
// CodecError

/// Failure while executing generated operations against a stream.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum CodecError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("`{0}` is null but its encoding requires a value")]
    NullValue(String),

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: &'static str },

    #[error("`{0}` is not bound")]
    Unbound(String),

    #[error("class `{0}` is not registered as inline")]
    UnknownInlineClass(String),

    #[error("class `{0}` is not registered as ordinal")]
    UnknownOrdinalClass(String),

    #[error("no conversion registered under `{0}`")]
    UnknownConversion(String),

    #[error("conversion `{0}` rejected its input")]
    ConversionFailed(String),

    #[error("unknown object tag {0}")]
    UnknownObjectTag(u8),

    #[error("nesting exceeds {0} levels")]
    NestingTooDeep(usize),

    #[error("{0} elements do not fit a compact length")]
    SizeOverflow(usize),
}

impl CodecError {
    #[inline]
    pub(crate) fn mismatch(expected: impl Into<String>, found: &crate::value::Value) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.kind_name(),
        }
    }
}
