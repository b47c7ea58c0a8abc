//! Per-field strategy resolution.

use alloc::string::String;

// -----------------------------------------------------------------------------
// Modules

mod custom;
mod resolver;

// -----------------------------------------------------------------------------
// Exports

pub use custom::{Malformed, STRATEGY_META_SUFFIX, StrategyDescriptor};
pub use resolver::Resolver;

// -----------------------------------------------------------------------------
// Strategy

/// The integer width of compact and delta codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    Int,
    Long,
}

/// The value a scalar delta is taken against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Baseline {
    /// A constant, already checked against the field width.
    Literal(i64),
    /// Another field of the same object.
    Field(String),
}

/// How a `Delta` field is coded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeltaPlan {
    /// `int` or `long`, coded against a baseline.
    Scalar { width: IntWidth, baseline: Baseline },
    /// `int[]` or `long[]`, each element coded against its predecessor.
    Array { width: IntWidth },
}

/// The encoding bound to one field.
///
/// Produced by [`Resolver::resolve`], consumed exhaustively by
/// [`emit`](crate::emit::emit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Compact varint of an `int`, `long`, `Integer` or `Long`.
    CompactInteger(IntWidth),
    /// Length-prefixed UTF-8.
    CompactString,
    Delta(DeltaPlan),
    /// Marker byte, then the value's own write-state procedure.
    Inline,
    /// The value's code, `-1` for null.
    Ordinal,
    Custom(StrategyDescriptor),
    /// Size, then every element through the compact sub-resolution.
    Collection,
    Array,
    Map,
    /// The plain primitive codec, or the generic object codec.
    Common,
}

impl Strategy {
    /// A short name, for diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CompactInteger(_) => "CompactInteger",
            Self::CompactString => "CompactString",
            Self::Delta(_) => "Delta",
            Self::Inline => "Inline",
            Self::Ordinal => "Ordinal",
            Self::Custom(_) => "Custom",
            Self::Collection => "Collection",
            Self::Array => "Array",
            Self::Map => "Map",
            Self::Common => "Common",
        }
    }
}
