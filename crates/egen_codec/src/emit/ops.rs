use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::strategy::{Baseline, IntWidth};
use crate::types::{FieldType, ScalarKind};

// -----------------------------------------------------------------------------
// PrimitiveCodec

/// A primitive writer/reader pair of the byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveCodec {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    CompactInt,
    CompactLong,
    /// Length-prefixed UTF-8, `-1` for null.
    UtfString,
    /// The tagged generic object codec.
    Object,
}

impl PrimitiveCodec {
    /// Parses the `targetStrategy` name of a custom strategy.
    pub fn from_target_name(name: &str) -> Option<Self> {
        Some(match name {
            "Boolean" => Self::Boolean,
            "Byte" => Self::Byte,
            "Short" => Self::Short,
            "Char" => Self::Char,
            "Int" => Self::Int,
            "Long" => Self::Long,
            "Float" => Self::Float,
            "Double" => Self::Double,
            "CompactInt" => Self::CompactInt,
            "CompactLong" => Self::CompactLong,
            "String" | "UTFString" => Self::UtfString,
            "Object" => Self::Object,
            _ => return None,
        })
    }

    /// The fixed-width codec of a scalar.
    pub const fn scalar(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Boolean => Self::Boolean,
            ScalarKind::Char => Self::Char,
            ScalarKind::Byte => Self::Byte,
            ScalarKind::Short => Self::Short,
            ScalarKind::Int => Self::Int,
            ScalarKind::Long => Self::Long,
            ScalarKind::Float => Self::Float,
            ScalarKind::Double => Self::Double,
        }
    }

    pub const fn compact(width: IntWidth) -> Self {
        match width {
            IntWidth::Int => Self::CompactInt,
            IntWidth::Long => Self::CompactLong,
        }
    }
}

// -----------------------------------------------------------------------------
// Places and operands

/// A temporary or local variable name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a value is read from or assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Place {
    /// `self.<name>`
    Field(String),
    Local(Symbol),
}

impl Place {
    /// The place of a symbol.
    #[inline]
    pub fn local(symbol: &Symbol) -> Self {
        Self::Local(symbol.clone())
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "self.{name}"),
            Self::Local(symbol) => write!(f, "{symbol}"),
        }
    }
}

/// The argument of a primitive write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Value(Place),
    Literal(i32),
    /// `size()` of a collection or map, `length` of an array.
    Size(Place),
    /// `code()` of an ordinal value.
    Code(Place),
    /// A registered conversion applied to another operand.
    Converted { function: String, value: Box<Operand> },
}

// -----------------------------------------------------------------------------
// Write operations

/// One step of a field's write procedure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WriteOp {
    Write {
        codec: PrimitiveCodec,
        operand: Operand,
    },
    /// Compact delta of `value` against `baseline`.
    WriteDelta {
        width: IntWidth,
        value: Place,
        baseline: Baseline,
    },
    /// Compact delta array, `-1` length for null.
    WriteDeltaArray { width: IntWidth, value: Place },
    /// Invokes the value's own write-state procedure.
    WriteInline { value: Place, top_level: bool },
    IfPresent {
        value: Place,
        present: Vec<WriteOp>,
        absent: Vec<WriteOp>,
    },
    /// Iterates a collection or an array in its native order.
    ForEach {
        source: Place,
        element: Symbol,
        body: Vec<WriteOp>,
    },
    /// Iterates the entries of a map in its native order.
    ForEachEntry {
        source: Place,
        key: Symbol,
        value: Symbol,
        body: Vec<WriteOp>,
    },
}

// -----------------------------------------------------------------------------
// Read operations

/// A value produced while reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReadExpr {
    Read(PrimitiveCodec),
    /// A generic object narrowed to the declared type.
    Narrowed(FieldType),
    Delta { width: IntWidth, baseline: Baseline },
    DeltaArray(IntWidth),
    /// A registered conversion applied to another read.
    Converted { function: String, value: Box<ReadExpr> },
    /// `findByCode(class, code)`.
    FindByCode { class: String, code: Symbol },
    /// A fresh instance of an inline class.
    NewInstance(String),
    NewCollection(String),
    NewMap(String),
    /// An array of `len` elements.
    NewArray { element: FieldType, len: Symbol },
    /// The zero value of a type.
    Default(FieldType),
    Null,
}

/// One step of a field's read procedure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReadOp {
    Let {
        symbol: Symbol,
        expr: ReadExpr,
    },
    Assign {
        place: Place,
        expr: ReadExpr,
    },
    /// Invokes the read-state procedure of the instance at `target`.
    ReadInline { target: Place },
    IfNotSentinel {
        symbol: Symbol,
        sentinel: i32,
        then: Vec<ReadOp>,
        otherwise: Vec<ReadOp>,
    },
    /// Runs `body` `count` times, `index` counting from zero.
    Repeat {
        count: Symbol,
        index: Symbol,
        body: Vec<ReadOp>,
    },
    /// `target.add(element)`
    Push { target: Place, element: Symbol },
    /// `target[index] = element`
    Store {
        target: Place,
        index: Symbol,
        element: Symbol,
    },
    /// `target.put(key, value)`
    Insert {
        target: Place,
        key: Symbol,
        value: Symbol,
    },
}

// -----------------------------------------------------------------------------
// FieldOps

/// The paired write and read procedures of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldOps {
    pub write: Vec<WriteOp>,
    pub read: Vec<ReadOp>,
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{Place, PrimitiveCodec, Symbol};

    #[test]
    fn target_names() {
        assert_eq!(PrimitiveCodec::from_target_name("UTFString"), Some(PrimitiveCodec::UtfString));
        assert_eq!(PrimitiveCodec::from_target_name("String"), Some(PrimitiveCodec::UtfString));
        assert_eq!(PrimitiveCodec::from_target_name("CompactInt"), Some(PrimitiveCodec::CompactInt));
        assert_eq!(PrimitiveCodec::from_target_name("int"), None);
    }

    #[test]
    fn display() {
        assert_eq!(Place::Field("xs".into()).to_string(), "self.xs");
        assert_eq!(Place::local(&Symbol::new("xs$size0")).to_string(), "xs$size0");
    }
}
