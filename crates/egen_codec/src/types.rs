//! Declared field types.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::Deserialize;

// -----------------------------------------------------------------------------
// ScalarKind

/// A fixed-width scalar, the payload of both primitive and boxed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ScalarKind {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl ScalarKind {
    /// The lower-case primitive spelling, e.g. `int`.
    pub const fn primitive_name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// The boxed spelling, e.g. `Integer`.
    pub const fn boxed_name(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Char => "Character",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Int => "Integer",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
        }
    }
}

// -----------------------------------------------------------------------------
// FieldType

/// The declared type of a field.
///
/// Class names are compared verbatim against the
/// [`TypeRegistry`](crate::registry::TypeRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub enum FieldType {
    /// A primitive scalar, never null.
    Scalar(ScalarKind),
    /// A boxed scalar, may be null.
    Boxed(ScalarKind),
    String,
    /// `T[]`.
    Array(Box<FieldType>),
    /// A parameterized class such as `ArrayList<String>`.
    Generic { class: String, args: Vec<FieldType> },
    /// A reference to a declared class.
    Class(String),
}

impl FieldType {
    #[inline]
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    #[inline]
    pub fn array(element: FieldType) -> Self {
        Self::Array(Box::new(element))
    }

    #[inline]
    pub fn generic(class: impl Into<String>, args: impl IntoIterator<Item = FieldType>) -> Self {
        Self::Generic {
            class: class.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Returns the class name used for registry lookups.
    ///
    /// Scalars, strings and arrays have none.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Class(name) | Self::Generic { class: name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Returns `true` if a value of this type may be null.
    #[inline]
    pub const fn is_nullable(&self) -> bool {
        !matches!(self, Self::Scalar(_))
    }

    /// Returns the element type of an array.
    pub fn element(&self) -> Option<&FieldType> {
        match self {
            Self::Array(element) => Some(element.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.write_str(kind.primitive_name()),
            Self::Boxed(kind) => f.write_str(kind.boxed_name()),
            Self::String => f.write_str("String"),
            Self::Array(element) => write!(f, "{element}[]"),
            Self::Generic { class, args } => {
                write!(f, "{class}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Self::Class(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{FieldType, ScalarKind};

    #[test]
    fn display() {
        let ty = FieldType::generic(
            "HashMap",
            [FieldType::String, FieldType::array(FieldType::Scalar(ScalarKind::Int))],
        );
        assert_eq!(ty.to_string(), "HashMap<String, int[]>");
        assert_eq!(FieldType::Boxed(ScalarKind::Int).to_string(), "Integer");
    }

    #[test]
    fn class_name() {
        assert_eq!(FieldType::class("Point").class_name(), Some("Point"));
        assert_eq!(
            FieldType::generic("ArrayList", [FieldType::String]).class_name(),
            Some("ArrayList")
        );
        assert_eq!(FieldType::String.class_name(), None);
        assert!(!FieldType::Scalar(ScalarKind::Long).is_nullable());
    }
}
