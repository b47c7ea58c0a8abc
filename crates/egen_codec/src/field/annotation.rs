use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::Deserialize;

// -----------------------------------------------------------------------------
// AnnotationValue

/// An argument value of an [`Annotation`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum AnnotationValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Nested(Annotation),
}

impl AnnotationValue {
    /// Returns the textual form of a constant argument.
    ///
    /// Nested annotations are not constants and yield `None`.
    pub fn as_constant(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Nested(_) => None,
        }
    }
}

impl From<&str> for AnnotationValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for AnnotationValue {
    #[inline]
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for AnnotationValue {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for AnnotationValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Annotation> for AnnotationValue {
    #[inline]
    fn from(value: Annotation) -> Self {
        Self::Nested(value)
    }
}

// -----------------------------------------------------------------------------
// Annotation

/// An annotation instance: its type name and named arguments.
///
/// # Example
///
/// ```
/// use egen_codec::field::{Annotation, AnnotationValue};
///
/// let delta = Annotation::new("egen.Delta").with_arg("value", "100");
/// assert_eq!(delta.simple_name(), "Delta");
/// assert_eq!(delta.arg("value"), Some(&AnnotationValue::Str("100".into())));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Annotation {
    ty: String,
    #[serde(default)]
    args: Vec<(String, AnnotationValue)>,
}

impl Annotation {
    #[inline]
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            args: Vec::new(),
        }
    }

    /// Adds an argument, replacing an earlier one with the same name.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<AnnotationValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.args.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.args.push((name, value)),
        }
        self
    }

    /// The annotation type name as written.
    #[inline]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// The last `.`-separated segment of the type name.
    #[inline]
    pub fn simple_name(&self) -> &str {
        simple_name(&self.ty)
    }

    #[inline]
    pub fn args(&self) -> &[(String, AnnotationValue)] {
        &self.args
    }

    pub fn arg(&self, name: &str) -> Option<&AnnotationValue> {
        self.args.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// The last `.`-separated segment of a type name.
#[inline]
pub(crate) fn simple_name(ty: &str) -> &str {
    ty.rsplit('.').next().unwrap_or(ty)
}

// -----------------------------------------------------------------------------
// AnnotationKind

/// The four field annotations understood by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Compact,
    Delta,
    Inline,
    Ordinal,
}

impl AnnotationKind {
    /// Highest precedence first.
    pub const PRECEDENCE: [Self; 4] = [Self::Compact, Self::Delta, Self::Inline, Self::Ordinal];

    /// Matches the simple name of an annotation type.
    pub fn from_type_name(ty: &str) -> Option<Self> {
        match simple_name(ty) {
            "Compact" => Some(Self::Compact),
            "Delta" => Some(Self::Delta),
            "Inline" => Some(Self::Inline),
            "Ordinal" => Some(Self::Ordinal),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Compact => "Compact",
            Self::Delta => "Delta",
            Self::Inline => "Inline",
            Self::Ordinal => "Ordinal",
        }
    }
}
