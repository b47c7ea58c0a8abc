use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;

use super::{Annotation, AnnotationKind};
use crate::types::FieldType;

// -----------------------------------------------------------------------------
// Binding

/// How the emitted code reaches the value.
///
/// This only changes the emitted [`Place`](crate::emit::Place),
/// never the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Binding {
    /// `self.<name>`
    #[default]
    SelfField,
    /// A bare local variable.
    Local,
}

// -----------------------------------------------------------------------------
// FieldDescriptor

/// Static metadata of one serializable field.
///
/// # Example
///
/// ```
/// use egen_codec::field::{Annotation, AnnotationKind, FieldDescriptor};
/// use egen_codec::types::{FieldType, ScalarKind};
///
/// let field = FieldDescriptor::new("count", FieldType::Scalar(ScalarKind::Int))
///     .with_annotation(Annotation::new("Compact"));
///
/// assert_eq!(field.annotation_kind(), Some(AnnotationKind::Compact));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDescriptor {
    name: String,
    ty: FieldType,
    #[serde(default)]
    annotations: Vec<Annotation>,
    #[serde(default)]
    binding: Binding,
}

impl FieldDescriptor {
    #[inline]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
            binding: Binding::SelfField,
        }
    }

    #[inline]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[inline]
    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.binding = binding;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    #[inline]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    #[inline]
    pub fn binding(&self) -> Binding {
        self.binding
    }

    /// The highest-precedence field annotation present, if any.
    pub fn annotation_kind(&self) -> Option<AnnotationKind> {
        AnnotationKind::PRECEDENCE
            .into_iter()
            .find(|kind| self.annotation(*kind).is_some())
    }

    /// The first annotation of the given kind.
    pub fn annotation(&self, kind: AnnotationKind) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|a| AnnotationKind::from_type_name(a.ty()) == Some(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::FieldDescriptor;
    use crate::field::{Annotation, AnnotationKind};
    use crate::types::FieldType;

    #[test]
    fn precedence() {
        let field = FieldDescriptor::new("x", FieldType::class("Color"))
            .with_annotation(Annotation::new("Ordinal"))
            .with_annotation(Annotation::new("Inline"));
        assert_eq!(field.annotation_kind(), Some(AnnotationKind::Inline));

        let field = field.with_annotation(Annotation::new("egen.Compact"));
        assert_eq!(field.annotation_kind(), Some(AnnotationKind::Compact));
    }

    #[test]
    fn unrelated_annotations() {
        let field = FieldDescriptor::new("x", FieldType::String)
            .with_annotation(Annotation::new("Deprecated"));
        assert_eq!(field.annotation_kind(), None);
    }
}
