//! Field metadata: declared annotations, descriptors and class schemas.

// -----------------------------------------------------------------------------
// Modules

mod annotation;
mod descriptor;
mod schema;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use annotation::simple_name;

pub use annotation::{Annotation, AnnotationKind, AnnotationValue};
pub use descriptor::{Binding, FieldDescriptor};
pub use schema::ClassSchema;
