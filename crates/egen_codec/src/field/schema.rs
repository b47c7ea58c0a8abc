use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;

use super::FieldDescriptor;

// -----------------------------------------------------------------------------
// ClassSchema

/// The ordered serializable fields of a class.
///
/// Registering a schema as inline in the
/// [`TypeRegistry`](crate::registry::TypeRegistry) makes the class
/// self-serializable: nested values are written through its own
/// write-state procedure instead of the generic object codec.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassSchema {
    name: String,
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
}

impl ClassSchema {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    #[inline]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }
}
