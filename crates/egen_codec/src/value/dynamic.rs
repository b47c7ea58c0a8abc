use alloc::string::String;
use alloc::vec::Vec;

use super::Value;
use crate::field::ClassSchema;

// -----------------------------------------------------------------------------
// DynamicObject

/// An instance of a declared class: its class name and named field values.
///
/// Field order is preserved.
///
/// # Example
///
/// ```
/// use egen_codec::value::{DynamicObject, Value};
///
/// let mut point = DynamicObject::new("Point").with_field("x", 1).with_field("y", 2);
/// point.set("x", 5);
///
/// assert_eq!(point.get("x"), Some(&Value::Int(5)));
/// assert_eq!(point.get("z"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicObject {
    class: String,
    fields: Vec<(String, Value)>,
}

impl DynamicObject {
    #[inline]
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: Vec::new(),
        }
    }

    /// A fresh instance with every schema field at its zero value.
    pub fn from_schema(schema: &ClassSchema) -> Self {
        Self {
            class: schema.name().into(),
            fields: schema
                .fields()
                .iter()
                .map(|f| (f.name().into(), Value::default_of(f.ty())))
                .collect(),
        }
    }

    #[inline]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    #[inline]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[inline]
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Assigns a field, appending it if it does not exist yet.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.get_mut(&name) {
            Some(slot) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }
}

// -----------------------------------------------------------------------------
// DynamicCollection

/// An instance of a collection class, kept in iteration order.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicCollection {
    class: String,
    items: Vec<Value>,
}

impl DynamicCollection {
    #[inline]
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            items: Vec::new(),
        }
    }

    pub fn from_items<T: Into<Value>>(class: impl Into<String>, items: impl IntoIterator<Item = T>) -> Self {
        Self {
            class: class.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[inline]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// -----------------------------------------------------------------------------
// DynamicMap

/// An instance of a map class, kept in iteration order.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMap {
    class: String,
    entries: Vec<(Value, Value)>,
}

impl DynamicMap {
    #[inline]
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn with_entry(mut self, key: impl Into<Value>, value: impl Into<Value>) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[inline]
    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Inserts an entry, replacing the value of an equal key in place.
    pub fn insert(&mut self, key: Value, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
