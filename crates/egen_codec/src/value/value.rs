use alloc::string::String;
use alloc::vec::Vec;

use super::{DynamicCollection, DynamicMap, DynamicObject};
use crate::types::{FieldType, ScalarKind};

// -----------------------------------------------------------------------------
// Value

/// A runtime value the generated operations read from and assign to.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    /// A UTF-16 code unit.
    Char(u16),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Array(Vec<Value>),
    Collection(DynamicCollection),
    Map(DynamicMap),
    Object(DynamicObject),
    /// An enumerable value identified by its code.
    Ordinal { class: String, code: i32 },
}

impl Value {
    /// The zero value of a declared type: `0`/`false` for scalars, null otherwise.
    pub fn default_of(ty: &FieldType) -> Self {
        match ty {
            FieldType::Scalar(kind) => match kind {
                ScalarKind::Boolean => Self::Boolean(false),
                ScalarKind::Char => Self::Char(0),
                ScalarKind::Byte => Self::Byte(0),
                ScalarKind::Short => Self::Short(0),
                ScalarKind::Int => Self::Int(0),
                ScalarKind::Long => Self::Long(0),
                ScalarKind::Float => Self::Float(0.0),
                ScalarKind::Double => Self::Double(0.0),
            },
            _ => Self::Null,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short name of the variant, for diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Char(_) => "char",
            Self::Byte(_) => "byte",
            Self::Short(_) => "short",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Str(_) => "String",
            Self::Array(_) => "array",
            Self::Collection(_) => "collection",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
            Self::Ordinal { .. } => "ordinal",
        }
    }

    /// The scalar kind carried by this value, if it is a scalar.
    pub const fn scalar_kind(&self) -> Option<ScalarKind> {
        Some(match self {
            Self::Boolean(_) => ScalarKind::Boolean,
            Self::Char(_) => ScalarKind::Char,
            Self::Byte(_) => ScalarKind::Byte,
            Self::Short(_) => ScalarKind::Short,
            Self::Int(_) => ScalarKind::Int,
            Self::Long(_) => ScalarKind::Long,
            Self::Float(_) => ScalarKind::Float,
            Self::Double(_) => ScalarKind::Double,
            _ => return None,
        })
    }

    /// Integral values that fit an `i32`.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Self::Byte(v) => Some(v as i32),
            Self::Short(v) => Some(v as i32),
            Self::Int(v) => Some(v),
            Self::Long(v) => i32::try_from(v).ok(),
            _ => None,
        }
    }

    /// Any integral value widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Byte(v) => Some(v as i64),
            Self::Short(v) => Some(v as i64),
            Self::Int(v) => Some(v as i64),
            Self::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The element count of an array, collection or map.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Array(items) => Some(items.len()),
            Self::Collection(c) => Some(c.len()),
            Self::Map(m) => Some(m.len()),
            _ => None,
        }
    }

    /// Returns `true` if the value may be stored in a field of type `ty`.
    ///
    /// Containers are checked shallowly, elements are not visited.
    pub fn conforms_to(&self, ty: &FieldType) -> bool {
        match (self, ty) {
            (Self::Null, ty) => ty.is_nullable(),
            (value, FieldType::Scalar(kind) | FieldType::Boxed(kind)) => {
                value.scalar_kind() == Some(*kind)
            }
            (Self::Str(_), FieldType::String) => true,
            (Self::Array(_), FieldType::Array(_)) => true,
            (Self::Collection(c), _) => ty.class_name() == Some(c.class()),
            (Self::Map(m), _) => ty.class_name() == Some(m.class()),
            (Self::Object(o), FieldType::Class(name)) => o.class() == name,
            (Self::Ordinal { class, .. }, FieldType::Class(name)) => class == name,
            _ => false,
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => Str,
    DynamicCollection => Collection,
    DynamicMap => Map,
    DynamicObject => Object,
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    #[inline]
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::Value;
    use crate::types::{FieldType, ScalarKind};
    use crate::value::{DynamicCollection, DynamicObject};

    #[test]
    fn defaults() {
        assert_eq!(Value::default_of(&FieldType::Scalar(ScalarKind::Int)), Value::Int(0));
        assert_eq!(Value::default_of(&FieldType::Boxed(ScalarKind::Int)), Value::Null);
        assert_eq!(Value::default_of(&FieldType::String), Value::Null);
    }

    #[test]
    fn conformance() {
        let int = FieldType::Scalar(ScalarKind::Int);
        assert!(Value::Int(1).conforms_to(&int));
        assert!(!Value::Long(1).conforms_to(&int));
        assert!(!Value::Null.conforms_to(&int));
        assert!(Value::Null.conforms_to(&FieldType::Boxed(ScalarKind::Int)));

        let list = FieldType::generic("ArrayList", [FieldType::String]);
        let value = Value::from(DynamicCollection::new("ArrayList"));
        assert!(value.conforms_to(&list));
        assert!(!value.conforms_to(&FieldType::generic("HashSet", [FieldType::String])));

        let point = Value::from(DynamicObject::new("Point"));
        assert!(point.conforms_to(&FieldType::class("Point")));
        assert!(!point.conforms_to(&FieldType::String));
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::from(Some(3_i32)), Value::Int(3));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(vec![1_i64, 2]).len(), Some(2));
        assert_eq!(Value::Long(i64::MAX).as_i32(), None);
        assert_eq!(Value::Short(-2).as_i64(), Some(-2));
    }
}
