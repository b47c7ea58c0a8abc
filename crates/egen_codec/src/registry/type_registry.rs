use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use egen_utils::hash::{HashMap, HashSet, new_map, new_set};

use serde::Deserialize;

use super::{CodeTable, OrdinalLookup};
use crate::config::Manifest;
use crate::field::{Annotation, ClassSchema};
use crate::types::FieldType;
use crate::value::Value;

/// Collection classes known without registration.
///
/// `List` and `Set` are declared types, read back as a collection of the
/// same name.
pub const BUILTIN_COLLECTIONS: [&str; 6] = ["ArrayList", "LinkedList", "HashSet", "TreeSet", "List", "Set"];

/// Map classes known without registration.
pub const BUILTIN_MAPS: [&str; 3] = ["HashMap", "TreeMap", "Map"];

/// Declared supertypes known without registration.
pub const BUILTIN_SUPERTYPES: [(&str, Supertype); 7] = [
    ("Object", Supertype::Any),
    ("Iterable", Supertype::Collection),
    ("Collection", Supertype::Collection),
    ("List", Supertype::Collection),
    ("Set", Supertype::Collection),
    ("Queue", Supertype::Collection),
    ("Map", Supertype::Map),
];

// -----------------------------------------------------------------------------
// Supertype

/// The values a declared supertype accepts when a generically read object is
/// narrowed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Supertype {
    /// Every value.
    Any,
    /// Any collection instance.
    Collection,
    /// Any map instance.
    Map,
    /// Any declared class instance, including ordinals.
    Object,
}

impl Supertype {
    pub const fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Collection => matches!(value, Value::Null | Value::Collection(_)),
            Self::Map => matches!(value, Value::Null | Value::Map(_)),
            Self::Object => matches!(value, Value::Null | Value::Object(_) | Value::Ordinal { .. }),
        }
    }
}

/// A conversion between a field value and a custom strategy's target value.
///
/// Returns `None` when the input cannot be converted.
pub type Conversion = fn(&Value) -> Option<Value>;

// -----------------------------------------------------------------------------
// TypeRegistry

/// The external metadata the resolver and the runtime consult.
///
/// - inline classes: self-serializable classes, with their [`ClassSchema`].
/// - ordinal classes: enumerable classes, with their [`OrdinalLookup`].
/// - collection and map classes, pre-populated with
///   [`BUILTIN_COLLECTIONS`] and [`BUILTIN_MAPS`].
/// - supertype names, pre-populated with [`BUILTIN_SUPERTYPES`].
/// - annotation types, with their own meta-annotations.
/// - named [`Conversion`]s referenced by custom strategies.
///
/// # Example
///
/// ```
/// use egen_codec::registry::{CodeTable, TypeRegistry};
/// use egen_codec::types::FieldType;
///
/// let mut registry = TypeRegistry::new();
/// registry.register_ordinal("Color", CodeTable::new([0, 1, 2]));
///
/// assert!(registry.is_ordinal(&FieldType::class("Color")));
/// assert!(registry.is_collection(&FieldType::generic("ArrayList", [FieldType::String])));
/// assert!(!registry.is_map(&FieldType::class("Color")));
/// ```
pub struct TypeRegistry {
    inline_classes: HashMap<String, ClassSchema>,
    ordinals: HashMap<String, Box<dyn OrdinalLookup>>,
    collections: HashSet<String>,
    maps: HashSet<String>,
    supertypes: HashMap<String, Supertype>,
    annotation_types: HashMap<String, Vec<Annotation>>,
    conversions: HashMap<String, Conversion>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry without any entry, not even the built-in containers.
    pub fn empty() -> Self {
        Self {
            inline_classes: new_map(),
            ordinals: new_map(),
            collections: new_set(),
            maps: new_set(),
            supertypes: new_map(),
            annotation_types: new_map(),
            conversions: new_map(),
        }
    }

    /// Create a registry with the built-in collection, map and supertype names.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for name in BUILTIN_COLLECTIONS {
            registry.register_collection(name);
        }
        for name in BUILTIN_MAPS {
            registry.register_map(name);
        }
        for (name, supertype) in BUILTIN_SUPERTYPES {
            registry.register_supertype(name, supertype);
        }
        registry
    }

    /// Registers a self-serializable class, replacing an earlier schema.
    pub fn register_inline(&mut self, schema: ClassSchema) {
        self.inline_classes.insert(schema.name().into(), schema);
    }

    pub fn register_ordinal(&mut self, class: impl Into<String>, lookup: impl OrdinalLookup + 'static) {
        self.ordinals.insert(class.into(), Box::new(lookup));
    }

    pub fn register_collection(&mut self, class: impl Into<String>) {
        self.collections.insert(class.into());
    }

    pub fn register_map(&mut self, class: impl Into<String>) {
        self.maps.insert(class.into());
    }

    /// Declares a class name that generically read values narrow to by shape.
    pub fn register_supertype(&mut self, class: impl Into<String>, supertype: Supertype) {
        self.supertypes.insert(class.into(), supertype);
    }

    /// Declares an annotation type together with the annotations placed on it.
    pub fn register_annotation_type(
        &mut self,
        name: impl Into<String>,
        meta: impl IntoIterator<Item = Annotation>,
    ) {
        self.annotation_types
            .insert(name.into(), meta.into_iter().collect());
    }

    pub fn register_conversion(&mut self, path: impl Into<String>, conversion: Conversion) {
        self.conversions.insert(path.into(), conversion);
    }

    /// Applies every entry of a [`Manifest`].
    pub fn apply_manifest(&mut self, manifest: Manifest) {
        let Manifest {
            inline,
            ordinals,
            collections,
            maps,
            supertypes,
            annotation_types,
        } = manifest;

        for schema in inline {
            self.register_inline(schema);
        }
        for (class, codes) in ordinals {
            self.register_ordinal(class, CodeTable::new(codes));
        }
        for class in collections {
            self.register_collection(class);
        }
        for class in maps {
            self.register_map(class);
        }
        for (class, supertype) in supertypes {
            self.register_supertype(class, supertype);
        }
        for decl in annotation_types {
            self.register_annotation_type(decl.name, decl.meta);
        }
    }

    // -------------------------------------------------------------------------
    // Queries

    #[inline]
    pub fn is_inline(&self, ty: &FieldType) -> bool {
        ty.class_name()
            .is_some_and(|name| self.inline_classes.contains_key(name))
    }

    #[inline]
    pub fn inline_schema(&self, class: &str) -> Option<&ClassSchema> {
        self.inline_classes.get(class)
    }

    #[inline]
    pub fn is_ordinal(&self, ty: &FieldType) -> bool {
        ty.class_name()
            .is_some_and(|name| self.ordinals.contains_key(name))
    }

    #[inline]
    pub fn ordinal(&self, class: &str) -> Option<&dyn OrdinalLookup> {
        self.ordinals.get(class).map(|lookup| &**lookup)
    }

    #[inline]
    pub fn is_collection(&self, ty: &FieldType) -> bool {
        ty.class_name()
            .is_some_and(|name| self.collections.contains(name))
    }

    #[inline]
    pub fn is_map(&self, ty: &FieldType) -> bool {
        ty.class_name().is_some_and(|name| self.maps.contains(name))
    }

    #[inline]
    pub fn supertype(&self, class: &str) -> Option<Supertype> {
        self.supertypes.get(class).copied()
    }

    /// Returns `true` if `value` may be assigned to a field of type `ty`.
    ///
    /// Exact conformance first, then the supertype declared for the class
    /// name of `ty`, if any.
    pub fn narrows_to(&self, value: &Value, ty: &FieldType) -> bool {
        value.conforms_to(ty)
            || ty
                .class_name()
                .and_then(|name| self.supertype(name))
                .is_some_and(|supertype| supertype.accepts(value))
    }

    /// The meta-annotations of a declared annotation type.
    #[inline]
    pub fn annotation_meta(&self, annotation_type: &str) -> Option<&[Annotation]> {
        self.annotation_types
            .get(annotation_type)
            .map(Vec::as_slice)
    }

    #[inline]
    pub fn conversion(&self, path: &str) -> Option<Conversion> {
        self.conversions.get(path).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{Supertype, TypeRegistry};
    use crate::field::{ClassSchema, FieldDescriptor};
    use crate::types::{FieldType, ScalarKind};
    use crate::value::{DynamicCollection, DynamicMap, DynamicObject, Value};

    #[test]
    fn is_sync_send() {
        fn is_send<T: Send>() {}
        fn is_sync<T: Sync>() {}

        is_send::<TypeRegistry>();
        is_sync::<TypeRegistry>();
    }

    #[test]
    fn builtins() {
        let registry = TypeRegistry::new();
        for name in ["ArrayList", "LinkedList", "HashSet", "TreeSet", "List", "Set"] {
            assert!(registry.is_collection(&FieldType::generic(name, [FieldType::String])));
        }
        assert!(registry.is_map(&FieldType::generic(
            "TreeMap",
            [FieldType::String, FieldType::String]
        )));
        assert!(registry.is_map(&FieldType::generic(
            "Map",
            [FieldType::String, FieldType::String]
        )));
        assert!(!registry.is_collection(&FieldType::array(FieldType::String)));

        let empty = TypeRegistry::empty();
        assert!(!empty.is_collection(&FieldType::generic("ArrayList", [FieldType::String])));
    }

    #[test]
    fn external_entries() {
        let mut registry = TypeRegistry::new();
        registry.register_collection("ArrayDeque");
        registry.register_inline(
            ClassSchema::new("Point")
                .with_field(FieldDescriptor::new("x", FieldType::Scalar(ScalarKind::Int))),
        );
        registry.register_ordinal("Side", |_: &str, code: i32| (code == 0).then_some(Value::Int(0)));
        registry.register_conversion("Fns.identity", |v: &Value| Some(v.clone()));

        assert!(registry.is_collection(&FieldType::generic("ArrayDeque", [FieldType::String])));
        assert!(registry.is_inline(&FieldType::class("Point")));
        assert_eq!(registry.inline_schema("Point").map(|s| s.fields().len()), Some(1));
        assert!(registry.ordinal("Side").is_some_and(|l| l.find_by_code("Side", 0).is_some()));
        assert_eq!(registry.conversion("Fns.identity").map(|f| f(&Value::Int(3))), Some(Some(Value::Int(3))));
        assert!(registry.conversion("Fns.missing").is_none());
    }

    #[test]
    fn narrowing_by_supertype() {
        let mut registry = TypeRegistry::new();
        let list = FieldType::generic("List", [FieldType::String]);
        let array_list = Value::from(DynamicCollection::from_items("ArrayList", ["a"]));

        assert!(registry.narrows_to(&array_list, &list));
        assert!(registry.narrows_to(&Value::Null, &list));
        assert!(!registry.narrows_to(&Value::from(DynamicMap::new("HashMap")), &list));
        assert!(registry.narrows_to(
            &Value::from(DynamicMap::new("TreeMap")),
            &FieldType::generic("Map", [FieldType::String, FieldType::String])
        ));
        assert!(registry.narrows_to(&Value::from("x"), &FieldType::class("Object")));

        let shape = FieldType::class("Shape");
        let circle = Value::from(DynamicObject::new("Circle"));
        assert!(!registry.narrows_to(&circle, &shape));
        registry.register_supertype("Shape", Supertype::Object);
        assert!(registry.narrows_to(&circle, &shape));
        assert!(!registry.narrows_to(&Value::Int(1), &shape));

        assert!(!TypeRegistry::empty().narrows_to(&array_list, &list));
    }
}
