//! Global codec flags and externally supplied registry manifests.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;

use crate::field::{Annotation, ClassSchema};
use crate::registry::Supertype;

// -----------------------------------------------------------------------------
// CodecConfig

/// Read-only flags fixed before any resolution begins.
///
/// Both flags only affect fields (and container elements) going through
/// the compact sub-resolution.
///
/// # Example
///
/// ```
/// use egen_codec::CodecConfig;
///
/// let config = CodecConfig::new().with_recursive_inline(true);
/// assert!(config.recursive_inline);
/// assert!(!config.recursive_ordinal);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Compact fields of an inline class are coded inline.
    pub recursive_inline: bool,
    /// Compact fields of an ordinal class are coded by their code.
    pub recursive_ordinal: bool,
}

impl CodecConfig {
    /// Both recursive modes disabled.
    #[inline]
    pub const fn new() -> Self {
        Self {
            recursive_inline: false,
            recursive_ordinal: false,
        }
    }

    #[inline]
    pub const fn with_recursive_inline(mut self, enabled: bool) -> Self {
        self.recursive_inline = enabled;
        self
    }

    #[inline]
    pub const fn with_recursive_ordinal(mut self, enabled: bool) -> Self {
        self.recursive_ordinal = enabled;
        self
    }
}

// -----------------------------------------------------------------------------
// Manifest

/// An annotation type and the meta-annotations declared on it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnnotationTypeDecl {
    pub name: String,
    #[serde(default)]
    pub meta: Vec<Annotation>,
}

/// Registry entries supplied as data, see
/// [`TypeRegistry::apply_manifest`](crate::registry::TypeRegistry::apply_manifest).
///
/// Conversions are functions and cannot be part of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub inline: Vec<ClassSchema>,
    /// Ordinal class name to its valid codes.
    pub ordinals: BTreeMap<String, Vec<i32>>,
    pub collections: Vec<String>,
    pub maps: Vec<String>,
    /// Declared supertype name to the values it accepts on narrowing.
    pub supertypes: BTreeMap<String, Supertype>,
    pub annotation_types: Vec<AnnotationTypeDecl>,
}

#[cfg(test)]
mod tests {
    use super::{CodecConfig, Manifest};
    use crate::registry::{Supertype, TypeRegistry};
    use crate::types::FieldType;

    #[test]
    fn config_from_ron() {
        let config: CodecConfig = ron::from_str("(recursive_ordinal: true)").unwrap();
        assert_eq!(config, CodecConfig::new().with_recursive_ordinal(true));

        let config: CodecConfig = ron::from_str("()").unwrap();
        assert_eq!(config, CodecConfig::default());
    }

    #[test]
    fn manifest_from_json() {
        let json = r#"{
            "inline": [
                { "name": "Point", "fields": [
                    { "name": "x", "ty": { "Scalar": "Int" } },
                    { "name": "y", "ty": { "Scalar": "Int" },
                      "annotations": [ { "ty": "Compact" } ] }
                ] }
            ],
            "ordinals": { "Color": [2, 0, 1] },
            "collections": ["ArrayDeque"],
            "supertypes": { "Shape": "Object" },
            "annotation_types": [
                { "name": "Celsius", "meta": [
                    { "ty": "AutoSerializationStrategy", "args": [
                        ["targetStrategy", { "Str": "Int" }],
                        ["toTarget", { "Str": "Temp.toInt" }],
                        ["fromTarget", { "Str": "Temp.fromInt" }]
                    ] }
                ] }
            ]
        }"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.inline[0].fields().len(), 2);

        let mut registry = TypeRegistry::new();
        registry.apply_manifest(manifest);

        assert!(registry.is_inline(&FieldType::class("Point")));
        assert!(registry.is_ordinal(&FieldType::class("Color")));
        assert!(registry.is_collection(&FieldType::generic("ArrayDeque", [FieldType::String])));
        assert!(registry.is_collection(&FieldType::generic("ArrayList", [FieldType::String])));
        assert_eq!(registry.annotation_meta("Celsius").map(<[_]>::len), Some(1));
        assert!(!registry.is_map(&FieldType::generic("ArrayDeque", [FieldType::String])));
        assert_eq!(registry.supertype("Shape"), Some(Supertype::Object));
        assert_eq!(registry.supertype("List"), Some(Supertype::Collection));
    }
}
