use alloc::string::ToString;

use super::{Baseline, DeltaPlan, IntWidth, Strategy, StrategyDescriptor};
use crate::config::CodecConfig;
use crate::error::ConfigError;
use crate::field::{AnnotationKind, AnnotationValue, FieldDescriptor};
use crate::registry::TypeRegistry;
use crate::types::{FieldType, ScalarKind};

/// The baseline of a `Delta` annotation without a `value` argument.
const DEFAULT_BASELINE: &str = "0";

// -----------------------------------------------------------------------------
// Resolver

/// Selects exactly one [`Strategy`] per field.
///
/// Resolution is a pure function of the field, the [`CodecConfig`] and
/// the [`TypeRegistry`]. Explicit annotations are checked first
/// (`Compact`, `Delta`, `Inline`, `Ordinal`), then a custom strategy
/// declared on any other annotation, then [`Strategy::Common`].
///
/// # Example
///
/// ```
/// use egen_codec::field::{Annotation, FieldDescriptor};
/// use egen_codec::registry::TypeRegistry;
/// use egen_codec::strategy::{IntWidth, Resolver, Strategy};
/// use egen_codec::types::{FieldType, ScalarKind};
/// use egen_codec::CodecConfig;
///
/// let config = CodecConfig::new();
/// let registry = TypeRegistry::new();
/// let resolver = Resolver::new(&config, &registry);
///
/// let field = FieldDescriptor::new("count", FieldType::Boxed(ScalarKind::Long))
///     .with_annotation(Annotation::new("Compact"));
/// assert_eq!(resolver.resolve(&field), Ok(Strategy::CompactInteger(IntWidth::Long)));
///
/// let names = FieldType::generic("ArrayList", [FieldType::String]);
/// assert_eq!(resolver.resolve_compact(&names), Strategy::Collection);
/// ```
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    config: &'a CodecConfig,
    registry: &'a TypeRegistry,
}

impl<'a> Resolver<'a> {
    #[inline]
    pub const fn new(config: &'a CodecConfig, registry: &'a TypeRegistry) -> Self {
        Self { config, registry }
    }

    #[inline]
    pub const fn config(&self) -> &'a CodecConfig {
        self.config
    }

    #[inline]
    pub const fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Resolves the strategy of a top-level field.
    ///
    /// # Errors
    ///
    /// Only a malformed `Delta` baseline fails.
    pub fn resolve(&self, field: &FieldDescriptor) -> Result<Strategy, ConfigError> {
        let strategy = match field.annotation_kind() {
            Some(AnnotationKind::Compact) => self.resolve_compact(field.ty()),
            Some(AnnotationKind::Delta) => Self::resolve_delta(field)?,
            Some(AnnotationKind::Inline) => Strategy::Inline,
            Some(AnnotationKind::Ordinal) => Strategy::Ordinal,
            None => match StrategyDescriptor::extract(field, self.registry) {
                Some(descriptor) => Strategy::Custom(descriptor),
                None => Strategy::Common,
            },
        };

        log::debug!("field `{}` resolved to {}", field.name(), strategy.name());
        Ok(strategy)
    }

    /// The compact sub-resolution, also applied to every container element.
    ///
    /// The order is fixed: integers and strings, then inline and ordinal
    /// classes (when enabled), then collections, arrays and maps.
    pub fn resolve_compact(&self, ty: &FieldType) -> Strategy {
        match ty {
            FieldType::Scalar(ScalarKind::Int) | FieldType::Boxed(ScalarKind::Int) => {
                Strategy::CompactInteger(IntWidth::Int)
            }
            FieldType::Scalar(ScalarKind::Long) | FieldType::Boxed(ScalarKind::Long) => {
                Strategy::CompactInteger(IntWidth::Long)
            }
            FieldType::String => Strategy::CompactString,
            _ if self.config.recursive_inline && self.registry.is_inline(ty) => Strategy::Inline,
            _ if self.config.recursive_ordinal && self.registry.is_ordinal(ty) => Strategy::Ordinal,
            _ if self.registry.is_collection(ty) => Strategy::Collection,
            FieldType::Array(_) => Strategy::Array,
            _ if self.registry.is_map(ty) => Strategy::Map,
            _ => Strategy::Common,
        }
    }

    fn resolve_delta(field: &FieldDescriptor) -> Result<Strategy, ConfigError> {
        let plan = match field.ty() {
            FieldType::Scalar(ScalarKind::Int) => DeltaPlan::Scalar {
                width: IntWidth::Int,
                baseline: Self::delta_baseline(field, IntWidth::Int)?,
            },
            FieldType::Scalar(ScalarKind::Long) => DeltaPlan::Scalar {
                width: IntWidth::Long,
                baseline: Self::delta_baseline(field, IntWidth::Long)?,
            },
            FieldType::Array(element) => match element.as_ref() {
                FieldType::Scalar(ScalarKind::Int) => DeltaPlan::Array { width: IntWidth::Int },
                FieldType::Scalar(ScalarKind::Long) => DeltaPlan::Array { width: IntWidth::Long },
                _ => return Ok(Strategy::Common),
            },
            _ => return Ok(Strategy::Common),
        };
        Ok(Strategy::Delta(plan))
    }

    /// Evaluates the `value` argument of the field's `Delta` annotation.
    ///
    /// A value starting with an ASCII letter names another field, anything
    /// else must be an integer literal of the given width. A missing
    /// argument means `0`.
    pub fn delta_baseline(field: &FieldDescriptor, width: IntWidth) -> Result<Baseline, ConfigError> {
        let Some(delta) = field.annotation(AnnotationKind::Delta) else {
            return Err(ConfigError::MissingDeltaAnnotation {
                field: field.name().into(),
            });
        };

        let value = match delta.arg("value") {
            None => DEFAULT_BASELINE,
            Some(AnnotationValue::Str(value)) => value.trim(),
            Some(_) => {
                return Err(ConfigError::MalformedDeltaArgument {
                    field: field.name().into(),
                });
            }
        };

        if value.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Ok(Baseline::Field(value.into()));
        }

        let invalid = || ConfigError::InvalidDeltaBaseline {
            field: field.name().into(),
            value: value.to_string(),
        };
        let literal = value.parse::<i64>().map_err(|_| invalid())?;
        if width == IntWidth::Int && i32::try_from(literal).is_err() {
            return Err(invalid());
        }
        Ok(Baseline::Literal(literal))
    }
}

#[cfg(test)]
mod tests {
    use super::Resolver;
    use crate::config::CodecConfig;
    use crate::error::ConfigError;
    use crate::field::{Annotation, ClassSchema, FieldDescriptor};
    use crate::registry::{CodeTable, TypeRegistry};
    use crate::strategy::{Baseline, DeltaPlan, IntWidth, Strategy};
    use crate::types::{FieldType, ScalarKind};

    const INT: FieldType = FieldType::Scalar(ScalarKind::Int);

    fn compact(name: &str, ty: FieldType) -> FieldDescriptor {
        FieldDescriptor::new(name, ty).with_annotation(Annotation::new("Compact"))
    }

    fn delta(ty: FieldType, value: Option<&str>) -> FieldDescriptor {
        let mut annotation = Annotation::new("Delta");
        if let Some(value) = value {
            annotation = annotation.with_arg("value", value);
        }
        FieldDescriptor::new("d", ty).with_annotation(annotation)
    }

    #[test]
    fn compact_integers_ignore_flags() {
        let registry = TypeRegistry::new();
        let config = CodecConfig::new().with_recursive_inline(true).with_recursive_ordinal(true);
        let resolver = Resolver::new(&config, &registry);

        for (ty, width) in [
            (INT, IntWidth::Int),
            (FieldType::Boxed(ScalarKind::Int), IntWidth::Int),
            (FieldType::Scalar(ScalarKind::Long), IntWidth::Long),
            (FieldType::Boxed(ScalarKind::Long), IntWidth::Long),
        ] {
            assert_eq!(resolver.resolve(&compact("x", ty)), Ok(Strategy::CompactInteger(width)));
        }
        assert_eq!(resolver.resolve(&compact("s", FieldType::String)), Ok(Strategy::CompactString));
        assert_eq!(
            resolver.resolve(&compact("b", FieldType::Scalar(ScalarKind::Byte))),
            Ok(Strategy::Common)
        );
    }

    #[test]
    fn inline_precedes_collection() {
        let mut registry = TypeRegistry::new();
        registry.register_inline(ClassSchema::new("ArrayList"));
        let field = compact("xs", FieldType::generic("ArrayList", [FieldType::String]));

        let enabled = CodecConfig::new().with_recursive_inline(true);
        assert_eq!(Resolver::new(&enabled, &registry).resolve(&field), Ok(Strategy::Inline));

        let disabled = CodecConfig::new();
        assert_eq!(Resolver::new(&disabled, &registry).resolve(&field), Ok(Strategy::Collection));
    }

    #[test]
    fn ordinal_precedes_map() {
        let mut registry = TypeRegistry::new();
        registry.register_ordinal("TreeMap", CodeTable::new([0]));
        let ty = FieldType::generic("TreeMap", [FieldType::String, INT]);

        let enabled = CodecConfig::new().with_recursive_ordinal(true);
        assert_eq!(Resolver::new(&enabled, &registry).resolve_compact(&ty), Strategy::Ordinal);

        let disabled = CodecConfig::new();
        assert_eq!(Resolver::new(&disabled, &registry).resolve_compact(&ty), Strategy::Map);
    }

    #[test]
    fn compact_fallbacks() {
        let registry = TypeRegistry::new();
        let config = CodecConfig::new();
        let resolver = Resolver::new(&config, &registry);

        assert_eq!(resolver.resolve_compact(&FieldType::array(FieldType::String)), Strategy::Array);
        assert_eq!(resolver.resolve_compact(&FieldType::class("Point")), Strategy::Common);
        assert_eq!(resolver.resolve_compact(&FieldType::Boxed(ScalarKind::Double)), Strategy::Common);
    }

    #[test]
    fn annotation_precedence() {
        let registry = TypeRegistry::new();
        let config = CodecConfig::new();
        let resolver = Resolver::new(&config, &registry);

        let field = FieldDescriptor::new("x", INT)
            .with_annotation(Annotation::new("Ordinal"))
            .with_annotation(Annotation::new("Delta"))
            .with_annotation(Annotation::new("Compact"));
        assert_eq!(resolver.resolve(&field), Ok(Strategy::CompactInteger(IntWidth::Int)));

        let field = FieldDescriptor::new("p", FieldType::class("Point"))
            .with_annotation(Annotation::new("Ordinal"))
            .with_annotation(Annotation::new("Inline"));
        assert_eq!(resolver.resolve(&field), Ok(Strategy::Inline));

        let field = FieldDescriptor::new("p", FieldType::class("Point"));
        assert_eq!(resolver.resolve(&field), Ok(Strategy::Common));
    }

    #[test]
    fn custom_strategy_without_egen_annotation() {
        let mut registry = TypeRegistry::new();
        registry.register_annotation_type(
            "Celsius",
            [Annotation::new("AutoSerializationStrategy")
                .with_arg("targetStrategy", "Int")
                .with_arg("toTarget", "T.to")
                .with_arg("fromTarget", "T.from")],
        );
        let config = CodecConfig::new();
        let resolver = Resolver::new(&config, &registry);

        let field = FieldDescriptor::new("t", FieldType::class("Temp"))
            .with_annotation(Annotation::new("Celsius"));
        assert!(matches!(resolver.resolve(&field), Ok(Strategy::Custom(_))));

        let field = field.with_annotation(Annotation::new("Inline"));
        assert_eq!(resolver.resolve(&field), Ok(Strategy::Inline));
    }

    #[test]
    fn delta_plans() {
        let registry = TypeRegistry::new();
        let config = CodecConfig::new();
        let resolver = Resolver::new(&config, &registry);

        assert_eq!(
            resolver.resolve(&delta(INT, None)),
            Ok(Strategy::Delta(DeltaPlan::Scalar {
                width: IntWidth::Int,
                baseline: Baseline::Literal(0),
            }))
        );
        assert_eq!(
            resolver.resolve(&delta(FieldType::Scalar(ScalarKind::Long), Some("-9000000000"))),
            Ok(Strategy::Delta(DeltaPlan::Scalar {
                width: IntWidth::Long,
                baseline: Baseline::Literal(-9_000_000_000),
            }))
        );
        assert_eq!(
            resolver.resolve(&delta(INT, Some("start"))),
            Ok(Strategy::Delta(DeltaPlan::Scalar {
                width: IntWidth::Int,
                baseline: Baseline::Field("start".into()),
            }))
        );
        assert_eq!(
            resolver.resolve(&delta(FieldType::array(INT), Some("junk!"))),
            Ok(Strategy::Delta(DeltaPlan::Array { width: IntWidth::Int }))
        );
        assert_eq!(resolver.resolve(&delta(FieldType::String, None)), Ok(Strategy::Common));
        assert_eq!(
            resolver.resolve(&delta(FieldType::Boxed(ScalarKind::Int), None)),
            Ok(Strategy::Common)
        );
    }

    #[test]
    fn delta_errors() {
        let registry = TypeRegistry::new();
        let config = CodecConfig::new();
        let resolver = Resolver::new(&config, &registry);

        assert!(matches!(
            resolver.resolve(&delta(INT, Some("9000000000"))),
            Err(ConfigError::InvalidDeltaBaseline { .. })
        ));
        assert!(matches!(
            resolver.resolve(&delta(INT, Some("1.5"))),
            Err(ConfigError::InvalidDeltaBaseline { .. })
        ));

        let field = FieldDescriptor::new("d", INT)
            .with_annotation(Annotation::new("Delta").with_arg("value", 3_i64));
        assert_eq!(
            resolver.resolve(&field),
            Err(ConfigError::MalformedDeltaArgument { field: "d".into() })
        );

        assert_eq!(
            Resolver::delta_baseline(&FieldDescriptor::new("d", INT), IntWidth::Int),
            Err(ConfigError::MissingDeltaAnnotation { field: "d".into() })
        );
    }
}
