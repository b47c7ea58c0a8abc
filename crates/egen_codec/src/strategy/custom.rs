use alloc::string::String;
use core::fmt;

use crate::emit::PrimitiveCodec;
use crate::field::{Annotation, AnnotationValue, FieldDescriptor, simple_name};
use crate::registry::TypeRegistry;

/// Meta-annotation types whose simple name ends with this suffix
/// designate a custom strategy.
pub const STRATEGY_META_SUFFIX: &str = "AutoSerializationStrategy";

// -----------------------------------------------------------------------------
// StrategyDescriptor

/// A custom strategy declared on an annotation type.
///
/// Values are converted with `to_target` and written with the primitive
/// codec named by `target_strategy`; reading mirrors it through
/// `from_target`. Both conversions are paths into
/// [`TypeRegistry::conversion`].
///
/// # Example
///
/// ```
/// use egen_codec::field::{Annotation, FieldDescriptor};
/// use egen_codec::registry::TypeRegistry;
/// use egen_codec::strategy::StrategyDescriptor;
/// use egen_codec::types::FieldType;
///
/// let mut registry = TypeRegistry::new();
/// registry.register_annotation_type(
///     "Celsius",
///     [Annotation::new("AutoSerializationStrategy")
///         .with_arg("targetStrategy", "Int")
///         .with_arg("toTarget", "Temp.toInt")
///         .with_arg("fromTarget", "Temp.fromInt")],
/// );
///
/// let field = FieldDescriptor::new("t", FieldType::class("Temp"))
///     .with_annotation(Annotation::new("Celsius"));
/// let descriptor = StrategyDescriptor::extract(&field, &registry).unwrap();
///
/// assert_eq!(descriptor.target_strategy(), "Int");
/// assert_eq!(descriptor.to_target(), "Temp.toInt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyDescriptor {
    target_strategy: String,
    codec: PrimitiveCodec,
    to_target: String,
    from_target: String,
}

impl StrategyDescriptor {
    /// Finds the first well-formed custom strategy among the field's annotations.
    ///
    /// Annotations whose type is undeclared or carries no strategy
    /// meta-annotation are skipped. Malformed meta-annotations are logged
    /// and treated as absent.
    pub fn extract(field: &FieldDescriptor, registry: &TypeRegistry) -> Option<Self> {
        field.annotations().iter().find_map(|annotation| {
            let meta = registry
                .annotation_meta(annotation.ty())
                .or_else(|| registry.annotation_meta(simple_name(annotation.ty())))?;

            let strategy = meta
                .iter()
                .find(|m| m.simple_name().ends_with(STRATEGY_META_SUFFIX))?;

            match Self::from_annotation(strategy) {
                Ok(descriptor) => Some(descriptor),
                Err(e) => {
                    log::warn!(
                        "ignoring custom strategy of `{}` on field `{}`: {e}",
                        annotation.ty(),
                        field.name(),
                    );
                    None
                }
            }
        })
    }

    /// Reads `targetStrategy`, `toTarget` and `fromTarget` from a strategy
    /// meta-annotation.
    pub fn from_annotation(meta: &Annotation) -> Result<Self, Malformed> {
        let target_strategy = constant_arg(meta, "targetStrategy")?;
        let to_target = constant_arg(meta, "toTarget")?;
        let from_target = constant_arg(meta, "fromTarget")?;

        let Some(codec) = PrimitiveCodec::from_target_name(&target_strategy) else {
            return Err(Malformed::UnknownTarget(target_strategy));
        };

        Ok(Self {
            target_strategy,
            codec,
            to_target,
            from_target,
        })
    }

    /// The target name as declared, e.g. `Int`.
    #[inline]
    pub fn target_strategy(&self) -> &str {
        &self.target_strategy
    }

    /// The primitive codec the target name designates.
    #[inline]
    pub fn codec(&self) -> PrimitiveCodec {
        self.codec
    }

    #[inline]
    pub fn to_target(&self) -> &str {
        &self.to_target
    }

    #[inline]
    pub fn from_target(&self) -> &str {
        &self.from_target
    }
}

fn constant_arg(meta: &Annotation, name: &'static str) -> Result<String, Malformed> {
    match meta.arg(name) {
        None => Err(Malformed::Missing(name)),
        Some(AnnotationValue::Nested(_)) => Err(Malformed::NotConstant(name)),
        Some(value) => value.as_constant().ok_or(Malformed::NotConstant(name)),
    }
}

// -----------------------------------------------------------------------------
// Malformed

/// Why a strategy meta-annotation was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    Missing(&'static str),
    NotConstant(&'static str),
    UnknownTarget(String),
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "missing argument `{name}`"),
            Self::NotConstant(name) => write!(f, "argument `{name}` is not a constant"),
            Self::UnknownTarget(name) => write!(f, "unknown target strategy `{name}`"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Malformed, StrategyDescriptor};
    use crate::emit::PrimitiveCodec;
    use crate::field::{Annotation, FieldDescriptor};
    use crate::registry::TypeRegistry;
    use crate::types::FieldType;

    fn meta(target: &str) -> Annotation {
        Annotation::new("egen.AutoSerializationStrategy")
            .with_arg("targetStrategy", target)
            .with_arg("toTarget", "Fns.to")
            .with_arg("fromTarget", "Fns.from")
    }

    #[test]
    fn absent_without_declaration() {
        let registry = TypeRegistry::new();
        let field = FieldDescriptor::new("t", FieldType::class("Temp"))
            .with_annotation(Annotation::new("Celsius"));
        assert_eq!(StrategyDescriptor::extract(&field, &registry), None);
    }

    #[test]
    fn absent_without_meta() {
        let mut registry = TypeRegistry::new();
        registry.register_annotation_type("Celsius", [Annotation::new("Documented")]);
        let field = FieldDescriptor::new("t", FieldType::class("Temp"))
            .with_annotation(Annotation::new("Celsius"));
        assert_eq!(StrategyDescriptor::extract(&field, &registry), None);
    }

    #[test]
    fn malformed_is_skipped() {
        let mut registry = TypeRegistry::new();
        registry.register_annotation_type("Broken", [meta("Int").with_arg("toTarget", Annotation::new("X"))]);
        registry.register_annotation_type("Unknown", [meta("Quaternion")]);
        registry.register_annotation_type("Good", [meta("CompactLong")]);

        let field = FieldDescriptor::new("t", FieldType::class("Temp"))
            .with_annotation(Annotation::new("Broken"))
            .with_annotation(Annotation::new("Unknown"))
            .with_annotation(Annotation::new("a.b.Good"));

        let descriptor = StrategyDescriptor::extract(&field, &registry).unwrap();
        assert_eq!(descriptor.codec(), PrimitiveCodec::CompactLong);
        assert_eq!(descriptor.from_target(), "Fns.from");
    }

    #[test]
    fn malformed_reasons() {
        let missing = Annotation::new("AutoSerializationStrategy").with_arg("targetStrategy", "Int");
        assert_eq!(
            StrategyDescriptor::from_annotation(&missing),
            Err(Malformed::Missing("toTarget"))
        );
        assert_eq!(
            StrategyDescriptor::from_annotation(&meta("Quaternion")),
            Err(Malformed::UnknownTarget("Quaternion".into()))
        );
    }

    #[test]
    fn constants_are_stringified() {
        let meta = meta("Int").with_arg("toTarget", 7_i64);
        let descriptor = StrategyDescriptor::from_annotation(&meta).unwrap();
        assert_eq!(descriptor.to_target(), "7");
    }
}
