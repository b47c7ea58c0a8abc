//! Executes emitted operations against [`DynamicObject`]s.

// -----------------------------------------------------------------------------
// Modules

mod read;
mod write;

use alloc::string::String;
use alloc::vec::Vec;

use egen_io::{DataInput, DataOutput};

use crate::config::CodecConfig;
use crate::emit::{FieldOps, emit};
use crate::error::{CodecError, ConfigError};
use crate::field::{Binding, ClassSchema};
use crate::registry::TypeRegistry;
use crate::strategy::{Baseline, DeltaPlan, Resolver, Strategy};
use crate::value::{DynamicObject, MAX_DEPTH};

// -----------------------------------------------------------------------------
// CodecContext

/// The configuration and registry shared by every compiled class.
pub struct CodecContext {
    config: CodecConfig,
    registry: TypeRegistry,
}

impl CodecContext {
    #[inline]
    pub fn new(config: CodecConfig, registry: TypeRegistry) -> Self {
        Self { config, registry }
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    #[inline]
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.config, &self.registry)
    }

    /// Compiles a class, see [`ClassCodec::compile`].
    #[inline]
    pub fn compile(&self, schema: &ClassSchema) -> Result<ClassCodec<'_>, ConfigError> {
        ClassCodec::compile(schema, self)
    }

    /// Compiles a registered inline class.
    pub(crate) fn inline_codec(&self, class: &str) -> Result<ClassCodec<'_>, CodecError> {
        let schema = self
            .registry
            .inline_schema(class)
            .ok_or_else(|| CodecError::UnknownInlineClass(class.into()))?;
        Ok(self.compile(schema)?)
    }
}

// -----------------------------------------------------------------------------
// ClassCodec

pub(crate) struct CompiledField {
    pub name: String,
    pub binding: Binding,
    pub ops: FieldOps,
}

/// The write-state and read-state procedures of one class.
///
/// Fields are written and read in declaration order.
///
/// # Example
///
/// ```
/// use egen_codec::field::{Annotation, ClassSchema, FieldDescriptor};
/// use egen_codec::registry::TypeRegistry;
/// use egen_codec::runtime::CodecContext;
/// use egen_codec::types::{FieldType, ScalarKind};
/// use egen_codec::value::{DynamicObject, Value};
/// use egen_codec::CodecConfig;
///
/// let schema = ClassSchema::new("Trade")
///     .with_field(FieldDescriptor::new("price", FieldType::Scalar(ScalarKind::Long))
///         .with_annotation(Annotation::new("Compact")))
///     .with_field(FieldDescriptor::new("venue", FieldType::String)
///         .with_annotation(Annotation::new("Compact")));
///
/// let ctx = CodecContext::new(CodecConfig::new(), TypeRegistry::new());
/// let codec = ctx.compile(&schema).unwrap();
///
/// let trade = DynamicObject::new("Trade").with_field("price", 42_i64).with_field("venue", "X");
/// let mut buf: Vec<u8> = Vec::new();
/// codec.write_state(&trade, &mut buf).unwrap();
/// assert_eq!(buf, [42, 1, b'X']);
///
/// let mut read = DynamicObject::from_schema(&schema);
/// codec.read_state(&mut read, &mut buf.as_slice()).unwrap();
/// assert_eq!(read.get("venue"), Some(&Value::from("X")));
/// ```
pub struct ClassCodec<'c> {
    ctx: &'c CodecContext,
    class: String,
    fields: Vec<CompiledField>,
}

impl<'c> ClassCodec<'c> {
    /// Resolves and emits every field of `schema`.
    ///
    /// # Errors
    ///
    /// The first field that fails to resolve or emit aborts compilation, as
    /// does a Delta baseline naming a field `schema` does not declare.
    pub fn compile(schema: &ClassSchema, ctx: &'c CodecContext) -> Result<Self, ConfigError> {
        let resolver = ctx.resolver();
        let fields = schema
            .fields()
            .iter()
            .map(|field| {
                let strategy = resolver.resolve(field)?;
                if let Strategy::Delta(DeltaPlan::Scalar {
                    baseline: Baseline::Field(reference),
                    ..
                }) = &strategy
                    && schema.field(reference).is_none()
                {
                    return Err(ConfigError::UnknownBaselineField {
                        field: field.name().into(),
                        reference: reference.clone(),
                    });
                }
                Ok(CompiledField {
                    name: field.name().into(),
                    binding: field.binding(),
                    ops: emit(field, &strategy, &resolver)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            ctx,
            class: schema.name().into(),
            fields,
        })
    }

    #[inline]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The emitted operations of a field.
    pub fn field_ops(&self, name: &str) -> Option<&FieldOps> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.ops)
    }

    pub fn write_state(&self, object: &DynamicObject, out: &mut dyn DataOutput) -> Result<(), CodecError> {
        self.write_at(object, out, 0)
    }

    pub fn read_state(&self, object: &mut DynamicObject, input: &mut dyn DataInput) -> Result<(), CodecError> {
        self.read_at(object, input, 0)
    }

    pub(crate) fn write_at(
        &self,
        object: &DynamicObject,
        out: &mut dyn DataOutput,
        depth: usize,
    ) -> Result<(), CodecError> {
        self.check(object, depth)?;
        write::Writer::new(self.ctx, object, depth).run(&self.fields, out)
    }

    pub(crate) fn read_at(
        &self,
        object: &mut DynamicObject,
        input: &mut dyn DataInput,
        depth: usize,
    ) -> Result<(), CodecError> {
        self.check(object, depth)?;
        read::Reader::new(self.ctx, depth).run(&self.fields, object, input)
    }

    fn check(&self, object: &DynamicObject, depth: usize) -> Result<(), CodecError> {
        if depth > MAX_DEPTH {
            return Err(CodecError::NestingTooDeep(MAX_DEPTH));
        }
        if object.class() != self.class {
            return Err(CodecError::TypeMismatch {
                expected: self.class.clone(),
                found: "object of another class",
            });
        }
        Ok(())
    }
}
