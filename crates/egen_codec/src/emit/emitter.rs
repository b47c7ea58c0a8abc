use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

use super::{FieldOps, NameScope, Operand, Place, PrimitiveCodec, ReadExpr, ReadOp, Symbol, WriteOp};
use crate::error::ConfigError;
use crate::field::{Binding, FieldDescriptor};
use crate::strategy::{DeltaPlan, Resolver, Strategy, StrategyDescriptor};
use crate::types::FieldType;

/// The marker byte written before an inline value.
pub const INLINE_PRESENT: i32 = 0;

/// The sentinel of every nullable strategy.
pub const NULL_SENTINEL: i32 = -1;

// -----------------------------------------------------------------------------
// Entry points

/// Resolves and emits one field.
pub fn compile_field(field: &FieldDescriptor, resolver: &Resolver<'_>) -> Result<FieldOps, ConfigError> {
    let strategy = resolver.resolve(field)?;
    emit(field, &strategy, resolver)
}

/// Emits the paired write and read operations of `field` under `strategy`.
///
/// Container elements are emitted through
/// [`Resolver::resolve_compact`], whatever the container's own
/// annotation. Temporaries are named from a fresh [`NameScope`].
///
/// # Errors
///
/// Returns a [`ConfigError`] when the declared type cannot carry the
/// strategy; nothing is emitted in that case.
///
/// # Example
///
/// ```
/// use egen_codec::emit::{Operand, Place, PrimitiveCodec, WriteOp, emit};
/// use egen_codec::field::FieldDescriptor;
/// use egen_codec::registry::TypeRegistry;
/// use egen_codec::strategy::{Resolver, Strategy};
/// use egen_codec::types::{FieldType, ScalarKind};
/// use egen_codec::CodecConfig;
///
/// let config = CodecConfig::new();
/// let registry = TypeRegistry::new();
/// let resolver = Resolver::new(&config, &registry);
///
/// let field = FieldDescriptor::new("ratio", FieldType::Scalar(ScalarKind::Double));
/// let ops = emit(&field, &Strategy::Common, &resolver).unwrap();
///
/// assert_eq!(
///     ops.write,
///     [WriteOp::Write {
///         codec: PrimitiveCodec::Double,
///         operand: Operand::Value(Place::Field("ratio".into())),
///     }],
/// );
/// ```
pub fn emit(
    field: &FieldDescriptor,
    strategy: &Strategy,
    resolver: &Resolver<'_>,
) -> Result<FieldOps, ConfigError> {
    let place = match field.binding() {
        Binding::SelfField => Place::Field(field.name().into()),
        Binding::Local => Place::Local(Symbol::new(field.name())),
    };

    let mut emitter = Emitter {
        resolver,
        field: field.name(),
        scope: NameScope::new(field.name()),
    };
    let ops = emitter.emit(place, field.ty(), strategy)?;

    log::trace!(
        "field `{}`: {} write op(s), {} read op(s)",
        field.name(),
        ops.write.len(),
        ops.read.len(),
    );
    Ok(ops)
}

// -----------------------------------------------------------------------------
// Emitter

struct Emitter<'r, 'a> {
    resolver: &'r Resolver<'a>,
    field: &'r str,
    scope: NameScope,
}

impl Emitter<'_, '_> {
    fn emit(&mut self, place: Place, ty: &FieldType, strategy: &Strategy) -> Result<FieldOps, ConfigError> {
        match strategy {
            Strategy::CompactInteger(width) => Ok(plain(place, PrimitiveCodec::compact(*width))),
            Strategy::CompactString => Ok(plain(place, PrimitiveCodec::UtfString)),
            Strategy::Delta(plan) => Ok(delta(place, plan)),
            Strategy::Inline => self.inline(place, ty),
            Strategy::Ordinal => self.ordinal(place, ty),
            Strategy::Custom(descriptor) => Ok(custom(place, descriptor)),
            Strategy::Collection => self.collection(place, ty),
            Strategy::Array => self.array(place, ty),
            Strategy::Map => self.map(place, ty),
            Strategy::Common => Ok(common(place, ty)),
        }
    }

    /// Emits an element with the compact sub-resolution.
    fn element(&mut self, symbol: &Symbol, ty: &FieldType) -> Result<FieldOps, ConfigError> {
        let strategy = self.resolver.resolve_compact(ty);
        self.emit(Place::local(symbol), ty, &strategy)
    }

    fn class_of<'t>(&self, ty: &'t FieldType) -> Result<&'t str, ConfigError> {
        ty.class_name().ok_or_else(|| ConfigError::NotAClass {
            field: self.field.into(),
            ty: ty.to_string(),
        })
    }

    fn type_args<'t>(&self, ty: &'t FieldType, expected: usize) -> Result<(&'t str, &'t [FieldType]), ConfigError> {
        match ty {
            FieldType::Generic { class, args } if args.len() == expected => {
                Ok((class.as_str(), args.as_slice()))
            }
            _ => Err(ConfigError::MalformedContainerType {
                field: self.field.into(),
                ty: ty.to_string(),
                expected,
            }),
        }
    }

    fn inline(&mut self, place: Place, ty: &FieldType) -> Result<FieldOps, ConfigError> {
        let class = self.class_of(ty)?;
        let marker = self.scope.fresh("marker");

        let write = vec![WriteOp::IfPresent {
            value: place.clone(),
            present: vec![
                WriteOp::Write {
                    codec: PrimitiveCodec::Byte,
                    operand: Operand::Literal(INLINE_PRESENT),
                },
                WriteOp::WriteInline {
                    value: place.clone(),
                    top_level: true,
                },
            ],
            absent: vec![WriteOp::Write {
                codec: PrimitiveCodec::Byte,
                operand: Operand::Literal(NULL_SENTINEL),
            }],
        }];

        let read = vec![
            ReadOp::Let {
                symbol: marker.clone(),
                expr: ReadExpr::Read(PrimitiveCodec::Byte),
            },
            ReadOp::IfNotSentinel {
                symbol: marker,
                sentinel: NULL_SENTINEL,
                then: vec![
                    ReadOp::Assign {
                        place: place.clone(),
                        expr: ReadExpr::NewInstance(class.into()),
                    },
                    ReadOp::ReadInline {
                        target: place.clone(),
                    },
                ],
                otherwise: vec![assign_null(place)],
            },
        ];

        Ok(FieldOps { write, read })
    }

    fn ordinal(&mut self, place: Place, ty: &FieldType) -> Result<FieldOps, ConfigError> {
        let class = self.class_of(ty)?;
        let code = self.scope.fresh("code");

        let write = vec![WriteOp::IfPresent {
            value: place.clone(),
            present: vec![WriteOp::Write {
                codec: PrimitiveCodec::CompactInt,
                operand: Operand::Code(place.clone()),
            }],
            absent: vec![write_sentinel()],
        }];

        let read = vec![
            ReadOp::Let {
                symbol: code.clone(),
                expr: ReadExpr::Read(PrimitiveCodec::CompactInt),
            },
            ReadOp::IfNotSentinel {
                symbol: code.clone(),
                sentinel: NULL_SENTINEL,
                then: vec![ReadOp::Assign {
                    place: place.clone(),
                    expr: ReadExpr::FindByCode {
                        class: class.into(),
                        code,
                    },
                }],
                otherwise: vec![ReadOp::Assign {
                    place,
                    expr: ReadExpr::Default(ty.clone()),
                }],
            },
        ];

        Ok(FieldOps { write, read })
    }

    fn collection(&mut self, place: Place, ty: &FieldType) -> Result<FieldOps, ConfigError> {
        let (class, args) = self.type_args(ty, 1)?;
        let size = self.scope.fresh("size");
        let index = self.scope.fresh("i");
        let elem = self.scope.fresh("elem");
        let element = self.element(&elem, &args[0])?;

        let write = sized_write(
            &place,
            WriteOp::ForEach {
                source: place.clone(),
                element: elem.clone(),
                body: element.write,
            },
        );

        let mut body = element.read;
        body.push(ReadOp::Push {
            target: place.clone(),
            element: elem,
        });
        let read = sized_read(place, size, index, ReadExpr::NewCollection(class.into()), body);

        Ok(FieldOps { write, read })
    }

    fn array(&mut self, place: Place, ty: &FieldType) -> Result<FieldOps, ConfigError> {
        let Some(element_ty) = ty.element() else {
            return Err(ConfigError::Inapplicable {
                field: self.field.into(),
                strategy: Strategy::Array.name(),
                ty: ty.to_string(),
            });
        };
        let size = self.scope.fresh("size");
        let index = self.scope.fresh("i");
        let elem = self.scope.fresh("elem");
        let element = self.element(&elem, element_ty)?;

        let write = sized_write(
            &place,
            WriteOp::ForEach {
                source: place.clone(),
                element: elem.clone(),
                body: element.write,
            },
        );

        let mut body = element.read;
        body.push(ReadOp::Store {
            target: place.clone(),
            index: index.clone(),
            element: elem,
        });
        let alloc = ReadExpr::NewArray {
            element: element_ty.clone(),
            len: size.clone(),
        };
        let read = sized_read(place, size, index, alloc, body);

        Ok(FieldOps { write, read })
    }

    fn map(&mut self, place: Place, ty: &FieldType) -> Result<FieldOps, ConfigError> {
        let (class, args) = self.type_args(ty, 2)?;
        let size = self.scope.fresh("size");
        let index = self.scope.fresh("i");
        let key = self.scope.fresh("key");
        let value = self.scope.fresh("value");
        let key_ops = self.element(&key, &args[0])?;
        let value_ops = self.element(&value, &args[1])?;

        let mut entry_write = key_ops.write;
        entry_write.extend(value_ops.write);
        let write = sized_write(
            &place,
            WriteOp::ForEachEntry {
                source: place.clone(),
                key: key.clone(),
                value: value.clone(),
                body: entry_write,
            },
        );

        let mut body = key_ops.read;
        body.extend(value_ops.read);
        body.push(ReadOp::Insert {
            target: place.clone(),
            key,
            value,
        });
        let read = sized_read(place, size, index, ReadExpr::NewMap(class.into()), body);

        Ok(FieldOps { write, read })
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn plain(place: Place, codec: PrimitiveCodec) -> FieldOps {
    FieldOps {
        write: vec![WriteOp::Write {
            codec,
            operand: Operand::Value(place.clone()),
        }],
        read: vec![ReadOp::Assign {
            place,
            expr: ReadExpr::Read(codec),
        }],
    }
}

fn delta(place: Place, plan: &DeltaPlan) -> FieldOps {
    match plan {
        DeltaPlan::Scalar { width, baseline } => FieldOps {
            write: vec![WriteOp::WriteDelta {
                width: *width,
                value: place.clone(),
                baseline: baseline.clone(),
            }],
            read: vec![ReadOp::Assign {
                place,
                expr: ReadExpr::Delta {
                    width: *width,
                    baseline: baseline.clone(),
                },
            }],
        },
        DeltaPlan::Array { width } => FieldOps {
            write: vec![WriteOp::WriteDeltaArray {
                width: *width,
                value: place.clone(),
            }],
            read: vec![ReadOp::Assign {
                place,
                expr: ReadExpr::DeltaArray(*width),
            }],
        },
    }
}

fn custom(place: Place, descriptor: &StrategyDescriptor) -> FieldOps {
    let codec = descriptor.codec();
    FieldOps {
        write: vec![WriteOp::Write {
            codec,
            operand: Operand::Converted {
                function: descriptor.to_target().into(),
                value: Box::new(Operand::Value(place.clone())),
            },
        }],
        read: vec![ReadOp::Assign {
            place,
            expr: ReadExpr::Converted {
                function: descriptor.from_target().into(),
                value: Box::new(ReadExpr::Read(codec)),
            },
        }],
    }
}

fn common(place: Place, ty: &FieldType) -> FieldOps {
    match ty {
        FieldType::Scalar(kind) => plain(place, PrimitiveCodec::scalar(*kind)),
        _ => FieldOps {
            write: vec![WriteOp::Write {
                codec: PrimitiveCodec::Object,
                operand: Operand::Value(place.clone()),
            }],
            read: vec![ReadOp::Assign {
                place,
                expr: ReadExpr::Narrowed(ty.clone()),
            }],
        },
    }
}

#[inline]
fn write_sentinel() -> WriteOp {
    WriteOp::Write {
        codec: PrimitiveCodec::CompactInt,
        operand: Operand::Literal(NULL_SENTINEL),
    }
}

#[inline]
fn assign_null(place: Place) -> ReadOp {
    ReadOp::Assign {
        place,
        expr: ReadExpr::Null,
    }
}

/// `size` then the loop, or the sentinel for null.
fn sized_write(place: &Place, each: WriteOp) -> Vec<WriteOp> {
    vec![WriteOp::IfPresent {
        value: place.clone(),
        present: vec![
            WriteOp::Write {
                codec: PrimitiveCodec::CompactInt,
                operand: Operand::Size(place.clone()),
            },
            each,
        ],
        absent: vec![write_sentinel()],
    }]
}

fn sized_read(place: Place, size: Symbol, index: Symbol, alloc: ReadExpr, body: Vec<ReadOp>) -> Vec<ReadOp> {
    vec![
        ReadOp::Let {
            symbol: size.clone(),
            expr: ReadExpr::Read(PrimitiveCodec::CompactInt),
        },
        ReadOp::IfNotSentinel {
            symbol: size.clone(),
            sentinel: NULL_SENTINEL,
            then: vec![
                ReadOp::Assign {
                    place: place.clone(),
                    expr: alloc,
                },
                ReadOp::Repeat {
                    count: size,
                    index,
                    body,
                },
            ],
            otherwise: vec![assign_null(place)],
        },
    ]
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{compile_field, emit};
    use crate::config::CodecConfig;
    use crate::emit::{Operand, Place, PrimitiveCodec, ReadExpr, ReadOp, Symbol, WriteOp};
    use crate::error::ConfigError;
    use crate::field::{Annotation, Binding, FieldDescriptor};
    use crate::registry::TypeRegistry;
    use crate::strategy::{IntWidth, Resolver, Strategy};
    use crate::types::{FieldType, ScalarKind};

    fn compact(name: &str, ty: FieldType) -> FieldDescriptor {
        FieldDescriptor::new(name, ty).with_annotation(Annotation::new("Compact"))
    }

    #[test]
    fn string_list() {
        let config = CodecConfig::new();
        let registry = TypeRegistry::new();
        let resolver = Resolver::new(&config, &registry);

        let field = compact("names", FieldType::generic("ArrayList", [FieldType::String]));
        let ops = compile_field(&field, &resolver).unwrap();

        let names = Place::Field("names".into());
        let elem = Symbol::new("names$elem2");
        assert_eq!(
            ops.write,
            vec![WriteOp::IfPresent {
                value: names.clone(),
                present: vec![
                    WriteOp::Write {
                        codec: PrimitiveCodec::CompactInt,
                        operand: Operand::Size(names.clone()),
                    },
                    WriteOp::ForEach {
                        source: names.clone(),
                        element: elem.clone(),
                        body: vec![WriteOp::Write {
                            codec: PrimitiveCodec::UtfString,
                            operand: Operand::Value(Place::Local(elem.clone())),
                        }],
                    },
                ],
                absent: vec![WriteOp::Write {
                    codec: PrimitiveCodec::CompactInt,
                    operand: Operand::Literal(-1),
                }],
            }]
        );

        let ReadOp::IfNotSentinel { sentinel, then, otherwise, .. } = &ops.read[1] else {
            panic!("expected a sentinel check, got {:?}", ops.read[1]);
        };
        assert_eq!(*sentinel, -1);
        assert_eq!(
            then[0],
            ReadOp::Assign {
                place: names.clone(),
                expr: ReadExpr::NewCollection("ArrayList".into()),
            }
        );
        assert_eq!(
            otherwise,
            &vec![ReadOp::Assign {
                place: names,
                expr: ReadExpr::Null,
            }]
        );
    }

    #[test]
    fn delta_array_is_one_call() {
        let config = CodecConfig::new();
        let registry = TypeRegistry::new();
        let resolver = Resolver::new(&config, &registry);

        let field = FieldDescriptor::new("xs", FieldType::array(FieldType::Scalar(ScalarKind::Int)))
            .with_annotation(Annotation::new("Delta"));
        let ops = compile_field(&field, &resolver).unwrap();

        assert_eq!(
            ops.write,
            vec![WriteOp::WriteDeltaArray {
                width: IntWidth::Int,
                value: Place::Field("xs".into()),
            }]
        );
        assert_eq!(
            ops.read,
            vec![ReadOp::Assign {
                place: Place::Field("xs".into()),
                expr: ReadExpr::DeltaArray(IntWidth::Int),
            }]
        );
    }

    #[test]
    fn nested_temporaries_are_distinct() {
        let config = CodecConfig::new();
        let registry = TypeRegistry::new();
        let resolver = Resolver::new(&config, &registry);

        let inner = FieldType::generic("LinkedList", [FieldType::String]);
        let field = compact("grid", FieldType::generic("ArrayList", [inner]));
        let ops = compile_field(&field, &resolver).unwrap();

        let WriteOp::IfPresent { present, .. } = &ops.write[0] else {
            panic!("expected a presence check");
        };
        let WriteOp::ForEach { element: outer, body, .. } = &present[1] else {
            panic!("expected a loop");
        };
        let WriteOp::IfPresent { present, .. } = &body[0] else {
            panic!("expected a nested presence check");
        };
        let WriteOp::ForEach { element: inner, .. } = &present[1] else {
            panic!("expected a nested loop");
        };
        assert_ne!(outer, inner);
        assert!(inner.as_str().starts_with("grid$"));
    }

    #[test]
    fn local_binding() {
        let config = CodecConfig::new();
        let registry = TypeRegistry::new();
        let resolver = Resolver::new(&config, &registry);

        let field = FieldDescriptor::new("n", FieldType::Scalar(ScalarKind::Short))
            .with_binding(Binding::Local);
        let ops = compile_field(&field, &resolver).unwrap();
        assert_eq!(
            ops.read,
            vec![ReadOp::Assign {
                place: Place::Local(Symbol::new("n")),
                expr: ReadExpr::Read(PrimitiveCodec::Short),
            }]
        );
    }

    #[test]
    fn structural_errors() {
        let config = CodecConfig::new();
        let registry = TypeRegistry::new();
        let resolver = Resolver::new(&config, &registry);

        let raw = compact("xs", FieldType::class("ArrayList"));
        assert_eq!(
            compile_field(&raw, &resolver),
            Err(ConfigError::MalformedContainerType {
                field: "xs".into(),
                ty: "ArrayList".into(),
                expected: 1,
            })
        );

        let half = compact("m", FieldType::generic("HashMap", [FieldType::String]));
        assert!(matches!(
            compile_field(&half, &resolver),
            Err(ConfigError::MalformedContainerType { expected: 2, .. })
        ));

        let inline_int = FieldDescriptor::new("x", FieldType::Scalar(ScalarKind::Int))
            .with_annotation(Annotation::new("Inline"));
        assert!(matches!(
            compile_field(&inline_int, &resolver),
            Err(ConfigError::NotAClass { .. })
        ));

        let field = FieldDescriptor::new("s", FieldType::String);
        assert!(matches!(
            emit(&field, &Strategy::Array, &resolver),
            Err(ConfigError::Inapplicable { .. })
        ));
    }

    #[test]
    fn common_object_is_narrowed() {
        let config = CodecConfig::new();
        let registry = TypeRegistry::new();
        let resolver = Resolver::new(&config, &registry);

        let field = FieldDescriptor::new("n", FieldType::Boxed(ScalarKind::Int));
        let ops = compile_field(&field, &resolver).unwrap();
        assert_eq!(
            ops.read,
            vec![ReadOp::Assign {
                place: Place::Field("n".into()),
                expr: ReadExpr::Narrowed(FieldType::Boxed(ScalarKind::Int)),
            }]
        );
    }
}
