use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

use egen_io::{DataInput, IoError};
use egen_utils::hash::{HashMap, new_map};

use super::{CodecContext, CompiledField};
use crate::emit::{Place, PrimitiveCodec, ReadExpr, ReadOp, Symbol};
use crate::error::CodecError;
use crate::field::Binding;
use crate::strategy::{Baseline, IntWidth};
use crate::value::{DynamicCollection, DynamicMap, DynamicObject, Value, read_object};

/// Upper bound for an array pre-allocation driven by a decoded size.
const PREALLOC: usize = 1024;

// -----------------------------------------------------------------------------
// Reader

/// Runs the read operations of one object.
pub(super) struct Reader<'o, 'c> {
    ctx: &'c CodecContext,
    locals: HashMap<&'o str, Value>,
    depth: usize,
}

impl<'o, 'c> Reader<'o, 'c> {
    pub fn new(ctx: &'c CodecContext, depth: usize) -> Self {
        Self {
            ctx,
            locals: new_map(),
            depth,
        }
    }

    pub fn run(
        mut self,
        fields: &'o [CompiledField],
        object: &mut DynamicObject,
        input: &mut dyn DataInput,
    ) -> Result<(), CodecError> {
        for field in fields {
            self.exec(&field.ops.read, object, input)?;
            if field.binding == Binding::Local
                && let Some(value) = self.locals.remove(field.name.as_str())
            {
                object.set(field.name.as_str(), value);
            }
        }
        Ok(())
    }

    fn exec(
        &mut self,
        ops: &'o [ReadOp],
        object: &mut DynamicObject,
        input: &mut dyn DataInput,
    ) -> Result<(), CodecError> {
        for op in ops {
            match op {
                ReadOp::Let { symbol, expr } => {
                    let value = self.eval(expr, object, input)?;
                    self.locals.insert(symbol.as_str(), value);
                }
                ReadOp::Assign { place, expr } => {
                    let value = self.eval(expr, object, input)?;
                    match place {
                        Place::Field(name) => object.set(name.as_str(), value),
                        Place::Local(symbol) => {
                            self.locals.insert(symbol.as_str(), value);
                        }
                    }
                }
                ReadOp::ReadInline { target } => {
                    let ctx = self.ctx;
                    let depth = self.depth + 1;
                    let nested = match place_mut(&mut self.locals, object, target)? {
                        Value::Object(nested) => nested,
                        other => return Err(CodecError::mismatch("inline object", other)),
                    };
                    ctx.inline_codec(nested.class())?
                        .read_at(nested, input, depth)?;
                }
                ReadOp::IfNotSentinel {
                    symbol,
                    sentinel,
                    then,
                    otherwise,
                } => {
                    if self.int_local(symbol)? != *sentinel {
                        self.exec(then, object, input)?;
                    } else {
                        self.exec(otherwise, object, input)?;
                    }
                }
                ReadOp::Repeat { count, index, body } => {
                    let count = self.int_local(count)?;
                    if count < 0 {
                        return Err(IoError::InvalidLength(count as i64).into());
                    }
                    for i in 0..count {
                        self.locals.insert(index.as_str(), Value::Int(i));
                        self.exec(body, object, input)?;
                    }
                }
                ReadOp::Push { target, element } => {
                    let element = self.take(element)?;
                    match place_mut(&mut self.locals, object, target)? {
                        Value::Collection(c) => c.push(element),
                        other => return Err(CodecError::mismatch("collection", other)),
                    }
                }
                ReadOp::Store {
                    target,
                    index,
                    element,
                } => {
                    let element = self.take(element)?;
                    let index = self.int_local(index)? as usize;
                    match place_mut(&mut self.locals, object, target)? {
                        Value::Array(items) => match items.get_mut(index) {
                            Some(slot) => *slot = element,
                            None => items.push(element),
                        },
                        other => return Err(CodecError::mismatch("array", other)),
                    }
                }
                ReadOp::Insert { target, key, value } => {
                    let key = self.take(key)?;
                    let value = self.take(value)?;
                    match place_mut(&mut self.locals, object, target)? {
                        Value::Map(m) => m.insert(key, value),
                        other => return Err(CodecError::mismatch("map", other)),
                    }
                }
            }
        }
        Ok(())
    }

    fn eval(
        &self,
        expr: &ReadExpr,
        object: &DynamicObject,
        input: &mut dyn DataInput,
    ) -> Result<Value, CodecError> {
        Ok(match expr {
            ReadExpr::Read(codec) => read_primitive(*codec, input)?,
            ReadExpr::Narrowed(ty) => {
                let value = read_object(input)?;
                if !self.ctx.registry().narrows_to(&value, ty) {
                    return Err(CodecError::mismatch(ty.to_string(), &value));
                }
                value
            }
            ReadExpr::Delta { width, baseline } => {
                let base = baseline_of(baseline, object)?;
                match width {
                    IntWidth::Int => {
                        let base = i32::try_from(base)
                            .map_err(|_| CodecError::mismatch("int baseline", &Value::Long(base)))?;
                        Value::Int(input.read_delta_int(base)?)
                    }
                    IntWidth::Long => Value::Long(input.read_delta_long(base)?),
                }
            }
            ReadExpr::DeltaArray(IntWidth::Int) => Value::from(input.read_delta_int_array()?),
            ReadExpr::DeltaArray(IntWidth::Long) => Value::from(input.read_delta_long_array()?),
            ReadExpr::Converted { function, value } => {
                let raw = self.eval(value, object, input)?;
                let convert = self
                    .ctx
                    .registry()
                    .conversion(function)
                    .ok_or_else(|| CodecError::UnknownConversion(function.clone()))?;
                convert(&raw).ok_or_else(|| CodecError::ConversionFailed(function.clone()))?
            }
            ReadExpr::FindByCode { class, code } => {
                let code = self.int_local(code)?;
                let lookup = self
                    .ctx
                    .registry()
                    .ordinal(class)
                    .ok_or_else(|| CodecError::UnknownOrdinalClass(class.clone()))?;
                lookup.find_by_code(class, code).unwrap_or(Value::Null)
            }
            ReadExpr::NewInstance(class) => {
                let schema = self
                    .ctx
                    .registry()
                    .inline_schema(class)
                    .ok_or_else(|| CodecError::UnknownInlineClass(class.clone()))?;
                Value::Object(DynamicObject::from_schema(schema))
            }
            ReadExpr::NewCollection(class) => Value::Collection(DynamicCollection::new(class.as_str())),
            ReadExpr::NewMap(class) => Value::Map(DynamicMap::new(class.as_str())),
            ReadExpr::NewArray { element: _, len } => {
                let len = self.int_local(len)?.max(0) as usize;
                Value::Array(Vec::with_capacity(len.min(PREALLOC)))
            }
            ReadExpr::Default(ty) => Value::default_of(ty),
            ReadExpr::Null => Value::Null,
        })
    }

    // -------------------------------------------------------------------------
    // Locals

    fn int_local(&self, symbol: &Symbol) -> Result<i32, CodecError> {
        let value = self
            .locals
            .get(symbol.as_str())
            .ok_or_else(|| CodecError::Unbound(symbol.to_string()))?;
        value.as_i32().ok_or_else(|| CodecError::mismatch("int", value))
    }

    fn take(&mut self, symbol: &Symbol) -> Result<Value, CodecError> {
        self.locals
            .remove(symbol.as_str())
            .ok_or_else(|| CodecError::Unbound(symbol.to_string()))
    }
}

fn place_mut<'a>(
    locals: &'a mut HashMap<&str, Value>,
    object: &'a mut DynamicObject,
    place: &Place,
) -> Result<&'a mut Value, CodecError> {
    match place {
        Place::Field(name) => object
            .get_mut(name)
            .ok_or_else(|| CodecError::Unbound(format!("self.{name}"))),
        Place::Local(symbol) => locals
            .get_mut(symbol.as_str())
            .ok_or_else(|| CodecError::Unbound(symbol.to_string())),
    }
}

fn baseline_of(baseline: &Baseline, object: &DynamicObject) -> Result<i64, CodecError> {
    match baseline {
        Baseline::Literal(n) => Ok(*n),
        Baseline::Field(name) => {
            let value = object
                .get(name)
                .ok_or_else(|| CodecError::Unbound(format!("self.{name}")))?;
            value.as_i64().ok_or_else(|| CodecError::mismatch("integral baseline", value))
        }
    }
}

fn read_primitive(codec: PrimitiveCodec, input: &mut dyn DataInput) -> Result<Value, CodecError> {
    Ok(match codec {
        PrimitiveCodec::Boolean => Value::Boolean(input.read_boolean()?),
        PrimitiveCodec::Byte => Value::Byte(input.read_byte()?),
        PrimitiveCodec::Short => Value::Short(input.read_short()?),
        PrimitiveCodec::Char => Value::Char(input.read_char()?),
        PrimitiveCodec::Int => Value::Int(input.read_int()?),
        PrimitiveCodec::Long => Value::Long(input.read_long()?),
        PrimitiveCodec::Float => Value::Float(input.read_float()?),
        PrimitiveCodec::Double => Value::Double(input.read_double()?),
        PrimitiveCodec::CompactInt => Value::Int(input.read_compact_int()?),
        PrimitiveCodec::CompactLong => Value::Long(input.read_compact_long()?),
        PrimitiveCodec::UtfString => Value::from(input.read_utf_string()?),
        PrimitiveCodec::Object => read_object(input)?,
    })
}
