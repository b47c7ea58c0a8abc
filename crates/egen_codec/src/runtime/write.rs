use alloc::borrow::Cow;
use alloc::format;
use alloc::vec::Vec;

use egen_io::DataOutput;
use egen_utils::hash::{HashMap, new_map};

use super::{CodecContext, CompiledField};
use crate::emit::{Operand, Place, PrimitiveCodec, WriteOp};
use crate::error::CodecError;
use crate::field::Binding;
use crate::strategy::{Baseline, IntWidth};
use crate::value::{DynamicObject, Value, write_object};

// -----------------------------------------------------------------------------
// Writer

/// Runs the write operations of one object.
pub(super) struct Writer<'o, 'v> {
    ctx: &'v CodecContext,
    object: &'v DynamicObject,
    locals: HashMap<&'o str, &'v Value>,
    field: &'o str,
    depth: usize,
}

impl<'o, 'v> Writer<'o, 'v> {
    pub fn new(ctx: &'v CodecContext, object: &'v DynamicObject, depth: usize) -> Self {
        Self {
            ctx,
            object,
            locals: new_map(),
            field: "",
            depth,
        }
    }

    pub fn run(mut self, fields: &'o [CompiledField], out: &mut dyn DataOutput) -> Result<(), CodecError> {
        for field in fields {
            self.field = field.name.as_str();
            if field.binding == Binding::Local {
                let value = self.field_value(&field.name)?;
                self.locals.insert(field.name.as_str(), value);
            }
            self.exec(&field.ops.write, out)?;
        }
        Ok(())
    }

    fn exec(&mut self, ops: &'o [WriteOp], out: &mut dyn DataOutput) -> Result<(), CodecError> {
        for op in ops {
            match op {
                WriteOp::Write { codec, operand } => {
                    let value = self.operand(operand)?;
                    self.write_primitive(*codec, &value, out)?;
                }
                WriteOp::WriteDelta {
                    width,
                    value,
                    baseline,
                } => {
                    let value = self.load(value)?;
                    let base = self.baseline(baseline)?;
                    match width {
                        IntWidth::Int => out.write_delta_int(self.int(value)?, narrow(base, value)?)?,
                        IntWidth::Long => out.write_delta_long(self.long(value)?, base)?,
                    }
                }
                WriteOp::WriteDeltaArray { width, value } => {
                    let value = self.load(value)?;
                    match (width, value) {
                        (_, Value::Null) => out.write_compact_int(-1)?,
                        (IntWidth::Int, Value::Array(items)) => {
                            let items = items.iter().map(|v| self.int(v)).collect::<Result<Vec<_>, _>>()?;
                            out.write_delta_int_array(Some(&items))?;
                        }
                        (IntWidth::Long, Value::Array(items)) => {
                            let items = items.iter().map(|v| self.long(v)).collect::<Result<Vec<_>, _>>()?;
                            out.write_delta_long_array(Some(&items))?;
                        }
                        (_, other) => return Err(CodecError::mismatch("array", other)),
                    }
                }
                WriteOp::WriteInline {
                    value,
                    top_level: _,
                } => {
                    let object = match self.load(value)? {
                        Value::Object(object) => object,
                        other => return Err(CodecError::mismatch("inline object", other)),
                    };
                    self.ctx
                        .inline_codec(object.class())?
                        .write_at(object, out, self.depth + 1)?;
                }
                WriteOp::IfPresent {
                    value,
                    present,
                    absent,
                } => {
                    if self.load(value)?.is_null() {
                        self.exec(absent, out)?;
                    } else {
                        self.exec(present, out)?;
                    }
                }
                WriteOp::ForEach {
                    source,
                    element,
                    body,
                } => {
                    let items = match self.load(source)? {
                        Value::Array(items) => items.as_slice(),
                        Value::Collection(c) => c.items(),
                        other => return Err(CodecError::mismatch("array or collection", other)),
                    };
                    for item in items {
                        self.locals.insert(element.as_str(), item);
                        self.exec(body, out)?;
                    }
                }
                WriteOp::ForEachEntry {
                    source,
                    key,
                    value,
                    body,
                } => {
                    let map = match self.load(source)? {
                        Value::Map(map) => map,
                        other => return Err(CodecError::mismatch("map", other)),
                    };
                    for (k, v) in map.entries() {
                        self.locals.insert(key.as_str(), k);
                        self.locals.insert(value.as_str(), v);
                        self.exec(body, out)?;
                    }
                }
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Values

    fn field_value(&self, name: &str) -> Result<&'v Value, CodecError> {
        self.object
            .get(name)
            .ok_or_else(|| CodecError::Unbound(format!("self.{name}")))
    }

    fn load(&self, place: &Place) -> Result<&'v Value, CodecError> {
        match place {
            Place::Field(name) => self.field_value(name),
            Place::Local(symbol) => self
                .locals
                .get(symbol.as_str())
                .copied()
                .ok_or_else(|| CodecError::Unbound(format!("{symbol}"))),
        }
    }

    fn operand(&self, operand: &Operand) -> Result<Cow<'v, Value>, CodecError> {
        Ok(match operand {
            Operand::Value(place) => Cow::Borrowed(self.load(place)?),
            Operand::Literal(n) => Cow::Owned(Value::Int(*n)),
            Operand::Size(place) => {
                let value = self.load(place)?;
                if value.is_null() {
                    return Err(CodecError::NullValue(self.field.into()));
                }
                let len = value.len().ok_or_else(|| CodecError::mismatch("container", value))?;
                let len = i32::try_from(len).map_err(|_| CodecError::SizeOverflow(len))?;
                Cow::Owned(Value::Int(len))
            }
            Operand::Code(place) => match self.load(place)? {
                Value::Ordinal { code, .. } => Cow::Owned(Value::Int(*code)),
                Value::Null => return Err(CodecError::NullValue(self.field.into())),
                other => return Err(CodecError::mismatch("ordinal", other)),
            },
            Operand::Converted { function, value } => {
                let input = self.operand(value)?;
                let convert = self
                    .ctx
                    .registry()
                    .conversion(function)
                    .ok_or_else(|| CodecError::UnknownConversion(function.clone()))?;
                let converted = convert(&*input).ok_or_else(|| CodecError::ConversionFailed(function.clone()))?;
                Cow::Owned(converted)
            }
        })
    }

    fn baseline(&self, baseline: &Baseline) -> Result<i64, CodecError> {
        match baseline {
            Baseline::Literal(n) => Ok(*n),
            Baseline::Field(name) => {
                let value = self.field_value(name)?;
                value.as_i64().ok_or_else(|| CodecError::mismatch("integral baseline", value))
            }
        }
    }

    fn int(&self, value: &Value) -> Result<i32, CodecError> {
        match value {
            Value::Null => Err(CodecError::NullValue(self.field.into())),
            other => other.as_i32().ok_or_else(|| CodecError::mismatch("int", other)),
        }
    }

    fn long(&self, value: &Value) -> Result<i64, CodecError> {
        match value {
            Value::Null => Err(CodecError::NullValue(self.field.into())),
            other => other.as_i64().ok_or_else(|| CodecError::mismatch("long", other)),
        }
    }

    fn write_primitive(
        &self,
        codec: PrimitiveCodec,
        value: &Value,
        out: &mut dyn DataOutput,
    ) -> Result<(), CodecError> {
        match (codec, value) {
            (PrimitiveCodec::UtfString, Value::Null) => out.write_utf_string(None)?,
            (PrimitiveCodec::UtfString, Value::Str(s)) => out.write_utf_string(Some(s.as_str()))?,
            (PrimitiveCodec::Object, value) => write_object(out, value)?,
            (_, Value::Null) => return Err(CodecError::NullValue(self.field.into())),
            (PrimitiveCodec::Boolean, Value::Boolean(b)) => out.write_boolean(*b)?,
            (PrimitiveCodec::Char, Value::Char(c)) => out.write_char(*c)?,
            (PrimitiveCodec::Float, Value::Float(f)) => out.write_float(*f)?,
            (PrimitiveCodec::Double, Value::Double(d)) => out.write_double(*d)?,
            (PrimitiveCodec::Byte, value) => {
                let byte = value.as_i32().and_then(|n| i8::try_from(n).ok());
                out.write_byte(byte.ok_or_else(|| CodecError::mismatch("byte", value))?)?;
            }
            (PrimitiveCodec::Short, value) => {
                let short = value.as_i32().and_then(|n| i16::try_from(n).ok());
                out.write_short(short.ok_or_else(|| CodecError::mismatch("short", value))?)?;
            }
            (PrimitiveCodec::Int, value) => out.write_int(self.int(value)?)?,
            (PrimitiveCodec::Long, value) => out.write_long(self.long(value)?)?,
            (PrimitiveCodec::CompactInt, value) => out.write_compact_int(self.int(value)?)?,
            (PrimitiveCodec::CompactLong, value) => out.write_compact_long(self.long(value)?)?,
            (codec, value) => return Err(CodecError::mismatch(codec_name(codec), value)),
        }
        Ok(())
    }
}

/// Narrows a delta baseline to the `int` width.
fn narrow(base: i64, value: &Value) -> Result<i32, CodecError> {
    i32::try_from(base).map_err(|_| CodecError::mismatch("int baseline", value))
}

pub(super) const fn codec_name(codec: PrimitiveCodec) -> &'static str {
    match codec {
        PrimitiveCodec::Boolean => "boolean",
        PrimitiveCodec::Byte => "byte",
        PrimitiveCodec::Short => "short",
        PrimitiveCodec::Char => "char",
        PrimitiveCodec::Int | PrimitiveCodec::CompactInt => "int",
        PrimitiveCodec::Long | PrimitiveCodec::CompactLong => "long",
        PrimitiveCodec::Float => "float",
        PrimitiveCodec::Double => "double",
        PrimitiveCodec::UtfString => "String",
        PrimitiveCodec::Object => "object",
    }
}
