//! The generic, self-describing object codec used by the Common strategy.
//!
//! Every value starts with a one-byte tag, see [`tag`]. Lengths and
//! counts are compact ints, class and field names are UTF strings.

use alloc::string::String;
use alloc::vec::Vec;

use egen_io::{DataInput, DataOutput, IoError};

use super::{DynamicCollection, DynamicMap, DynamicObject, Value};
use crate::error::CodecError;

/// Nesting limit for both directions.
pub const MAX_DEPTH: usize = 64;

/// Upper bound for a pre-allocation driven by a decoded count.
const PREALLOC: usize = 1024;

/// Object tags.
pub mod tag {
    pub const NULL: u8 = 0;
    pub const BOOLEAN: u8 = 1;
    pub const CHAR: u8 = 2;
    pub const BYTE: u8 = 3;
    pub const SHORT: u8 = 4;
    pub const INT: u8 = 5;
    pub const LONG: u8 = 6;
    pub const FLOAT: u8 = 7;
    pub const DOUBLE: u8 = 8;
    pub const STRING: u8 = 9;
    pub const ARRAY: u8 = 10;
    pub const COLLECTION: u8 = 11;
    pub const MAP: u8 = 12;
    pub const OBJECT: u8 = 13;
    pub const ORDINAL: u8 = 14;
}

// -----------------------------------------------------------------------------
// Write

/// Writes any value together with its run-time type information.
///
/// # Example
///
/// ```
/// use egen_codec::value::{Value, read_object, write_object};
///
/// let value = Value::from(vec!["a", "b"]);
/// let mut buf: Vec<u8> = Vec::new();
/// write_object(&mut buf, &value).unwrap();
///
/// assert_eq!(read_object(&mut buf.as_slice()).unwrap(), value);
/// ```
pub fn write_object(out: &mut dyn DataOutput, value: &Value) -> Result<(), CodecError> {
    write_tagged(out, value, 0)
}

fn write_tagged(out: &mut dyn DataOutput, value: &Value, depth: usize) -> Result<(), CodecError> {
    if depth > MAX_DEPTH {
        return Err(CodecError::NestingTooDeep(MAX_DEPTH));
    }
    let depth = depth + 1;

    match value {
        Value::Null => out.write_all(&[tag::NULL])?,
        Value::Boolean(v) => {
            out.write_all(&[tag::BOOLEAN])?;
            out.write_boolean(*v)?;
        }
        Value::Char(v) => {
            out.write_all(&[tag::CHAR])?;
            out.write_char(*v)?;
        }
        Value::Byte(v) => {
            out.write_all(&[tag::BYTE])?;
            out.write_byte(*v)?;
        }
        Value::Short(v) => {
            out.write_all(&[tag::SHORT])?;
            out.write_short(*v)?;
        }
        Value::Int(v) => {
            out.write_all(&[tag::INT])?;
            out.write_int(*v)?;
        }
        Value::Long(v) => {
            out.write_all(&[tag::LONG])?;
            out.write_long(*v)?;
        }
        Value::Float(v) => {
            out.write_all(&[tag::FLOAT])?;
            out.write_float(*v)?;
        }
        Value::Double(v) => {
            out.write_all(&[tag::DOUBLE])?;
            out.write_double(*v)?;
        }
        Value::Str(s) => {
            out.write_all(&[tag::STRING])?;
            out.write_utf_string(Some(s.as_str()))?;
        }
        Value::Array(items) => {
            out.write_all(&[tag::ARRAY])?;
            write_count(out, items.len())?;
            for item in items {
                write_tagged(out, item, depth)?;
            }
        }
        Value::Collection(c) => {
            out.write_all(&[tag::COLLECTION])?;
            out.write_utf_string(Some(c.class()))?;
            write_count(out, c.len())?;
            for item in c.items() {
                write_tagged(out, item, depth)?;
            }
        }
        Value::Map(m) => {
            out.write_all(&[tag::MAP])?;
            out.write_utf_string(Some(m.class()))?;
            write_count(out, m.len())?;
            for (k, v) in m.entries() {
                write_tagged(out, k, depth)?;
                write_tagged(out, v, depth)?;
            }
        }
        Value::Object(o) => {
            out.write_all(&[tag::OBJECT])?;
            out.write_utf_string(Some(o.class()))?;
            write_count(out, o.fields().len())?;
            for (name, v) in o.fields() {
                out.write_utf_string(Some(name.as_str()))?;
                write_tagged(out, v, depth)?;
            }
        }
        Value::Ordinal { class, code } => {
            out.write_all(&[tag::ORDINAL])?;
            out.write_utf_string(Some(class.as_str()))?;
            out.write_compact_int(*code)?;
        }
    }
    Ok(())
}

/// Writes a non-negative element count.
fn write_count(out: &mut dyn DataOutput, len: usize) -> Result<(), CodecError> {
    let len = i32::try_from(len).map_err(|_| CodecError::SizeOverflow(len))?;
    out.write_compact_int(len)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Read

/// Reads a value written by [`write_object`].
pub fn read_object(input: &mut dyn DataInput) -> Result<Value, CodecError> {
    read_tagged(input, 0)
}

fn read_tagged(input: &mut dyn DataInput, depth: usize) -> Result<Value, CodecError> {
    if depth > MAX_DEPTH {
        return Err(CodecError::NestingTooDeep(MAX_DEPTH));
    }
    let depth = depth + 1;

    let value = match input.read_u8()? {
        tag::NULL => Value::Null,
        tag::BOOLEAN => Value::Boolean(input.read_boolean()?),
        tag::CHAR => Value::Char(input.read_char()?),
        tag::BYTE => Value::Byte(input.read_byte()?),
        tag::SHORT => Value::Short(input.read_short()?),
        tag::INT => Value::Int(input.read_int()?),
        tag::LONG => Value::Long(input.read_long()?),
        tag::FLOAT => Value::Float(input.read_float()?),
        tag::DOUBLE => Value::Double(input.read_double()?),
        tag::STRING => Value::Str(read_name(input)?),
        tag::ARRAY => {
            let len = read_count(input)?;
            let mut items = Vec::with_capacity(len.min(PREALLOC));
            for _ in 0..len {
                items.push(read_tagged(input, depth)?);
            }
            Value::Array(items)
        }
        tag::COLLECTION => {
            let mut collection = DynamicCollection::new(read_name(input)?);
            for _ in 0..read_count(input)? {
                collection.push(read_tagged(input, depth)?);
            }
            Value::Collection(collection)
        }
        tag::MAP => {
            let mut map = DynamicMap::new(read_name(input)?);
            for _ in 0..read_count(input)? {
                let key = read_tagged(input, depth)?;
                let value = read_tagged(input, depth)?;
                map.insert(key, value);
            }
            Value::Map(map)
        }
        tag::OBJECT => {
            let mut object = DynamicObject::new(read_name(input)?);
            for _ in 0..read_count(input)? {
                let name = read_name(input)?;
                let value = read_tagged(input, depth)?;
                object.set(name, value);
            }
            Value::Object(object)
        }
        tag::ORDINAL => Value::Ordinal {
            class: read_name(input)?,
            code: input.read_compact_int()?,
        },
        other => return Err(CodecError::UnknownObjectTag(other)),
    };
    Ok(value)
}

/// Reads a non-negative element count.
fn read_count(input: &mut dyn DataInput) -> Result<usize, CodecError> {
    match input.read_compact_int()? {
        len if len < 0 => Err(IoError::InvalidLength(len as i64).into()),
        len => Ok(len as usize),
    }
}

fn read_name(input: &mut dyn DataInput) -> Result<String, CodecError> {
    input
        .read_utf_string()?
        .ok_or_else(|| IoError::InvalidLength(-1).into())
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{MAX_DEPTH, read_object, tag, write_object};
    use crate::error::CodecError;
    use crate::value::{DynamicCollection, DynamicMap, DynamicObject, Value};

    fn round_trip(value: &Value) -> Value {
        let mut buf: Vec<u8> = Vec::new();
        write_object(&mut buf, value).unwrap();
        let mut input = buf.as_slice();
        let read = read_object(&mut input).unwrap();
        assert!(input.is_empty());
        read
    }

    #[test]
    fn scalars() {
        for value in [
            Value::Null,
            Value::Boolean(true),
            Value::Char(0xFFFF),
            Value::Byte(i8::MIN),
            Value::Short(-7),
            Value::Int(i32::MAX),
            Value::Long(i64::MIN),
            Value::Double(1.5),
            Value::from("egen"),
        ] {
            assert_eq!(round_trip(&value), value);
        }
    }

    #[test]
    fn containers() {
        let object = DynamicObject::new("Point")
            .with_field("x", 1)
            .with_field("tags", DynamicCollection::from_items("ArrayList", ["a"]))
            .with_field("color", Value::Ordinal { class: "Color".into(), code: 2 });
        let map = DynamicMap::new("TreeMap").with_entry("p", object).with_entry("q", Value::Null);
        let value = Value::Array(vec![Value::from(map), Value::Array(vec![])]);

        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn unknown_tag() {
        let mut input: &[u8] = &[0x63];
        assert_eq!(read_object(&mut input), Err(CodecError::UnknownObjectTag(0x63)));
    }

    #[test]
    fn nesting_limit() {
        let mut value = Value::Null;
        for _ in 0..=MAX_DEPTH + 1 {
            value = Value::Array(vec![value]);
        }
        let mut buf: Vec<u8> = Vec::new();
        assert_eq!(write_object(&mut buf, &value), Err(CodecError::NestingTooDeep(MAX_DEPTH)));

        let mut buf = vec![tag::ARRAY, 1].repeat(MAX_DEPTH + 2);
        buf.push(tag::NULL);
        assert_eq!(read_object(&mut buf.as_slice()), Err(CodecError::NestingTooDeep(MAX_DEPTH)));
    }
}
