use alloc::vec::Vec;

use crate::IoError;
use crate::compact::{self, MAX_COMPACT_INT_LEN, MAX_COMPACT_LONG_LEN};

// -----------------------------------------------------------------------------
// DataOutput

/// A sink of big-endian primitive values.
///
/// Only [`write_all`](DataOutput::write_all) must be implemented,
/// every other method is layered on top of it.
///
/// Nullable payloads (strings and delta arrays) reserve the compact
/// length `-1` for `None`.
pub trait DataOutput {
    /// Writes the whole buffer or fails.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), IoError>;

    #[inline]
    fn write_boolean(&mut self, value: bool) -> Result<(), IoError> {
        self.write_all(&[value as u8])
    }

    #[inline]
    fn write_byte(&mut self, value: i8) -> Result<(), IoError> {
        self.write_all(&value.to_be_bytes())
    }

    #[inline]
    fn write_short(&mut self, value: i16) -> Result<(), IoError> {
        self.write_all(&value.to_be_bytes())
    }

    /// Writes a UTF-16 code unit.
    #[inline]
    fn write_char(&mut self, value: u16) -> Result<(), IoError> {
        self.write_all(&value.to_be_bytes())
    }

    #[inline]
    fn write_int(&mut self, value: i32) -> Result<(), IoError> {
        self.write_all(&value.to_be_bytes())
    }

    #[inline]
    fn write_long(&mut self, value: i64) -> Result<(), IoError> {
        self.write_all(&value.to_be_bytes())
    }

    #[inline]
    fn write_float(&mut self, value: f32) -> Result<(), IoError> {
        self.write_all(&value.to_bits().to_be_bytes())
    }

    #[inline]
    fn write_double(&mut self, value: f64) -> Result<(), IoError> {
        self.write_all(&value.to_bits().to_be_bytes())
    }

    /// Writes `value` in 1 to 5 bytes, see [`compact`].
    fn write_compact_int(&mut self, value: i32) -> Result<(), IoError> {
        let mut buf = [0; MAX_COMPACT_INT_LEN];
        let len = compact::encode_int(value, &mut buf);
        self.write_all(&buf[..len])
    }

    /// Writes `value` in 1 to 9 bytes, see [`compact`].
    fn write_compact_long(&mut self, value: i64) -> Result<(), IoError> {
        let mut buf = [0; MAX_COMPACT_LONG_LEN];
        let len = compact::encode_long(value, &mut buf);
        self.write_all(&buf[..len])
    }

    /// Writes the compact UTF-8 byte length followed by the bytes.
    fn write_utf_string(&mut self, value: Option<&str>) -> Result<(), IoError> {
        let Some(value) = value else {
            return self.write_compact_int(-1);
        };
        let len = i32::try_from(value.len()).map_err(|_| IoError::InvalidLength(value.len() as i64))?;
        self.write_compact_int(len)?;
        self.write_all(value.as_bytes())
    }

    /// Writes `value - from` as a compact int, wrapping on overflow.
    #[inline]
    fn write_delta_int(&mut self, value: i32, from: i32) -> Result<(), IoError> {
        self.write_compact_int(value.wrapping_sub(from))
    }

    /// Writes `value - from` as a compact long, wrapping on overflow.
    #[inline]
    fn write_delta_long(&mut self, value: i64, from: i64) -> Result<(), IoError> {
        self.write_compact_long(value.wrapping_sub(from))
    }

    /// Writes the length, then every element as a delta against its predecessor.
    ///
    /// The first element is coded against `0`.
    fn write_delta_int_array(&mut self, values: Option<&[i32]>) -> Result<(), IoError> {
        let Some(values) = values else {
            return self.write_compact_int(-1);
        };
        let len = i32::try_from(values.len()).map_err(|_| IoError::InvalidLength(values.len() as i64))?;
        self.write_compact_int(len)?;
        let mut prev = 0;
        for &value in values {
            self.write_delta_int(value, prev)?;
            prev = value;
        }
        Ok(())
    }

    /// Long counterpart of [`write_delta_int_array`](DataOutput::write_delta_int_array).
    fn write_delta_long_array(&mut self, values: Option<&[i64]>) -> Result<(), IoError> {
        let Some(values) = values else {
            return self.write_compact_int(-1);
        };
        let len = i32::try_from(values.len()).map_err(|_| IoError::InvalidLength(values.len() as i64))?;
        self.write_compact_int(len)?;
        let mut prev = 0;
        for &value in values {
            self.write_delta_long(value, prev)?;
            prev = value;
        }
        Ok(())
    }
}

impl DataOutput for Vec<u8> {
    #[inline]
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl<T: DataOutput + ?Sized> DataOutput for &mut T {
    #[inline]
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        (**self).write_all(bytes)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::DataOutput;

    #[test]
    fn fixed_width_is_big_endian() {
        let mut out = Vec::new();
        out.write_int(0x0102_0304).unwrap();
        out.write_short(-2).unwrap();
        out.write_boolean(true).unwrap();
        out.write_char(0x41).unwrap();
        assert_eq!(out, [1, 2, 3, 4, 0xFF, 0xFE, 1, 0, 0x41]);
    }

    #[test]
    fn null_string_is_minus_one() {
        let mut out = Vec::new();
        out.write_utf_string(None).unwrap();
        out.write_utf_string(Some("")).unwrap();
        assert_eq!(out, [0x7F, 0x00]);
    }

    #[test]
    fn delta_array_layout() {
        let mut out = Vec::new();
        out.write_delta_int_array(Some(&[5, 7, 7, 10])).unwrap();
        // length 4, then deltas 5, 2, 0, 3
        assert_eq!(out, [4, 5, 2, 0, 3]);
    }
}
