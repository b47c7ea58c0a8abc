use alloc::string::String;
use alloc::vec::Vec;

use crate::IoError;
use crate::compact::{self, MAX_COMPACT_LONG_LEN};

/// Upper bound for a single pre-allocation driven by a length prefix.
const CHUNK: usize = 4096;

// -----------------------------------------------------------------------------
// DataInput

/// A source of big-endian primitive values, mirror of
/// [`DataOutput`](crate::DataOutput).
pub trait DataInput {
    /// Fills the whole buffer or fails.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), IoError>;

    #[inline]
    fn read_boolean(&mut self) -> Result<bool, IoError> {
        Ok(self.read_u8()? != 0)
    }

    #[inline]
    fn read_u8(&mut self) -> Result<u8, IoError> {
        let mut buf = [0; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    #[inline]
    fn read_byte(&mut self) -> Result<i8, IoError> {
        Ok(self.read_u8()? as i8)
    }

    #[inline]
    fn read_short(&mut self) -> Result<i16, IoError> {
        let mut buf = [0; 2];
        self.read_exact(&mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    #[inline]
    fn read_char(&mut self) -> Result<u16, IoError> {
        let mut buf = [0; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    #[inline]
    fn read_int(&mut self) -> Result<i32, IoError> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    #[inline]
    fn read_long(&mut self) -> Result<i64, IoError> {
        let mut buf = [0; 8];
        self.read_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    #[inline]
    fn read_float(&mut self) -> Result<f32, IoError> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;
        Ok(f32::from_bits(u32::from_be_bytes(buf)))
    }

    #[inline]
    fn read_double(&mut self) -> Result<f64, IoError> {
        let mut buf = [0; 8];
        self.read_exact(&mut buf)?;
        Ok(f64::from_bits(u64::from_be_bytes(buf)))
    }

    fn read_compact_long(&mut self) -> Result<i64, IoError> {
        let first = self.read_u8()?;
        let mut rest = [0; MAX_COMPACT_LONG_LEN - 1];
        let extra = compact::trailing_len(first);
        self.read_exact(&mut rest[..extra])?;
        Ok(compact::decode_long(first, &rest[..extra]))
    }

    /// Reads a compact int.
    ///
    /// Longer (long) encodings are accepted and truncated to the low 32 bits.
    #[inline]
    fn read_compact_int(&mut self) -> Result<i32, IoError> {
        Ok(self.read_compact_long()? as i32)
    }

    fn read_utf_string(&mut self) -> Result<Option<String>, IoError> {
        let Some(len) = read_length(self)? else {
            return Ok(None);
        };
        let bytes = read_bytes(self, len)?;
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| IoError::InvalidUtf8)
    }

    #[inline]
    fn read_delta_int(&mut self, from: i32) -> Result<i32, IoError> {
        Ok(from.wrapping_add(self.read_compact_int()?))
    }

    #[inline]
    fn read_delta_long(&mut self, from: i64) -> Result<i64, IoError> {
        Ok(from.wrapping_add(self.read_compact_long()?))
    }

    fn read_delta_int_array(&mut self) -> Result<Option<Vec<i32>>, IoError> {
        let Some(len) = read_length(self)? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(len.min(CHUNK));
        let mut prev = 0;
        for _ in 0..len {
            prev = self.read_delta_int(prev)?;
            values.push(prev);
        }
        Ok(Some(values))
    }

    fn read_delta_long_array(&mut self) -> Result<Option<Vec<i64>>, IoError> {
        let Some(len) = read_length(self)? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(len.min(CHUNK));
        let mut prev = 0;
        for _ in 0..len {
            prev = self.read_delta_long(prev)?;
            values.push(prev);
        }
        Ok(Some(values))
    }
}

/// Reads a nullable compact length, `-1` meaning `None`.
fn read_length<I: DataInput + ?Sized>(input: &mut I) -> Result<Option<usize>, IoError> {
    match input.read_compact_int()? {
        -1 => Ok(None),
        len if len < 0 => Err(IoError::InvalidLength(len as i64)),
        len => Ok(Some(len as usize)),
    }
}

// Grows in chunks so a corrupt prefix cannot force a huge allocation up front.
fn read_bytes<I: DataInput + ?Sized>(input: &mut I, len: usize) -> Result<Vec<u8>, IoError> {
    let mut bytes = Vec::with_capacity(len.min(CHUNK));
    while bytes.len() < len {
        let start = bytes.len();
        let step = (len - start).min(CHUNK);
        bytes.resize(start + step, 0);
        input.read_exact(&mut bytes[start..])?;
    }
    Ok(bytes)
}

impl DataInput for &[u8] {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        if buf.len() > self.len() {
            return Err(IoError::UnexpectedEof {
                needed: buf.len(),
                remaining: self.len(),
            });
        }
        let (head, tail) = self.split_at(buf.len());
        buf.copy_from_slice(head);
        *self = tail;
        Ok(())
    }
}

impl<T: DataInput + ?Sized> DataInput for &mut T {
    #[inline]
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        (**self).read_exact(buf)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::DataInput;
    use crate::{DataOutput, IoError};

    #[test]
    fn compact_int_boundaries() {
        let values = [0, -1, 1, 63, -64, 64, 8191, -8192, i32::MIN, i32::MAX];
        let mut out = Vec::new();
        for v in values {
            out.write_compact_int(v).unwrap();
        }
        let mut input = out.as_slice();
        for v in values {
            assert_eq!(input.read_compact_int().unwrap(), v);
        }
        assert!(input.is_empty());
    }

    #[test]
    fn compact_long_boundaries() {
        let values = [0, -1, i64::MIN, i64::MAX, i32::MIN as i64 - 1, 1 << 50];
        let mut out = Vec::new();
        for v in values {
            out.write_compact_long(v).unwrap();
        }
        let mut input = out.as_slice();
        for v in values {
            assert_eq!(input.read_compact_long().unwrap(), v);
        }
    }

    #[test]
    fn floats_are_bit_exact() {
        let mut out = Vec::new();
        out.write_float(f32::NAN).unwrap();
        out.write_double(-0.0).unwrap();
        let mut input = out.as_slice();
        assert_eq!(input.read_float().unwrap().to_bits(), f32::NAN.to_bits());
        assert_eq!(input.read_double().unwrap().to_bits(), (-0.0_f64).to_bits());
    }

    #[test]
    fn extreme_delta() {
        let mut out = Vec::new();
        out.write_delta_int(i32::MIN, i32::MAX).unwrap();
        out.write_delta_long(i64::MIN, i64::MAX).unwrap();
        out.write_delta_int(7, 7).unwrap();
        let mut input = out.as_slice();
        assert_eq!(input.read_delta_int(i32::MAX).unwrap(), i32::MIN);
        assert_eq!(input.read_delta_long(i64::MAX).unwrap(), i64::MIN);
        assert_eq!(input.read_delta_int(7).unwrap(), 7);
    }

    #[test]
    fn delta_arrays() {
        let mut out = Vec::new();
        out.write_delta_long_array(Some(&[i64::MAX, i64::MIN, 0])).unwrap();
        out.write_delta_int_array(None).unwrap();
        out.write_delta_int_array(Some(&[])).unwrap();
        let mut input = out.as_slice();
        assert_eq!(
            input.read_delta_long_array().unwrap(),
            Some(vec![i64::MAX, i64::MIN, 0])
        );
        assert_eq!(input.read_delta_int_array().unwrap(), None);
        assert_eq!(input.read_delta_int_array().unwrap(), Some(vec![]));
    }

    #[test]
    fn truncated_input() {
        let mut input: &[u8] = &[0x80];
        assert_eq!(
            input.read_compact_int(),
            Err(IoError::UnexpectedEof {
                needed: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn rejects_bad_strings() {
        let mut input: &[u8] = &[0x02, 0xC3, 0x28];
        assert_eq!(input.read_utf_string(), Err(IoError::InvalidUtf8));

        let mut input: &[u8] = &[0x7E];
        assert_eq!(input.read_utf_string(), Err(IoError::InvalidLength(-2)));
    }
}
