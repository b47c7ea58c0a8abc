//! Compact (variable-length) integer layout.
//!
//! The first byte carries a run of leading `1` bits telling how many bytes
//! follow, the remaining bits of the first byte and all following bytes hold
//! a big-endian two's complement payload which is sign-extended on decode.
//!
//! | first byte  | bytes | payload bits |
//! |-------------|-------|--------------|
//! | `0xxxxxxx`  | 1     | 7            |
//! | `10xxxxxx`  | 2     | 14           |
//! | `110xxxxx`  | 3     | 21           |
//! | `1110xxxx`  | 4     | 28           |
//! | `11110xxx`  | 5     | 35           |
//! | `111110xx`  | 6     | 42           |
//! | `1111110x`  | 7     | 49           |
//! | `11111110`  | 8     | 56           |
//! | `11111111`  | 9     | 64           |
//!
//! Compact ints never use more than 5 bytes: values outside the 28 bit range
//! are written as `0xF0` followed by the plain 4 byte int.

/// Maximum encoded size of a compact `i64`.
pub const MAX_COMPACT_LONG_LEN: usize = 9;

/// Maximum encoded size of a compact `i32`.
pub const MAX_COMPACT_INT_LEN: usize = 5;

/// Number of payload bits carried by an encoding with `extra` trailing bytes.
#[inline]
const fn payload_bits(extra: u32) -> u32 {
    if extra >= 8 { 64 } else { 7 * (extra + 1) }
}

#[inline]
const fn fits(value: i64, bits: u32) -> bool {
    if bits >= 64 {
        return true;
    }
    let half = 1_i64 << (bits - 1);
    value >= -half && value < half
}

/// Number of bytes following the first byte, given the first byte.
#[inline]
pub const fn trailing_len(first: u8) -> usize {
    first.leading_ones() as usize
}

/// Encodes `value` into `buf`, returning the number of bytes used.
pub fn encode_long(value: i64, buf: &mut [u8; MAX_COMPACT_LONG_LEN]) -> usize {
    let mut extra = 0_u32;
    while !fits(value, payload_bits(extra)) {
        extra += 1;
    }
    let len = extra as usize + 1;
    let raw = value as u64;

    for i in 0..extra as usize {
        buf[len - 1 - i] = (raw >> (8 * i)) as u8;
    }

    let prefix = !(0xFF_u8.checked_shr(extra).unwrap_or(0));
    let head = if extra >= 8 {
        0
    } else {
        ((raw >> (8 * extra)) as u8) & (0x7F_u8 >> extra)
    };
    buf[0] = prefix | head;
    len
}

/// Encodes `value` into `buf`, returning the number of bytes used.
pub fn encode_int(value: i32, buf: &mut [u8; MAX_COMPACT_INT_LEN]) -> usize {
    if fits(value as i64, payload_bits(3)) {
        let mut wide = [0_u8; MAX_COMPACT_LONG_LEN];
        let len = encode_long(value as i64, &mut wide);
        buf[..len].copy_from_slice(&wide[..len]);
        len
    } else {
        buf[0] = 0xF0;
        buf[1..].copy_from_slice(&value.to_be_bytes());
        MAX_COMPACT_INT_LEN
    }
}

/// Decodes a value from its first byte and the [`trailing_len`] bytes after it.
pub fn decode_long(first: u8, rest: &[u8]) -> i64 {
    let extra = rest.len() as u32;
    let mut raw = if extra >= 8 {
        0
    } else {
        (first & (0x7F_u8 >> extra)) as u64
    };
    for byte in rest {
        raw = (raw << 8) | *byte as u64;
    }
    let shift = 64 - payload_bits(extra);
    ((raw << shift) as i64) >> shift
}
