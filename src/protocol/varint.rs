//! Zig-zag + base-128 varint codec
//!
//! Signed integers are first mapped onto unsigned ones with zig-zag encoding so
//! that small magnitudes (positive or negative) stay small, then written as a
//! little-endian base-128 varint: 7 data bits per byte, high bit set on every
//! byte except the last.
//!
//! ```text
//!     0 -> 0x00
//!    -1 -> 0x01
//!     1 -> 0x02
//!    -2 -> 0x03
//!    63 -> 0x7e
//!    64 -> 0x80 0x01
//! ```

use thiserror::Error;

/// Longest possible varint encoding of a 64-bit value
pub const MAX_VARINT_LEN: usize = 10;

/// Varint codec errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Destination buffer too small for the encoded value
    #[error("varint needs {needed} bytes but buffer holds {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },

    /// Input ended while the continuation bit was still set
    #[error("varint truncated after {0} bytes")]
    Truncated(usize),

    /// Encoded value does not fit in 64 bits
    #[error("varint overflows 64 bits")]
    Overflow,
}

/// Map a signed value onto the unsigned zig-zag space
#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`]
#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Number of bytes the varint encoding of `value` occupies
pub fn encoded_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Write `value` as an unsigned varint into `buf`
///
/// Returns the number of bytes written. Nothing is written if the encoding
/// does not fit.
pub fn encode_u64(mut value: u64, buf: &mut [u8]) -> Result<usize, CodecError> {
    let needed = encoded_len(value);
    if needed > buf.len() {
        return Err(CodecError::BufferTooSmall {
            needed,
            capacity: buf.len(),
        });
    }

    let mut i = 0;
    while value >= 0x80 {
        buf[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;
    Ok(i + 1)
}

/// Read an unsigned varint from the front of `buf`
///
/// Returns the decoded value and the number of bytes consumed.
pub fn decode_u64(buf: &[u8]) -> Result<(u64, usize), CodecError> {
    let mut value: u64 = 0;
    let mut shift = 0u32;

    for (i, &byte) in buf.iter().enumerate() {
        // The tenth byte may only carry the single remaining bit
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(CodecError::Overflow);
        }

        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }

    Err(CodecError::Truncated(buf.len()))
}

/// Zig-zag encode `value` and write it as a varint into `buf`
pub fn encode_i64(value: i64, buf: &mut [u8]) -> Result<usize, CodecError> {
    encode_u64(zigzag_encode(value), buf)
}

/// Read a zig-zag varint from the front of `buf`
pub fn decode_i64(buf: &[u8]) -> Result<(i64, usize), CodecError> {
    let (raw, len) = decode_u64(buf)?;
    Ok((zigzag_decode(raw), len))
}
