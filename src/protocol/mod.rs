//! Request/response wire format
//!
//! Every exchange is one fixed-size envelope in each direction:
//!
//! ```text
//! [8 bytes: zig-zag varint of a signed 64-bit integer, zero padded]
//! ```
//!
//! The client sends the current Unix epoch time in seconds. A conforming peer
//! decodes the request and returns the same integer, re-encoded, as an 8-byte
//! response. The envelope is always exactly [`ENVELOPE_LEN`] bytes on the wire
//! regardless of how many bytes the varint itself needs.
//!
//! # Example
//!
//! ```
//! use netpulse::protocol::{decode_envelope, encode_envelope};
//!
//! let envelope = encode_envelope(1_700_000_000).unwrap();
//! assert_eq!(envelope.len(), 8);
//! assert_eq!(decode_envelope(&envelope).unwrap(), 1_700_000_000);
//! ```

pub mod varint;

pub use varint::CodecError;

/// Size of both the request and the response envelope
pub const ENVELOPE_LEN: usize = 8;

/// Fixed-size request/response buffer
pub type Envelope = [u8; ENVELOPE_LEN];

/// Encode `value` into a zero-padded 8-byte envelope
///
/// Values whose varint encoding needs more than 8 bytes (magnitude of 2^55
/// or more) are rejected.
pub fn encode_envelope(value: i64) -> Result<Envelope, CodecError> {
    let mut envelope = [0u8; ENVELOPE_LEN];
    varint::encode_i64(value, &mut envelope)?;
    Ok(envelope)
}

/// Decode the integer carried by an 8-byte envelope
///
/// Bytes after the terminating varint byte are padding and ignored.
pub fn decode_envelope(envelope: &Envelope) -> Result<i64, CodecError> {
    varint::decode_i64(envelope).map(|(value, _)| value)
}
