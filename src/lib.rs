//! RFC 4648 base64 with exact-size buffers.
//!
//! The core API is allocation free: size a destination with
//! [`encoded_length`] / [`decoded_length`], then fill it with
//! [`encode_into`] / [`decode_into`]. [`encode`] and [`decode`] are thin
//! wrappers that allocate the exact buffer and delegate.

mod alphabet;
mod encoding;
mod length;
mod scalar;
mod simd;

pub use encoding::{SizeMismatch, decode_into, encode_into};
pub use length::{decoded_length, encoded_length};
pub use simd::Engine;

/// Whether encode emits trailing `=` and decode expects it.
///
/// Selected per call; the two modes differ only in how the final partial
/// group is terminated, and [`decoded_length`] handles both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    /// Output is padded with `=` to a multiple of 4 symbols.
    #[default]
    Padded,
    /// Trailing `=` is omitted; a partial group stays short.
    Unpadded,
}

/// Encode to a freshly allocated `String` of exactly the required length.
pub fn encode(data: &[u8], padding: Padding) -> String {
    let mut buf = vec![0u8; encoded_length(data.len(), padding)];
    encode_into(data, &mut buf, padding).expect("buffer sized by encoded_length");

    // SAFETY: the alphabet and padding symbols are all ASCII
    unsafe { String::from_utf8_unchecked(buf) }
}

/// Decode to a freshly allocated `Vec<u8>` of exactly the required length.
///
/// Never fails: bytes outside the alphabet decode as sextet 0 by contract.
pub fn decode(encoded: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; decoded_length(encoded)];
    decode_into(encoded, &mut buf).expect("buffer sized by decoded_length");
    buf
}

#[cfg(test)]
mod tests;
