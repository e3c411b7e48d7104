//! Buffer drivers: the exact-destination-size entry points.
//!
//! Each driver checks the size precondition once, before any work, then runs
//! the bulk core over the largest batch-aligned prefix and the scalar core
//! over the remainder. On failure nothing is written.

use std::error::Error;
use std::fmt;

use crate::length::{decoded_length, encoded_length};
use crate::{Padding, scalar, simd};

/// The destination buffer does not have the exact length the length
/// calculator computes for this source and padding mode.
///
/// This signals a caller bug: the codec never resizes or guesses, so the
/// caller must size the destination with [`encoded_length`] /
/// [`decoded_length`] before calling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMismatch {
    /// Length the destination must have.
    pub expected: usize,
    /// Length the caller supplied.
    pub actual: usize,
}

impl fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "destination buffer is {} bytes, exact required length is {}",
            self.actual, self.expected
        )
    }
}

impl Error for SizeMismatch {}

/// Encode `source` into an exactly-sized `dest`.
///
/// `dest.len()` must equal `encoded_length(source.len(), padding)`; any
/// other length fails before a single byte is written.
pub fn encode_into(source: &[u8], dest: &mut [u8], padding: Padding) -> Result<(), SizeMismatch> {
    let expected = encoded_length(source.len(), padding);
    if dest.len() != expected {
        return Err(SizeMismatch {
            expected,
            actual: dest.len(),
        });
    }

    let consumed = simd::encode_prefix(source, dest);
    scalar::encode(&source[consumed..], &mut dest[consumed / 3 * 4..], padding);
    Ok(())
}

/// Decode `source` into an exactly-sized `dest`.
///
/// `dest.len()` must equal `decoded_length(source)`. Bytes outside the
/// base64 alphabet are mapped to sextet 0, not rejected.
pub fn decode_into(source: &[u8], dest: &mut [u8]) -> Result<(), SizeMismatch> {
    let expected = decoded_length(source);
    if dest.len() != expected {
        return Err(SizeMismatch {
            expected,
            actual: dest.len(),
        });
    }

    let consumed = simd::decode_prefix(source, dest);
    scalar::decode(&source[consumed..], &mut dest[consumed / 4 * 3..]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_into_rejects_wrong_size() {
        let mut dest = [0u8; 3];
        let err = encode_into(b"foo", &mut dest, Padding::Padded).unwrap_err();
        assert_eq!(
            err,
            SizeMismatch {
                expected: 4,
                actual: 3
            }
        );
        // No partial output on failure
        assert_eq!(dest, [0u8; 3]);
    }

    #[test]
    fn test_decode_into_rejects_wrong_size() {
        let mut dest = [0u8; 4];
        let err = decode_into(b"Zm9v", &mut dest).unwrap_err();
        assert_eq!(
            err,
            SizeMismatch {
                expected: 3,
                actual: 4
            }
        );
        assert_eq!(dest, [0u8; 4]);
    }

    #[test]
    fn test_encode_into_exact_buffer() {
        let mut dest = [0u8; 8];
        encode_into(b"foobar", &mut dest, Padding::Padded).unwrap();
        assert_eq!(&dest, b"Zm9vYmFy");
    }

    #[test]
    fn test_decode_into_exact_buffer() {
        let mut dest = [0u8; 6];
        decode_into(b"Zm9vYmFy", &mut dest).unwrap();
        assert_eq!(&dest, b"foobar");
    }

    #[test]
    fn test_error_display() {
        let err = SizeMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "destination buffer is 3 bytes, exact required length is 4"
        );
    }
}
