//! Exact output-length arithmetic.
//!
//! Callers size destination buffers with these functions before calling the
//! buffer drivers; the drivers refuse to run against any other length.

use crate::Padding;
use crate::alphabet::PAD;

/// Exact encoded length for `binary_length` input bytes.
///
/// Padded output is always rounded up to a multiple of 4; unpadded output
/// drops the `=` bytes, so a trailing partial group contributes
/// `remainder + 1` symbols.
pub fn encoded_length(binary_length: usize, padding: Padding) -> usize {
    match padding {
        Padding::Padded => binary_length.div_ceil(3) * 4,
        Padding::Unpadded => {
            let remainder = binary_length % 3;
            let length = (binary_length / 3) * 4;
            if remainder != 0 {
                length + remainder + 1
            } else {
                length
            }
        }
    }
}

/// Exact decoded length for an encoded buffer.
///
/// Only the last one or two bytes are inspected for `=`; the rest of the
/// input is not validated. A short trailing group (unpadded form) of
/// `remainder` symbols contributes `remainder - 1` bytes.
pub fn decoded_length(encoded: &[u8]) -> usize {
    if encoded.is_empty() {
        return 0;
    }

    let group_count = encoded.len() / 4;
    let remainder = encoded.len() % 4;
    if remainder != 0 {
        // Unpadded data
        return group_count * 3 + (remainder - 1);
    }

    // Either binary % 3 == 0 || padded
    let length = group_count * 3;
    if encoded[encoded.len() - 2] == PAD {
        length - 2
    } else if encoded[encoded.len() - 1] == PAD {
        length - 1
    } else {
        length
    }
}
