//! Scalar codec core: byte-at-a-time transform.
//!
//! Both functions require the destination slice to already be the exact
//! length computed by the length calculator for the given source; the buffer
//! drivers in `encoding` enforce that once, at the API boundary. Used on its
//! own for small inputs and as the tail pass after a bulk prefix.

use crate::Padding;
use crate::alphabet::{DECODE_LUT, ENCODE_LUT, PAD};

/// Encode `source` into `dest`, three bytes -> four symbols at a time.
///
/// The 1- and 2-byte tails are handled outside the main loop so the loop
/// body stays branch free. Unpadded mode never writes `=`; the destination
/// is sized without those cells.
pub fn encode(source: &[u8], dest: &mut [u8], padding: Padding) {
    let triple_end = (source.len() / 3) * 3;
    let mut out = 0;

    for chunk in source[..triple_end].chunks_exact(3) {
        let (b0, b1, b2) = (chunk[0], chunk[1], chunk[2]);

        dest[out] = ENCODE_LUT[(b0 >> 2) as usize];
        dest[out + 1] = ENCODE_LUT[((b0 & 0x03) << 4 | b1 >> 4) as usize];
        dest[out + 2] = ENCODE_LUT[((b1 & 0x0F) << 2 | b2 >> 6) as usize];
        dest[out + 3] = ENCODE_LUT[(b2 & 0x3F) as usize];
        out += 4;
    }

    match source.len() - triple_end {
        2 => {
            let b0 = source[triple_end];
            let b1 = source[triple_end + 1];

            dest[out] = ENCODE_LUT[(b0 >> 2) as usize];
            dest[out + 1] = ENCODE_LUT[((b0 & 0x03) << 4 | b1 >> 4) as usize];
            dest[out + 2] = ENCODE_LUT[((b1 & 0x0F) << 2) as usize];
            if padding == Padding::Padded {
                dest[out + 3] = PAD;
            }
        }
        1 => {
            let b0 = source[triple_end];

            dest[out] = ENCODE_LUT[(b0 >> 2) as usize];
            dest[out + 1] = ENCODE_LUT[((b0 & 0x03) << 4) as usize];
            if padding == Padding::Padded {
                dest[out + 2] = PAD;
                dest[out + 3] = PAD;
            }
        }
        _ => {}
    }
}

/// Decode `source` into `dest`, four symbols -> three bytes at a time.
///
/// Driven by the destination length, not by scanning for `=`: the final
/// partial group reads only the symbols its 1 or 2 remaining output bytes
/// need, so trailing padding is never touched here.
pub fn decode(source: &[u8], dest: &mut [u8]) {
    let quad_end = (dest.len() / 3) * 4;
    let mut out = 0;

    for chunk in source[..quad_end].chunks_exact(4) {
        let v0 = DECODE_LUT[chunk[0] as usize];
        let v1 = DECODE_LUT[chunk[1] as usize];
        let v2 = DECODE_LUT[chunk[2] as usize];
        let v3 = DECODE_LUT[chunk[3] as usize];

        dest[out] = v0 << 2 | v1 >> 4;
        dest[out + 1] = v1 << 4 | v2 >> 2;
        dest[out + 2] = v2 << 6 | v3;
        out += 3;
    }

    match dest.len() - out {
        2 => {
            let v0 = DECODE_LUT[source[quad_end] as usize];
            let v1 = DECODE_LUT[source[quad_end + 1] as usize];
            let v2 = DECODE_LUT[source[quad_end + 2] as usize];

            dest[out] = v0 << 2 | v1 >> 4;
            dest[out + 1] = v1 << 4 | v2 >> 2;
        }
        1 => {
            let v0 = DECODE_LUT[source[quad_end] as usize];
            let v1 = DECODE_LUT[source[quad_end + 1] as usize];

            dest[out] = v0 << 2 | v1 >> 4;
        }
        _ => {}
    }
}
