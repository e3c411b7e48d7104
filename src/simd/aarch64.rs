//! NEON bulk core for aarch64.
//!
//! Same algebra as the x86_64 cores: byte permute, mask + multiply sextet
//! extraction, branchless range offsets. NEON has no `mulhi`/`maddubs`, so
//! those steps widen through `vmull`/`vshrn` and table-split shifts instead.

// Explicit unsafe blocks around every intrinsic for Rust 2024's
// unsafe_op_in_unsafe_fn; some intrinsics are already safe to call inside a
// matching #[target_feature] fn, hence the allow.
#![allow(unused_unsafe)]

use std::arch::aarch64::*;

/// NEON bulk encode: 12 source bytes -> 16 symbols per step.
///
/// Loads 16 bytes per 12 consumed, so the loop is bounded by
/// `(len - 4) / 12`. Returns the number of source bytes consumed.
#[target_feature(enable = "neon")]
pub unsafe fn encode_neon(source: &[u8], dest: &mut [u8]) -> usize {
    if source.len() < 16 {
        return 0;
    }
    let steps = (source.len() - 4) / 12;

    let mut offset = 0;
    let mut out = 0;
    for _ in 0..steps {
        unsafe {
            let input = vld1q_u8(source.as_ptr().add(offset));
            let indices = unpack_sextets(input);
            let symbols = sextets_to_ascii(indices);
            vst1q_u8(dest.as_mut_ptr().add(out), symbols);
        }
        offset += 12;
        out += 16;
    }

    offset
}

/// Spread 12 packed source bytes into 16 sextet lanes.
#[target_feature(enable = "neon")]
unsafe fn unpack_sextets(input: uint8x16_t) -> uint8x16_t {
    unsafe {
        // Same permute pattern as the x86 preshuffle, in lane order
        let permute = vld1q_u8([1, 0, 2, 1, 4, 3, 5, 4, 7, 6, 8, 7, 10, 9, 11, 10].as_ptr());
        let shuffled = vreinterpretq_u32_u8(vqtbl1q_u8(input, permute));

        let t0 = vandq_u32(shuffled, vdupq_n_u32(0x0FC0_FC00));

        // mulhi_epu16 equivalent: widen, multiply, take the high half
        let t0_u16 = vreinterpretq_u16_u32(t0);
        let mult = vreinterpretq_u16_u32(vdupq_n_u32(0x0400_0040));
        let lo = vmull_u16(vget_low_u16(t0_u16), vget_low_u16(mult));
        let hi = vmull_u16(vget_high_u16(t0_u16), vget_high_u16(mult));
        let t1 = vreinterpretq_u32_u16(vcombine_u16(vshrn_n_u32::<16>(lo), vshrn_n_u32::<16>(hi)));

        let t2 = vandq_u32(shuffled, vdupq_n_u32(0x003F_03F0));
        let t2_u16 = vreinterpretq_u16_u32(t2);
        let t3 = vreinterpretq_u32_u16(vmulq_u16(
            t2_u16,
            vreinterpretq_u16_u32(vdupq_n_u32(0x0100_0010)),
        ));

        vreinterpretq_u8_u32(vorrq_u32(t1, t3))
    }
}

/// Map sextets to ASCII by range offset instead of a 64-entry table; the
/// offsets are the same five constants the x86 cores use, as wrapping u8.
#[target_feature(enable = "neon")]
unsafe fn sextets_to_ascii(indices: uint8x16_t) -> uint8x16_t {
    unsafe {
        let offsets = vld1q_u8(
            [
                65,  // 0..=25 -> 'A'..='Z'
                71,  // 26..=51 -> 'a'..='z'
                252, 252, 252, 252, 252, 252, 252, 252, 252, 252, // 52..=61 -> '0'..='9' (-4)
                237, // 62 -> '+' (-19)
                240, // 63 -> '/' (-16)
                0, 0,
            ]
            .as_ptr(),
        );

        let reduced = vqsubq_u8(indices, vdupq_n_u8(51));
        let gt25 = vcgtq_s8(vreinterpretq_s8_u8(indices), vdupq_n_s8(25));
        let lut_indices = vsubq_u8(reduced, gt25);

        vaddq_u8(indices, vqtbl1q_u8(offsets, lut_indices))
    }
}

/// NEON bulk decode: 16 symbols -> 12 bytes per step, clamped by both the
/// source and the exact destination length. Returns source bytes consumed.
#[target_feature(enable = "neon")]
pub unsafe fn decode_neon(source: &[u8], dest: &mut [u8]) -> usize {
    let steps = (source.len() / 16).min(dest.len() / 12);

    let mut offset = 0;
    let mut out = 0;
    for _ in 0..steps {
        let mut block = [0u8; 16];
        unsafe {
            let input = vld1q_u8(source.as_ptr().add(offset));
            let indices = ascii_to_sextets(input);
            let packed = pack_sextets(indices);
            vst1q_u8(block.as_mut_ptr(), packed);
        }
        // Only the first 12 bytes of the vector are output
        dest[out..out + 12].copy_from_slice(&block[..12]);
        offset += 16;
        out += 12;
    }

    offset
}

/// Recover sextets from ASCII symbols by high-nibble range offset; '/'
/// shares nibble 2 with '+' and is nudged down one slot by the equal mask.
#[target_feature(enable = "neon")]
unsafe fn ascii_to_sextets(input: uint8x16_t) -> uint8x16_t {
    unsafe {
        // 191 = -65, 185 = -71 as wrapping u8
        let roll = vld1q_u8([0, 16, 19, 4, 191, 191, 185, 185, 0, 0, 0, 0, 0, 0, 0, 0].as_ptr());

        let hi_nibbles = vshrq_n_u8::<4>(input);
        let eq_slash = vceqq_u8(input, vdupq_n_u8(0x2F));
        let roll_indices = vaddq_u8(hi_nibbles, eq_slash);

        vaddq_u8(input, vqtbl1q_u8(roll, roll_indices))
    }
}

/// Repack four adjacent sextet lanes into three bytes.
///
/// The x86 `maddubs`/`madd` pair is rebuilt from table splits and widening
/// shifts: merge each (v0, v1) pair into `v0 << 6 | v1` in a 16-bit lane,
/// then each 16-bit pair into the 24-bit group, then emit the three payload
/// bytes per group in output order. Valid output is the low 12 bytes.
#[target_feature(enable = "neon")]
unsafe fn pack_sextets(indices: uint8x16_t) -> uint8x16_t {
    unsafe {
        let even = vqtbl1q_u8(
            indices,
            vld1q_u8([0, 255, 2, 255, 4, 255, 6, 255, 8, 255, 10, 255, 12, 255, 14, 255].as_ptr()),
        );
        let odd = vqtbl1q_u8(
            indices,
            vld1q_u8([1, 255, 3, 255, 5, 255, 7, 255, 9, 255, 11, 255, 13, 255, 15, 255].as_ptr()),
        );

        let merged = vaddq_u16(
            vshlq_n_u16::<6>(vreinterpretq_u16_u8(even)),
            vreinterpretq_u16_u8(odd),
        );
        let merged_bytes = vreinterpretq_u8_u16(merged);

        let lo_pairs = vreinterpretq_u32_u8(vqtbl1q_u8(
            merged_bytes,
            vld1q_u8([0, 1, 255, 255, 4, 5, 255, 255, 8, 9, 255, 255, 12, 13, 255, 255].as_ptr()),
        ));
        let hi_pairs = vreinterpretq_u32_u8(vqtbl1q_u8(
            merged_bytes,
            vld1q_u8([2, 3, 255, 255, 6, 7, 255, 255, 10, 11, 255, 255, 14, 15, 255, 255].as_ptr()),
        ));

        let packed = vaddq_u32(vshlq_n_u32::<12>(lo_pairs), hi_pairs);

        vqtbl1q_u8(
            vreinterpretq_u8_u32(packed),
            vld1q_u8([2, 1, 0, 6, 5, 4, 10, 9, 8, 14, 13, 12, 255, 255, 255, 255].as_ptr()),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::scalar;
    use crate::{Padding, encoded_length};

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 131 + 17) as u8).collect()
    }

    #[test]
    fn test_neon_encode_matches_scalar() {
        for len in [16, 17, 28, 48, 100, 255] {
            let data = sample(len);
            let mut expected = vec![0u8; encoded_length(len, Padding::Padded)];
            scalar::encode(&data, &mut expected, Padding::Padded);

            let mut dest = vec![0u8; expected.len()];
            let consumed = unsafe { super::encode_neon(&data, &mut dest) };
            assert!(consumed > 0 && consumed % 12 == 0);
            scalar::encode(&data[consumed..], &mut dest[consumed / 3 * 4..], Padding::Padded);

            assert_eq!(dest, expected, "len {len}");
        }
    }

    #[test]
    fn test_neon_decode_matches_scalar() {
        for len in [12, 13, 24, 50, 96, 200] {
            let data = sample(len);
            let mut encoded = vec![0u8; encoded_length(len, Padding::Padded)];
            scalar::encode(&data, &mut encoded, Padding::Padded);

            let mut dest = vec![0u8; len];
            let consumed = unsafe { super::decode_neon(&encoded, &mut dest) };
            assert_eq!(consumed % 16, 0);
            scalar::decode(&encoded[consumed..], &mut dest[consumed / 4 * 3..]);

            assert_eq!(dest, data, "len {len}");
        }
    }
}
