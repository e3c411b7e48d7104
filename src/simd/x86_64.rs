//! SSSE3 and AVX2 bulk cores for x86_64.
//!
//! Based on techniques from:
//! - https://github.com/aklomp/base64 (reference C implementation)
//! - Wojciech Muła's SSE base64 notes (http://0x80.pl/notesen/)
//!
//! Both widths run the same algebra: a cross-lane byte permute lines up each
//! source triple as a 4-byte sub-lane, mask + 16-bit multiply high/low spread
//! the 24 significant bits into four 6-bit fields, and a saturating-subtract
//! plus compare picks one of five constant offsets per lane instead of a
//! 64-entry table lookup. Decode inverts each stage with a high-nibble offset
//! table and a multiply-add repack.

// Explicit unsafe blocks around every intrinsic for Rust 2024's
// unsafe_op_in_unsafe_fn; some intrinsics are already safe to call inside a
// matching #[target_feature] fn, hence the allow.
#![allow(unused_unsafe)]

use std::arch::x86_64::*;

/// Source bytes consumed per 128-bit encode step.
const ENC_BATCH_128: usize = 12;
/// Source bytes consumed per 256-bit encode step.
const ENC_BATCH_256: usize = 24;
/// Source bytes consumed per 128-bit decode step.
const DEC_BATCH_128: usize = 16;
/// Source bytes consumed per 256-bit decode step.
const DEC_BATCH_256: usize = 32;

/// SSSE3 bulk encode: 12 source bytes -> 16 symbols per step.
///
/// Each step loads a full 16-byte vector but consumes only 12, so the loop
/// is bounded by `(len - 4) / 12` to keep the final load in bounds. Returns
/// the number of source bytes consumed.
#[target_feature(enable = "ssse3")]
pub unsafe fn encode_ssse3(source: &[u8], dest: &mut [u8]) -> usize {
    if source.len() < 16 {
        return 0;
    }
    let steps = (source.len() - 4) / ENC_BATCH_128;

    let mut offset = 0;
    let mut out = 0;
    for _ in 0..steps {
        unsafe {
            let input = _mm_loadu_si128(source.as_ptr().add(offset) as *const __m128i);
            let indices = unpack_sextets_128(input);
            let symbols = sextets_to_ascii_128(indices);
            _mm_storeu_si128(dest.as_mut_ptr().add(out) as *mut __m128i, symbols);
        }
        offset += ENC_BATCH_128;
        out += 16;
    }

    offset
}

/// AVX2 bulk encode: 24 source bytes -> 32 symbols per step.
///
/// The two 128-bit lanes are loaded 12 bytes apart so each lane sees its own
/// triple run; the per-lane algebra is identical to the SSSE3 step. Returns
/// the number of source bytes consumed.
#[target_feature(enable = "avx2")]
pub unsafe fn encode_avx2(source: &[u8], dest: &mut [u8]) -> usize {
    if source.len() < 28 {
        return 0;
    }
    let steps = (source.len() - 4) / ENC_BATCH_256;

    let mut offset = 0;
    let mut out = 0;
    for _ in 0..steps {
        unsafe {
            let lo = _mm_loadu_si128(source.as_ptr().add(offset) as *const __m128i);
            let hi = _mm_loadu_si128(source.as_ptr().add(offset + 12) as *const __m128i);
            let input = _mm256_set_m128i(hi, lo);
            let indices = unpack_sextets_256(input);
            let symbols = sextets_to_ascii_256(indices);
            _mm256_storeu_si256(dest.as_mut_ptr().add(out) as *mut __m256i, symbols);
        }
        offset += ENC_BATCH_256;
        out += 32;
    }

    offset
}

/// Spread 12 packed source bytes into 16 sextet lanes (one per output
/// symbol), 128-bit lane.
///
/// The permute replicates the middle byte of each triple so every 4-byte
/// sub-lane holds the 24 significant bits; the mask/multiply pairs then move
/// each 6-bit field to the low bits of its own byte:
///
/// ```text
/// t0 = [0000cccc|CC000000|aaaaaa00|00000000]
/// t1 = [00000000|00cccccc|00000000|00aaaaaa]   (mulhi)
/// t2 = [00000000|00dddddd|000000bb|bbbb0000]
/// t3 = [00dddddd|00000000|00bbbbbb|00000000]   (mullo)
/// ```
#[target_feature(enable = "ssse3")]
unsafe fn unpack_sextets_128(input: __m128i) -> __m128i {
    unsafe {
        let shuffled = _mm_shuffle_epi8(
            input,
            _mm_set_epi8(10, 11, 9, 10, 7, 8, 6, 7, 4, 5, 3, 4, 1, 2, 0, 1),
        );

        let t0 = _mm_and_si128(shuffled, _mm_set1_epi32(0x0FC0_FC00_u32 as i32));
        let t1 = _mm_mulhi_epu16(t0, _mm_set1_epi32(0x0400_0040));
        let t2 = _mm_and_si128(shuffled, _mm_set1_epi32(0x003F_03F0));
        let t3 = _mm_mullo_epi16(t2, _mm_set1_epi32(0x0100_0010));

        _mm_or_si128(t1, t3)
    }
}

/// 256-bit variant of [`unpack_sextets_128`]; `_mm256_shuffle_epi8` permutes
/// within each lane, which is exactly what the offset load arranged for.
#[target_feature(enable = "avx2")]
unsafe fn unpack_sextets_256(input: __m256i) -> __m256i {
    unsafe {
        let lane = _mm_set_epi8(10, 11, 9, 10, 7, 8, 6, 7, 4, 5, 3, 4, 1, 2, 0, 1);
        let shuffled = _mm256_shuffle_epi8(input, _mm256_set_m128i(lane, lane));

        let t0 = _mm256_and_si256(shuffled, _mm256_set1_epi32(0x0FC0_FC00_u32 as i32));
        let t1 = _mm256_mulhi_epu16(t0, _mm256_set1_epi32(0x0400_0040));
        let t2 = _mm256_and_si256(shuffled, _mm256_set1_epi32(0x003F_03F0));
        let t3 = _mm256_mullo_epi16(t2, _mm256_set1_epi32(0x0100_0010));

        _mm256_or_si256(t1, t3)
    }
}

/// Map sextets to ASCII without a 64-entry table, 128-bit lane.
///
/// The alphabet splits into five contiguous ranges, each a constant offset
/// from its sextet values:
///
/// - `[0..26)`  -> 'A'..'Z'  offset +65
/// - `[26..52)` -> 'a'..'z'  offset +71
/// - `[52..62)` -> '0'..'9'  offset -4
/// - `62`       -> '+'       offset -19
/// - `63`       -> '/'       offset -16
///
/// Saturating-subtract 51 collapses the first two ranges to 0 and spreads
/// the rest over 1..=12; the compare-with-25 mask then splits ranges one and
/// two apart. The resulting index selects the offset from a 16-byte table.
#[target_feature(enable = "ssse3")]
unsafe fn sextets_to_ascii_128(indices: __m128i) -> __m128i {
    unsafe {
        let offsets = _mm_setr_epi8(
            65, 71, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -19, -16, 0, 0,
        );

        let reduced = _mm_subs_epu8(indices, _mm_set1_epi8(51));
        let gt25 = _mm_cmpgt_epi8(indices, _mm_set1_epi8(25));
        let lut_indices = _mm_sub_epi8(reduced, gt25);

        _mm_add_epi8(indices, _mm_shuffle_epi8(offsets, lut_indices))
    }
}

/// 256-bit variant of [`sextets_to_ascii_128`].
#[target_feature(enable = "avx2")]
unsafe fn sextets_to_ascii_256(indices: __m256i) -> __m256i {
    unsafe {
        let lane = _mm_setr_epi8(
            65, 71, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -19, -16, 0, 0,
        );
        let offsets = _mm256_set_m128i(lane, lane);

        let reduced = _mm256_subs_epu8(indices, _mm256_set1_epi8(51));
        let gt25 = _mm256_cmpgt_epi8(indices, _mm256_set1_epi8(25));
        let lut_indices = _mm256_sub_epi8(reduced, gt25);

        _mm256_add_epi8(indices, _mm256_shuffle_epi8(offsets, lut_indices))
    }
}

/// SSSE3 bulk decode: 16 symbols -> 12 bytes per step.
///
/// Steps are clamped by both the source and the exact destination length, so
/// a padded tail group is always left to the scalar core and the 12-byte
/// stores never pass the end of `dest`. Returns source bytes consumed.
#[target_feature(enable = "ssse3")]
pub unsafe fn decode_ssse3(source: &[u8], dest: &mut [u8]) -> usize {
    let steps = (source.len() / DEC_BATCH_128).min(dest.len() / 12);

    let mut offset = 0;
    let mut out = 0;
    for _ in 0..steps {
        let mut block = [0u8; 16];
        unsafe {
            let input = _mm_loadu_si128(source.as_ptr().add(offset) as *const __m128i);
            let indices = ascii_to_sextets_128(input);
            let packed = pack_sextets_128(indices);
            _mm_storeu_si128(block.as_mut_ptr() as *mut __m128i, packed);
        }
        // Only the first 12 bytes of the vector are output
        dest[out..out + 12].copy_from_slice(&block[..12]);
        offset += DEC_BATCH_128;
        out += 12;
    }

    offset
}

/// AVX2 bulk decode: 32 symbols -> 24 bytes per step.
#[target_feature(enable = "avx2")]
pub unsafe fn decode_avx2(source: &[u8], dest: &mut [u8]) -> usize {
    let steps = (source.len() / DEC_BATCH_256).min(dest.len() / 24);

    let mut offset = 0;
    let mut out = 0;
    for _ in 0..steps {
        let mut block = [0u8; 32];
        unsafe {
            let input = _mm256_loadu_si256(source.as_ptr().add(offset) as *const __m256i);
            let indices = ascii_to_sextets_256(input);
            let packed = pack_sextets_256(indices);
            _mm256_storeu_si256(block.as_mut_ptr() as *mut __m256i, packed);
        }
        dest[out..out + 24].copy_from_slice(&block[..24]);
        offset += DEC_BATCH_256;
        out += 24;
    }

    offset
}

/// Recover sextets from ASCII symbols, 128-bit lane.
///
/// The five alphabet ranges are distinguished by high nibble alone except
/// for '+' (0x2B) and '/' (0x2F), which share nibble 2; the compare-equal
/// mask nudges '/' down one table slot. Offsets for non-alphabet bytes are
/// arbitrary — unrecognized input produces garbage sextets by contract, the
/// same leniency the scalar inverse table documents.
#[target_feature(enable = "ssse3")]
unsafe fn ascii_to_sextets_128(input: __m128i) -> __m128i {
    unsafe {
        let roll = _mm_setr_epi8(0, 16, 19, 4, -65, -65, -71, -71, 0, 0, 0, 0, 0, 0, 0, 0);

        let hi_nibbles = _mm_and_si128(_mm_srli_epi32::<4>(input), _mm_set1_epi8(0x0F));
        let eq_slash = _mm_cmpeq_epi8(input, _mm_set1_epi8(0x2F));
        let roll_indices = _mm_add_epi8(hi_nibbles, eq_slash);

        _mm_add_epi8(input, _mm_shuffle_epi8(roll, roll_indices))
    }
}

/// 256-bit variant of [`ascii_to_sextets_128`].
#[target_feature(enable = "avx2")]
unsafe fn ascii_to_sextets_256(input: __m256i) -> __m256i {
    unsafe {
        let lane = _mm_setr_epi8(0, 16, 19, 4, -65, -65, -71, -71, 0, 0, 0, 0, 0, 0, 0, 0);
        let roll = _mm256_set_m128i(lane, lane);

        let hi_nibbles = _mm256_and_si256(_mm256_srli_epi32::<4>(input), _mm256_set1_epi8(0x0F));
        let eq_slash = _mm256_cmpeq_epi8(input, _mm256_set1_epi8(0x2F));
        let roll_indices = _mm256_add_epi8(hi_nibbles, eq_slash);

        _mm256_add_epi8(input, _mm256_shuffle_epi8(roll, roll_indices))
    }
}

/// Repack four adjacent sextet lanes into three bytes, 128-bit lane.
///
/// `maddubs` merges each (v0, v1) pair into `v0 << 6 | v1`, `madd` merges
/// the 16-bit pairs into the full 24-bit group, and the final permute emits
/// the three payload bytes per group in output order, dropping the unused
/// fourth byte. Valid output is the low 12 bytes of the vector.
#[target_feature(enable = "ssse3")]
unsafe fn pack_sextets_128(indices: __m128i) -> __m128i {
    unsafe {
        let merged = _mm_maddubs_epi16(indices, _mm_set1_epi32(0x0140_0140));
        let packed = _mm_madd_epi16(merged, _mm_set1_epi32(0x0001_1000));

        _mm_shuffle_epi8(
            packed,
            _mm_setr_epi8(2, 1, 0, 6, 5, 4, 10, 9, 8, 14, 13, 12, -1, -1, -1, -1),
        )
    }
}

/// 256-bit variant of [`pack_sextets_128`]; the cross-lane dword permute
/// compacts the two 12-byte lane results into 24 contiguous bytes.
#[target_feature(enable = "avx2")]
unsafe fn pack_sextets_256(indices: __m256i) -> __m256i {
    unsafe {
        let merged = _mm256_maddubs_epi16(indices, _mm256_set1_epi32(0x0140_0140));
        let packed = _mm256_madd_epi16(merged, _mm256_set1_epi32(0x0001_1000));

        let lane = _mm_setr_epi8(2, 1, 0, 6, 5, 4, 10, 9, 8, 14, 13, 12, -1, -1, -1, -1);
        let shuffled = _mm256_shuffle_epi8(packed, _mm256_set_m128i(lane, lane));

        _mm256_permutevar8x32_epi32(shuffled, _mm256_setr_epi32(0, 1, 2, 4, 5, 6, 7, 7))
    }
}
