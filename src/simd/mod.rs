//! Bulk vectorized cores and runtime strategy selection.
//!
//! Each engine transforms the largest batch-aligned prefix of the source and
//! reports how many source bytes it consumed; the buffer drivers hand the
//! remainder to the scalar core. Output is byte-identical across engines, so
//! the selection is purely a throughput decision. CPU feature detection runs
//! once and is cached.

use std::sync::OnceLock;

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
mod x86_64;

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
mod aarch64;

/// Available bulk transform strategies, best first.
///
/// The set is fixed at compile time; which member actually runs is decided
/// once per process from CPU capability detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// 256-bit lanes: 24 source bytes -> 32 symbols per encode step.
    Avx2,
    /// 128-bit lanes: 12 source bytes -> 16 symbols per encode step.
    Ssse3,
    /// 128-bit lanes on aarch64, always available there.
    Neon,
    /// No bulk prefix; every byte goes through the scalar core.
    Scalar,
}

static ENGINE: OnceLock<Engine> = OnceLock::new();

impl Engine {
    /// The engine every encode/decode call in this process dispatches to.
    pub fn active() -> Engine {
        *ENGINE.get_or_init(Engine::detect)
    }

    fn detect() -> Engine {
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        {
            if is_x86_feature_detected!("avx2") {
                return Engine::Avx2;
            }
            if is_x86_feature_detected!("ssse3") {
                return Engine::Ssse3;
            }
        }

        #[cfg(all(feature = "simd", target_arch = "aarch64"))]
        {
            // NEON is mandatory on aarch64
            Engine::Neon
        }
        #[cfg(not(all(feature = "simd", target_arch = "aarch64")))]
        {
            Engine::Scalar
        }
    }
}

/// Encode a batch-aligned prefix of `source` into `dest`.
///
/// Returns the number of source bytes consumed (a multiple of the engine's
/// batch size, possibly 0 for short input). The corresponding output is
/// `consumed / 3 * 4` bytes.
pub fn encode_prefix(source: &[u8], dest: &mut [u8]) -> usize {
    match Engine::active() {
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        // SAFETY: detection verified the feature before selecting the engine
        Engine::Avx2 => unsafe { x86_64::encode_avx2(source, dest) },
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        // SAFETY: detection verified the feature before selecting the engine
        Engine::Ssse3 => unsafe { x86_64::encode_ssse3(source, dest) },
        #[cfg(all(feature = "simd", target_arch = "aarch64"))]
        // SAFETY: NEON is always present on aarch64
        Engine::Neon => unsafe { aarch64::encode_neon(source, dest) },
        _ => {
            let _ = (source, dest);
            0
        }
    }
}

/// Decode a batch-aligned prefix of `source` into `dest`.
///
/// Returns the number of source bytes consumed (a multiple of the engine's
/// batch size, possibly 0). The corresponding output is `consumed / 4 * 3`
/// bytes; steps are clamped so no store ever passes the exact destination
/// length, even when the source tail carries padding.
pub fn decode_prefix(source: &[u8], dest: &mut [u8]) -> usize {
    match Engine::active() {
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        // SAFETY: detection verified the feature before selecting the engine
        Engine::Avx2 => unsafe { x86_64::decode_avx2(source, dest) },
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        // SAFETY: detection verified the feature before selecting the engine
        Engine::Ssse3 => unsafe { x86_64::decode_ssse3(source, dest) },
        #[cfg(all(feature = "simd", target_arch = "aarch64"))]
        // SAFETY: NEON is always present on aarch64
        Engine::Neon => unsafe { aarch64::decode_neon(source, dest) },
        _ => {
            let _ = (source, dest);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_engine_is_stable() {
        assert_eq!(Engine::active(), Engine::active());
    }

    #[test]
    fn test_prefix_consumption_is_batch_aligned() {
        let data: Vec<u8> = (0..193).map(|i| (i * 31) as u8).collect();
        let mut dest = vec![0u8; data.len().div_ceil(3) * 4];

        let consumed = encode_prefix(&data, &mut dest);
        assert!(consumed <= data.len());
        assert_eq!(consumed % 3, 0);
    }

    #[test]
    fn test_short_input_takes_no_bulk_steps() {
        let mut dest = [0u8; 4];
        assert_eq!(encode_prefix(b"abc", &mut dest), 0);

        let mut dest = [0u8; 3];
        assert_eq!(decode_prefix(b"YWJj", &mut dest), 0);
    }
}
