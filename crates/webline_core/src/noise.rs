//! Seeded noise for cosmetic "live" data
//!
//! Every random-looking value in Webline (BPM jitter, oscilloscope bars,
//! data-stream characters, glitch text) is drawn from a [`NoiseSource`]
//! seeded per session, so a run is reproducible given its seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// SplitMix64 finalizer
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Stateless hash of `(seed, index)` to a unit sample in `[0, 1)`
///
/// Used where a waveform must be a pure function of time (loop noise) rather
/// than a stream of draws.
pub fn hash_unit(seed: u64, index: u64) -> f32 {
    let bits = mix64(seed ^ mix64(index));
    // top 24 bits give an exactly representable f32 in [0, 1)
    (bits >> 40) as f32 / (1u64 << 24) as f32
}

fn salt_hash(salt: &str) -> u64 {
    // FNV-1a
    salt.bytes().fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
        (h ^ b as u64).wrapping_mul(0x0000_0100_0000_01B3)
    })
}

/// A seeded pseudo-random stream
#[derive(Clone, Debug)]
pub struct NoiseSource {
    seed: u64,
    rng: StdRng,
}

impl NoiseSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Derive an independent stream for a named consumer
    ///
    /// Depends only on this source's seed and `salt`, never on how many
    /// values have been drawn, so screens get stable streams regardless of
    /// construction order.
    pub fn derive(&self, salt: &str) -> NoiseSource {
        NoiseSource::new(mix64(self.seed ^ salt_hash(salt)))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Unit sample in `[0, 1)`
    pub fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform sample in `[lo, hi)`
    ///
    /// Returns `lo` for an empty range or one whose width is not finite.
    pub fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        let width = hi - lo;
        if !(width.is_finite() && width > 0.0) {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// Uniform integer in `[lo, hi]`
    pub fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform integer in `[0, n)`; returns 0 for `n == 0`
    pub fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }
}
