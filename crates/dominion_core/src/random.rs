//! Deterministic seeded pseudo-random number generator.
//!
//! Reproducibility, not unpredictability, is the requirement: two
//! generators constructed with the same seed produce the same
//! sequence on every platform. Executions that need randomness seed a
//! generator from the current tick so replays and remote clients draw
//! identical values. Never use system randomness inside the
//! simulation.

use serde::{Deserialize, Serialize};

/// Deterministic PRNG with 256-bit state, suitable for snapshots and
/// replays.
///
/// This is `xoshiro256**` seeded via SplitMix64. Not cryptographically
/// secure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PseudoRandom {
    state: [u64; 4],
}

impl PseudoRandom {
    /// Create a generator from a single integer seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut sm = SplitMix64 { state: seed };
        Self {
            state: [sm.next(), sm.next(), sm.next(), sm.next()],
        }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        // xoshiro256**
        let result = self.state[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);

        let t = self.state[1] << 17;

        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];

        self.state[2] ^= t;

        self.state[3] = self.state[3].rotate_left(45);

        result
    }

    /// Next raw 32-bit value (top half of the 64-bit output).
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform value in `range`, sampled by rejection to avoid modulo
    /// bias.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty.
    pub fn gen_range_u64(&mut self, range: std::ops::Range<u64>) -> u64 {
        assert!(range.start < range.end, "empty range");

        let span = range.end - range.start;
        let threshold = u64::MAX - (u64::MAX % span);
        loop {
            let x = self.next_u64();
            if x < threshold {
                return range.start + (x % span);
            }
        }
    }

    /// True with probability `numerator / denominator`.
    ///
    /// # Panics
    ///
    /// Panics if `denominator` is zero.
    pub fn chance(&mut self, numerator: u64, denominator: u64) -> bool {
        self.gen_range_u64(0..denominator) < numerator
    }
}

struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn next(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}
