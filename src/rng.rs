//! Deterministic pseudo-random source for the procedural effects.
//!
//! SplitMix64 mixing. Seeded from the engine configuration so simulated
//! runs are reproducible.

/// Small deterministic PRNG.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw 64-bit value (SplitMix64).
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform u32 below `bound` (0 when `bound` is 0).
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_u32_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        // Lemire-style multiply-shift reduction
        let x = (self.next_u64() >> 32) as u32;
        ((u64::from(x) * u64::from(bound)) >> 32) as u32
    }

    /// Uniform f32 in [0, 1).
    #[allow(clippy::cast_precision_loss)]
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits give a full-precision f32 mantissa.
        let bits = (self.next_u64() >> 40) as u32;
        bits as f32 / 16_777_216.0
    }

    /// Uniform f32 in [min, max).
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Bernoulli trial with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Approximate standard normal sample (Irwin-Hall, 12 uniforms).
    pub fn norm(&mut self) -> f32 {
        let mut sum = 0.0;
        for _ in 0..12 {
            sum += self.next_f32();
        }
        sum - 6.0
    }
}
