#![forbid(unsafe_code)]

//! Seedable randomness for decorative effects.
//!
//! Effects take a [`RandomSource`] so tests can pin a seed and hosts can plug
//! in their own entropy. [`XorShift64`] is the built-in deterministic source.

/// A source of uniformly distributed random values.
pub trait RandomSource {
    /// Next raw 64-bit value.
    fn next_u64(&mut self) -> u64;

    /// Uniform float in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64 {
        // Top 53 bits give every representable step in [0, 1).
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[0, bound)`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        (self.next_f64() * f64::from(bound)) as u32
    }
}

/// xorshift64 generator.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Create a generator from `seed`. Any seed, including 0, is valid.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        // A zero state would stay zero forever.
        Self {
            state: seed.wrapping_add(0x9E37_79B9_7F4A_7C15) | 1,
        }
    }
}

impl Default for XorShift64 {
    fn default() -> Self {
        Self::new(0x5EED)
    }
}

impl RandomSource for XorShift64 {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}
