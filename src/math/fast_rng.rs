//! Explicit, seedable random-generator state for the Monte Carlo backends.
//!
//! Every backend owns its generators; nothing here touches process-wide state, so two
//! streams seeded through [`stream_seed`] never share mutable RNG state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub type Xoshiro256Rng = Xoshiro256PlusPlus;
pub type Pcg64Rng = Pcg64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FastRngKind {
    #[default]
    Xoshiro256PlusPlus,
    Pcg64,
    StdRng,
}

#[derive(Debug, Clone)]
pub struct Xoshiro256PlusPlus {
    state: [u64; 4],
}

impl Xoshiro256PlusPlus {
    #[inline]
    pub fn seed_from_u64(seed: u64) -> Self {
        let mut sm = SplitMix64::new(seed);
        let mut state = [0_u64; 4];
        for item in &mut state {
            *item = sm.next_u64();
        }

        if state.iter().all(|&x| x == 0) {
            state[0] = 1;
        }

        Self { state }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.state[0].wrapping_add(self.state[3]))
            .rotate_left(23)
            .wrapping_add(self.state[0]);

        let t = self.state[1] << 17;

        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];

        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);

        result
    }

    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        unit_f64(self.next_u64())
    }
}

#[derive(Debug, Clone)]
pub struct Pcg64 {
    state: u128,
    inc: u128,
}

impl Pcg64 {
    const MULTIPLIER: u128 = 47026247687942121848144207491837523525;

    #[inline]
    pub fn seed_from_u64(seed: u64) -> Self {
        let mut sm = SplitMix64::new(seed);
        let state_hi = sm.next_u64() as u128;
        let state_lo = sm.next_u64() as u128;
        let stream = sm.next_u64() as u128;

        let mut rng = Self {
            state: 0,
            inc: (stream << 1) | 1,
        };

        rng.state = (state_hi << 64) | state_lo;
        let _ = rng.next_u64();
        rng
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let oldstate = self.state;
        self.state = oldstate
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(self.inc);

        // PCG XSL-RR 128/64 output permutation.
        let xorshifted = ((oldstate >> 64) ^ oldstate) as u64;
        let rot = (oldstate >> 122) as u32;
        xorshifted.rotate_right(rot)
    }

    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        unit_f64(self.next_u64())
    }
}

/// Per-stream generator. One value is owned by each sequential run, worker or device stream.
#[derive(Debug, Clone)]
pub enum FastRng {
    Xoshiro256PlusPlus(Xoshiro256Rng),
    Pcg64(Pcg64Rng),
    StdRng(StdRng),
}

impl FastRng {
    #[inline]
    pub fn from_seed(kind: FastRngKind, seed: u64) -> Self {
        match kind {
            FastRngKind::Xoshiro256PlusPlus => {
                Self::Xoshiro256PlusPlus(Xoshiro256Rng::seed_from_u64(seed))
            }
            FastRngKind::Pcg64 => Self::Pcg64(Pcg64Rng::seed_from_u64(seed)),
            FastRngKind::StdRng => Self::StdRng(StdRng::seed_from_u64(seed)),
        }
    }

    /// Uniform draw on `[0, 1)` with 53 bits of resolution.
    #[inline]
    pub fn random_f64(&mut self) -> f64 {
        match self {
            Self::Xoshiro256PlusPlus(rng) => rng.next_f64(),
            Self::Pcg64(rng) => rng.next_f64(),
            Self::StdRng(rng) => rng.random::<f64>(),
        }
    }

    #[inline]
    pub fn random_u64(&mut self) -> u64 {
        match self {
            Self::Xoshiro256PlusPlus(rng) => rng.next_u64(),
            Self::Pcg64(rng) => rng.next_u64(),
            Self::StdRng(rng) => rng.random::<u64>(),
        }
    }

    /// Unbiased uniform integer on `0..bound`.
    ///
    /// Lemire's widening-multiply method with rejection of the short tail, so every value
    /// in the range is exactly equally likely. `bound` must be non-zero.
    #[inline]
    pub fn random_below(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0, "bound must be positive");
        if let Self::StdRng(rng) = self {
            return rng.random_range(0..bound);
        }

        let threshold = bound.wrapping_neg() % bound;
        loop {
            let wide = (self.random_u64() as u128) * (bound as u128);
            if (wide as u64) >= threshold {
                return (wide >> 64) as u64;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    #[inline]
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

#[inline(always)]
fn unit_f64(bits: u64) -> f64 {
    (bits >> 11) as f64 * (1.0 / ((1_u64 << 53) as f64))
}

/// Seed of stream `stream_index` derived from a run-level base seed.
///
/// Streams are further decorrelated by the SplitMix64 expansion in every generator.
#[inline]
pub fn stream_seed(base_seed: u64, stream_index: usize) -> u64 {
    base_seed.wrapping_add((stream_index as u64).wrapping_mul(7_919))
}
