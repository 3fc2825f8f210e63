//! Seeded, continuous noise for brush behaviors
//!
//! A [`NoiseGenerator`] walks a lattice of uniform random values and
//! smoothstep-blends between the two it currently sits between. The random
//! stream is a `minstd_rand` linear congruential generator seeded through the
//! `seed_seq` word mixing of the C++ standard library, and floats are drawn
//! the way `uniform_real_distribution<float>(0, 1)` draws them. Saved strokes
//! replay noise through this exact sequence, so none of these steps may
//! change.

use crate::interpolation::lerp;

const MINSTD_MULTIPLIER: u64 = 48_271;
const MINSTD_MODULUS: u64 = 2_147_483_647;

/// `(MINSTD_MODULUS - 1) as f32`, which rounds up to 2^31.
const MINSTD_RANGE: f32 = 2_147_483_648.0;

/// Largest f32 below 1.0.
const ONE_MINUS_EPSILON: f32 = 1.0 - f32::EPSILON / 2.0;

/// Number of seed words a `minstd_rand` consumes from a seed sequence
/// (one 32-bit word of state plus three discarded words).
const SEED_SEQUENCE_WORDS: usize = 4;

/// Smooth pseudo-random function of a monotonically advancing input.
///
/// Output stays in [0, 1]. The generator is `Copy`; copying it mid-stroke and
/// advancing both copies the same way yields the same outputs, which is what
/// lets a stroke's volatile tail be evaluated speculatively and rolled back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseGenerator {
    seed: u64,
    prng: MinStdRand,
    /// Position between `previous_value` and `next_value`, in [0, 1)
    progress: f32,
    previous_value: f32,
    next_value: f32,
}

impl NoiseGenerator {
    /// Create a generator from `seed`.
    ///
    /// Only the low 32 bits of the seed feed the seed sequence; seeds that
    /// differ only in their high bits produce the same stream.
    pub fn new(seed: u64) -> Self {
        let mut prng = MinStdRand::from_seed_words(&[seed as u32]);
        let previous_value = prng.next_unit_f32();
        let next_value = prng.next_unit_f32();
        Self {
            seed,
            prng,
            progress: 0.0,
            previous_value,
            next_value,
        }
    }

    /// The seed this generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return to the freshly seeded state
    pub fn reset(&mut self) {
        *self = Self::new(self.seed);
    }

    /// Current noise value in [0, 1]
    pub fn current_output_value(&self) -> f32 {
        let t = self.progress;
        lerp(self.previous_value, self.next_value, t * t * (3.0 - 2.0 * t))
    }

    /// Move the input forward by `advance_by` lattice periods.
    ///
    /// Panics if `advance_by` is negative or NaN. Crossing more than one
    /// lattice point draws a fresh pair of values instead of stepping through
    /// every skipped point, so the cost is bounded no matter how large the
    /// advance is.
    pub fn advance_input_by(&mut self, advance_by: f32) {
        assert!(
            advance_by >= 0.0,
            "NoiseGenerator::advance_input_by: advance must be non-negative, got {advance_by}"
        );
        self.progress += advance_by;
        if self.progress < 1.0 {
            return;
        }
        self.previous_value = if self.progress >= 2.0 {
            self.prng.next_unit_f32()
        } else {
            self.next_value
        };
        self.next_value = self.prng.next_unit_f32();
        self.progress = if self.progress.is_finite() {
            self.progress.fract()
        } else {
            0.0
        };
    }
}

/// `minstd_rand`: x' = 48271 * x mod (2^31 - 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MinStdRand {
    state: u32,
}

impl MinStdRand {
    fn from_seed_words(seed_words: &[u32]) -> Self {
        let mut words = [0u32; SEED_SEQUENCE_WORDS];
        seed_sequence_generate(seed_words, &mut words);
        let state = (words[3] as u64 % MINSTD_MODULUS) as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = (self.state as u64 * MINSTD_MULTIPLIER % MINSTD_MODULUS) as u32;
        self.state
    }

    /// Uniform float in [0, 1)
    fn next_unit_f32(&mut self) -> f32 {
        let value = (self.next_u32() - 1) as f32 / MINSTD_RANGE;
        value.min(ONE_MINUS_EPSILON)
    }
}

/// The `seed_seq::generate` mixing algorithm, filling `out` from `seed_words`.
fn seed_sequence_generate(seed_words: &[u32], out: &mut [u32]) {
    let n = out.len();
    if n == 0 {
        return;
    }
    out.fill(0x8b8b_8b8b);

    let s = seed_words.len();
    let t = if n >= 623 {
        11
    } else if n >= 68 {
        7
    } else if n >= 39 {
        5
    } else if n >= 7 {
        3
    } else {
        (n - 1) / 2
    };
    let p = (n - t) / 2;
    let q = p + t;
    let m = (s + 1).max(n);
    let scramble = |x: u32| x ^ (x >> 27);

    for k in 0..m {
        let r1 = 1_664_525u32
            .wrapping_mul(scramble(out[k % n] ^ out[(k + p) % n] ^ out[(k + n - 1) % n]));
        let r2 = if k == 0 {
            r1.wrapping_add(s as u32)
        } else if k <= s {
            r1.wrapping_add((k % n) as u32).wrapping_add(seed_words[k - 1])
        } else {
            r1.wrapping_add((k % n) as u32)
        };
        out[(k + p) % n] = out[(k + p) % n].wrapping_add(r1);
        out[(k + q) % n] = out[(k + q) % n].wrapping_add(r2);
        out[k % n] = r2;
    }

    for k in m..m + n {
        let r3 = 1_566_083_941u32.wrapping_mul(scramble(
            out[k % n]
                .wrapping_add(out[(k + p) % n])
                .wrapping_add(out[(k + n - 1) % n]),
        ));
        let r4 = r3.wrapping_sub((k % n) as u32);
        out[(k + p) % n] ^= r3;
        out[(k + q) % n] ^= r4;
        out[k % n] = r4;
    }
}
