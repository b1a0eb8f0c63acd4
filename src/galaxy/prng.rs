//! Park-Miller minimal standard generator with Schrage decomposition.
//!
//! The same recurrence is implemented in `shaders/galaxy_placement.wgsl`;
//! both sides must stay bit-for-bit identical so the host reference and the
//! GPU placement agree on every slot.

pub const RANDOM_IA: i32 = 16807;
pub const RANDOM_IM: i32 = 2147483647;
pub const RANDOM_IQ: i32 = 127773;
pub const RANDOM_IR: i32 = 2836;
pub const RANDOM_MASK: i32 = 123459876;

const RANDOM_AM: f32 = 1.0 / RANDOM_IM as f32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: i32,
}

impl Lcg {
    pub fn new(seed: i32) -> Self {
        let mut lcg = Self { state: 0 };
        lcg.seed(seed);
        lcg
    }

    /// Resets the generator. The seed is masked and advanced once.
    pub fn seed(&mut self, seed: i32) {
        self.state = seed;
        self.cycle();
    }

    /// Returns the next value, approximately in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        self.cycle();
        self.state as f32 * RANDOM_AM
    }

    pub fn state(&self) -> i32 {
        self.state
    }

    fn cycle(&mut self) {
        // IA * (state mod IQ) stays below i32::MAX, so no step can overflow.
        let mut state = self.state ^ RANDOM_MASK;
        let k = state / RANDOM_IQ;
        state = RANDOM_IA * (state - k * RANDOM_IQ) - RANDOM_IR * k;
        if state < 0 {
            state += RANDOM_IM;
        }
        self.state = state ^ RANDOM_MASK;
    }
}

/// Integer hash used to decorrelate neighbouring slot seeds.
pub fn hash_u32(mut x: u32) -> u32 {
    x = (x ^ 61) ^ (x >> 16);
    x = x.wrapping_mul(9);
    x ^= x >> 4;
    x = x.wrapping_mul(0x27d4_eb2d);
    x ^ (x >> 15)
}

/// Seed of the generator that drives one particle slot.
pub fn slot_seed(base_seed: u32, slot: u32) -> i32 {
    hash_u32(slot ^ hash_u32(base_seed)) as i32
}
