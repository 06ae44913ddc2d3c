//! Xorshift block-variant picker.
//!
//! Plot worlds only need randomness to choose between palette variants, so a
//! single 64-bit xorshift word is enough. The generator is seeded per chunk
//! from the chunk coordinates and never touches external entropy, which keeps
//! generated chunks reproducible across runs and machines.

use rand::{Error, RngCore, SeedableRng};

/// Multiplier of the 32-bit polynomial chunk hash.
const CHUNK_HASH_PRIME: i32 = 31;

/// Hash a chunk coordinate into the 32-bit seed used for variant selection.
///
/// Computed as `31 * (31 * 1 + cx) + cz` with 32-bit wrapping arithmetic.
pub fn chunk_hash(cx: i32, cz: i32) -> i32 {
    let mut h: i32 = 1;
    h = CHUNK_HASH_PRIME.wrapping_mul(h).wrapping_add(cx);
    h = CHUNK_HASH_PRIME.wrapping_mul(h).wrapping_add(cz);
    h
}

/// 64-bit xorshift generator (shift triple 21, 35, 4).
///
/// [`XorShiftRng::next_u64`] hands out the current state and then advances it,
/// so the first draw after seeding is the seed itself. A zero state is a fixed
/// point: every draw stays zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    /// Create a generator with an explicit 64-bit state.
    pub const fn new(state: u64) -> Self {
        Self { state }
    }

    /// Seed a generator for the chunk at `(cx, cz)`.
    ///
    /// The 32-bit [`chunk_hash`] is sign-extended into the 64-bit state.
    pub fn for_chunk(cx: i32, cz: i32) -> Self {
        Self::new(i64::from(chunk_hash(cx, cz)) as u64)
    }

    /// Current internal state.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Draw an integer in `[0, bound)`.
    ///
    /// Maps the high 32 bits of the next draw onto the range with a
    /// multiply-shift: `((draw >> 32) * bound) >> 32`. There is no rejection
    /// step, so bounds that are not a power of two are very slightly biased
    /// towards lower values. Existing worlds depend on this exact mapping. A
    /// `bound` of zero yields zero.
    pub fn next_int(&mut self, bound: u32) -> u32 {
        let high = self.next_u64() >> 32;
        ((high * u64::from(bound)) >> 32) as u32
    }
}

#[inline]
fn xorshift64(mut a: u64) -> u64 {
    a ^= a << 21;
    a ^= a >> 35;
    a ^= a << 4;
    a
}

impl RngCore for XorShiftRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let current = self.state;
        self.state = xorshift64(current);
        current
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for XorShiftRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn chunk_hash_matches_polynomial() {
        assert_eq!(chunk_hash(0, 0), 961);
        assert_eq!(chunk_hash(1, 0), 992);
        assert_eq!(chunk_hash(0, 1), 962);
        assert_eq!(chunk_hash(-31, 0), 0);
    }

    #[test]
    fn chunk_hash_wraps_instead_of_overflowing() {
        let h = chunk_hash(i32::MAX, i32::MAX);
        let expected = 31i32
            .wrapping_mul(31i32.wrapping_add(i32::MAX))
            .wrapping_add(i32::MAX);
        assert_eq!(h, expected);
    }

    #[test]
    fn negative_hash_is_sign_extended() {
        let rng = XorShiftRng::for_chunk(-100, -100);
        assert_eq!(rng.state(), i64::from(chunk_hash(-100, -100)) as u64);
        assert!(rng.state() > u64::from(u32::MAX));
    }

    #[test]
    fn first_draw_is_the_seed() {
        let mut rng = XorShiftRng::new(0xDEAD_BEEF);
        assert_eq!(rng.next_u64(), 0xDEAD_BEEF);
        assert_eq!(rng.state(), xorshift64(0xDEAD_BEEF));
    }

    #[test]
    fn xorshift_step_matches_reference() {
        let a: u64 = 1;
        let a = a ^ (a << 21);
        let a = a ^ (a >> 35);
        let a = a ^ (a << 4);
        assert_eq!(xorshift64(1), a);
    }

    #[test]
    fn zero_state_is_fixed_point() {
        let mut rng = XorShiftRng::new(0);
        for _ in 0..16 {
            assert_eq!(rng.next_int(7), 0);
        }
    }

    #[test]
    fn next_int_stays_in_bounds() {
        let mut rng = XorShiftRng::for_chunk(12, -7);
        for bound in 1..40u32 {
            for _ in 0..200 {
                assert!(rng.next_int(bound) < bound);
            }
        }
    }

    #[test]
    fn next_int_uses_high_bits() {
        // High word 0x8000_0000 maps to the middle of any range.
        let mut rng = XorShiftRng::new(0x8000_0000_0000_0000);
        assert_eq!(rng.next_int(10), 5);
    }

    #[test]
    fn small_seeds_start_with_zero_variant() {
        // Seeds below 2^32 have an empty high word on the first draw.
        let mut rng = XorShiftRng::for_chunk(0, 0);
        assert_eq!(rng.next_int(4), 0);
    }

    #[test]
    fn same_chunk_same_sequence() {
        let mut a = XorShiftRng::for_chunk(3, 9);
        let mut b = XorShiftRng::for_chunk(3, 9);
        let seq_a: Vec<u32> = (0..64).map(|_| a.next_int(5)).collect();
        let seq_b: Vec<u32> = (0..64).map(|_| b.next_int(5)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn different_chunks_diverge() {
        let mut a = XorShiftRng::for_chunk(3, 9);
        let mut b = XorShiftRng::for_chunk(4, 9);
        let seq_a: Vec<u32> = (0..64).map(|_| a.next_int(5)).collect();
        let seq_b: Vec<u32> = (0..64).map(|_| b.next_int(5)).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn works_through_rand_traits() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        let value: u8 = rng.gen_range(0..10);
        assert!(value < 10);

        let mut bytes = [0u8; 11];
        rng.fill_bytes(&mut bytes);
        assert!(bytes.iter().any(|b| *b != 0));
    }
}
