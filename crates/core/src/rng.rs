//! RNG module - deterministic random source for block issue
//!
//! A small LCG drives every random choice the core makes (block kind, spawn
//! column, spawn orientation). A seeded match is therefore fully replayable.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    seed: u32,
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { seed, state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits: the low bits of an LCG with a power-of-two modulus
    /// cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max <= 1 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Random value in the inclusive range [0, max]
    pub fn next_inclusive(&mut self, max: u32) -> u32 {
        self.next_range(max.saturating_add(1))
    }

    /// The seed this generator was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Current internal state (restart a generator from here with `new`)
    pub fn state(&self) -> u32 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed() {
        let mut rng = SimpleRng::new(0);
        assert_eq!(rng.seed(), 0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(7);
        let mut seen = [false; 7];
        for _ in 0..1000 {
            let v = rng.next_range(7) as usize;
            assert!(v < 7);
            seen[v] = true;
        }
        assert!(seen.iter().all(|&s| s), "every value should appear");
        assert_eq!(rng.next_range(1), 0);
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_next_inclusive_hits_upper_bound() {
        let mut rng = SimpleRng::new(99);
        let hit = (0..500).any(|_| rng.next_inclusive(3) == 3);
        assert!(hit);
        assert_eq!(rng.next_inclusive(0), 0);
    }
}
