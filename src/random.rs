use rand::Rng;

const MULTIPLIER_A: i64 = 1103515245;
const INCREMENT_C: i64 = 12345;
const DEFAULT_SEED: i64 = 3819201;

/// A source of randomness threaded explicitly into every decision.
///
/// Randomized difficulty tiers never reach for a global generator, so a test can
/// substitute a seeded implementation and replay the exact same decisions.
pub trait RandomGenerator {
    /// Returns a number in `[0, bound)`. `bound` must be positive.
    fn next_below(&mut self, bound: usize) -> usize;

    /// Returns `true` with roughly `percent` in 100 odds.
    fn chance(&mut self, percent: u8) -> bool {
        self.next_below(100) < usize::from(percent)
    }

    /// Picks one element, or `None` for an empty slice.
    fn pick<'a, K>(&mut self, items: &'a [K]) -> Option<&'a K> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_below(items.len()))
    }
}

/// Draws from the thread-local generator of the `rand` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRandomGenerator;

impl RandomGenerator for StandardRandomGenerator {
    fn next_below(&mut self, bound: usize) -> usize {
        rand::rng().random_range(0..bound)
    }
}

/// A linear congruential generator with a fixed seed; the same seed always
/// yields the same sequence on every platform.
#[derive(Debug, Clone)]
pub struct LcgRandomGenerator {
    seed: i64,
}

impl Default for LcgRandomGenerator {
    fn default() -> Self {
        LcgRandomGenerator::new(DEFAULT_SEED)
    }
}

impl LcgRandomGenerator {
    /// Any seed is accepted; it is reduced into the generator's modulus first.
    pub const fn new(seed: i64) -> Self {
        Self {
            seed: seed.rem_euclid(i32::MAX as i64),
        }
    }

    fn next(&mut self) -> i32 {
        self.seed = (self.seed * MULTIPLIER_A + INCREMENT_C) % (i32::MAX as i64);
        self.seed as i32
    }
}

impl RandomGenerator for LcgRandomGenerator {
    fn next_below(&mut self, bound: usize) -> usize {
        (self.next() % bound as i32).unsigned_abs() as usize
    }
}
