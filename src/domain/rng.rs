/// Injectable randomness.
///
/// Gameplay never touches a global RNG. Spawn positions and the initial
/// heading are drawn through `RandomSource` so a session is reproducible
/// from its seed and tests can script exact draws.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. `bound` is never zero.
    fn below(&mut self, bound: u32) -> u32;
}

impl RandomSource for Pcg32 {
    fn below(&mut self, bound: u32) -> u32 {
        self.random_range(0..bound)
    }
}

/// Seeded PCG stream used for real sessions.
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Each value is reduced modulo the requested bound.
#[cfg(test)]
pub struct Scripted {
    draws: Vec<u32>,
    next: usize,
}

#[cfg(test)]
impl Scripted {
    pub fn new(draws: &[u32]) -> Self {
        Scripted { draws: draws.to_vec(), next: 0 }
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    fn below(&mut self, bound: u32) -> u32 {
        let v = self.draws[self.next % self.draws.len()];
        self.next += 1;
        v % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = seeded(42);
        let mut b = seeded(42);
        for _ in 0..64 {
            assert_eq!(a.below(20), b.below(20));
        }
    }

    #[test]
    fn draws_respect_bound() {
        let mut r = seeded(3);
        for _ in 0..1000 {
            assert!(r.below(4) < 4);
        }
    }

    #[test]
    fn scripted_cycles() {
        let mut s = Scripted::new(&[1, 2]);
        assert_eq!(s.below(10), 1);
        assert_eq!(s.below(10), 2);
        assert_eq!(s.below(10), 1);
        assert_eq!(s.below(2), 0);
    }
}
