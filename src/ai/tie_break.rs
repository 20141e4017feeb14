use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks one of several equally scored moves.
pub trait TieBreak: Send {
    /// Return an index in `0..candidates`. `candidates` is never zero.
    fn choose(&mut self, candidates: usize) -> usize;

    fn name(&self) -> &str;
}

/// Uniformly random choice, for variety between games.
pub struct RandomTieBreak {
    rng: StdRng,
}

impl RandomTieBreak {
    pub fn new() -> Self {
        RandomTieBreak {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomTieBreak {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomTieBreak {
    fn default() -> Self {
        Self::new()
    }
}

impl TieBreak for RandomTieBreak {
    fn choose(&mut self, candidates: usize) -> usize {
        assert!(candidates > 0, "No candidates to choose from");
        self.rng.random_range(0..candidates)
    }

    fn name(&self) -> &str {
        "Random"
    }
}

/// Always the first candidate in search order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTieBreak;

impl TieBreak for FirstTieBreak {
    fn choose(&mut self, candidates: usize) -> usize {
        assert!(candidates > 0, "No candidates to choose from");
        0
    }

    fn name(&self) -> &str {
        "First"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_stays_in_range() {
        let mut tie_break = RandomTieBreak::new();
        for _ in 0..100 {
            assert!(tie_break.choose(4) < 4);
        }
        assert_eq!(tie_break.choose(1), 0);
    }

    #[test]
    fn test_random_covers_all_candidates() {
        let mut tie_break = RandomTieBreak::seeded(7);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[tie_break.choose(3)] = true;
        }
        assert!(seen.iter().all(|&s| s), "every candidate should come up: {seen:?}");
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = RandomTieBreak::seeded(42);
        let mut b = RandomTieBreak::seeded(42);
        let picks_a: Vec<usize> = (0..20).map(|_| a.choose(9)).collect();
        let picks_b: Vec<usize> = (0..20).map(|_| b.choose(9)).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn test_first_always_zero() {
        let mut tie_break = FirstTieBreak;
        assert_eq!(tie_break.choose(1), 0);
        assert_eq!(tie_break.choose(7), 0);
        assert_eq!(tie_break.name(), "First");
    }
}
