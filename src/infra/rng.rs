// src/infra/rng.rs

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};

use crate::domain::MatchId;
use crate::engine::RandomSource;

/// Системный RNG поверх `rand::thread_rng`. Для боевых матчей.
#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl RandomSource for SystemRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut thread_rng());
    }
}

/// Детерминированный RNG: одинаковый seed — одинаковые перемешивания
/// и монетки. Нужен тестам и реплею сыгранных матчей.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    seed: u64,
    inner: StdRng,
}

impl DeterministicRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// RNG для реплея конкретного матча: seed выводится из его id,
    /// так что повторный прогон истории даёт те же раздачи.
    pub fn for_match(match_id: MatchId, base_seed: u64) -> Self {
        Self::from_seed(base_seed ^ match_id.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Seed, с которого этот генератор стартовал.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Сбросить генератор к стартовому seed (начать реплей заново).
    pub fn reset(&mut self) {
        self.inner = StdRng::seed_from_u64(self.seed);
    }
}

impl RandomSource for DeterministicRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}
