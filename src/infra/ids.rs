// src/infra/ids.rs

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{DeckId, MatchId, TournamentId};

/// Монотонные счётчики идентификаторов, по одному на сущность.
/// Хватает для in-memory хранилища и dev-CLI; продовое хранилище
/// выдаёт id само.
#[derive(Debug)]
pub struct IdGenerator {
    match_counter: AtomicU64,
    deck_counter: AtomicU64,
    tournament_counter: AtomicU64,
}

impl IdGenerator {
    /// Все счётчики стартуют с единицы.
    pub fn new() -> Self {
        Self {
            match_counter: AtomicU64::new(1),
            deck_counter: AtomicU64::new(1),
            tournament_counter: AtomicU64::new(1),
        }
    }

    #[inline]
    pub fn next_match_id(&self) -> MatchId {
        self.match_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_deck_id(&self) -> DeckId {
        self.deck_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_tournament_id(&self) -> TournamentId {
        self.tournament_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
