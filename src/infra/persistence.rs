// src/infra/persistence.rs

use std::collections::HashMap;

use crate::domain::{Deck, DeckId, Match, MatchId, Tournament, TournamentId};
use crate::engine::game_state::GameStateContext;

/// Репозиторий матчей.
///
/// Игровой контекст хранится отдельным снапшотом при матче:
/// он появляется только после старта партии и чистится вместе с ней.
pub trait MatchRepository {
    fn load_match(&self, id: MatchId) -> Option<Match>;

    fn save_match(&mut self, game_match: &Match);

    /// Все матчи, опционально — только одного турнира.
    fn list_matches(&self, tournament_id: Option<TournamentId>) -> Vec<Match>;

    fn load_game_state(&self, match_id: MatchId) -> Option<GameStateContext>;

    /// Сохранить или очистить (None) игровой контекст матча.
    fn save_game_state(&mut self, match_id: MatchId, ctx: Option<GameStateContext>);
}

/// Репозиторий колод.
pub trait DeckRepository {
    fn load_deck(&self, id: DeckId) -> Option<Deck>;

    fn save_deck(&mut self, deck: &Deck);

    fn deck_exists(&self, id: DeckId) -> bool;
}

/// Репозиторий турниров.
pub trait TournamentRepository {
    fn load_tournament(&self, id: TournamentId) -> Option<Tournament>;

    fn save_tournament(&mut self, tournament: &Tournament);

    fn tournament_exists(&self, id: TournamentId) -> bool;
}

/// Простое in-memory хранилище для тестов и локального запуска.
/// Реализует все три репозитория разом.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    matches: HashMap<MatchId, Match>,
    game_states: HashMap<MatchId, GameStateContext>,
    decks: HashMap<DeckId, Deck>,
    tournaments: HashMap<TournamentId, Tournament>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchRepository for InMemoryStorage {
    fn load_match(&self, id: MatchId) -> Option<Match> {
        self.matches.get(&id).cloned()
    }

    fn save_match(&mut self, game_match: &Match) {
        self.matches.insert(game_match.id, game_match.clone());
    }

    fn list_matches(&self, tournament_id: Option<TournamentId>) -> Vec<Match> {
        let mut result: Vec<Match> = self
            .matches
            .values()
            .filter(|m| tournament_id.map_or(true, |t| m.tournament_id == t))
            .cloned()
            .collect();
        result.sort_by_key(|m| m.id);
        result
    }

    fn load_game_state(&self, match_id: MatchId) -> Option<GameStateContext> {
        self.game_states.get(&match_id).cloned()
    }

    fn save_game_state(&mut self, match_id: MatchId, ctx: Option<GameStateContext>) {
        if let Some(c) = ctx {
            self.game_states.insert(match_id, c);
        } else {
            self.game_states.remove(&match_id);
        }
    }
}

impl DeckRepository for InMemoryStorage {
    fn load_deck(&self, id: DeckId) -> Option<Deck> {
        self.decks.get(&id).cloned()
    }

    fn save_deck(&mut self, deck: &Deck) {
        self.decks.insert(deck.id, deck.clone());
    }

    fn deck_exists(&self, id: DeckId) -> bool {
        self.decks.contains_key(&id)
    }
}

impl TournamentRepository for InMemoryStorage {
    fn load_tournament(&self, id: TournamentId) -> Option<Tournament> {
        self.tournaments.get(&id).cloned()
    }

    fn save_tournament(&mut self, tournament: &Tournament) {
        self.tournaments.insert(tournament.id, tournament.clone());
    }

    fn tournament_exists(&self, id: TournamentId) -> bool {
        self.tournaments.contains_key(&id)
    }
}
