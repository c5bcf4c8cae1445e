// src/api/queries.rs

use serde::{Deserialize, Serialize};

use crate::domain::{Deck, DeckId, Match, MatchId, PlayerIdentifier, Tournament, TournamentId};
use crate::engine::actions::PlayerActionType;
use crate::engine::game_state::GameStateContext;

/// Read-only запросы. Побочных эффектов не имеют.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    GetMatch { match_id: MatchId },

    GetGameState { match_id: MatchId },

    /// Какие действия доступны игроку прямо сейчас.
    AvailableActions {
        match_id: MatchId,
        player: PlayerIdentifier,
    },

    GetDeck { deck_id: DeckId },

    GetTournament { tournament_id: TournamentId },

    /// Все матчи, опционально — одного турнира.
    ListMatches {
        tournament_id: Option<TournamentId>,
    },
}

/// Ответы на запросы.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum QueryResponse {
    Match(Box<Match>),
    GameState(Box<GameStateContext>),
    AvailableActions(Vec<PlayerActionType>),
    Deck(Box<Deck>),
    Tournament(Box<Tournament>),
    Matches(Vec<Match>),
}
