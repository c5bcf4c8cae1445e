// src/api/errors.rs

use thiserror::Error;

use crate::domain::{DeckId, MatchError, MatchId, TournamentId};
use crate::engine::errors::EngineError;

/// Ошибки API-слоя.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Матч {0} не найден")]
    MatchNotFound(MatchId),

    #[error("Колода {0} не найдена")]
    DeckNotFound(DeckId),

    #[error("Турнир {0} не найден")]
    TournamentNotFound(TournamentId),

    #[error("У матча {0} назначены не обе колоды")]
    DecksNotAssigned(MatchId),

    #[error("Для матча {0} ещё нет игрового контекста")]
    NoGameState(MatchId),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Match(#[from] MatchError),
}
