// src/api/commands.rs

use serde::{Deserialize, Serialize};

use crate::domain::{DeckId, MatchId, PlayerId, PlayerIdentifier, TournamentId};
use crate::engine::actions::PlayerAction;
use crate::engine::game_loop::MatchStatus;
use crate::validation::ValidationResult;

/// Команда верхнего уровня. Одна команда — одна операция над матчем.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Создать матч под турниром.
    CreateMatch(CreateMatchCommand),

    /// Посадить игрока в матч со своей колодой.
    JoinMatch(JoinMatchCommand),

    /// Прогнать обе колоды через валидатор турнира.
    ValidateDecks { match_id: MatchId },

    /// Старт партии: монетка, перемешивание, раздача.
    StartGame { match_id: MatchId },

    /// Стартовая расстановка: активный покемон из руки.
    SetInitialActive {
        match_id: MatchId,
        player: PlayerIdentifier,
        hand_index: usize,
    },

    /// Завершить расстановку — начать первый ход.
    CompleteSetup { match_id: MatchId },

    /// Действие игрока в партии.
    SubmitAction {
        match_id: MatchId,
        action: PlayerAction,
    },

    /// Явная отмена матча (не Concede игрока, а решение оркестратора).
    CancelMatch { match_id: MatchId, reason: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateMatchCommand {
    pub tournament_id: TournamentId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JoinMatchCommand {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub deck_id: DeckId,
}

/// Результат выполнения команды.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CommandOutcome {
    MatchCreated {
        match_id: MatchId,
    },

    PlayerJoined {
        seat: PlayerIdentifier,
    },

    /// Результаты валидации обеих колод; passed = матч двинулся дальше.
    DecksValidated {
        player1: ValidationResult,
        player2: ValidationResult,
        passed: bool,
    },

    GameStarted {
        first_player: PlayerIdentifier,
    },

    ActionApplied {
        status: MatchStatus,
    },

    /// Команда выполнена, отдельного результата нет.
    Ack,
}
