// src/domain/game_match.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DeckId, MatchId, PlayerId, TournamentId};

/// Ошибки переходов жизненного цикла матча.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Матч в состоянии {0:?}, переход недопустим")]
    WrongState(MatchState),

    #[error("Оба места уже заняты")]
    MatchFull,

    #[error("Игрок {0} уже в матче")]
    AlreadyJoined(PlayerId),

    #[error("Матч уже завершён")]
    AlreadyFinished,
}

/// Кто из двух игроков. Все пер-игровые структуры тегируются этим типом.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlayerIdentifier {
    Player1,
    Player2,
}

impl PlayerIdentifier {
    pub fn opponent(self) -> Self {
        match self {
            PlayerIdentifier::Player1 => PlayerIdentifier::Player2,
            PlayerIdentifier::Player2 => PlayerIdentifier::Player1,
        }
    }
}

/// Верхнеуровневое состояние матча. Активно ровно одно.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MatchState {
    WaitingForPlayers,
    DeckValidation,
    PreGameSetup,
    InitialSetup,
    PlayerTurn,
    GameOver,
    Cancelled,
}

impl MatchState {
    /// Терминальное состояние: матч больше не мутируется.
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchState::GameOver | MatchState::Cancelled)
    }
}

/// Фаза хода. Имеет смысл только при MatchState::PlayerTurn,
/// во всех остальных состояниях на матче хранится None.
///
/// Обычный поток линейный: Draw → MainPhase → Attack → End.
/// SelectActivePokemon — внеочередная фаза: входим в неё, когда
/// у игрока опустел активный слот и на скамейке есть кого поднять.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    Draw,
    MainPhase,
    Attack,
    End,
    SelectActivePokemon,
}

/// Итог завершённого матча.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchResult {
    Player1Win,
    Player2Win,
    Draw,
}

/// По какому условию матч закончился.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum WinCondition {
    /// Соперник не смог взять карту из пустой колоды.
    DeckOut,
    /// Игрок забрал все свои призовые карты.
    PrizesExhausted,
    /// У соперника не осталось покемонов (ни активного, ни на скамейке).
    NoPokemonLeft,
}

/// Агрегат матча: кто играет, чем играет, где мы в жизненном цикле.
///
/// Инвариант: state и current_player/first_player согласованы —
/// до конца INITIAL_SETUP current_player всегда None, в PLAYER_TURN
/// оба всегда Some. Переходы только через guarded-методы ниже.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub player1_id: Option<PlayerId>,
    pub player2_id: Option<PlayerId>,
    pub player1_deck_id: Option<DeckId>,
    pub player2_deck_id: Option<DeckId>,
    pub state: MatchState,
    /// None всегда, когда state != PlayerTurn.
    pub turn_phase: Option<TurnPhase>,
    pub current_player: Option<PlayerIdentifier>,
    pub first_player: Option<PlayerIdentifier>,
    pub turn_number: u32,
    pub winner_id: Option<PlayerId>,
    pub result: Option<MatchResult>,
    pub win_condition: Option<WinCondition>,
    pub cancellation_reason: Option<String>,
    /// Unix timestamp в секундах (UTC).
    pub created_at: u64,
    pub updated_at: u64,
}

impl Match {
    pub fn new(id: MatchId, tournament_id: TournamentId, now_ts: u64) -> Self {
        Self {
            id,
            tournament_id,
            player1_id: None,
            player2_id: None,
            player1_deck_id: None,
            player2_deck_id: None,
            state: MatchState::WaitingForPlayers,
            turn_phase: None,
            current_player: None,
            first_player: None,
            turn_number: 0,
            winner_id: None,
            result: None,
            win_condition: None,
            cancellation_reason: None,
            created_at: now_ts,
            updated_at: now_ts,
        }
    }

    pub fn player_id(&self, player: PlayerIdentifier) -> Option<PlayerId> {
        match player {
            PlayerIdentifier::Player1 => self.player1_id,
            PlayerIdentifier::Player2 => self.player2_id,
        }
    }

    pub fn deck_id(&self, player: PlayerIdentifier) -> Option<DeckId> {
        match player {
            PlayerIdentifier::Player1 => self.player1_deck_id,
            PlayerIdentifier::Player2 => self.player2_deck_id,
        }
    }

    /// Посадить игрока в свободное место (со своей колодой).
    /// Когда оба места заняты — WAITING_FOR_PLAYERS → DECK_VALIDATION.
    pub fn join_player(
        &mut self,
        player_id: PlayerId,
        deck_id: DeckId,
        now_ts: u64,
    ) -> Result<PlayerIdentifier, MatchError> {
        if self.state != MatchState::WaitingForPlayers {
            return Err(MatchError::WrongState(self.state));
        }
        if self.player1_id == Some(player_id) || self.player2_id == Some(player_id) {
            return Err(MatchError::AlreadyJoined(player_id));
        }

        let seat = if self.player1_id.is_none() {
            self.player1_id = Some(player_id);
            self.player1_deck_id = Some(deck_id);
            PlayerIdentifier::Player1
        } else if self.player2_id.is_none() {
            self.player2_id = Some(player_id);
            self.player2_deck_id = Some(deck_id);
            PlayerIdentifier::Player2
        } else {
            return Err(MatchError::MatchFull);
        };

        if self.player1_id.is_some() && self.player2_id.is_some() {
            self.state = MatchState::DeckValidation;
        }
        self.updated_at = now_ts;
        Ok(seat)
    }

    /// DECK_VALIDATION → PRE_GAME_SETUP: обе колоды прошли валидатор.
    pub fn decks_validated(&mut self, now_ts: u64) -> Result<(), MatchError> {
        if self.state != MatchState::DeckValidation {
            return Err(MatchError::WrongState(self.state));
        }
        self.state = MatchState::PreGameSetup;
        self.updated_at = now_ts;
        Ok(())
    }

    /// PRE_GAME_SETUP → INITIAL_SETUP: первый игрок определён монеткой,
    /// колоды перемешаны, руки и призы разложены (это делает engine).
    pub fn begin_initial_setup(
        &mut self,
        first_player: PlayerIdentifier,
        now_ts: u64,
    ) -> Result<(), MatchError> {
        if self.state != MatchState::PreGameSetup {
            return Err(MatchError::WrongState(self.state));
        }
        self.state = MatchState::InitialSetup;
        self.first_player = Some(first_player);
        self.updated_at = now_ts;
        Ok(())
    }

    /// INITIAL_SETUP → PLAYER_TURN (фаза Draw), ходит first_player.
    pub fn begin_first_turn(&mut self, now_ts: u64) -> Result<(), MatchError> {
        if self.state != MatchState::InitialSetup {
            return Err(MatchError::WrongState(self.state));
        }
        self.state = MatchState::PlayerTurn;
        self.turn_phase = Some(TurnPhase::Draw);
        self.current_player = self.first_player;
        self.turn_number = 1;
        self.updated_at = now_ts;
        Ok(())
    }

    /// Сменить фазу внутри PLAYER_TURN.
    pub fn set_phase(&mut self, phase: TurnPhase, now_ts: u64) -> Result<(), MatchError> {
        if self.state != MatchState::PlayerTurn {
            return Err(MatchError::WrongState(self.state));
        }
        self.turn_phase = Some(phase);
        self.updated_at = now_ts;
        Ok(())
    }

    /// Передать ход сопернику: фаза Draw, номер хода +1.
    pub fn pass_turn(&mut self, now_ts: u64) -> Result<(), MatchError> {
        if self.state != MatchState::PlayerTurn {
            return Err(MatchError::WrongState(self.state));
        }
        self.current_player = self.current_player.map(PlayerIdentifier::opponent);
        self.turn_phase = Some(TurnPhase::Draw);
        self.turn_number += 1;
        self.updated_at = now_ts;
        Ok(())
    }

    /// PLAYER_TURN → GAME_OVER по выполненному условию победы.
    pub fn finish(
        &mut self,
        winner: PlayerIdentifier,
        condition: WinCondition,
        now_ts: u64,
    ) -> Result<(), MatchError> {
        if self.state != MatchState::PlayerTurn {
            return Err(MatchError::WrongState(self.state));
        }
        self.state = MatchState::GameOver;
        self.turn_phase = None;
        self.current_player = None;
        self.winner_id = self.player_id(winner);
        self.result = Some(match winner {
            PlayerIdentifier::Player1 => MatchResult::Player1Win,
            PlayerIdentifier::Player2 => MatchResult::Player2Win,
        });
        self.win_condition = Some(condition);
        self.updated_at = now_ts;
        Ok(())
    }

    /// Любое состояние → CANCELLED (сдача или явная отмена) с причиной.
    pub fn cancel(&mut self, reason: impl Into<String>, now_ts: u64) -> Result<(), MatchError> {
        if self.state.is_terminal() {
            return Err(MatchError::AlreadyFinished);
        }
        self.state = MatchState::Cancelled;
        self.turn_phase = None;
        self.current_player = None;
        self.cancellation_reason = Some(reason.into());
        self.updated_at = now_ts;
        Ok(())
    }
}
