// src/engine/errors.rs

use thiserror::Error;

use crate::domain::{MatchError, MatchState, PlayerIdentifier};
use crate::engine::actions::PlayerActionType;

/// Ошибки движка матча.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Действие {0:?} сейчас недоступно")]
    ActionNotAllowed(PlayerActionType),

    #[error("Для действия {0:?} не зарегистрирован обработчик")]
    UnregisteredHandler(PlayerActionType),

    #[error("Сейчас не ход игрока {0:?}")]
    NotPlayersTurn(PlayerIdentifier),

    #[error("Матч уже завершён")]
    MatchFinished,

    #[error("Недопустимое состояние матча для этой операции: {0:?}")]
    WrongMatchState(MatchState),

    #[error("Колода игрока {0:?} не прошла валидацию")]
    DeckNotValid(PlayerIdentifier),

    #[error(
        "В колоде игрока {player:?} {actual} карт, для раздачи руки и призов нужно минимум {required}"
    )]
    DeckTooSmallToStart {
        player: PlayerIdentifier,
        required: u32,
        actual: u32,
    },

    #[error("Карты нет в руке: {set_name}/{card_id}")]
    CardNotInHand { set_name: String, card_id: String },

    #[error("В руке нет карты с индексом {0}")]
    InvalidHandIndex(usize),

    #[error("На скамейке нет слота с индексом {0}")]
    InvalidBenchIndex(usize),

    #[error("Нет призовой карты с индексом {0}")]
    InvalidPrizeIndex(usize),

    #[error("Активный слот игрока {0:?} уже занят")]
    ActiveSlotOccupied(PlayerIdentifier),

    #[error("Сетап не завершён: у игрока {0:?} нет активного покемона")]
    SetupIncomplete(PlayerIdentifier),

    #[error("В payload действия нет обязательного поля {0}")]
    MissingActionData(&'static str),

    #[error(transparent)]
    Match(#[from] MatchError),
}
