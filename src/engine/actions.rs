// src/engine/actions.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ActionId, PlayerIdentifier};

/// Тип действия игрока. Закрытый набор: всё, что игрок вообще
/// может отправить в матч.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlayerActionType {
    DrawCard,
    PlayPokemon,
    AttachEnergy,
    PlayTrainer,
    EvolvePokemon,
    Retreat,
    UseAbility,
    Attack,
    GenerateCoinFlip,
    EndTurn,
    SelectPrize,
    DrawPrize,
    SetActivePokemon,
    Concede,
}

/// Действие, присланное игроком на применение.
///
/// `data` — свободный payload конкретного действия
/// (isKnockedOut, benchIndex, prizeIndex, cardId/setName и т.п.).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlayerAction {
    pub player: PlayerIdentifier,
    pub action_type: PlayerActionType,
    #[serde(default)]
    pub data: Value,
}

impl PlayerAction {
    pub fn new(player: PlayerIdentifier, action_type: PlayerActionType) -> Self {
        Self {
            player,
            action_type,
            data: Value::Null,
        }
    }

    pub fn with_data(player: PlayerIdentifier, action_type: PlayerActionType, data: Value) -> Self {
        Self {
            player,
            action_type,
            data,
        }
    }
}

/// Запись в истории действий. После добавления в историю не меняется.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActionRecord {
    /// Некоторые записи приходят из внешних систем без id,
    /// поэтому поле опциональное. Поиск по истории это учитывает.
    pub action_id: Option<ActionId>,
    pub action_type: PlayerActionType,
    pub player: PlayerIdentifier,
    #[serde(default)]
    pub data: Value,
}

impl ActionRecord {
    pub fn new(
        action_id: ActionId,
        action_type: PlayerActionType,
        player: PlayerIdentifier,
        data: Value,
    ) -> Self {
        Self {
            action_id: Some(action_id),
            action_type,
            player,
            data,
        }
    }

    // Типизированные аксессоры к общеизвестным ключам payload'а.

    /// Атака закончилась нокаутом защищающегося покемона.
    pub fn is_knocked_out(&self) -> bool {
        self.data
            .get("isKnockedOut")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn bench_index(&self) -> Option<usize> {
        self.data
            .get("benchIndex")
            .and_then(Value::as_u64)
            .map(|v| v as usize)
    }

    pub fn prize_index(&self) -> Option<usize> {
        self.data
            .get("prizeIndex")
            .and_then(Value::as_u64)
            .map(|v| v as usize)
    }
}
