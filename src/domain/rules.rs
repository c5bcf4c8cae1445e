// src/domain/rules.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ошибки конструирования правил. Падают сразу, в месте создания объекта.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("RestrictedCard: set_name пустой")]
    EmptySetName,

    #[error("RestrictedCard: card_id пустой")]
    EmptyCardId,

    #[error("RestrictedCard: max_copies = {0}, допустимо 0..=4")]
    InvalidMaxCopies(u32),

    #[error("DeckRules: max_deck_size {max} < min_deck_size {min}")]
    MaxBelowMin { min: u32, max: u32 },

    #[error("DeckRules: exact_deck_size, но min {min} != max {max}")]
    ExactSizeMismatch { min: u32, max: u32 },

    #[error("DeckRules: max_copies_per_card = 0, должно быть >= 1")]
    ZeroCopiesPerCard,

    #[error("StartGameRules: initial_hand_size = 0")]
    ZeroHandSize,

    #[error("StartGameRules: prize_card_count = 0")]
    ZeroPrizeCount,
}

/// Точечное переопределение лимита копий для одной карты.
///
/// max_copies = 0 означает "фактически запрещена в этом турнире".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestrictedCard {
    pub set_name: String,
    pub card_id: String,
    pub max_copies: u32,
}

impl RestrictedCard {
    pub fn new(
        set_name: impl Into<String>,
        card_id: impl Into<String>,
        max_copies: u32,
    ) -> Result<Self, RulesError> {
        let set_name = set_name.into();
        let card_id = card_id.into();

        if set_name.trim().is_empty() {
            return Err(RulesError::EmptySetName);
        }
        if card_id.trim().is_empty() {
            return Err(RulesError::EmptyCardId);
        }
        if max_copies > 4 {
            return Err(RulesError::InvalidMaxCopies(max_copies));
        }

        Ok(Self {
            set_name,
            card_id,
            max_copies,
        })
    }

    pub fn matches(&self, set_name: &str, card_id: &str) -> bool {
        self.set_name == set_name && self.card_id == card_id
    }
}

/// Правила конструирования колоды для турнира.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckRules {
    pub min_deck_size: u32,
    pub max_deck_size: u32,
    /// true = колода обязана быть ровно min_deck_size карт.
    pub exact_deck_size: bool,
    /// Общетурнирный лимит копий одной карты (кроме базовой энергии).
    pub max_copies_per_card: u32,
    /// Минимум базовых покемонов. 0 = не требуем.
    ///
    /// На уровне валидатора колоды проверяется только предупреждением:
    /// полная проверка требует типов карт из внешнего каталога.
    pub min_basic_pokemon: u32,
    pub restricted_cards: Vec<RestrictedCard>,
}

impl DeckRules {
    pub fn new(
        min_deck_size: u32,
        max_deck_size: u32,
        exact_deck_size: bool,
        max_copies_per_card: u32,
        min_basic_pokemon: u32,
        restricted_cards: Vec<RestrictedCard>,
    ) -> Result<Self, RulesError> {
        if max_deck_size < min_deck_size {
            return Err(RulesError::MaxBelowMin {
                min: min_deck_size,
                max: max_deck_size,
            });
        }
        if exact_deck_size && min_deck_size != max_deck_size {
            return Err(RulesError::ExactSizeMismatch {
                min: min_deck_size,
                max: max_deck_size,
            });
        }
        if max_copies_per_card == 0 {
            return Err(RulesError::ZeroCopiesPerCard);
        }

        Ok(Self {
            min_deck_size,
            max_deck_size,
            exact_deck_size,
            max_copies_per_card,
            min_basic_pokemon,
            restricted_cards,
        })
    }

    /// Классический формат: ровно 60 карт, максимум 4 копии, 1+ базовый покемон.
    pub fn standard_60() -> Self {
        Self {
            min_deck_size: 60,
            max_deck_size: 60,
            exact_deck_size: true,
            max_copies_per_card: 4,
            min_basic_pokemon: 1,
            restricted_cards: Vec::new(),
        }
    }

    /// Переопределение лимита для конкретной карты, если есть.
    pub fn restriction_for(&self, set_name: &str, card_id: &str) -> Option<&RestrictedCard> {
        self.restricted_cards
            .iter()
            .find(|r| r.matches(set_name, card_id))
    }
}

/// Правила старта партии: раздача рук и призовых карт.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartGameRules {
    pub initial_hand_size: u32,
    pub prize_card_count: u32,
}

impl StartGameRules {
    pub fn new(initial_hand_size: u32, prize_card_count: u32) -> Result<Self, RulesError> {
        if initial_hand_size == 0 {
            return Err(RulesError::ZeroHandSize);
        }
        if prize_card_count == 0 {
            return Err(RulesError::ZeroPrizeCount);
        }
        Ok(Self {
            initial_hand_size,
            prize_card_count,
        })
    }

    /// Стандарт: 7 карт в руку, 6 призовых.
    pub fn standard() -> Self {
        Self {
            initial_hand_size: 7,
            prize_card_count: 6,
        }
    }
}
