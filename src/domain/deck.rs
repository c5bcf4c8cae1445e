// src/domain/deck.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DeckId, PlayerId, TournamentId};

/// Ошибки конструирования колоды и её записей.
///
/// Это ошибки программиста/данных: ловить и глотать их нельзя,
/// они должны падать сразу в месте конструирования.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("DeckCard: card_id пустой")]
    EmptyCardId,

    #[error("DeckCard: set_name пустой")]
    EmptySetName,

    #[error("DeckCard: quantity = {0}, должно быть >= 1")]
    InvalidQuantity(u32),

    #[error("Deck: карта {set_name}/{card_id} не найдена в колоде")]
    CardNotInDeck { set_name: String, card_id: String },
}

/// Одна запись колоды: какая карта и сколько копий.
///
/// Иммутабельна: `with_quantity` возвращает новый экземпляр.
/// Равенство — по всем трём полям; `is_same_card` игнорирует количество.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckCard {
    pub card_id: String,
    pub set_name: String,
    pub quantity: u32,
}

impl DeckCard {
    pub fn new(
        card_id: impl Into<String>,
        set_name: impl Into<String>,
        quantity: u32,
    ) -> Result<Self, DeckError> {
        let card_id = card_id.into();
        let set_name = set_name.into();

        if card_id.trim().is_empty() {
            return Err(DeckError::EmptyCardId);
        }
        if set_name.trim().is_empty() {
            return Err(DeckError::EmptySetName);
        }
        if quantity < 1 {
            return Err(DeckError::InvalidQuantity(quantity));
        }

        Ok(Self {
            card_id,
            set_name,
            quantity,
        })
    }

    /// Новый экземпляр с другим количеством копий.
    pub fn with_quantity(&self, quantity: u32) -> Result<Self, DeckError> {
        if quantity < 1 {
            return Err(DeckError::InvalidQuantity(quantity));
        }
        Ok(Self {
            card_id: self.card_id.clone(),
            set_name: self.set_name.clone(),
            quantity,
        })
    }

    /// Та же ли это карта (card_id + set_name), без учёта количества.
    pub fn is_same_card(&self, other: &DeckCard) -> bool {
        self.card_id == other.card_id && self.set_name == other.set_name
    }

    /// Базовая энергия: карта "без уровня", маркер `--` в идентификаторе
    /// (например `fire-energy--98`). Такие карты не подпадают под лимит копий.
    pub fn is_basic_energy(&self) -> bool {
        self.card_id.contains("-energy--")
    }
}

/// Колода игрока: упорядоченный список записей DeckCard.
///
/// Порядок карт значим и обязан переживать сериализацию.
/// `is_valid` выставляет ТОЛЬКО валидатор (validation::validate_deck),
/// домен сам этот флаг не трогает.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub created_by: PlayerId,
    /// Турнир, под который собрана колода (если уже привязана).
    pub tournament_id: Option<TournamentId>,
    pub is_valid: bool,
    pub cards: Vec<DeckCard>,
    /// Unix timestamp в секундах (UTC).
    pub created_at: u64,
    pub updated_at: u64,
}

impl Deck {
    pub fn new(id: DeckId, name: impl Into<String>, created_by: PlayerId, now_ts: u64) -> Self {
        Self {
            id,
            name: name.into(),
            created_by,
            tournament_id: None,
            is_valid: false,
            cards: Vec::new(),
            created_at: now_ts,
            updated_at: now_ts,
        }
    }

    /// Суммарное количество карт (с учётом копий).
    pub fn total_card_count(&self) -> u32 {
        self.cards.iter().map(|c| c.quantity).sum()
    }

    /// Уникальные сеты колоды в порядке первого появления.
    pub fn unique_sets(&self) -> Vec<String> {
        let mut sets: Vec<String> = Vec::new();
        for card in &self.cards {
            if !sets.iter().any(|s| s == &card.set_name) {
                sets.push(card.set_name.clone());
            }
        }
        sets
    }

    /// Добавить карту. Если такая карта уже есть (is_same_card),
    /// количества складываются вместо дублирования записи.
    pub fn add_card(&mut self, card: DeckCard, now_ts: u64) {
        match self.cards.iter_mut().find(|c| c.is_same_card(&card)) {
            Some(existing) => existing.quantity += card.quantity,
            None => self.cards.push(card),
        }
        self.updated_at = now_ts;
    }

    /// Убрать запись карты целиком.
    pub fn remove_card(
        &mut self,
        set_name: &str,
        card_id: &str,
        now_ts: u64,
    ) -> Result<DeckCard, DeckError> {
        let pos = self
            .cards
            .iter()
            .position(|c| c.set_name == set_name && c.card_id == card_id)
            .ok_or_else(|| DeckError::CardNotInDeck {
                set_name: set_name.to_string(),
                card_id: card_id.to_string(),
            })?;

        self.updated_at = now_ts;
        Ok(self.cards.remove(pos))
    }

    pub fn assign_to_tournament(&mut self, tournament_id: TournamentId, now_ts: u64) {
        self.tournament_id = Some(tournament_id);
        self.updated_at = now_ts;
    }
}
