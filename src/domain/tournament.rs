// src/domain/tournament.rs

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::rules::DeckRules;
use crate::domain::{DeckId, TournamentId};

/// Ошибки агрегата турнира.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Tournament: name пустой")]
    EmptyName,

    #[error("Tournament: format пустой")]
    EmptyFormat,
}

/// Статус жизненного цикла турнира.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TournamentStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

/// Турнир: владелец правил конструирования колод, бан-листов
/// и точечных ограничений. Валидатор колод читает его через
/// query-методы и сам ничего не мутирует.
///
/// Все мутаторы идемпотентны (повторное добавление — no-op)
/// и обновляют `updated_at`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub author: String,
    pub status: TournamentStatus,
    /// Официальный (санкционированный) турнир или кастомный.
    pub official: bool,
    /// Название формата, например "standard" / "expanded".
    pub format: String,
    pub deck_rules: DeckRules,
    /// Полностью запрещённые сеты.
    pub banned_sets: HashSet<String>,
    /// Точечные баны: set_name -> card_id'ы, запрещённые внутри сета.
    pub set_banned_cards: HashMap<String, HashSet<String>>,
    /// Колоды, сохранённые под этот турнир.
    pub saved_decks: HashSet<DeckId>,
    /// Регуляционные метки, допущенные в формат.
    pub regulation_marks: HashSet<String>,
    /// Unix timestamp в секундах (UTC).
    pub created_at: u64,
    pub updated_at: u64,
}

impl Tournament {
    pub fn new(
        id: TournamentId,
        name: impl Into<String>,
        author: impl Into<String>,
        format: impl Into<String>,
        deck_rules: DeckRules,
        now_ts: u64,
    ) -> Result<Self, TournamentError> {
        let name = name.into();
        let format = format.into();

        if name.trim().is_empty() {
            return Err(TournamentError::EmptyName);
        }
        if format.trim().is_empty() {
            return Err(TournamentError::EmptyFormat);
        }

        Ok(Self {
            id,
            name,
            version: "1.0".to_string(),
            description: None,
            author: author.into(),
            status: TournamentStatus::Draft,
            official: false,
            format,
            deck_rules,
            banned_sets: HashSet::new(),
            set_banned_cards: HashMap::new(),
            saved_decks: HashSet::new(),
            regulation_marks: HashSet::new(),
            created_at: now_ts,
            updated_at: now_ts,
        })
    }

    // ---------- query-методы (их читает валидатор колод) ----------

    /// Разрешён ли сет (не находится в бан-листе).
    pub fn is_set_allowed(&self, set_name: &str) -> bool {
        !self.banned_sets.contains(set_name)
    }

    /// Забанена ли карта: целиком сетом или точечно.
    pub fn is_card_banned(&self, set_name: &str, card_id: &str) -> bool {
        if self.banned_sets.contains(set_name) {
            return true;
        }
        self.set_banned_cards
            .get(set_name)
            .map(|cards| cards.contains(card_id))
            .unwrap_or(false)
    }

    /// Есть ли для карты точечное ограничение количества копий.
    pub fn is_card_restricted(&self, set_name: &str, card_id: &str) -> bool {
        self.deck_rules.restriction_for(set_name, card_id).is_some()
    }

    /// Максимум копий карты в этом турнире:
    /// 0 если карта забанена, иначе точечное ограничение,
    /// иначе общетурнирный лимит.
    pub fn max_copies_for_card(&self, set_name: &str, card_id: &str) -> u32 {
        if self.is_card_banned(set_name, card_id) {
            return 0;
        }
        match self.deck_rules.restriction_for(set_name, card_id) {
            Some(r) => r.max_copies,
            None => self.deck_rules.max_copies_per_card,
        }
    }

    // ---------- мутаторы (идемпотентные) ----------

    pub fn ban_set(&mut self, set_name: impl Into<String>, now_ts: u64) {
        if self.banned_sets.insert(set_name.into()) {
            self.updated_at = now_ts;
        }
    }

    pub fn unban_set(&mut self, set_name: &str, now_ts: u64) {
        if self.banned_sets.remove(set_name) {
            self.updated_at = now_ts;
        }
    }

    pub fn ban_card_in_set(
        &mut self,
        set_name: impl Into<String>,
        card_id: impl Into<String>,
        now_ts: u64,
    ) {
        let inserted = self
            .set_banned_cards
            .entry(set_name.into())
            .or_default()
            .insert(card_id.into());
        if inserted {
            self.updated_at = now_ts;
        }
    }

    pub fn unban_card_in_set(&mut self, set_name: &str, card_id: &str, now_ts: u64) {
        let mut removed = false;
        if let Some(cards) = self.set_banned_cards.get_mut(set_name) {
            removed = cards.remove(card_id);
            if cards.is_empty() {
                self.set_banned_cards.remove(set_name);
            }
        }
        if removed {
            self.updated_at = now_ts;
        }
    }

    /// Добавить/заменить точечное ограничение для карты.
    pub fn restrict_card(&mut self, restriction: crate::domain::RestrictedCard, now_ts: u64) {
        match self
            .deck_rules
            .restricted_cards
            .iter_mut()
            .find(|r| r.matches(&restriction.set_name, &restriction.card_id))
        {
            Some(existing) => {
                if *existing == restriction {
                    return; // уже ровно такое ограничение
                }
                *existing = restriction;
            }
            None => self.deck_rules.restricted_cards.push(restriction),
        }
        self.updated_at = now_ts;
    }

    pub fn unrestrict_card(&mut self, set_name: &str, card_id: &str, now_ts: u64) {
        let before = self.deck_rules.restricted_cards.len();
        self.deck_rules
            .restricted_cards
            .retain(|r| !r.matches(set_name, card_id));
        if self.deck_rules.restricted_cards.len() != before {
            self.updated_at = now_ts;
        }
    }

    pub fn save_deck(&mut self, deck_id: DeckId, now_ts: u64) {
        if self.saved_decks.insert(deck_id) {
            self.updated_at = now_ts;
        }
    }

    pub fn add_regulation_mark(&mut self, mark: impl Into<String>, now_ts: u64) {
        if self.regulation_marks.insert(mark.into()) {
            self.updated_at = now_ts;
        }
    }

    pub fn set_status(&mut self, status: TournamentStatus, now_ts: u64) {
        if self.status != status {
            self.status = status;
            self.updated_at = now_ts;
        }
    }
}
