// src/infra/catalog.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Тип карты из мастер-данных.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CardType {
    Pokemon { is_basic: bool },
    Trainer,
    Energy { is_basic: bool },
}

/// Атрибуты карты из каталога.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardInfo {
    pub name: String,
    pub card_type: CardType,
}

/// Каталог карт: внешняя граница ядра.
///
/// Ядру он нужен только для полной проверки минимума базовых
/// покемонов и для пер-карточных резолверов вне этого crate.
/// Реализация (файлы, БД, кэш) — забота окружающей системы.
pub trait CardCatalog {
    fn lookup(&self, set_name: &str, card_id: &str) -> Option<CardInfo>;
}

/// In-memory каталог для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryCardCatalog {
    cards: HashMap<(String, String), CardInfo>,
}

impl InMemoryCardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        set_name: impl Into<String>,
        card_id: impl Into<String>,
        info: CardInfo,
    ) {
        self.cards.insert((set_name.into(), card_id.into()), info);
    }
}

impl CardCatalog for InMemoryCardCatalog {
    fn lookup(&self, set_name: &str, card_id: &str) -> Option<CardInfo> {
        self.cards
            .get(&(set_name.to_string(), card_id.to_string()))
            .cloned()
    }
}
