// src/engine/game_state.rs

use serde::{Deserialize, Serialize};

use crate::domain::{Deck, PlayerIdentifier};
use crate::engine::actions::ActionRecord;

/// Карта в партии: конкретная копия, уже без количества.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameCard {
    pub card_id: String,
    pub set_name: String,
}

/// Слот покемона на поле (активный или на скамейке).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PokemonSlot {
    pub card: GameCard,
    /// Прикреплённая энергия.
    pub energy: Vec<GameCard>,
    /// Накопленный урон. Математику урона считают резолверы
    /// конкретных карт за пределами ядра.
    pub damage: u32,
}

impl PokemonSlot {
    pub fn new(card: GameCard) -> Self {
        Self {
            card,
            energy: Vec::new(),
            damage: 0,
        }
    }
}

/// Состояние одного игрока в партии: стопки карт и поле.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayerState {
    /// Колода в партии; верх стопки — конец вектора.
    pub deck: Vec<GameCard>,
    pub hand: Vec<GameCard>,
    /// Отложенные призовые карты.
    pub prizes: Vec<GameCard>,
    pub discard: Vec<GameCard>,
    pub active_pokemon: Option<PokemonSlot>,
    pub bench: Vec<PokemonSlot>,
}

impl PlayerState {
    /// Нужен ли игроку выбор активного покемона:
    /// активный слот пуст И на скамейке есть кого поднять.
    pub fn needs_active_selection(&self) -> bool {
        self.active_pokemon.is_none() && !self.bench.is_empty()
    }

    /// Остались ли у игрока покемоны вообще (активный или скамейка).
    pub fn has_pokemon_in_play(&self) -> bool {
        self.active_pokemon.is_some() || !self.bench.is_empty()
    }

    /// Взять верхнюю карту колоды.
    pub fn draw_from_deck(&mut self) -> Option<GameCard> {
        self.deck.pop()
    }
}

/// Игровой контекст матча: история действий + состояние обоих игроков.
///
/// История append-only и хронологическая; `last_action` всегда
/// дублирует последнюю запись (для быстрых проверок условий).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GameStateContext {
    pub last_action: Option<ActionRecord>,
    pub action_history: Vec<ActionRecord>,
    pub player1: PlayerState,
    pub player2: PlayerState,
}

impl GameStateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Построить стартовые стопки из доменных колод:
    /// каждая запись DeckCard разворачивается в quantity копий,
    /// порядок колоды сохраняется. Перемешивание — отдельно, в engine.
    pub fn from_decks(deck1: &Deck, deck2: &Deck) -> Self {
        Self {
            last_action: None,
            action_history: Vec::new(),
            player1: PlayerState {
                deck: expand_deck(deck1),
                ..PlayerState::default()
            },
            player2: PlayerState {
                deck: expand_deck(deck2),
                ..PlayerState::default()
            },
        }
    }

    pub fn player(&self, id: PlayerIdentifier) -> &PlayerState {
        match id {
            PlayerIdentifier::Player1 => &self.player1,
            PlayerIdentifier::Player2 => &self.player2,
        }
    }

    pub fn player_mut(&mut self, id: PlayerIdentifier) -> &mut PlayerState {
        match id {
            PlayerIdentifier::Player1 => &mut self.player1,
            PlayerIdentifier::Player2 => &mut self.player2,
        }
    }

    /// Добавить запись в историю. Единственный способ её пополнить.
    pub fn push_action(&mut self, record: ActionRecord) {
        self.last_action = Some(record.clone());
        self.action_history.push(record);
    }
}

fn expand_deck(deck: &Deck) -> Vec<GameCard> {
    let mut cards = Vec::with_capacity(deck.total_card_count() as usize);
    for entry in &deck.cards {
        for _ in 0..entry.quantity {
            cards.push(GameCard {
                card_id: entry.card_id.clone(),
                set_name: entry.set_name.clone(),
            });
        }
    }
    cards
}
