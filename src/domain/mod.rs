//! Доменная модель: колоды, правила турниров, турниры и агрегат матча.

pub mod deck;
pub mod game_match;
pub mod rules;
pub mod tournament;

// Базовые идентификаторы. Числовые — генерятся в infra::ids,
// строковые (card_id / set_name) приходят из каталога карт как есть.
pub type MatchId = u64;
pub type DeckId = u64;
pub type TournamentId = u64;
pub type PlayerId = u64;
pub type ActionId = u64;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Deck и т.п.
pub use deck::*;
pub use game_match::*;
pub use rules::*;
pub use tournament::*;
