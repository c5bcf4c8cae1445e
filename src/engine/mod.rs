//! Движок матча: машина состояний, доступные действия, диспетчеризация.
//!
//! Основные операции:
//!   - `get_available_actions` – какие действия легальны прямо сейчас
//!   - `apply_action` – проверить легальность и применить действие
//!   - `run_deck_validation` / `start_game` / `complete_setup` – жизненный цикл
//!
//! Всё ядро синхронное и чистое: персистентность и транспорт снаружи.

pub mod actions;
pub mod available;
pub mod dispatch;
pub mod errors;
pub mod game_loop;
pub mod game_state;
pub mod handlers;
pub mod match_manager;

pub use actions::{ActionRecord, PlayerAction, PlayerActionType};
pub use available::get_available_actions;
pub use dispatch::{ActionHandler, HandlerRegistry};
pub use errors::EngineError;
pub use game_loop::{
    apply_action, complete_setup, run_deck_validation, set_initial_active, start_game,
    MatchStatus,
};
pub use game_state::{GameCard, GameStateContext, PlayerState, PokemonSlot};
pub use handlers::default_registry;
pub use match_manager::{ManagerError, MatchManager};

/// RNG-интерфейс движка. Реализации — в infra
/// (SystemRng поверх `rand`, DeterministicRng для тестов и реплея).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}

/// Сторона монетки. Первый игрок и эффекты бросков выражаются через неё.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoinFace {
    Heads,
    Tails,
}

/// Бросок монетки поверх RandomSource: перемешиваем две стороны
/// и берём верхнюю. Трейт остаётся с одним методом shuffle.
pub fn flip_coin<R: RandomSource>(rng: &mut R) -> CoinFace {
    let mut faces = [CoinFace::Heads, CoinFace::Tails];
    rng.shuffle(&mut faces);
    faces[0]
}
