//! Инфраструктура: генерация ID, хранилища, каталог карт, RNG.
//!
//! Ядро движка ничего отсюда не требует напрямую — оно работает через
//! трейты (RandomSource, репозитории, CardCatalog); здесь живут их
//! реализации для тестов и локального запуска.

pub mod catalog;
pub mod ids;
pub mod persistence;
pub mod rng;

pub use catalog::{CardCatalog, CardInfo, CardType, InMemoryCardCatalog};
pub use ids::IdGenerator;
pub use persistence::{
    DeckRepository, InMemoryStorage, MatchRepository, TournamentRepository,
};
pub use rng::{DeterministicRng, SystemRng};
