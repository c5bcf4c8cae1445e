//! Движок матчей коллекционной карточной игры (два игрока, пошаговая).
//!
//! Ядро — три вещи:
//! - машина состояний матча (лобби → валидация колод → сетап → ходы → финал);
//! - подсистема доступных действий: какие действия легальны прямо сейчас;
//! - валидация колоды против правил турнира (размер, баны, лимиты копий).
//!
//! Всё ядро синхронное и без I/O. Хранилища, каталог карт и транспорт —
//! внешние коллабораторы за трейтами в `infra`.

pub mod api;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod validation;
