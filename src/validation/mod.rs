//! Валидация колоды против правил турнира.
//!
//! Проблемы валидации — это данные (ValidationResult), а не ошибки:
//! колода может нарушать несколько правил одновременно, и игрок должен
//! увидеть их все разом, а не по одной за попытку.

pub mod deck_validator;
pub mod result;

pub use deck_validator::{validate_deck, verify_min_basic_pokemon};
pub use result::ValidationResult;
