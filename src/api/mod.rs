//! API-слой: serde-команды/запросы и синхронный сервис над хранилищем.
//!
//! Транспорт (HTTP, очередь, что угодно) живёт снаружи и просто
//! сериализует Command/Query сюда. Сервис — та самая "оркестровка":
//! проверка доступности действия ДО диспетчеризации и сохранение
//! состояния ПОСЛЕ применения.

pub mod commands;
pub mod errors;
pub mod queries;
pub mod service;

pub use commands::{Command, CommandOutcome};
pub use errors::ApiError;
pub use queries::{Query, QueryResponse};
pub use service::ApiService;
