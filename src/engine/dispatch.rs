// src/engine/dispatch.rs

use std::collections::HashMap;

use crate::domain::Match;
use crate::engine::actions::{ActionRecord, PlayerAction, PlayerActionType};
use crate::engine::errors::EngineError;
use crate::engine::game_state::GameStateContext;
use crate::engine::RandomSource;

/// Резолвер одного типа действия.
///
/// Получает матч, игровой контекст и присланное действие; возвращает
/// записи для истории. Легальность действия резолвер НЕ проверяет —
/// это обязанность вызывающего (game_loop::apply_action) ДО диспетчеризации.
/// Возвращённые записи в историю добавляет тоже вызывающий.
pub trait ActionHandler<R: RandomSource> {
    fn resolve(
        &self,
        game_match: &mut Match,
        ctx: &mut GameStateContext,
        action: &PlayerAction,
        rng: &mut R,
        now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError>;
}

/// Реестр резолверов: PlayerActionType → ActionHandler.
///
/// Наполняется один раз при сборке системы (см. handlers::default_registry),
/// не на каждый запрос. Запрос незарегистрированного типа — жёсткая
/// конфигурационная ошибка, молча не проглатывается.
pub struct HandlerRegistry<R: RandomSource> {
    handlers: HashMap<PlayerActionType, Box<dyn ActionHandler<R>>>,
}

impl<R: RandomSource> HandlerRegistry<R> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Привязать резолвер к типу действия. Повторная регистрация
    /// того же типа заменяет предыдущий резолвер.
    pub fn register(&mut self, action_type: PlayerActionType, handler: Box<dyn ActionHandler<R>>) {
        self.handlers.insert(action_type, handler);
    }

    pub fn is_registered(&self, action_type: PlayerActionType) -> bool {
        self.handlers.contains_key(&action_type)
    }

    pub fn get_handler(
        &self,
        action_type: PlayerActionType,
    ) -> Result<&dyn ActionHandler<R>, EngineError> {
        self.handlers
            .get(&action_type)
            .map(|h| h.as_ref())
            .ok_or(EngineError::UnregisteredHandler(action_type))
    }
}

impl<R: RandomSource> Default for HandlerRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}
