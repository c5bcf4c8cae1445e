// src/engine/match_manager.rs

use std::collections::HashMap;

use crate::domain::{Match, MatchId, PlayerIdentifier};
use crate::engine::actions::{PlayerAction, PlayerActionType};
use crate::engine::available::get_available_actions;
use crate::engine::dispatch::HandlerRegistry;
use crate::engine::errors::EngineError;
use crate::engine::game_loop::{apply_action, MatchStatus};
use crate::engine::game_state::GameStateContext;
use crate::engine::RandomSource;

/// Ошибки уровня менеджера матчей (над движком одного матча).
#[derive(Debug)]
pub enum ManagerError {
    /// Матч с таким ID не найден.
    MatchNotFound(MatchId),

    /// Проброшенная ошибка движка.
    Engine(EngineError),
}

impl From<EngineError> for ManagerError {
    fn from(e: EngineError) -> Self {
        ManagerError::Engine(e)
    }
}

/// Внутренний объект: матч + его игровой контекст (если партия идёт).
struct ManagedMatch {
    game_match: Match,
    ctx: Option<GameStateContext>,
}

/// Менеджер матчей:
/// - хранит матчи по MatchId;
/// - применяет действия строго по одному на матч: всё проходит через
///   `&mut self`, так что два конкурентных действия к одному матчу
///   не могут валидироваться против устаревшего снапшота.
///
/// Read-only запросы (доступные действия) побочных эффектов не имеют
/// и могут выполняться сколько угодно раз.
pub struct MatchManager {
    matches: HashMap<MatchId, ManagedMatch>,
}

impl MatchManager {
    pub fn new() -> Self {
        Self {
            matches: HashMap::new(),
        }
    }

    /// Добавить матч. Матч с тем же id заменяется.
    pub fn add_match(&mut self, game_match: Match) {
        let id = game_match.id;
        self.matches.insert(
            id,
            ManagedMatch {
                game_match,
                ctx: None,
            },
        );
    }

    pub fn has_match(&self, match_id: MatchId) -> bool {
        self.matches.contains_key(&match_id)
    }

    pub fn game_match(&self, match_id: MatchId) -> Option<&Match> {
        self.matches.get(&match_id).map(|m| &m.game_match)
    }

    pub fn game_match_mut(&mut self, match_id: MatchId) -> Option<&mut Match> {
        self.matches.get_mut(&match_id).map(|m| &mut m.game_match)
    }

    pub fn context(&self, match_id: MatchId) -> Option<&GameStateContext> {
        self.matches.get(&match_id).and_then(|m| m.ctx.as_ref())
    }

    /// Привязать игровой контекст (после start_game).
    pub fn attach_context(
        &mut self,
        match_id: MatchId,
        ctx: GameStateContext,
    ) -> Result<(), ManagerError> {
        let managed = self
            .matches
            .get_mut(&match_id)
            .ok_or(ManagerError::MatchNotFound(match_id))?;
        managed.ctx = Some(ctx);
        Ok(())
    }

    /// Какие действия доступны игроку в этом матче прямо сейчас.
    pub fn available_actions(
        &self,
        match_id: MatchId,
        player: PlayerIdentifier,
    ) -> Result<Vec<PlayerActionType>, ManagerError> {
        let managed = self
            .matches
            .get(&match_id)
            .ok_or(ManagerError::MatchNotFound(match_id))?;

        // До старта партии контекста ещё нет — подсистеме доступных
        // действий хватает пустого (предигровые состояния на него
        // не смотрят).
        let empty = GameStateContext::new();
        let ctx = managed.ctx.as_ref().unwrap_or(&empty);
        Ok(get_available_actions(
            managed.game_match.state,
            managed.game_match.turn_phase,
            ctx,
            player,
        ))
    }

    /// Применить действие к матчу. Точка сериализации: `&mut self`.
    pub fn apply_action<R: RandomSource>(
        &mut self,
        match_id: MatchId,
        registry: &HandlerRegistry<R>,
        rng: &mut R,
        action: &PlayerAction,
        now_ts: u64,
    ) -> Result<MatchStatus, ManagerError> {
        let managed = self
            .matches
            .get_mut(&match_id)
            .ok_or(ManagerError::MatchNotFound(match_id))?;

        match managed.ctx.as_mut() {
            Some(ctx) => Ok(apply_action(
                &mut managed.game_match,
                ctx,
                registry,
                rng,
                action,
                now_ts,
            )?),
            None => {
                // До старта партии контекста нет; из доступных действий
                // остаётся только Concede, ему хватает пустого.
                let mut ctx = GameStateContext::new();
                let status = apply_action(
                    &mut managed.game_match,
                    &mut ctx,
                    registry,
                    rng,
                    action,
                    now_ts,
                )?;
                managed.ctx = Some(ctx);
                Ok(status)
            }
        }
    }
}

impl Default for MatchManager {
    fn default() -> Self {
        Self::new()
    }
}
