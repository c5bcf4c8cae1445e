//! Подсистема доступных действий.
//!
//! Публичный контракт — `get_available_actions(state, phase, ctx, player)`:
//! чистая и тотальная функция. Для нераспознанной пары (state, phase)
//! деградирует до {Concede}, для терминальных состояний — пустой набор.
//!
//! Внутри — двухуровневая таблица стратегий: внешний реестр провайдеров
//! по MatchState, внутри PlayerTurn — пять фазовых суб-провайдеров.
//! Выбор — первый подошедший `can_handle` в порядке регистрации
//! (осознанно полный порядок, не "лучшее совпадение").

pub mod conditions;
pub mod phases;

use std::sync::OnceLock;

use crate::domain::{MatchState, PlayerIdentifier, TurnPhase};
use crate::engine::actions::PlayerActionType;
use crate::engine::game_state::GameStateContext;

use phases::{
    AttackPhaseProvider, DrawPhaseProvider, EndPhaseProvider, MainPhaseProvider,
    SelectActivePhaseProvider,
};

/// Провайдер доступных действий для одного состояния матча.
///
/// Провайдеры stateless: всё, что им нужно, приходит аргументами.
pub trait ActionProvider {
    fn can_handle(&self, state: MatchState, phase: Option<TurnPhase>) -> bool;

    fn actions(
        &self,
        phase: Option<TurnPhase>,
        ctx: &GameStateContext,
        player: PlayerIdentifier,
    ) -> Vec<PlayerActionType>;
}

/// Провайдер фазы внутри PlayerTurn.
pub trait PhaseActionProvider {
    fn can_handle(&self, phase: TurnPhase) -> bool;

    fn actions(&self, ctx: &GameStateContext, player: PlayerIdentifier)
        -> Vec<PlayerActionType>;
}

/// Внешний реестр: упорядоченный список провайдеров по состояниям.
///
/// Провайдеры stateless, поэтому штатный реестр собирается один раз
/// и переиспользуется всеми вызовами `get_available_actions`.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn ActionProvider + Send + Sync>>,
}

impl ProviderRegistry {
    /// Стандартная комплектация: предигровые состояния, PlayerTurn
    /// с пятью фазовыми провайдерами, терминальные состояния.
    pub fn standard() -> Self {
        Self {
            providers: vec![
                Box::new(SetupStatesProvider),
                Box::new(PlayerTurnProvider::standard()),
                Box::new(TerminalStatesProvider),
            ],
        }
    }

    pub fn available(
        &self,
        state: MatchState,
        phase: Option<TurnPhase>,
        ctx: &GameStateContext,
        player: PlayerIdentifier,
    ) -> Vec<PlayerActionType> {
        let mut actions = self
            .providers
            .iter()
            .find(|p| p.can_handle(state, phase))
            .map(|p| p.actions(phase, ctx, player))
            .unwrap_or_default();

        // Concede доступен всегда, кроме терминальных состояний.
        if !state.is_terminal() && !actions.contains(&PlayerActionType::Concede) {
            actions.push(PlayerActionType::Concede);
        }
        actions
    }
}

/// Какие действия может отправить игрок прямо сейчас.
///
/// Не бросает ошибок и не имеет побочных эффектов; вызывающий обязан
/// проверить присланное действие на членство в этом наборе ДО диспетчеризации.
pub fn get_available_actions(
    state: MatchState,
    phase: Option<TurnPhase>,
    ctx: &GameStateContext,
    current_player: PlayerIdentifier,
) -> Vec<PlayerActionType> {
    static STANDARD: OnceLock<ProviderRegistry> = OnceLock::new();
    STANDARD
        .get_or_init(ProviderRegistry::standard)
        .available(state, phase, ctx, current_player)
}

/// Предигровые состояния: игрового поля ещё нет,
/// игроку остаётся только возможность сдаться.
struct SetupStatesProvider;

impl ActionProvider for SetupStatesProvider {
    fn can_handle(&self, state: MatchState, _phase: Option<TurnPhase>) -> bool {
        matches!(
            state,
            MatchState::WaitingForPlayers
                | MatchState::DeckValidation
                | MatchState::PreGameSetup
                | MatchState::InitialSetup
        )
    }

    fn actions(
        &self,
        _phase: Option<TurnPhase>,
        _ctx: &GameStateContext,
        _player: PlayerIdentifier,
    ) -> Vec<PlayerActionType> {
        Vec::new()
    }
}

/// PlayerTurn: делегирует фазовым суб-провайдерам.
pub struct PlayerTurnProvider {
    phase_providers: Vec<Box<dyn PhaseActionProvider + Send + Sync>>,
}

impl PlayerTurnProvider {
    pub fn standard() -> Self {
        Self {
            phase_providers: vec![
                Box::new(DrawPhaseProvider),
                Box::new(MainPhaseProvider),
                Box::new(AttackPhaseProvider),
                Box::new(EndPhaseProvider),
                Box::new(SelectActivePhaseProvider),
            ],
        }
    }
}

impl ActionProvider for PlayerTurnProvider {
    fn can_handle(&self, state: MatchState, _phase: Option<TurnPhase>) -> bool {
        state == MatchState::PlayerTurn
    }

    fn actions(
        &self,
        phase: Option<TurnPhase>,
        ctx: &GameStateContext,
        player: PlayerIdentifier,
    ) -> Vec<PlayerActionType> {
        // phase = None при PlayerTurn — нелегальное состояние;
        // защитно схлопываемся до пустого набора (итог: {Concede}).
        let phase = match phase {
            Some(p) => p,
            None => return Vec::new(),
        };

        self.phase_providers
            .iter()
            .find(|p| p.can_handle(phase))
            .map(|p| p.actions(ctx, player))
            .unwrap_or_default()
    }
}

/// GameOver / Cancelled: матч закончен, действий нет вообще.
struct TerminalStatesProvider;

impl ActionProvider for TerminalStatesProvider {
    fn can_handle(&self, state: MatchState, _phase: Option<TurnPhase>) -> bool {
        state.is_terminal()
    }

    fn actions(
        &self,
        _phase: Option<TurnPhase>,
        _ctx: &GameStateContext,
        _player: PlayerIdentifier,
    ) -> Vec<PlayerActionType> {
        Vec::new()
    }
}
