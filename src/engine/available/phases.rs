// src/engine/available/phases.rs

//! Пять фазовых провайдеров внутри PlayerTurn.
//!
//! Базовые наборы действий — по фазе; сквозные условия (невыбранный
//! приз, выбор активного) берём из `conditions`, не дублируя их тут.

use crate::domain::{PlayerIdentifier, TurnPhase};
use crate::engine::actions::PlayerActionType;
use crate::engine::available::conditions;
use crate::engine::available::PhaseActionProvider;
use crate::engine::game_state::GameStateContext;

/// DRAW: только взять карту.
pub struct DrawPhaseProvider;

impl PhaseActionProvider for DrawPhaseProvider {
    fn can_handle(&self, phase: TurnPhase) -> bool {
        phase == TurnPhase::Draw
    }

    fn actions(
        &self,
        _ctx: &GameStateContext,
        _player: PlayerIdentifier,
    ) -> Vec<PlayerActionType> {
        vec![PlayerActionType::DrawCard]
    }
}

/// MAIN_PHASE: весь основной репертуар хода.
pub struct MainPhaseProvider;

impl PhaseActionProvider for MainPhaseProvider {
    fn can_handle(&self, phase: TurnPhase) -> bool {
        phase == TurnPhase::MainPhase
    }

    fn actions(
        &self,
        _ctx: &GameStateContext,
        _player: PlayerIdentifier,
    ) -> Vec<PlayerActionType> {
        vec![
            PlayerActionType::PlayPokemon,
            PlayerActionType::AttachEnergy,
            PlayerActionType::PlayTrainer,
            PlayerActionType::EvolvePokemon,
            PlayerActionType::Retreat,
            PlayerActionType::UseAbility,
            PlayerActionType::Attack,
            PlayerActionType::EndTurn,
        ]
    }
}

/// ATTACK: атака объявлена и ждёт бросков монетки.
pub struct AttackPhaseProvider;

impl PhaseActionProvider for AttackPhaseProvider {
    fn can_handle(&self, phase: TurnPhase) -> bool {
        phase == TurnPhase::Attack
    }

    fn actions(
        &self,
        _ctx: &GameStateContext,
        _player: PlayerIdentifier,
    ) -> Vec<PlayerActionType> {
        vec![
            PlayerActionType::Attack,
            PlayerActionType::GenerateCoinFlip,
            PlayerActionType::EndTurn,
        ]
    }
}

/// END: закрыть ход, либо — если за атакой висит невыбранный приз —
/// вместо END_TURN предложить взять приз (выбором или верхним).
pub struct EndPhaseProvider;

impl PhaseActionProvider for EndPhaseProvider {
    fn can_handle(&self, phase: TurnPhase) -> bool {
        phase == TurnPhase::End
    }

    fn actions(&self, ctx: &GameStateContext, player: PlayerIdentifier) -> Vec<PlayerActionType> {
        if conditions::prize_selection_pending(ctx, player) {
            vec![PlayerActionType::SelectPrize, PlayerActionType::DrawPrize]
        } else {
            vec![PlayerActionType::EndTurn]
        }
    }
}

/// SELECT_ACTIVE_POKEMON: поднять покемона со скамейки.
///
/// END_TURN удерживается только при двойном нокауте (выбор нужен
/// обоим), пока оба не разрешатся. Если выбор нужен одному —
/// END_TURN остаётся доступен наряду с SET_ACTIVE_POKEMON.
pub struct SelectActivePhaseProvider;

impl PhaseActionProvider for SelectActivePhaseProvider {
    fn can_handle(&self, phase: TurnPhase) -> bool {
        phase == TurnPhase::SelectActivePokemon
    }

    fn actions(&self, ctx: &GameStateContext, _player: PlayerIdentifier) -> Vec<PlayerActionType> {
        let mut actions = vec![PlayerActionType::SetActivePokemon];
        if !conditions::both_need_active_selection(ctx) {
            actions.push(PlayerActionType::EndTurn);
        }
        actions
    }
}
