// src/engine/handlers.rs

//! Резолверы всех четырнадцати типов действий + сборка реестра.
//!
//! Резолверы — каркасные: они двигают карты между стопками, ведут
//! фазовые переходы и бухгалтерию нокаутов/призов. Математика урона и
//! интерпретация текста конкретных карт — вне ядра, этим занимаются
//! пер-карточные резолверы снаружи.

use serde_json::{json, Value};

use crate::domain::{Match, MatchState, PlayerIdentifier, TurnPhase, WinCondition};
use crate::engine::actions::{ActionRecord, PlayerAction, PlayerActionType};
use crate::engine::dispatch::{ActionHandler, HandlerRegistry};
use crate::engine::errors::EngineError;
use crate::engine::game_state::{GameCard, GameStateContext, PokemonSlot};
use crate::engine::{flip_coin, CoinFace, RandomSource};

/// Собрать реестр со всеми штатными резолверами.
/// Вызывается один раз при сборке системы.
pub fn default_registry<R: RandomSource>() -> HandlerRegistry<R> {
    let mut registry = HandlerRegistry::new();
    registry.register(PlayerActionType::DrawCard, Box::new(DrawCardHandler));
    registry.register(PlayerActionType::PlayPokemon, Box::new(PlayPokemonHandler));
    registry.register(PlayerActionType::AttachEnergy, Box::new(AttachEnergyHandler));
    registry.register(PlayerActionType::PlayTrainer, Box::new(PlayTrainerHandler));
    registry.register(
        PlayerActionType::EvolvePokemon,
        Box::new(EvolvePokemonHandler),
    );
    registry.register(PlayerActionType::Retreat, Box::new(RetreatHandler));
    registry.register(PlayerActionType::UseAbility, Box::new(UseAbilityHandler));
    registry.register(PlayerActionType::Attack, Box::new(AttackHandler));
    registry.register(
        PlayerActionType::GenerateCoinFlip,
        Box::new(GenerateCoinFlipHandler),
    );
    registry.register(PlayerActionType::EndTurn, Box::new(EndTurnHandler));
    registry.register(PlayerActionType::SelectPrize, Box::new(SelectPrizeHandler));
    registry.register(PlayerActionType::DrawPrize, Box::new(DrawPrizeHandler));
    registry.register(
        PlayerActionType::SetActivePokemon,
        Box::new(SetActivePokemonHandler),
    );
    registry.register(PlayerActionType::Concede, Box::new(ConcedeHandler));
    registry
}

/// Запись истории из присланного действия, payload как есть.
/// action_id не ставим — его присваивает apply_action при добавлении.
fn record_of(action: &PlayerAction) -> ActionRecord {
    ActionRecord {
        action_id: None,
        action_type: action.action_type,
        player: action.player,
        data: action.data.clone(),
    }
}

/// То же, но с дополнительными ключами поверх присланного payload'а.
fn record_with(action: &PlayerAction, extra: Value) -> ActionRecord {
    let mut data = match &action.data {
        Value::Object(map) => Value::Object(map.clone()),
        Value::Null => json!({}),
        other => json!({ "submitted": other.clone() }),
    };
    if let (Value::Object(target), Value::Object(source)) = (&mut data, extra) {
        for (k, v) in source {
            target.insert(k, v);
        }
    }
    ActionRecord {
        action_id: None,
        action_type: action.action_type,
        player: action.player,
        data,
    }
}

fn str_field(action: &PlayerAction, key: &'static str) -> Result<String, EngineError> {
    action
        .data
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(EngineError::MissingActionData(key))
}

fn bool_field(action: &PlayerAction, key: &str) -> bool {
    action
        .data
        .get(key)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Взять карту из руки по (set_name, card_id).
fn take_from_hand(
    ctx: &mut GameStateContext,
    player: PlayerIdentifier,
    set_name: &str,
    card_id: &str,
) -> Result<GameCard, EngineError> {
    let hand = &mut ctx.player_mut(player).hand;
    let pos = hand
        .iter()
        .position(|c| c.set_name == set_name && c.card_id == card_id)
        .ok_or_else(|| EngineError::CardNotInHand {
            set_name: set_name.to_string(),
            card_id: card_id.to_string(),
        })?;
    Ok(hand.remove(pos))
}

// ---------------------------------------------------------------------------

/// DRAW_CARD: верхняя карта колоды в руку, фаза Draw → MainPhase.
/// Пустая колода — deck-out, победа соперника.
struct DrawCardHandler;

impl<R: RandomSource> ActionHandler<R> for DrawCardHandler {
    fn resolve(
        &self,
        game_match: &mut Match,
        ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        let player = action.player;
        match ctx.player_mut(player).draw_from_deck() {
            Some(card) => {
                let extra = json!({ "cardId": card.card_id, "setName": card.set_name });
                ctx.player_mut(player).hand.push(card);
                game_match.set_phase(TurnPhase::MainPhase, now_ts)?;
                Ok(vec![record_with(action, extra)])
            }
            None => {
                game_match.finish(player.opponent(), WinCondition::DeckOut, now_ts)?;
                Ok(vec![record_with(action, json!({ "deckOut": true }))])
            }
        }
    }
}

/// PLAY_POKEMON: карта из руки на пустой активный слот либо на скамейку.
struct PlayPokemonHandler;

impl<R: RandomSource> ActionHandler<R> for PlayPokemonHandler {
    fn resolve(
        &self,
        _game_match: &mut Match,
        ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        _now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        let set_name = str_field(action, "setName")?;
        let card_id = str_field(action, "cardId")?;
        let card = take_from_hand(ctx, action.player, &set_name, &card_id)?;

        let state = ctx.player_mut(action.player);
        let to_active = state.active_pokemon.is_none();
        if to_active {
            state.active_pokemon = Some(PokemonSlot::new(card));
        } else {
            state.bench.push(PokemonSlot::new(card));
        }
        Ok(vec![record_with(action, json!({ "toActive": to_active }))])
    }
}

/// ATTACH_ENERGY: энергия из руки на активного покемона
/// (или на скамейку по benchIndex).
struct AttachEnergyHandler;

impl<R: RandomSource> ActionHandler<R> for AttachEnergyHandler {
    fn resolve(
        &self,
        _game_match: &mut Match,
        ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        _now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        let set_name = str_field(action, "setName")?;
        let card_id = str_field(action, "cardId")?;
        let card = take_from_hand(ctx, action.player, &set_name, &card_id)?;

        let state = ctx.player_mut(action.player);
        let target = match action.data.get("benchIndex").and_then(Value::as_u64) {
            Some(idx) => state
                .bench
                .get_mut(idx as usize)
                .ok_or(EngineError::InvalidBenchIndex(idx as usize))?,
            None => state
                .active_pokemon
                .as_mut()
                .ok_or(EngineError::MissingActionData("benchIndex"))?,
        };
        target.energy.push(card);
        Ok(vec![record_of(action)])
    }
}

/// PLAY_TRAINER: карта из руки в сброс; эффект — вне ядра.
struct PlayTrainerHandler;

impl<R: RandomSource> ActionHandler<R> for PlayTrainerHandler {
    fn resolve(
        &self,
        _game_match: &mut Match,
        ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        _now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        let set_name = str_field(action, "setName")?;
        let card_id = str_field(action, "cardId")?;
        let card = take_from_hand(ctx, action.player, &set_name, &card_id)?;
        ctx.player_mut(action.player).discard.push(card);
        Ok(vec![record_of(action)])
    }
}

/// EVOLVE_POKEMON: карта эволюции из руки заменяет карту слота,
/// предыдущая ступень уходит в сброс.
struct EvolvePokemonHandler;

impl<R: RandomSource> ActionHandler<R> for EvolvePokemonHandler {
    fn resolve(
        &self,
        _game_match: &mut Match,
        ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        _now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        let set_name = str_field(action, "setName")?;
        let card_id = str_field(action, "cardId")?;
        let evolution = take_from_hand(ctx, action.player, &set_name, &card_id)?;

        let state = ctx.player_mut(action.player);
        let slot = match action.data.get("benchIndex").and_then(Value::as_u64) {
            Some(idx) => state
                .bench
                .get_mut(idx as usize)
                .ok_or(EngineError::InvalidBenchIndex(idx as usize))?,
            None => state
                .active_pokemon
                .as_mut()
                .ok_or(EngineError::MissingActionData("benchIndex"))?,
        };
        let previous = std::mem::replace(&mut slot.card, evolution);
        let extra = json!({ "evolvedFrom": previous.card_id });
        state.discard.push(previous);
        Ok(vec![record_with(action, extra)])
    }
}

/// RETREAT: активный покемон меняется местами со слотом скамейки.
struct RetreatHandler;

impl<R: RandomSource> ActionHandler<R> for RetreatHandler {
    fn resolve(
        &self,
        _game_match: &mut Match,
        ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        _now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        let idx = action
            .data
            .get("benchIndex")
            .and_then(Value::as_u64)
            .ok_or(EngineError::MissingActionData("benchIndex"))? as usize;

        let state = ctx.player_mut(action.player);
        if idx >= state.bench.len() {
            return Err(EngineError::InvalidBenchIndex(idx));
        }
        let active = state
            .active_pokemon
            .take()
            .ok_or(EngineError::MissingActionData("activePokemon"))?;
        state.active_pokemon = Some(std::mem::replace(&mut state.bench[idx], active));
        Ok(vec![record_of(action)])
    }
}

/// USE_ABILITY: только запись в историю; сам эффект — вне ядра.
struct UseAbilityHandler;

impl<R: RandomSource> ActionHandler<R> for UseAbilityHandler {
    fn resolve(
        &self,
        _game_match: &mut Match,
        _ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        _now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        Ok(vec![record_of(action)])
    }
}

/// ATTACK: объявление/разрешение атаки.
///
/// Из MainPhase атака с requiresCoinFlip паркует ход в фазе Attack
/// (там игрок бросает монетки и подтверждает атаку повторным ATTACK).
/// Разрешённая атака двигает фазу в End; бухгалтерия нокаута — здесь:
/// активный покемон защищающегося уходит в сброс, и если покемонов
/// у него не осталось вовсе — немедленная победа атакующего.
struct AttackHandler;

impl<R: RandomSource> ActionHandler<R> for AttackHandler {
    fn resolve(
        &self,
        game_match: &mut Match,
        ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        let attacker = action.player;
        let defender = attacker.opponent();

        if game_match.turn_phase == Some(TurnPhase::MainPhase)
            && bool_field(action, "requiresCoinFlip")
        {
            game_match.set_phase(TurnPhase::Attack, now_ts)?;
            return Ok(vec![record_with(action, json!({ "declared": true }))]);
        }

        let knocked_out = bool_field(action, "isKnockedOut");
        let self_knocked_out = bool_field(action, "isSelfKnockedOut");

        if knocked_out {
            if let Some(slot) = ctx.player_mut(defender).active_pokemon.take() {
                let state = ctx.player_mut(defender);
                state.discard.push(slot.card);
                state.discard.extend(slot.energy);
            }
        }
        if self_knocked_out {
            if let Some(slot) = ctx.player_mut(attacker).active_pokemon.take() {
                let state = ctx.player_mut(attacker);
                state.discard.push(slot.card);
                state.discard.extend(slot.energy);
            }
        }

        if knocked_out && !ctx.player(defender).has_pokemon_in_play() {
            game_match.finish(attacker, WinCondition::NoPokemonLeft, now_ts)?;
        } else {
            // Приз за нокаут забирается в фазе End (SELECT_PRIZE),
            // выбор нового активного — после него.
            game_match.set_phase(TurnPhase::End, now_ts)?;
        }

        Ok(vec![record_of(action)])
    }
}

/// GENERATE_COIN_FLIP: бросок монетки в фазе Attack, результат в историю.
struct GenerateCoinFlipHandler;

impl<R: RandomSource> ActionHandler<R> for GenerateCoinFlipHandler {
    fn resolve(
        &self,
        _game_match: &mut Match,
        _ctx: &mut GameStateContext,
        action: &PlayerAction,
        rng: &mut R,
        _now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        let face = flip_coin(rng);
        let result = match face {
            CoinFace::Heads => "HEADS",
            CoinFace::Tails => "TAILS",
        };
        Ok(vec![record_with(action, json!({ "result": result }))])
    }
}

/// END_TURN: ход переходит сопернику, фаза Draw.
struct EndTurnHandler;

impl<R: RandomSource> ActionHandler<R> for EndTurnHandler {
    fn resolve(
        &self,
        game_match: &mut Match,
        _ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        game_match.pass_turn(now_ts)?;
        Ok(vec![record_of(action)])
    }
}

/// Общая часть SELECT_PRIZE / DRAW_PRIZE: призовая карта в руку.
/// Последний забранный приз — победа. После приза, если сопернику
/// нужен выбор активного, входим в SELECT_ACTIVE_POKEMON.
fn take_prize(
    game_match: &mut Match,
    ctx: &mut GameStateContext,
    action: &PlayerAction,
    index: usize,
    now_ts: u64,
) -> Result<Vec<ActionRecord>, EngineError> {
    let player = action.player;
    let state = ctx.player_mut(player);
    if index >= state.prizes.len() {
        return Err(EngineError::InvalidPrizeIndex(index));
    }
    let card = state.prizes.remove(index);
    let extra = json!({ "cardId": card.card_id, "setName": card.set_name });
    state.hand.push(card);

    if ctx.player(player).prizes.is_empty() {
        game_match.finish(player, WinCondition::PrizesExhausted, now_ts)?;
    } else if ctx.player(player.opponent()).needs_active_selection() {
        game_match.set_phase(TurnPhase::SelectActivePokemon, now_ts)?;
    }

    Ok(vec![record_with(action, extra)])
}

/// SELECT_PRIZE: игрок выбирает призовую карту по индексу.
struct SelectPrizeHandler;

impl<R: RandomSource> ActionHandler<R> for SelectPrizeHandler {
    fn resolve(
        &self,
        game_match: &mut Match,
        ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        let index = action
            .data
            .get("prizeIndex")
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize;
        take_prize(game_match, ctx, action, index, now_ts)
    }
}

/// DRAW_PRIZE: взять верхнюю призовую карту не глядя.
struct DrawPrizeHandler;

impl<R: RandomSource> ActionHandler<R> for DrawPrizeHandler {
    fn resolve(
        &self,
        game_match: &mut Match,
        ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        let top = ctx.player(action.player).prizes.len().saturating_sub(1);
        take_prize(game_match, ctx, action, top, now_ts)
    }
}

/// SET_ACTIVE_POKEMON: поднять покемона со скамейки в пустой
/// активный слот. Когда выбор больше никому не нужен — фаза
/// возвращается в End, и ход можно закрывать.
struct SetActivePokemonHandler;

impl<R: RandomSource> ActionHandler<R> for SetActivePokemonHandler {
    fn resolve(
        &self,
        game_match: &mut Match,
        ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        let player = action.player;
        let idx = action
            .data
            .get("benchIndex")
            .and_then(Value::as_u64)
            .ok_or(EngineError::MissingActionData("benchIndex"))? as usize;

        let state = ctx.player_mut(player);
        if state.active_pokemon.is_some() {
            return Err(EngineError::ActiveSlotOccupied(player));
        }
        if idx >= state.bench.len() {
            return Err(EngineError::InvalidBenchIndex(idx));
        }
        let slot = state.bench.remove(idx);
        let extra = json!({ "cardId": slot.card.card_id });
        state.active_pokemon = Some(slot);

        if game_match.state == MatchState::PlayerTurn
            && game_match.turn_phase == Some(TurnPhase::SelectActivePokemon)
            && !ctx.player1.needs_active_selection()
            && !ctx.player2.needs_active_selection()
        {
            game_match.set_phase(TurnPhase::End, now_ts)?;
        }

        Ok(vec![record_with(action, extra)])
    }
}

/// CONCEDE: матч отменяется с зафиксированной причиной.
struct ConcedeHandler;

impl<R: RandomSource> ActionHandler<R> for ConcedeHandler {
    fn resolve(
        &self,
        game_match: &mut Match,
        _ctx: &mut GameStateContext,
        action: &PlayerAction,
        _rng: &mut R,
        now_ts: u64,
    ) -> Result<Vec<ActionRecord>, EngineError> {
        let reason = action
            .data
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Игрок {:?} сдался", action.player));
        game_match.cancel(reason.clone(), now_ts)?;
        Ok(vec![record_with(action, json!({ "reason": reason }))])
    }
}
