// src/engine/game_loop.rs

//! Жизненный цикл матча поверх агрегата Match:
//!   - `run_deck_validation` – прогнать обе колоды через валидатор
//!   - `start_game` – монетка, перемешивание, раздача рук и призов
//!   - `set_initial_active` / `complete_setup` – стартовая расстановка
//!   - `apply_action` – проверить легальность действия и применить его
//!
//! Все функции синхронные и работают над переданными ссылками;
//! персистентность результата — забота вызывающего.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Deck, Match, MatchResult, MatchState, PlayerId, PlayerIdentifier, StartGameRules, Tournament,
    TurnPhase, WinCondition,
};
use crate::engine::actions::{PlayerAction, PlayerActionType};
use crate::engine::available::get_available_actions;
use crate::engine::dispatch::HandlerRegistry;
use crate::engine::errors::EngineError;
use crate::engine::game_state::GameStateContext;
use crate::engine::{flip_coin, CoinFace, RandomSource};
use crate::validation::{validate_deck, ValidationResult};

/// Статус матча после применения действия.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum MatchStatus {
    Ongoing,
    Finished {
        winner_id: Option<PlayerId>,
        result: Option<MatchResult>,
        win_condition: Option<WinCondition>,
    },
    Cancelled {
        reason: Option<String>,
    },
}

impl MatchStatus {
    pub fn of(game_match: &Match) -> Self {
        match game_match.state {
            MatchState::GameOver => MatchStatus::Finished {
                winner_id: game_match.winner_id,
                result: game_match.result,
                win_condition: game_match.win_condition,
            },
            MatchState::Cancelled => MatchStatus::Cancelled {
                reason: game_match.cancellation_reason.clone(),
            },
            _ => MatchStatus::Ongoing,
        }
    }
}

/// DECK_VALIDATION: обе колоды против правил турнира.
///
/// Выставляет `is_valid` на колодах (персистит их вызывающий).
/// Обе валидны → матч переходит в PRE_GAME_SETUP; иначе остаётся
/// в DECK_VALIDATION, а результаты возвращаются как данные.
pub fn run_deck_validation(
    game_match: &mut Match,
    deck1: &mut Deck,
    deck2: &mut Deck,
    tournament: &Tournament,
    now_ts: u64,
) -> Result<(ValidationResult, ValidationResult), EngineError> {
    if game_match.state != MatchState::DeckValidation {
        return Err(EngineError::WrongMatchState(game_match.state));
    }

    let result1 = validate_deck(deck1, tournament);
    let result2 = validate_deck(deck2, tournament);

    if result1.is_valid && result2.is_valid {
        game_match.decks_validated(now_ts)?;
    }
    Ok((result1, result2))
}

/// PRE_GAME_SETUP → INITIAL_SETUP: монетка на первого игрока,
/// перемешивание колод, раздача рук и призовых карт по StartGameRules.
/// Возвращает, кому выпало ходить первым, и собранный игровой контекст.
pub fn start_game<R: RandomSource>(
    game_match: &mut Match,
    deck1: &Deck,
    deck2: &Deck,
    rules: &StartGameRules,
    rng: &mut R,
    now_ts: u64,
) -> Result<(PlayerIdentifier, GameStateContext), EngineError> {
    if game_match.state != MatchState::PreGameSetup {
        return Err(EngineError::WrongMatchState(game_match.state));
    }
    if !deck1.is_valid {
        return Err(EngineError::DeckNotValid(PlayerIdentifier::Player1));
    }
    if !deck2.is_valid {
        return Err(EngineError::DeckNotValid(PlayerIdentifier::Player2));
    }

    // Раздача не должна молча недодавать призы, если мягкие правила
    // турнира пропустили слишком короткую колоду.
    let required = rules.initial_hand_size + rules.prize_card_count;
    for (player, deck) in [
        (PlayerIdentifier::Player1, &deck1),
        (PlayerIdentifier::Player2, &deck2),
    ] {
        let actual = deck.total_card_count();
        if actual < required {
            return Err(EngineError::DeckTooSmallToStart {
                player,
                required,
                actual,
            });
        }
    }

    let first_player = match flip_coin(rng) {
        CoinFace::Heads => PlayerIdentifier::Player1,
        CoinFace::Tails => PlayerIdentifier::Player2,
    };

    let mut ctx = GameStateContext::from_decks(deck1, deck2);
    for player in [PlayerIdentifier::Player1, PlayerIdentifier::Player2] {
        let state = ctx.player_mut(player);
        rng.shuffle(&mut state.deck);
        for _ in 0..rules.initial_hand_size {
            if let Some(card) = state.deck.pop() {
                state.hand.push(card);
            }
        }
        for _ in 0..rules.prize_card_count {
            if let Some(card) = state.deck.pop() {
                state.prizes.push(card);
            }
        }
    }

    game_match.begin_initial_setup(first_player, now_ts)?;
    Ok((first_player, ctx))
}

/// INITIAL_SETUP: выставить стартового активного покемона из руки.
pub fn set_initial_active(
    game_match: &Match,
    ctx: &mut GameStateContext,
    player: PlayerIdentifier,
    hand_index: usize,
) -> Result<(), EngineError> {
    if game_match.state != MatchState::InitialSetup {
        return Err(EngineError::WrongMatchState(game_match.state));
    }
    let state = ctx.player_mut(player);
    if state.active_pokemon.is_some() {
        return Err(EngineError::ActiveSlotOccupied(player));
    }
    if hand_index >= state.hand.len() {
        return Err(EngineError::InvalidHandIndex(hand_index));
    }
    let card = state.hand.remove(hand_index);
    state.active_pokemon = Some(crate::engine::game_state::PokemonSlot::new(card));
    Ok(())
}

/// INITIAL_SETUP → PLAYER_TURN: оба активных выставлены,
/// ходит first_player, фаза Draw.
pub fn complete_setup(
    game_match: &mut Match,
    ctx: &GameStateContext,
    now_ts: u64,
) -> Result<(), EngineError> {
    if game_match.state != MatchState::InitialSetup {
        return Err(EngineError::WrongMatchState(game_match.state));
    }
    for player in [PlayerIdentifier::Player1, PlayerIdentifier::Player2] {
        if ctx.player(player).active_pokemon.is_none() {
            return Err(EngineError::SetupIncomplete(player));
        }
    }
    game_match.begin_first_turn(now_ts)?;
    Ok(())
}

/// Применить действие игрока.
///
/// Порядок жёсткий:
/// 1) матч не терминален;
/// 2) очередность хода (вне SELECT_ACTIVE_POKEMON действует только
///    current_player; Concede может прислать любой);
/// 3) действие входит в набор доступных (см. available);
/// 4) резолвер из реестра применяет действие;
/// 5) возвращённые записи получают id и попадают в историю.
///
/// Одновременно к одному матчу можно применять только одно действие —
/// сериализацию по match_id обеспечивает вызывающий (см. MatchManager).
pub fn apply_action<R: RandomSource>(
    game_match: &mut Match,
    ctx: &mut GameStateContext,
    registry: &HandlerRegistry<R>,
    rng: &mut R,
    action: &PlayerAction,
    now_ts: u64,
) -> Result<MatchStatus, EngineError> {
    if game_match.state.is_terminal() {
        return Err(EngineError::MatchFinished);
    }

    if game_match.state == MatchState::PlayerTurn
        && action.action_type != PlayerActionType::Concede
    {
        let in_select_active = game_match.turn_phase == Some(TurnPhase::SelectActivePokemon);
        let is_current = game_match.current_player == Some(action.player);

        // В SELECT_ACTIVE_POKEMON защищающийся тоже действует
        // (SET_ACTIVE_POKEMON), но закрыть ход может только текущий игрок.
        if !in_select_active && !is_current {
            return Err(EngineError::NotPlayersTurn(action.player));
        }
        if in_select_active && action.action_type == PlayerActionType::EndTurn && !is_current {
            return Err(EngineError::NotPlayersTurn(action.player));
        }
    }

    let available =
        get_available_actions(game_match.state, game_match.turn_phase, ctx, action.player);
    if !available.contains(&action.action_type) {
        return Err(EngineError::ActionNotAllowed(action.action_type));
    }

    let handler = registry.get_handler(action.action_type)?;
    let records = handler.resolve(game_match, ctx, action, rng, now_ts)?;

    let mut next_id = ctx.action_history.len() as u64 + 1;
    for mut record in records {
        if record.action_id.is_none() {
            record.action_id = Some(next_id);
        }
        next_id += 1;
        ctx.push_action(record);
    }

    Ok(MatchStatus::of(game_match))
}
