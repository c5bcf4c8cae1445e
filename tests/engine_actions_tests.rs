// tests/engine_actions_tests.rs

//! Тесты диспетчеризации и резолверов действий:
//! - порядок проверок apply_action (терминальность, очередность,
//!   доступность, реестр)
//! - присвоение id записям истории
//! - сквозной цикл: атака → нокаут → приз → выбор активного → конец хода
//! - условия победы: deck-out, призы, отсутствие покемонов
//! - сдача в любой момент

use serde_json::json;

use tcg_match_engine::domain::{
    Match, MatchResult, MatchState, PlayerIdentifier, TurnPhase, WinCondition,
};
use tcg_match_engine::engine::{
    apply_action, default_registry, get_available_actions, EngineError, GameCard,
    GameStateContext, HandlerRegistry, MatchStatus, PlayerAction, PlayerActionType, PlayerState,
    PokemonSlot, RandomSource,
};

use PlayerActionType::*;
use PlayerIdentifier::{Player1, Player2};

const NOW: u64 = 1_700_000_000;

/// RNG-заглушка: shuffle ничего не делает, монетка всегда Heads.
struct IdentityRng;

impl RandomSource for IdentityRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

fn gcard(card_id: &str) -> GameCard {
    GameCard {
        card_id: card_id.to_string(),
        set_name: "base-set".to_string(),
    }
}

fn slot(card_id: &str) -> PokemonSlot {
    PokemonSlot::new(gcard(card_id))
}

/// Матч в PLAYER_TURN: оба игрока сели, колоды прошли валидацию,
/// первым ходит Player1, фаза Draw.
fn match_in_turn() -> Match {
    let mut m = Match::new(1, 1, NOW);
    m.join_player(100, 10, NOW).expect("место 1");
    m.join_player(200, 11, NOW).expect("место 2");
    m.decks_validated(NOW).expect("валидация");
    m.begin_initial_setup(Player1, NOW).expect("сетап");
    m.begin_first_turn(NOW).expect("первый ход");
    m
}

/// Контекст с активными покемонами, скамейками и небольшими колодами.
fn playable_ctx() -> GameStateContext {
    GameStateContext {
        last_action: None,
        action_history: Vec::new(),
        player1: PlayerState {
            deck: vec![gcard("bulbasaur-44"), gcard("charmander-46")],
            hand: vec![gcard("squirtle-63"), gcard("lightning-energy--94")],
            prizes: vec![gcard("prize-a"), gcard("prize-b")],
            discard: Vec::new(),
            active_pokemon: Some(slot("pikachu-25")),
            bench: vec![slot("raichu-14")],
        },
        player2: PlayerState {
            deck: vec![gcard("eevee-51")],
            hand: Vec::new(),
            prizes: vec![gcard("prize-c"), gcard("prize-d")],
            discard: Vec::new(),
            active_pokemon: Some(slot("scyther-10")),
            bench: vec![slot("pinsir-9")],
        },
    }
}

fn registry() -> HandlerRegistry<IdentityRng> {
    default_registry()
}

fn apply(
    m: &mut Match,
    ctx: &mut GameStateContext,
    action: PlayerAction,
) -> Result<MatchStatus, EngineError> {
    apply_action(m, ctx, &registry(), &mut IdentityRng, &action, NOW + 10)
}

#[test]
fn draw_card_moves_top_card_and_advances_phase() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();

    let status = apply(&mut m, &mut ctx, PlayerAction::new(Player1, DrawCard)).expect("взятие");

    assert_eq!(status, MatchStatus::Ongoing);
    assert_eq!(m.turn_phase, Some(TurnPhase::MainPhase));
    // Верхняя карта — конец вектора.
    assert_eq!(ctx.player1.deck.len(), 1);
    assert_eq!(ctx.player1.hand.last().map(|c| c.card_id.as_str()), Some("charmander-46"));

    // Запись в истории: id = 1, карта зафиксирована в payload.
    assert_eq!(ctx.action_history.len(), 1);
    let record = &ctx.action_history[0];
    assert_eq!(record.action_id, Some(1));
    assert_eq!(record.data["cardId"], json!("charmander-46"));
}

#[test]
fn action_ids_are_assigned_sequentially() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();

    apply(&mut m, &mut ctx, PlayerAction::new(Player1, DrawCard)).expect("взятие");
    m.set_phase(TurnPhase::End, NOW).expect("фаза");
    apply(&mut m, &mut ctx, PlayerAction::new(Player1, EndTurn)).expect("конец хода");

    let ids: Vec<_> = ctx.action_history.iter().map(|r| r.action_id).collect();
    assert_eq!(ids, vec![Some(1), Some(2)]);
    assert_eq!(ctx.last_action.as_ref().and_then(|r| r.action_id), Some(2));
}

#[test]
fn drawing_from_empty_deck_is_deck_out() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    ctx.player1.deck.clear();

    let status = apply(&mut m, &mut ctx, PlayerAction::new(Player1, DrawCard)).expect("взятие");

    assert_eq!(m.state, MatchState::GameOver);
    assert_eq!(
        status,
        MatchStatus::Finished {
            winner_id: Some(200),
            result: Some(MatchResult::Player2Win),
            win_condition: Some(WinCondition::DeckOut),
        }
    );
}

#[test]
fn acting_out_of_turn_is_rejected() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();

    let err = apply(&mut m, &mut ctx, PlayerAction::new(Player2, DrawCard)).unwrap_err();
    assert!(matches!(err, EngineError::NotPlayersTurn(Player2)));
    assert!(ctx.action_history.is_empty());
}

#[test]
fn unavailable_action_is_rejected_before_resolution() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();

    // Attack в фазе Draw недоступна.
    let err = apply(&mut m, &mut ctx, PlayerAction::new(Player1, Attack)).unwrap_err();
    assert!(matches!(err, EngineError::ActionNotAllowed(Attack)));
    assert_eq!(m.turn_phase, Some(TurnPhase::Draw));
}

#[test]
fn terminal_match_rejects_any_action() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.cancel("тест", NOW).expect("отмена");

    let err = apply(&mut m, &mut ctx, PlayerAction::new(Player1, Concede)).unwrap_err();
    assert!(matches!(err, EngineError::MatchFinished));
}

#[test]
fn missing_handler_is_a_registry_error() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    let empty: HandlerRegistry<IdentityRng> = HandlerRegistry::new();

    let err = apply_action(
        &mut m,
        &mut ctx,
        &empty,
        &mut IdentityRng,
        &PlayerAction::new(Player1, DrawCard),
        NOW,
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::UnregisteredHandler(DrawCard)));
}

#[test]
fn play_pokemon_prefers_empty_active_slot() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::MainPhase, NOW).expect("фаза");

    // Активный занят — карта идёт на скамейку.
    let action = PlayerAction::with_data(
        Player1,
        PlayPokemon,
        json!({ "setName": "base-set", "cardId": "squirtle-63" }),
    );
    apply(&mut m, &mut ctx, action).expect("покемон сыгран");

    assert_eq!(ctx.player1.bench.len(), 2);
    assert_eq!(ctx.player1.bench[1].card.card_id, "squirtle-63");
    assert_eq!(ctx.action_history[0].data["toActive"], json!(false));
    assert!(!ctx.player1.hand.iter().any(|c| c.card_id == "squirtle-63"));
}

#[test]
fn playing_card_not_in_hand_fails() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::MainPhase, NOW).expect("фаза");

    let action = PlayerAction::with_data(
        Player1,
        PlayPokemon,
        json!({ "setName": "base-set", "cardId": "mewtwo-10" }),
    );
    let err = apply(&mut m, &mut ctx, action).unwrap_err();
    assert!(matches!(err, EngineError::CardNotInHand { .. }));

    // Без payload — другая ошибка, ещё до поиска в руке.
    let bare = PlayerAction::new(Player1, PlayPokemon);
    let err = apply(&mut m, &mut ctx, bare).unwrap_err();
    assert!(matches!(err, EngineError::MissingActionData("setName")));
}

#[test]
fn attach_energy_to_active_and_bench() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::MainPhase, NOW).expect("фаза");

    // Без benchIndex — на активного.
    let action = PlayerAction::with_data(
        Player1,
        AttachEnergy,
        json!({ "setName": "base-set", "cardId": "lightning-energy--94" }),
    );
    apply(&mut m, &mut ctx, action).expect("энергия прикреплена");
    let active = ctx.player1.active_pokemon.as_ref().expect("активный есть");
    assert_eq!(active.energy.len(), 1);

    // Несуществующий слот скамейки — ошибка.
    ctx.player1.hand.push(gcard("fire-energy--98"));
    let bad = PlayerAction::with_data(
        Player1,
        AttachEnergy,
        json!({ "setName": "base-set", "cardId": "fire-energy--98", "benchIndex": 5 }),
    );
    let err = apply(&mut m, &mut ctx, bad).unwrap_err();
    assert!(matches!(err, EngineError::InvalidBenchIndex(5)));
}

#[test]
fn play_trainer_goes_to_discard() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::MainPhase, NOW).expect("фаза");
    ctx.player1.hand.push(gcard("potion-94"));

    let action = PlayerAction::with_data(
        Player1,
        PlayTrainer,
        json!({ "setName": "base-set", "cardId": "potion-94" }),
    );
    apply(&mut m, &mut ctx, action).expect("тренер сыгран");

    assert_eq!(ctx.player1.discard.len(), 1);
    assert_eq!(ctx.player1.discard[0].card_id, "potion-94");
}

#[test]
fn evolve_replaces_slot_card_and_discards_previous() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::MainPhase, NOW).expect("фаза");
    ctx.player1.hand.push(gcard("raichu-14"));

    let action = PlayerAction::with_data(
        Player1,
        EvolvePokemon,
        json!({ "setName": "base-set", "cardId": "raichu-14" }),
    );
    apply(&mut m, &mut ctx, action).expect("эволюция");

    let active = ctx.player1.active_pokemon.as_ref().expect("активный есть");
    assert_eq!(active.card.card_id, "raichu-14");
    assert!(ctx.player1.discard.iter().any(|c| c.card_id == "pikachu-25"));
    assert_eq!(ctx.action_history[0].data["evolvedFrom"], json!("pikachu-25"));
}

#[test]
fn retreat_swaps_active_with_bench_slot() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::MainPhase, NOW).expect("фаза");

    let action = PlayerAction::with_data(Player1, Retreat, json!({ "benchIndex": 0 }));
    apply(&mut m, &mut ctx, action).expect("отступление");

    assert_eq!(
        ctx.player1.active_pokemon.as_ref().map(|s| s.card.card_id.as_str()),
        Some("raichu-14")
    );
    assert_eq!(ctx.player1.bench[0].card.card_id, "pikachu-25");
}

#[test]
fn attack_with_coin_flip_parks_turn_in_attack_phase() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::MainPhase, NOW).expect("фаза");

    let declare = PlayerAction::with_data(Player1, Attack, json!({ "requiresCoinFlip": true }));
    apply(&mut m, &mut ctx, declare).expect("атака объявлена");

    assert_eq!(m.turn_phase, Some(TurnPhase::Attack));
    assert_eq!(ctx.action_history[0].data["declared"], json!(true));

    // В фазе Attack доступен бросок монетки; IdentityRng даёт HEADS.
    let flip = apply(&mut m, &mut ctx, PlayerAction::new(Player1, GenerateCoinFlip));
    assert_eq!(flip.expect("бросок"), MatchStatus::Ongoing);
    assert_eq!(ctx.action_history[1].data["result"], json!("HEADS"));
    assert_eq!(m.turn_phase, Some(TurnPhase::Attack));
}

#[test]
fn knockout_attack_prize_and_new_active_full_cycle() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::MainPhase, NOW).expect("фаза");
    ctx.player2.active_pokemon.as_mut().expect("активный").energy.push(gcard("grass-energy--99"));

    // Атака с нокаутом: активный защищающегося и его энергия в сброс.
    let attack = PlayerAction::with_data(Player1, Attack, json!({ "isKnockedOut": true }));
    apply(&mut m, &mut ctx, attack).expect("атака");

    assert_eq!(m.turn_phase, Some(TurnPhase::End));
    assert!(ctx.player2.active_pokemon.is_none());
    assert!(ctx.player2.discard.iter().any(|c| c.card_id == "scyther-10"));
    assert!(ctx.player2.discard.iter().any(|c| c.card_id == "grass-energy--99"));

    // Приз не выбран — END_TURN недоступен.
    let actions = get_available_actions(m.state, m.turn_phase, &ctx, Player1);
    assert!(actions.contains(&SelectPrize));
    assert!(!actions.contains(&EndTurn));

    // Забираем приз по индексу; сопернику нужен выбор активного.
    let prize = PlayerAction::with_data(Player1, SelectPrize, json!({ "prizeIndex": 1 }));
    apply(&mut m, &mut ctx, prize).expect("приз");
    assert_eq!(m.turn_phase, Some(TurnPhase::SelectActivePokemon));
    assert!(ctx.player1.hand.iter().any(|c| c.card_id == "prize-b"));
    assert_eq!(ctx.player1.prizes.len(), 1);
    assert_eq!(ctx.action_history[1].prize_index(), Some(1));

    // Защищающийся (не текущий игрок) поднимает покемона со скамейки.
    let set_active = PlayerAction::with_data(Player2, SetActivePokemon, json!({ "benchIndex": 0 }));
    apply(&mut m, &mut ctx, set_active).expect("новый активный");
    assert_eq!(
        ctx.player2.active_pokemon.as_ref().map(|s| s.card.card_id.as_str()),
        Some("pinsir-9")
    );
    assert_eq!(ctx.action_history[2].bench_index(), Some(0));
    // Выбор больше никому не нужен — фаза вернулась в End.
    assert_eq!(m.turn_phase, Some(TurnPhase::End));

    // Теперь ход можно закрыть; он переходит сопернику.
    apply(&mut m, &mut ctx, PlayerAction::new(Player1, EndTurn)).expect("конец хода");
    assert_eq!(m.current_player, Some(Player2));
    assert_eq!(m.turn_phase, Some(TurnPhase::Draw));
    assert_eq!(m.turn_number, 2);
}

#[test]
fn defender_cannot_end_turn_during_active_selection() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::SelectActivePokemon, NOW).expect("фаза");
    ctx.player2.active_pokemon = None;

    let err = apply(&mut m, &mut ctx, PlayerAction::new(Player2, EndTurn)).unwrap_err();
    assert!(matches!(err, EngineError::NotPlayersTurn(Player2)));
}

#[test]
fn last_prize_wins_the_match() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::MainPhase, NOW).expect("фаза");
    ctx.player1.prizes = vec![gcard("prize-last")];

    let attack = PlayerAction::with_data(Player1, Attack, json!({ "isKnockedOut": true }));
    apply(&mut m, &mut ctx, attack).expect("атака");
    // Скамейка у защищающегося непуста, так что матч ещё идёт.
    assert_eq!(m.state, MatchState::PlayerTurn);
    assert_eq!(m.turn_phase, Some(TurnPhase::End));

    let status = apply(&mut m, &mut ctx, PlayerAction::new(Player1, DrawPrize)).expect("приз");

    assert_eq!(
        status,
        MatchStatus::Finished {
            winner_id: Some(100),
            result: Some(MatchResult::Player1Win),
            win_condition: Some(WinCondition::PrizesExhausted),
        }
    );
    assert!(ctx.player1.hand.iter().any(|c| c.card_id == "prize-last"));
}

#[test]
fn knockout_with_empty_bench_ends_the_match() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::MainPhase, NOW).expect("фаза");
    ctx.player2.bench.clear();

    let attack = PlayerAction::with_data(Player1, Attack, json!({ "isKnockedOut": true }));
    let status = apply(&mut m, &mut ctx, attack).expect("атака");

    assert_eq!(
        status,
        MatchStatus::Finished {
            winner_id: Some(100),
            result: Some(MatchResult::Player1Win),
            win_condition: Some(WinCondition::NoPokemonLeft),
        }
    );
}

#[test]
fn self_knockout_discards_attacker_active_too() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::MainPhase, NOW).expect("фаза");

    let attack = PlayerAction::with_data(
        Player1,
        Attack,
        json!({ "isKnockedOut": true, "isSelfKnockedOut": true }),
    );
    apply(&mut m, &mut ctx, attack).expect("атака");

    assert!(ctx.player1.active_pokemon.is_none());
    assert!(ctx.player1.discard.iter().any(|c| c.card_id == "pikachu-25"));
    assert!(ctx.player2.active_pokemon.is_none());
    assert_eq!(m.turn_phase, Some(TurnPhase::End));
}

#[test]
fn set_active_validates_slot_and_bench_index() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();
    m.set_phase(TurnPhase::SelectActivePokemon, NOW).expect("фаза");
    ctx.player2.active_pokemon = None;

    // Индекс за пределами скамейки.
    let err = apply(
        &mut m,
        &mut ctx,
        PlayerAction::with_data(Player2, SetActivePokemon, json!({ "benchIndex": 3 })),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidBenchIndex(3)));

    // Активный слот уже занят.
    let err = apply(
        &mut m,
        &mut ctx,
        PlayerAction::with_data(Player1, SetActivePokemon, json!({ "benchIndex": 0 })),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::ActiveSlotOccupied(Player1)));
}

#[test]
fn concede_cancels_match_from_either_side() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();

    // Сдаётся не текущий игрок — это разрешено.
    let concede = PlayerAction::with_data(Player2, Concede, json!({ "reason": "время вышло" }));
    let status = apply(&mut m, &mut ctx, concede).expect("сдача");

    assert_eq!(m.state, MatchState::Cancelled);
    assert_eq!(
        status,
        MatchStatus::Cancelled {
            reason: Some("время вышло".to_string()),
        }
    );
    // После отмены действий не осталось вовсе.
    assert!(get_available_actions(m.state, m.turn_phase, &ctx, Player1).is_empty());
}

#[test]
fn concede_without_reason_records_default_one() {
    let mut m = match_in_turn();
    let mut ctx = playable_ctx();

    apply(&mut m, &mut ctx, PlayerAction::new(Player1, Concede)).expect("сдача");

    let reason = m.cancellation_reason.as_deref().expect("причина есть");
    assert!(reason.contains("Player1"));
    assert_eq!(ctx.action_history[0].data["reason"], json!(reason));
}
