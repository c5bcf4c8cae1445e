// src/bin/match_dev_cli.rs

//! Dev-CLI: прогоняет один матч от лобби до конца по скрипту.
//! Удобно для дымовой проверки движка без тестового раннера.

use tcg_match_engine::api::{ApiService, Command, CommandOutcome, Query, QueryResponse};
use tcg_match_engine::api::commands::{CreateMatchCommand, JoinMatchCommand};
use tcg_match_engine::domain::{
    Deck, DeckCard, DeckRules, PlayerIdentifier, Tournament, TournamentStatus,
};
use tcg_match_engine::engine::{PlayerAction, PlayerActionType};
use tcg_match_engine::infra::{DeckRepository, DeterministicRng, InMemoryStorage, TournamentRepository};

/// Колода: 4 покемона-заглушки по 4 копии + базовая энергия до 60.
fn make_deck(id: u64, owner: u64, name: &str) -> Deck {
    let mut deck = Deck::new(id, name, owner, 1_700_000_000);
    for n in 1..=11 {
        deck.add_card(
            DeckCard::new(format!("pikachu-{}", n), "base-set", 4).expect("валидная карта"),
            1_700_000_000,
        );
    }
    deck.add_card(
        DeckCard::new("lightning-energy--94", "base-set", 16).expect("валидная карта"),
        1_700_000_000,
    );
    deck
}

fn main() {
    println!("=== MATCH DEV CLI ===\n");

    let now = 1_700_000_100;
    let mut storage = InMemoryStorage::new();

    let tournament = {
        let mut t = Tournament::new(1, "Dev League", "dev", "standard", DeckRules::standard_60(), now)
            .expect("валидный турнир");
        t.set_status(TournamentStatus::Active, now);
        t
    };
    storage.save_tournament(&tournament);
    storage.save_deck(&make_deck(10, 100, "Deck P1"));
    storage.save_deck(&make_deck(11, 200, "Deck P2"));

    let mut service = ApiService::new(storage, DeterministicRng::from_seed(7));

    let match_id = match service
        .execute(Command::CreateMatch(CreateMatchCommand { tournament_id: 1 }), now)
        .expect("матч создаётся")
    {
        CommandOutcome::MatchCreated { match_id } => match_id,
        other => panic!("неожиданный ответ: {:?}", other),
    };
    println!("Матч создан: id={}", match_id);

    for (player_id, deck_id) in [(100u64, 10u64), (200, 11)] {
        let outcome = service
            .execute(
                Command::JoinMatch(JoinMatchCommand {
                    match_id,
                    player_id,
                    deck_id,
                }),
                now,
            )
            .expect("игрок садится");
        println!("Игрок {} сел: {:?}", player_id, outcome);
    }

    let outcome = service
        .execute(Command::ValidateDecks { match_id }, now)
        .expect("валидация проходит");
    println!("\nВалидация колод: {}", serde_json::to_string_pretty(&outcome).unwrap());

    let first_player = match service
        .execute(Command::StartGame { match_id }, now)
        .expect("старт партии")
    {
        CommandOutcome::GameStarted { first_player } => first_player,
        other => panic!("неожиданный ответ: {:?}", other),
    };
    println!("Первым ходит: {:?}", first_player);

    for player in [PlayerIdentifier::Player1, PlayerIdentifier::Player2] {
        service
            .execute(
                Command::SetInitialActive {
                    match_id,
                    player,
                    hand_index: 0,
                },
                now,
            )
            .expect("стартовый активный");
    }
    service
        .execute(Command::CompleteSetup { match_id }, now)
        .expect("сетап завершён");

    // Первый ход по шагам: взять карту, закрыть ход, и так два круга.
    let mut current = first_player;
    for turn in 1..=4 {
        if let QueryResponse::AvailableActions(actions) = service
            .query(Query::AvailableActions {
                match_id,
                player: current,
            })
            .expect("запрос доступных действий")
        {
            println!("\nХод {}: {:?} может {:?}", turn, current, actions);
        }

        for action_type in [PlayerActionType::DrawCard, PlayerActionType::EndTurn] {
            service
                .execute(
                    Command::SubmitAction {
                        match_id,
                        action: PlayerAction::new(current, action_type),
                    },
                    now + turn,
                )
                .expect("действие применяется");
        }
        current = current.opponent();
    }

    // Снимаем итоговое состояние матча.
    if let QueryResponse::Match(m) = service
        .query(Query::GetMatch { match_id })
        .expect("матч читается")
    {
        println!(
            "\nИтог: state={:?}, phase={:?}, ход №{}, текущий {:?}",
            m.state, m.turn_phase, m.turn_number, m.current_player
        );
    }
}
