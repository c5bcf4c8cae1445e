// src/api/service.rs

use crate::api::commands::{Command, CommandOutcome};
use crate::api::errors::ApiError;
use crate::api::queries::{Query, QueryResponse};
use crate::domain::{Match, MatchId, StartGameRules};
use crate::engine::available::get_available_actions;
use crate::engine::dispatch::HandlerRegistry;
use crate::engine::game_loop::{
    apply_action, complete_setup, run_deck_validation, set_initial_active, start_game,
};
use crate::engine::game_state::GameStateContext;
use crate::engine::handlers::default_registry;
use crate::engine::RandomSource;
use crate::infra::ids::IdGenerator;
use crate::infra::persistence::{DeckRepository, MatchRepository, TournamentRepository};

/// Синхронный сервис над хранилищем.
///
/// Контракт конкурентности ядра живёт здесь: все команды идут через
/// `&mut self`, то есть к одному матчу в один момент применяется не
/// больше одного действия. Запросы (`query`) читают без блокировок.
pub struct ApiService<S, R>
where
    S: MatchRepository + DeckRepository + TournamentRepository,
    R: RandomSource,
{
    storage: S,
    registry: HandlerRegistry<R>,
    rng: R,
    ids: IdGenerator,
    start_rules: StartGameRules,
}

impl<S, R> ApiService<S, R>
where
    S: MatchRepository + DeckRepository + TournamentRepository,
    R: RandomSource,
{
    /// Сервис со штатным реестром резолверов и стандартными
    /// правилами старта (7 карт в руку, 6 призов).
    pub fn new(storage: S, rng: R) -> Self {
        Self {
            storage,
            registry: default_registry(),
            rng,
            ids: IdGenerator::new(),
            start_rules: StartGameRules::standard(),
        }
    }

    pub fn with_start_rules(mut self, rules: StartGameRules) -> Self {
        self.start_rules = rules;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    fn load_match(&self, match_id: MatchId) -> Result<Match, ApiError> {
        self.storage
            .load_match(match_id)
            .ok_or(ApiError::MatchNotFound(match_id))
    }

    fn load_game_state(&self, match_id: MatchId) -> Result<GameStateContext, ApiError> {
        self.storage
            .load_game_state(match_id)
            .ok_or(ApiError::NoGameState(match_id))
    }

    /// Выполнить команду. Состояние сохраняется после применения —
    /// транзакционность границы save'ов обеспечивает реализация хранилища.
    pub fn execute(&mut self, command: Command, now_ts: u64) -> Result<CommandOutcome, ApiError> {
        match command {
            Command::CreateMatch(cmd) => {
                if !self.storage.tournament_exists(cmd.tournament_id) {
                    return Err(ApiError::TournamentNotFound(cmd.tournament_id));
                }
                let game_match =
                    Match::new(self.ids.next_match_id(), cmd.tournament_id, now_ts);
                self.storage.save_match(&game_match);
                Ok(CommandOutcome::MatchCreated {
                    match_id: game_match.id,
                })
            }

            Command::JoinMatch(cmd) => {
                let mut game_match = self.load_match(cmd.match_id)?;
                if !self.storage.deck_exists(cmd.deck_id) {
                    return Err(ApiError::DeckNotFound(cmd.deck_id));
                }
                let seat = game_match.join_player(cmd.player_id, cmd.deck_id, now_ts)?;
                self.storage.save_match(&game_match);
                Ok(CommandOutcome::PlayerJoined { seat })
            }

            Command::ValidateDecks { match_id } => {
                let mut game_match = self.load_match(match_id)?;
                let (deck1_id, deck2_id) = match (
                    game_match.player1_deck_id,
                    game_match.player2_deck_id,
                ) {
                    (Some(d1), Some(d2)) => (d1, d2),
                    _ => return Err(ApiError::DecksNotAssigned(match_id)),
                };
                let mut deck1 = self
                    .storage
                    .load_deck(deck1_id)
                    .ok_or(ApiError::DeckNotFound(deck1_id))?;
                let mut deck2 = self
                    .storage
                    .load_deck(deck2_id)
                    .ok_or(ApiError::DeckNotFound(deck2_id))?;
                let tournament = self
                    .storage
                    .load_tournament(game_match.tournament_id)
                    .ok_or(ApiError::TournamentNotFound(game_match.tournament_id))?;

                let (result1, result2) = run_deck_validation(
                    &mut game_match,
                    &mut deck1,
                    &mut deck2,
                    &tournament,
                    now_ts,
                )?;

                let passed = result1.is_valid && result2.is_valid;
                self.storage.save_deck(&deck1);
                self.storage.save_deck(&deck2);
                self.storage.save_match(&game_match);
                Ok(CommandOutcome::DecksValidated {
                    player1: result1,
                    player2: result2,
                    passed,
                })
            }

            Command::StartGame { match_id } => {
                let mut game_match = self.load_match(match_id)?;
                let (deck1_id, deck2_id) = match (
                    game_match.player1_deck_id,
                    game_match.player2_deck_id,
                ) {
                    (Some(d1), Some(d2)) => (d1, d2),
                    _ => return Err(ApiError::DecksNotAssigned(match_id)),
                };
                let deck1 = self
                    .storage
                    .load_deck(deck1_id)
                    .ok_or(ApiError::DeckNotFound(deck1_id))?;
                let deck2 = self
                    .storage
                    .load_deck(deck2_id)
                    .ok_or(ApiError::DeckNotFound(deck2_id))?;

                let (first_player, ctx) = start_game(
                    &mut game_match,
                    &deck1,
                    &deck2,
                    &self.start_rules,
                    &mut self.rng,
                    now_ts,
                )?;

                self.storage.save_match(&game_match);
                self.storage.save_game_state(match_id, Some(ctx));
                Ok(CommandOutcome::GameStarted { first_player })
            }

            Command::SetInitialActive {
                match_id,
                player,
                hand_index,
            } => {
                let game_match = self.load_match(match_id)?;
                let mut ctx = self.load_game_state(match_id)?;
                set_initial_active(&game_match, &mut ctx, player, hand_index)?;
                self.storage.save_game_state(match_id, Some(ctx));
                Ok(CommandOutcome::Ack)
            }

            Command::CompleteSetup { match_id } => {
                let mut game_match = self.load_match(match_id)?;
                let ctx = self.load_game_state(match_id)?;
                complete_setup(&mut game_match, &ctx, now_ts)?;
                self.storage.save_match(&game_match);
                Ok(CommandOutcome::Ack)
            }

            Command::SubmitAction { match_id, action } => {
                let mut game_match = self.load_match(match_id)?;
                // До старта партии контекста нет, но Concede легален в любом
                // нетерминальном состоянии — подставляем пустой, как в
                // Query::AvailableActions. Остальное отсечёт проверка
                // доступности внутри apply_action.
                let mut ctx = self
                    .storage
                    .load_game_state(match_id)
                    .unwrap_or_default();
                let status = apply_action(
                    &mut game_match,
                    &mut ctx,
                    &self.registry,
                    &mut self.rng,
                    &action,
                    now_ts,
                )?;
                self.storage.save_match(&game_match);
                self.storage.save_game_state(match_id, Some(ctx));
                Ok(CommandOutcome::ActionApplied { status })
            }

            Command::CancelMatch { match_id, reason } => {
                let mut game_match = self.load_match(match_id)?;
                game_match.cancel(reason, now_ts)?;
                self.storage.save_match(&game_match);
                Ok(CommandOutcome::Ack)
            }
        }
    }

    /// Выполнить read-only запрос.
    pub fn query(&self, query: Query) -> Result<QueryResponse, ApiError> {
        match query {
            Query::GetMatch { match_id } => {
                Ok(QueryResponse::Match(Box::new(self.load_match(match_id)?)))
            }

            Query::GetGameState { match_id } => Ok(QueryResponse::GameState(Box::new(
                self.load_game_state(match_id)?,
            ))),

            Query::AvailableActions { match_id, player } => {
                let game_match = self.load_match(match_id)?;
                // До старта партии контекста нет — предигровым
                // провайдерам хватает пустого.
                let ctx = self
                    .storage
                    .load_game_state(match_id)
                    .unwrap_or_default();
                Ok(QueryResponse::AvailableActions(get_available_actions(
                    game_match.state,
                    game_match.turn_phase,
                    &ctx,
                    player,
                )))
            }

            Query::GetDeck { deck_id } => {
                let deck = self
                    .storage
                    .load_deck(deck_id)
                    .ok_or(ApiError::DeckNotFound(deck_id))?;
                Ok(QueryResponse::Deck(Box::new(deck)))
            }

            Query::GetTournament { tournament_id } => {
                let tournament = self
                    .storage
                    .load_tournament(tournament_id)
                    .ok_or(ApiError::TournamentNotFound(tournament_id))?;
                Ok(QueryResponse::Tournament(Box::new(tournament)))
            }

            Query::ListMatches { tournament_id } => {
                Ok(QueryResponse::Matches(self.storage.list_matches(tournament_id)))
            }
        }
    }
}
