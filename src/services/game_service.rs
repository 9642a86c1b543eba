use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::game::Game;
use crate::models::player::Player;
use crate::models::quest::{Quest, QuestOutcome};
use crate::models::role::Role;
use crate::models::rule::RULES;
use crate::state::AppState;
use crate::store::Table;

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub names: Vec<String>,
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GameCreated {
    pub id: String,
    pub players: Vec<Player>,
    pub quests: Vec<Quest>,
}

/// Public view of a quest: vote count only, voter ids never leave the
/// record.
#[derive(Debug, Serialize)]
pub struct QuestView {
    pub required_travelers: usize,
    pub required_fails: usize,
    pub travelers: Vec<String>,
    pub nb_votes: usize,
    pub outcome: Option<QuestOutcome>,
}

#[derive(Debug, Serialize)]
pub struct BoardView {
    pub current_player_id: String,
    pub current_quest: usize,
    pub missions_unsent: u32,
    pub quests: Vec<QuestView>,
    pub result: Option<crate::models::game::GameResult>,
}

#[derive(Debug, Serialize)]
pub struct VotesView {
    pub votes: Vec<bool>,
    pub outcome: Option<QuestOutcome>,
}

/// Assigns roles, persists the players, then the game. The starting
/// proposer seat is drawn uniformly.
pub async fn create_game(state: &AppState, req: CreateGameRequest) -> Result<GameCreated> {
    let row = RULES.lookup(req.names.len())?;
    let players = crate::services::role_service::assign_roles(&req.names, &req.roles, row)?;

    for player in &players {
        let record = serde_json::to_value(player)
            .map_err(|e| Error::BadRequest(format!("unserializable player: {}", e)))?;
        state.store.insert(Table::Players, record).await?;
    }

    let starting_index = thread_rng().gen_range(0..players.len());
    let ids = players.iter().map(|p| p.id.clone()).collect();
    let game = Game::new(ids, starting_index, row);
    state.save_game(&game).await?;

    log::info!(
        "created game {} with {} players, starting seat {}",
        game.id,
        players.len(),
        starting_index
    );
    Ok(GameCreated {
        id: game.id,
        players,
        quests: game.quests,
    })
}

pub async fn list_games(state: &AppState) -> Result<Vec<Value>> {
    state.store.list(Table::Games).await
}

pub async fn list_players(state: &AppState) -> Result<Vec<Value>> {
    state.store.list(Table::Players).await
}

pub async fn get_game(state: &AppState, game_id: &str) -> Result<Game> {
    state.load_game(game_id).await
}

pub async fn board(state: &AppState, game_id: &str) -> Result<BoardView> {
    // Single snapshot read; never assembled field by field.
    let game = state.load_game(game_id).await?;
    Ok(board_view(&game))
}

fn board_view(game: &Game) -> BoardView {
    BoardView {
        current_player_id: game.current_player_id.clone(),
        current_quest: game.current_quest,
        missions_unsent: game.missions_unsent,
        quests: game
            .quests
            .iter()
            .map(|q| QuestView {
                required_travelers: q.required_travelers,
                required_fails: q.required_fails,
                travelers: q.travelers.clone(),
                nb_votes: q.votes.len(),
                outcome: q.outcome,
            })
            .collect(),
        result: game.result.clone(),
    }
}

/// The current proposer names a full roster for the current quest.
pub async fn propose_team(
    state: &AppState,
    game_id: &str,
    travelers: Vec<String>,
) -> Result<BoardView> {
    let lock = state.game_lock(game_id).await;
    let _guard = lock.lock().await;

    let mut game = state.load_game(game_id).await?;
    for traveler in &travelers {
        if !game.has_player(traveler) {
            return Err(Error::PlayerNotInGame(traveler.clone()));
        }
    }
    game.propose_team(travelers)?;
    state.save_game(&game).await?;
    Ok(board_view(&game))
}

pub async fn record_vote(
    state: &AppState,
    game_id: &str,
    player_id: &str,
    vote: bool,
) -> Result<Game> {
    let lock = state.game_lock(game_id).await;
    let _guard = lock.lock().await;

    let mut game = state.load_game(game_id).await?;
    if !game.has_player(player_id) {
        return Err(Error::PlayerNotInGame(player_id.to_string()));
    }
    game.record_vote(player_id, vote)?;
    state.save_game(&game).await?;
    Ok(game)
}

pub async fn unsend_mission(state: &AppState, game_id: &str) -> Result<BoardView> {
    let lock = state.game_lock(game_id).await;
    let _guard = lock.lock().await;

    let mut game = state.load_game(game_id).await?;
    game.unsend_mission()?;
    state.save_game(&game).await?;
    Ok(board_view(&game))
}

/// Vote booleans for one quest, shuffled on every call so a vote can never
/// be traced back to its submission slot.
pub async fn get_votes(
    state: &AppState,
    game_id: &str,
    quest_number: Option<usize>,
) -> Result<VotesView> {
    let game = state.load_game(game_id).await?;
    let number = match quest_number {
        Some(n) if (1..=game.quests.len()).contains(&n) => n,
        Some(n) => {
            return Err(Error::BadRequest(format!(
                "quest number {} out of range (1 to {})",
                n,
                game.quests.len()
            )))
        }
        // Default to the most recently resolved quest.
        None => game
            .quests
            .iter()
            .rposition(|q| q.outcome.is_some())
            .map(|i| i + 1)
            .unwrap_or(game.current_quest.min(game.quests.len())),
    };
    let quest = &game.quests[number - 1];
    let mut votes: Vec<bool> = quest.votes.iter().map(|(_, vote)| *vote).collect();
    votes.shuffle(&mut thread_rng());
    Ok(VotesView {
        votes,
        outcome: quest.outcome,
    })
}

/// Terminal step after a blue win: the assassin names one player. Hitting
/// Merlin hands the game to the red team.
pub async fn guess_merlin(
    state: &AppState,
    game_id: &str,
    payload: HashMap<String, String>,
) -> Result<Game> {
    if payload.len() != 1 {
        return Err(Error::BadRequest(
            "exactly one guess required ('assassin_id': 'guessed_player_id')".into(),
        ));
    }
    let (assassin_id, guessed_id) = payload.into_iter().next().expect("len checked above");

    let lock = state.game_lock(game_id).await;
    let _guard = lock.lock().await;

    let mut game = state.load_game(game_id).await?;
    if !game.has_player(&assassin_id) {
        return Err(Error::PlayerNotInGame(assassin_id));
    }
    if !game.has_player(&guessed_id) {
        return Err(Error::PlayerNotInGame(guessed_id));
    }

    let assassin = state.load_player(&assassin_id).await?;
    if assassin.role != Role::Assassin {
        return Err(Error::NotAssassin(assassin_id));
    }

    let result = game.result.as_mut().ok_or(Error::ResultNotEstablished)?;
    if !result.status {
        return Err(Error::GameNotWonByBlue);
    }
    if result.guess_merlin_id.is_some() {
        return Err(Error::GuessAlreadyMade);
    }

    let guessed = state.load_player(&guessed_id).await?;
    result.guess_merlin_id = Some(guessed_id);
    if guessed.role == Role::Merlin {
        result.status = false;
        log::info!("game {}: assassin found merlin, red team wins", game.id);
    } else {
        log::info!("game {}: assassin missed merlin, blue win stands", game.id);
    }

    state.save_game(&game).await?;
    Ok(game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::Team;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("name{}", i)).collect()
    }

    async fn new_game(state: &AppState, n: usize) -> GameCreated {
        create_game(
            state,
            CreateGameRequest {
                names: names(n),
                roles: vec![],
            },
        )
        .await
        .unwrap()
    }

    /// Drives the current quest to the given outcome with the fewest fail
    /// votes possible.
    async fn run_quest(state: &AppState, created: &GameCreated, fail: bool) -> Game {
        let game = state.load_game(&created.id).await.unwrap();
        let quest = &game.quests[game.current_quest - 1];
        let wanted = quest.required_travelers;
        let fails = if fail { quest.required_fails } else { 0 };
        let travelers: Vec<String> = game.players[..wanted].to_vec();
        propose_team(state, &created.id, travelers.clone())
            .await
            .unwrap();
        let mut updated = game;
        for (i, id) in travelers.iter().enumerate() {
            updated = record_vote(state, &created.id, id, i >= fails).await.unwrap();
        }
        updated
    }

    #[tokio::test]
    async fn create_game_persists_players_and_game() {
        let state = AppState::new();
        let created = new_game(&state, 6).await;

        assert_eq!(created.players.len(), 6);
        assert_eq!(list_players(&state).await.unwrap().len(), 6);
        let game = get_game(&state, &created.id).await.unwrap();
        assert_eq!(game.quests.len(), 5);
        assert_eq!(game.current_quest, 1);
        assert_eq!(game.missions_unsent, 0);
        assert!(game.has_player(&game.current_player_id));
        let row = RULES.lookup(6).unwrap();
        for (quest, rule) in game.quests.iter().zip(row.quests.iter()) {
            assert_eq!(quest.required_travelers, rule.travelers);
            assert_eq!(quest.required_fails, rule.fails);
        }
    }

    #[tokio::test]
    async fn create_game_rejects_unsupported_counts() {
        let state = AppState::new();
        for n in [4, 11] {
            let err = create_game(
                &state,
                CreateGameRequest {
                    names: names(n),
                    roles: vec![],
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, Error::NoRuleFound(_)));
        }
    }

    #[tokio::test]
    async fn votes_are_disclosed_without_identities() {
        let state = AppState::new();
        let created = new_game(&state, 5).await;
        run_quest(&state, &created, true).await;

        let view = get_votes(&state, &created.id, Some(1)).await.unwrap();
        assert_eq!(view.outcome, Some(QuestOutcome::Failed));
        let mut votes = view.votes;
        votes.sort();
        assert_eq!(votes, vec![false, true]);
    }

    #[tokio::test]
    async fn blue_wins_after_three_passed_quests() {
        let state = AppState::new();
        let created = new_game(&state, 5).await;
        run_quest(&state, &created, false).await;
        run_quest(&state, &created, false).await;
        let game = run_quest(&state, &created, false).await;
        assert!(game.result.as_ref().unwrap().status);
    }

    #[tokio::test]
    async fn correct_guess_flips_the_result() {
        let state = AppState::new();
        let created = new_game(&state, 5).await;
        for _ in 0..3 {
            run_quest(&state, &created, false).await;
        }
        let assassin = created
            .players
            .iter()
            .find(|p| p.role == Role::Assassin)
            .unwrap();
        let merlin = created
            .players
            .iter()
            .find(|p| p.role == Role::Merlin)
            .unwrap();

        let payload: HashMap<String, String> =
            [(assassin.id.clone(), merlin.id.clone())].into();
        let game = guess_merlin(&state, &created.id, payload).await.unwrap();
        let result = game.result.unwrap();
        assert!(!result.status);
        assert_eq!(result.guess_merlin_id.as_deref(), Some(merlin.id.as_str()));
    }

    #[tokio::test]
    async fn wrong_guess_leaves_the_blue_win() {
        let state = AppState::new();
        let created = new_game(&state, 5).await;
        for _ in 0..3 {
            run_quest(&state, &created, false).await;
        }
        let assassin = created
            .players
            .iter()
            .find(|p| p.role == Role::Assassin)
            .unwrap();
        let wrong = created
            .players
            .iter()
            .find(|p| p.team == Team::Blue && p.role != Role::Merlin)
            .unwrap();

        let payload: HashMap<String, String> = [(assassin.id.clone(), wrong.id.clone())].into();
        let game = guess_merlin(&state, &created.id, payload).await.unwrap();
        assert!(game.result.as_ref().unwrap().status);

        // A second guess is refused even if it would hit Merlin.
        let merlin = created
            .players
            .iter()
            .find(|p| p.role == Role::Merlin)
            .unwrap();
        let retry: HashMap<String, String> = [(assassin.id.clone(), merlin.id.clone())].into();
        let err = guess_merlin(&state, &created.id, retry).await.unwrap_err();
        assert!(matches!(err, Error::GuessAlreadyMade));
    }

    #[tokio::test]
    async fn guessing_before_a_result_is_refused() {
        let state = AppState::new();
        let created = new_game(&state, 5).await;
        let assassin = created
            .players
            .iter()
            .find(|p| p.role == Role::Assassin)
            .unwrap();
        let merlin = created
            .players
            .iter()
            .find(|p| p.role == Role::Merlin)
            .unwrap();
        let payload: HashMap<String, String> =
            [(assassin.id.clone(), merlin.id.clone())].into();
        let err = guess_merlin(&state, &created.id, payload).await.unwrap_err();
        assert!(matches!(err, Error::ResultNotEstablished));
    }

    #[tokio::test]
    async fn guessing_after_a_red_win_is_refused() {
        let state = AppState::new();
        let created = new_game(&state, 5).await;
        for _ in 0..3 {
            run_quest(&state, &created, true).await;
        }
        let assassin = created
            .players
            .iter()
            .find(|p| p.role == Role::Assassin)
            .unwrap();
        let merlin = created
            .players
            .iter()
            .find(|p| p.role == Role::Merlin)
            .unwrap();
        let payload: HashMap<String, String> =
            [(assassin.id.clone(), merlin.id.clone())].into();
        let err = guess_merlin(&state, &created.id, payload).await.unwrap_err();
        assert!(matches!(err, Error::GameNotWonByBlue));
    }

    #[tokio::test]
    async fn non_assassin_cannot_guess() {
        let state = AppState::new();
        let created = new_game(&state, 5).await;
        for _ in 0..3 {
            run_quest(&state, &created, false).await;
        }
        let merlin = created
            .players
            .iter()
            .find(|p| p.role == Role::Merlin)
            .unwrap();
        let payload: HashMap<String, String> =
            [(merlin.id.clone(), merlin.id.clone())].into();
        let err = guess_merlin(&state, &created.id, payload).await.unwrap_err();
        assert!(matches!(err, Error::NotAssassin(_)));
    }

    #[tokio::test]
    async fn unsend_mission_rotates_the_proposer() {
        let state = AppState::new();
        let created = new_game(&state, 5).await;
        let before = state.load_game(&created.id).await.unwrap();
        let view = unsend_mission(&state, &created.id).await.unwrap();
        assert_eq!(view.missions_unsent, 1);
        assert_ne!(view.current_player_id, before.current_player_id);
    }
}
