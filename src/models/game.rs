use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::quest::{Quest, QuestOutcome};
use super::rule::RuleRow;

/// Overall outcome. `status` is true while the blue team holds the win;
/// a correct Merlin guess flips it to false, exactly once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameResult {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guess_merlin_id: Option<String>,
}

/// Aggregate root of a running game. Owns its five quests outright and
/// references players by id, in seat order. All mutation goes through the
/// methods below so a caller can load, mutate and store the record as one
/// atomic unit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Player ids in seat order; position = seat index.
    pub players: Vec<String>,
    pub quests: Vec<Quest>,
    /// 1-based; moves past 5 once the final quest resolves.
    pub current_quest: usize,
    pub current_player_index: usize,
    pub current_player_id: String,
    pub missions_unsent: u32,
    pub result: Option<GameResult>,
}

impl Game {
    pub fn new(player_ids: Vec<String>, starting_index: usize, row: &RuleRow) -> Self {
        let current_player_id = player_ids[starting_index].clone();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            players: player_ids,
            quests: row.quests.iter().map(|&rule| Quest::new(rule)).collect(),
            current_quest: 1,
            current_player_index: starting_index,
            current_player_id,
            missions_unsent: 0,
            result: None,
        }
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.iter().any(|id| id == player_id)
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    fn current_quest_checked(&self) -> Result<usize> {
        if self.is_over() {
            return Err(Error::GameOver);
        }
        // With no result set, the index is always within 1..=5.
        Ok(self.current_quest - 1)
    }

    /// Rotates the proposer seat. Runs after every quest resolution and
    /// every rejected proposal.
    pub fn advance_turn(&mut self) {
        self.current_player_index = (self.current_player_index + 1) % self.players.len();
        self.current_player_id = self.players[self.current_player_index].clone();
    }

    /// Records the roster for the current quest. Travelers must already be
    /// validated as members of this game by the caller.
    pub fn propose_team(&mut self, travelers: Vec<String>) -> Result<()> {
        let idx = self.current_quest_checked()?;
        let quest = &mut self.quests[idx];
        if !quest.votes.is_empty() {
            return Err(Error::VotesAlreadyCast(idx + 1));
        }
        if travelers.len() != quest.required_travelers {
            return Err(Error::WrongTravelerCount {
                expected: quest.required_travelers,
                got: travelers.len(),
            });
        }
        let mut distinct = travelers.clone();
        distinct.sort();
        distinct.dedup();
        if distinct.len() != travelers.len() {
            return Err(Error::BadRequest("duplicate traveler in proposal".into()));
        }
        quest.travelers = travelers;
        Ok(())
    }

    /// Appends one traveler's vote. When the quest fills, resolves it,
    /// rotates the turn and either opens the next quest or settles the
    /// overall result.
    pub fn record_vote(&mut self, player_id: &str, vote: bool) -> Result<()> {
        let idx = self.current_quest_checked()?;
        let quest = &mut self.quests[idx];
        if quest.travelers.is_empty() {
            return Err(Error::NoProposal(idx + 1));
        }
        if !quest.travelers.iter().any(|id| id == player_id) {
            return Err(Error::NotATraveler(player_id.to_string()));
        }
        if quest.has_voted(player_id) {
            return Err(Error::AlreadyVoted(player_id.to_string()));
        }
        if quest.is_full() {
            return Err(Error::QuestFull(idx + 1));
        }

        quest.votes.push((player_id.to_string(), vote));

        if quest.is_full() {
            quest.outcome = Some(quest.tally());
            self.missions_unsent = 0;
            self.advance_turn();
            self.resolve();
            if self.result.is_none() {
                self.current_quest += 1;
            }
        }
        Ok(())
    }

    /// The proposer's team was rejected: count it and hand the proposal to
    /// the next seat. Quest votes are untouched.
    pub fn unsend_mission(&mut self) -> Result<()> {
        let idx = self.current_quest_checked()?;
        let quest = &mut self.quests[idx];
        if !quest.votes.is_empty() {
            return Err(Error::VotesAlreadyCast(idx + 1));
        }
        quest.travelers.clear();
        self.missions_unsent += 1;
        self.advance_turn();
        Ok(())
    }

    fn outcome_count(&self, outcome: QuestOutcome) -> usize {
        self.quests
            .iter()
            .filter(|q| q.outcome == Some(outcome))
            .count()
    }

    /// Settles the overall result once either side reaches three quests.
    /// Writes `result` at most once; the only later change allowed is the
    /// Merlin-guess flip.
    pub fn resolve(&mut self) {
        if self.result.is_some() {
            return;
        }
        let passed = self.outcome_count(QuestOutcome::Passed);
        let failed = self.outcome_count(QuestOutcome::Failed);
        if passed >= 3 || failed >= 3 {
            self.result = Some(GameResult {
                status: passed >= 3,
                guess_merlin_id: None,
            });
        }
    }
}
