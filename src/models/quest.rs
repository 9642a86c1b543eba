use serde::{Deserialize, Serialize};

use super::rule::QuestRule;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestOutcome {
    Passed,
    Failed,
}

/// One of the five rounds of a game. Votes are appended in submission
/// order but only ever disclosed shuffled; the outcome is written once,
/// when the vote list fills.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quest {
    pub required_travelers: usize,
    pub required_fails: usize,
    /// Roster picked by the current proposer. Empty until a proposal lands.
    pub travelers: Vec<String>,
    pub votes: Vec<(String, bool)>,
    pub outcome: Option<QuestOutcome>,
}

impl Quest {
    pub fn new(rule: QuestRule) -> Self {
        Self {
            required_travelers: rule.travelers,
            required_fails: rule.fails,
            travelers: Vec::new(),
            votes: Vec::new(),
            outcome: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.votes.len() >= self.required_travelers
    }

    pub fn has_voted(&self, player_id: &str) -> bool {
        self.votes.iter().any(|(id, _)| id == player_id)
    }

    pub fn fail_votes(&self) -> usize {
        self.votes.iter().filter(|(_, vote)| !vote).count()
    }

    /// Outcome once the quest fills: failed iff the fail votes reach the
    /// configured threshold. Not a majority rule.
    pub fn tally(&self) -> QuestOutcome {
        if self.fail_votes() >= self.required_fails {
            QuestOutcome::Failed
        } else {
            QuestOutcome::Passed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rule::QuestRule;

    fn quest(travelers: usize, fails: usize) -> Quest {
        Quest::new(QuestRule { travelers, fails })
    }

    #[test]
    fn one_fail_short_of_threshold_passes() {
        let mut q = quest(4, 2);
        q.votes = vec![
            ("a".into(), true),
            ("b".into(), true),
            ("c".into(), true),
            ("d".into(), false),
        ];
        assert_eq!(q.tally(), QuestOutcome::Passed);
    }

    #[test]
    fn fails_at_exact_threshold() {
        let mut q = quest(4, 2);
        q.votes = vec![
            ("a".into(), true),
            ("b".into(), false),
            ("c".into(), true),
            ("d".into(), false),
        ];
        assert_eq!(q.tally(), QuestOutcome::Failed);
    }

    #[test]
    fn single_fail_vote_sinks_a_one_fail_quest() {
        let mut q = quest(2, 1);
        q.votes = vec![("a".into(), true), ("b".into(), false)];
        assert_eq!(q.tally(), QuestOutcome::Failed);
    }
}
