use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Per-quest column of a rule row: how many players travel and how many
/// fail votes sink the quest.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct QuestRule {
    pub travelers: usize,
    pub fails: usize,
}

/// One row of the reference rule table, keyed by player count.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleRow {
    pub nb_player: usize,
    pub blue: usize,
    pub red: usize,
    pub quests: [QuestRule; 5],
}

pub struct RuleTable {
    rows: Vec<RuleRow>,
}

impl RuleTable {
    pub fn lookup(&self, player_count: usize) -> Result<&RuleRow> {
        self.rows
            .iter()
            .find(|row| row.nb_player == player_count)
            .ok_or(Error::NoRuleFound(player_count))
    }

    pub fn rows(&self) -> &[RuleRow] {
        &self.rows
    }
}

const fn q(travelers: usize, fails: usize) -> QuestRule {
    QuestRule { travelers, fails }
}

pub static RULES: Lazy<RuleTable> = Lazy::new(|| RuleTable {
    rows: vec![
        RuleRow {
            nb_player: 5,
            blue: 3,
            red: 2,
            quests: [q(2, 1), q(3, 1), q(2, 1), q(3, 1), q(3, 1)],
        },
        RuleRow {
            nb_player: 6,
            blue: 4,
            red: 2,
            quests: [q(2, 1), q(3, 1), q(4, 1), q(3, 1), q(4, 1)],
        },
        RuleRow {
            nb_player: 7,
            blue: 4,
            red: 3,
            quests: [q(2, 1), q(3, 1), q(3, 1), q(4, 2), q(4, 1)],
        },
        RuleRow {
            nb_player: 8,
            blue: 5,
            red: 3,
            quests: [q(3, 1), q(4, 1), q(4, 1), q(5, 2), q(5, 1)],
        },
        RuleRow {
            nb_player: 9,
            blue: 6,
            red: 3,
            quests: [q(3, 1), q(4, 1), q(4, 1), q(5, 2), q(5, 1)],
        },
        RuleRow {
            nb_player: 10,
            blue: 6,
            red: 4,
            quests: [q(3, 1), q(4, 1), q(4, 1), q(5, 2), q(5, 1)],
        },
    ],
});
