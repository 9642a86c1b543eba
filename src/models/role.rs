use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Blue,
    Red,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Blue => write!(f, "blue"),
            Team::Red => write!(f, "red"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Merlin,
    Percival,
    Assassin,
    Morgan,
    Mordred,
    Oberon,
    Blue,
    Red,
}

impl Role {
    pub fn team(self) -> Team {
        match self {
            Role::Merlin | Role::Percival | Role::Blue => Team::Blue,
            Role::Assassin | Role::Morgan | Role::Mordred | Role::Oberon | Role::Red => Team::Red,
        }
    }

    /// Optional roles a game creator may request on top of the base set.
    pub fn is_special(self) -> bool {
        matches!(
            self,
            Role::Percival | Role::Morgan | Role::Mordred | Role::Oberon
        )
    }

    /// Roles that get their own line in the night narration. Percival is
    /// special but never addressed by name, so it is not part of the key.
    pub fn is_narrated(self) -> bool {
        matches!(self, Role::Morgan | Role::Mordred | Role::Oberon)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Merlin => "merlin",
            Role::Percival => "percival",
            Role::Assassin => "assassin",
            Role::Morgan => "morgan",
            Role::Mordred => "mordred",
            Role::Oberon => "oberon",
            Role::Blue => "blue",
            Role::Red => "red",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merlin" => Ok(Role::Merlin),
            "percival" => Ok(Role::Percival),
            "assassin" => Ok(Role::Assassin),
            "morgan" => Ok(Role::Morgan),
            "mordred" => Ok(Role::Mordred),
            "oberon" => Ok(Role::Oberon),
            "blue" => Ok(Role::Blue),
            "red" => Ok(Role::Red),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}
