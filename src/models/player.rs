use serde::{Deserialize, Serialize};

use super::role::{Role, Team};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Seat position, fixed at creation. Turn order rotates over this index.
    pub index: usize,
    pub team: Team,
    pub role: Role,
}

impl Player {
    pub fn new(name: String, index: usize, role: Role) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            index,
            team: role.team(),
            role,
        }
    }
}
