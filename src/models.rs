pub mod game;
pub mod player;
pub mod quest;
pub mod role;
pub mod rule;
