use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;
use thiserror::Error;

/// Everything the game core can reject a request for. All of these surface
/// as 4xx responses with a readable message; none are retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no rule found for {0} players (supported: 5 to 10)")]
    NoRuleFound(usize),

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("invalid role composition: {0}")]
    InvalidRoleComposition(String),

    #[error("too many {0} roles for this number of players")]
    TooManyRoles(&'static str),

    #[error("{kind} '{id}' not found")]
    RecordNotFound { kind: &'static str, id: String },

    #[error("player '{0}' is not in this game")]
    PlayerNotInGame(String),

    #[error("player '{0}' is not the assassin")]
    NotAssassin(String),

    #[error("game result is not established yet")]
    ResultNotEstablished,

    #[error("game was not won by the blue team")]
    GameNotWonByBlue,

    #[error("quest {0} already has all its votes")]
    QuestFull(usize),

    #[error("no team has been proposed for quest {0}")]
    NoProposal(usize),

    #[error("player '{0}' is not a traveler on this quest")]
    NotATraveler(String),

    #[error("player '{0}' already voted on this quest")]
    AlreadyVoted(String),

    #[error("votes were already cast for quest {0}")]
    VotesAlreadyCast(usize),

    #[error("expected {expected} travelers, got {got}")]
    WrongTravelerCount { expected: usize, got: usize },

    #[error("the assassin already made a guess")]
    GuessAlreadyMade,

    #[error("the game is over")]
    GameOver,

    #[error("{0}")]
    BadRequest(String),
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::RecordNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        log::debug!("request rejected: {}", self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
