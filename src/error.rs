use actix_web::http::StatusCode;
use uuid::Uuid;

/// Errors surfaced by the league, scoring and betting services.
///
/// Every variant is recoverable at the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum LeagueError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient funds: requested {requested}g but only {available}g available")]
    InsufficientFunds { requested: i64, available: i64 },

    #[error("You already have a bet on match {match_id}")]
    DuplicateBet { match_id: Uuid },

    #[error("State conflict: {0}")]
    StateConflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LeagueError {
    pub fn validation(message: impl Into<String>) -> Self {
        LeagueError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        LeagueError::StateConflict(message.into())
    }

    /// Machine readable error kind for API clients
    pub fn kind(&self) -> &'static str {
        match self {
            LeagueError::Validation(_) => "validation_error",
            LeagueError::InsufficientFunds { .. } => "insufficient_funds",
            LeagueError::DuplicateBet { .. } => "duplicate_bet",
            LeagueError::StateConflict(_) => "state_conflict",
            LeagueError::NotFound(_) => "not_found",
            LeagueError::Forbidden(_) => "forbidden",
            LeagueError::Database(_) => "database_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            LeagueError::Validation(_) | LeagueError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
            LeagueError::DuplicateBet { .. } | LeagueError::StateConflict(_) => StatusCode::CONFLICT,
            LeagueError::NotFound(_) => StatusCode::NOT_FOUND,
            LeagueError::Forbidden(_) => StatusCode::FORBIDDEN,
            LeagueError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the initiating user. Database details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            LeagueError::Database(_) => "Internal database error".to_string(),
            other => other.to_string(),
        }
    }
}
