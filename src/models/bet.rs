use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BetType {
    /// Team wins the match
    Win,
    /// Team scores exactly `target_value` touchdowns
    TdExact,
    /// Team inflicts exactly `target_value` casualties
    CasExact,
}

impl BetType {
    pub fn requires_target(&self) -> bool {
        !matches!(self, BetType::Win)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BetType::Win => "win",
            BetType::TdExact => "td_exact",
            BetType::CasExact => "cas_exact",
        }
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Bet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub team_id: Uuid,
    pub bet_type: BetType,
    pub target_value: Option<i32>,
    pub bet_amount: i64,
    pub odds: i32,
    pub is_resolved: bool,
    pub is_won: bool,
    pub payout: i64,
    pub placed_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Bet {
    pub fn potential_payout(&self) -> i64 {
        self.bet_amount * i64::from(self.odds)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBetRequest {
    pub team_id: Uuid,
    pub bet_type: BetType,
    pub bet_amount: i64,
    #[serde(default)]
    pub target_value: Option<i32>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct BetNotification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bet_id: Uuid,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Outcome of resolving the pending bets of one match
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ResolutionSummary {
    pub resolved_count: usize,
    pub won_count: usize,
    pub total_payout: i64,
    pub total_stakes_lost: i64,
    pub notifications: Vec<BetNotification>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationsQuery {
    pub all: Option<bool>,
}
