use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::league::progression::InjuryType;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub coach_id: Uuid,
    pub race: String,
    pub games_played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub touchdowns_for: i32,
    pub touchdowns_against: i32,
    pub casualties_inflicted: i32,
    pub casualties_suffered: i32,
    /// Gold the team has banked from match winnings
    pub treasury: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Player {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub number: i32,
    pub spp: i32,
    pub touchdowns: i32,
    pub completions: i32,
    pub interceptions: i32,
    pub deflections: i32,
    pub casualties_inflicted: i32,
    pub mvp_awards: i32,
    pub games_played: i32,
    pub movement: i32,
    pub strength: i32,
    pub agility: i32,
    pub passing: Option<i32>,
    pub armor: i32,
    /// Level reached from career SPP
    pub level: i32,
    pub is_active: bool,
    pub is_dead: bool,
    pub miss_next_game: bool,
    pub niggling_injuries: i32,
    pub created_at: DateTime<Utc>,
}

/// A lasting injury suffered in a match
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct PlayerInjury {
    pub id: Uuid,
    pub player_id: Uuid,
    pub match_id: Uuid,
    pub injury_type: InjuryType,
    pub is_permanent: bool,
    pub stat_change: i32,
    pub occurred_at: DateTime<Utc>,
}

/// A player who reached a new level through the SPP of a match
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub player_id: Uuid,
    pub name: String,
    pub previous_level: i32,
    pub level: i32,
}
