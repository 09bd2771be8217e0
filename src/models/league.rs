// src/models/league.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::league::scoring::{ScoringRules, StandingDelta};

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct League {
    pub id: Uuid,
    pub name: String,
    pub commissioner_id: Uuid,
    pub win_points: i32,
    pub draw_points: i32,
    pub loss_points: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl League {
    pub fn scoring_rules(&self) -> ScoringRules {
        ScoringRules {
            win_points: self.win_points,
            draw_points: self.draw_points,
            loss_points: self.loss_points,
        }
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Season {
    pub id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    pub number: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Standing {
    pub id: Uuid,
    pub season_id: Uuid,
    pub team_id: Uuid,
    pub position: i32,
    pub played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    /// Base win/draw/loss points
    pub points: i32,
    pub bonus_points: i32,
    pub bonus_high_scoring: i32,
    pub bonus_opponent_high_scoring: i32,
    pub bonus_casualties: i32,
    pub touchdowns_for: i32,
    pub touchdowns_against: i32,
    pub casualties_inflicted: i32,
    pub casualties_suffered: i32,
    pub last_updated: DateTime<Utc>,
}

impl Standing {
    /// A zeroed standing row, as created on a team's first match of the season
    #[cfg(test)]
    pub fn empty(season_id: Uuid, team_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            season_id,
            team_id,
            position: 0,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            points: 0,
            bonus_points: 0,
            bonus_high_scoring: 0,
            bonus_opponent_high_scoring: 0,
            bonus_casualties: 0,
            touchdowns_for: 0,
            touchdowns_against: 0,
            casualties_inflicted: 0,
            casualties_suffered: 0,
            last_updated: Utc::now(),
        }
    }

    pub fn total_points(&self) -> i32 {
        self.points + self.bonus_points
    }

    pub fn touchdown_diff(&self) -> i32 {
        self.touchdowns_for - self.touchdowns_against
    }

    pub fn casualty_diff(&self) -> i32 {
        self.casualties_inflicted - self.casualties_suffered
    }

    /// Apply a match delta in memory. Mirrors the SQL update in `StandingsService`.
    pub fn apply(&mut self, delta: &StandingDelta) {
        self.played += delta.played;
        self.wins += delta.wins;
        self.draws += delta.draws;
        self.losses += delta.losses;
        self.points += delta.points;
        self.bonus_high_scoring += delta.bonus_high_scoring;
        self.bonus_opponent_high_scoring += delta.bonus_opponent_high_scoring;
        self.bonus_casualties += delta.bonus_casualties;
        self.bonus_points += delta.bonus_points();
        self.touchdowns_for += delta.touchdowns_for;
        self.touchdowns_against += delta.touchdowns_against;
        self.casualties_inflicted += delta.casualties_inflicted;
        self.casualties_suffered += delta.casualties_suffered;
        debug_assert!(self.bonus_counters_consistent(), "bonus counters out of sync for team {}", self.team_id);
    }

    pub fn bonus_counters_consistent(&self) -> bool {
        self.bonus_high_scoring >= 0
            && self.bonus_opponent_high_scoring >= 0
            && self.bonus_casualties >= 0
            && self.bonus_points
                == self.bonus_high_scoring + self.bonus_opponent_high_scoring + self.bonus_casualties
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct StandingWithTeam {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub standing: Standing,
    pub team_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeagueStandingsResponse {
    pub season: Season,
    pub scoring: ScoringRules,
    pub standings: Vec<StandingWithTeam>,
    pub last_updated: Option<DateTime<Utc>>,
}
