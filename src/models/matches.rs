use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::league::progression::InjuryType;
use crate::league::scoring::{ScoringRules, TeamTally};
use crate::models::bet::ResolutionSummary;
use crate::models::league::Standing;
use crate::models::team::{LevelUp, PlayerInjury, Team};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Match {
    pub id: Uuid,
    pub season_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub round_number: i32,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub played_at: Option<DateTime<Utc>>,
    pub status: MatchStatus,
    pub home_score: i32,
    pub away_score: i32,
    pub home_casualties: i32,
    pub away_casualties: i32,
    pub home_completions: i32,
    pub away_completions: i32,
    pub notes: Option<String>,
    pub validated_by: Option<Uuid>,
    pub home_winnings: i64,
    pub away_winnings: i64,
    /// League scoring rules in force when the result was recorded
    pub applied_win_points: Option<i32>,
    pub applied_draw_points: Option<i32>,
    pub applied_loss_points: Option<i32>,
    /// Standings and bets have been applied for the recorded result
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn side_of(&self, team_id: Uuid) -> Option<Side> {
        if team_id == self.home_team_id {
            Some(Side::Home)
        } else if team_id == self.away_team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn involves(&self, team_id: Uuid) -> bool {
        self.side_of(team_id).is_some()
    }

    pub fn home_tally(&self) -> TeamTally {
        TeamTally::new(self.home_score, self.home_casualties)
    }

    pub fn away_tally(&self) -> TeamTally {
        TeamTally::new(self.away_score, self.away_casualties)
    }

    /// Tally of `side` followed by the tally of its opponent
    pub fn tallies_for(&self, side: Side) -> (TeamTally, TeamTally) {
        match side {
            Side::Home => (self.home_tally(), self.away_tally()),
            Side::Away => (self.away_tally(), self.home_tally()),
        }
    }

    /// Rules the recorded result was scored with, if it has been scored
    pub fn applied_rules(&self) -> Option<ScoringRules> {
        Some(ScoringRules {
            win_points: self.applied_win_points?,
            draw_points: self.applied_draw_points?,
            loss_points: self.applied_loss_points?,
        })
    }

    pub fn score_line(&self) -> String {
        format!("{} - {}", self.home_score, self.away_score)
    }
}

/// One player's line on the match sheet
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PlayerStatLine {
    pub player_id: Uuid,
    #[serde(default)]
    pub touchdowns: i32,
    #[serde(default)]
    pub completions: i32,
    #[serde(default)]
    pub interceptions: i32,
    #[serde(default)]
    pub deflections: i32,
    #[serde(default)]
    pub casualties: i32,
    #[serde(default)]
    pub is_mvp: bool,
    #[serde(default)]
    pub injury: Option<InjuryType>,
}

impl PlayerStatLine {
    /// Star Player Points earned by this line
    pub fn spp(&self) -> i32 {
        let mut spp = self.touchdowns * 3
            + self.casualties * 2
            + self.completions
            + self.interceptions * 2
            + self.deflections;
        if self.is_mvp {
            spp += 4;
        }
        spp
    }
}

/// Finalized result submitted by the web layer
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MatchResult {
    pub home_score: i32,
    pub away_score: i32,
    pub home_casualties: i32,
    pub away_casualties: i32,
    #[serde(default)]
    pub home_completions: i32,
    #[serde(default)]
    pub away_completions: i32,
    #[serde(default)]
    pub home_winnings: i64,
    #[serde(default)]
    pub away_winnings: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub player_stats: Vec<PlayerStatLine>,
}

impl MatchResult {
    pub fn home_tally(&self) -> TeamTally {
        TeamTally::new(self.home_score, self.home_casualties)
    }

    pub fn away_tally(&self) -> TeamTally {
        TeamTally::new(self.away_score, self.away_casualties)
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct MatchPlayerStats {
    pub id: Uuid,
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub team_id: Uuid,
    pub touchdowns: i32,
    pub completions: i32,
    pub interceptions: i32,
    pub deflections: i32,
    pub casualties_inflicted: i32,
    pub is_mvp: bool,
    pub spp_earned: i32,
    pub injury: Option<InjuryType>,
}

impl MatchPlayerStats {
    pub fn as_line(&self) -> PlayerStatLine {
        PlayerStatLine {
            player_id: self.player_id,
            touchdowns: self.touchdowns,
            completions: self.completions,
            interceptions: self.interceptions,
            deflections: self.deflections,
            casualties: self.casualties_inflicted,
            is_mvp: self.is_mvp,
            injury: self.injury,
        }
    }
}

/// A match together with its recorded stat lines
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchDetails {
    #[serde(rename = "match")]
    pub game: Match,
    pub home_team: Team,
    pub away_team: Team,
    pub player_stats: Vec<MatchPlayerStats>,
    pub injuries: Vec<PlayerInjury>,
}

/// What a recorded result changed, returned to the caller
#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionReport {
    #[serde(rename = "match")]
    pub game: Match,
    pub home_standing: Standing,
    pub away_standing: Standing,
    pub bets: ResolutionSummary,
    pub level_ups: Vec<LevelUp>,
    pub injuries: Vec<PlayerInjury>,
    /// An administrator replaced a previously recorded result
    pub corrected: bool,
}
