use serde::{Deserialize, Serialize};

use crate::models::common::MatchOutcome;

/// Touchdowns or casualties needed in a single match to earn a bonus point
pub const BONUS_THRESHOLD: i32 = 3;

/// League-configured points for a win, draw and loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub win_points: i32,
    pub draw_points: i32,
    pub loss_points: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            win_points: 3,
            draw_points: 1,
            loss_points: 0,
        }
    }
}

impl ScoringRules {
    pub fn points_for(&self, outcome: MatchOutcome) -> i32 {
        match outcome {
            MatchOutcome::Win => self.win_points,
            MatchOutcome::Draw => self.draw_points,
            MatchOutcome::Loss => self.loss_points,
        }
    }
}

/// What one team did in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TeamTally {
    pub touchdowns: i32,
    /// Casualties inflicted on the opponent
    pub casualties: i32,
}

impl TeamTally {
    pub fn new(touchdowns: i32, casualties: i32) -> Self {
        Self { touchdowns, casualties }
    }
}

/// Change a single match makes to one team's standing row.
///
/// Deltas are plain additive values so that a recorded result can be reversed
/// exactly by applying `reversed()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StandingDelta {
    pub played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub points: i32,
    pub bonus_high_scoring: i32,
    pub bonus_opponent_high_scoring: i32,
    pub bonus_casualties: i32,
    pub touchdowns_for: i32,
    pub touchdowns_against: i32,
    pub casualties_inflicted: i32,
    pub casualties_suffered: i32,
}

impl StandingDelta {
    /// Delta for a team given its own tally and its opponent's
    pub fn for_team(own: TeamTally, opponent: TeamTally, rules: &ScoringRules) -> Self {
        let outcome = MatchOutcome::from_scores(own.touchdowns, opponent.touchdowns);

        Self {
            played: 1,
            wins: i32::from(outcome == MatchOutcome::Win),
            draws: i32::from(outcome == MatchOutcome::Draw),
            losses: i32::from(outcome == MatchOutcome::Loss),
            points: rules.points_for(outcome),
            bonus_high_scoring: i32::from(own.touchdowns >= BONUS_THRESHOLD),
            bonus_opponent_high_scoring: i32::from(opponent.touchdowns >= BONUS_THRESHOLD),
            bonus_casualties: i32::from(own.casualties >= BONUS_THRESHOLD),
            touchdowns_for: own.touchdowns,
            touchdowns_against: opponent.touchdowns,
            casualties_inflicted: own.casualties,
            casualties_suffered: opponent.casualties,
        }
    }

    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome::from_scores(self.touchdowns_for, self.touchdowns_against)
    }

    pub fn bonus_points(&self) -> i32 {
        self.bonus_high_scoring + self.bonus_opponent_high_scoring + self.bonus_casualties
    }

    /// Base plus bonus points
    pub fn total_points(&self) -> i32 {
        self.points + self.bonus_points()
    }

    pub fn reversed(&self) -> Self {
        Self {
            played: -self.played,
            wins: -self.wins,
            draws: -self.draws,
            losses: -self.losses,
            points: -self.points,
            bonus_high_scoring: -self.bonus_high_scoring,
            bonus_opponent_high_scoring: -self.bonus_opponent_high_scoring,
            bonus_casualties: -self.bonus_casualties,
            touchdowns_for: -self.touchdowns_for,
            touchdowns_against: -self.touchdowns_against,
            casualties_inflicted: -self.casualties_inflicted,
            casualties_suffered: -self.casualties_suffered,
        }
    }

    /// Field-wise sum, used to fold a reversal and a new result into one update
    pub fn combine(&self, other: &StandingDelta) -> Self {
        Self {
            played: self.played + other.played,
            wins: self.wins + other.wins,
            draws: self.draws + other.draws,
            losses: self.losses + other.losses,
            points: self.points + other.points,
            bonus_high_scoring: self.bonus_high_scoring + other.bonus_high_scoring,
            bonus_opponent_high_scoring: self.bonus_opponent_high_scoring + other.bonus_opponent_high_scoring,
            bonus_casualties: self.bonus_casualties + other.bonus_casualties,
            touchdowns_for: self.touchdowns_for + other.touchdowns_for,
            touchdowns_against: self.touchdowns_against + other.touchdowns_against,
            casualties_inflicted: self.casualties_inflicted + other.casualties_inflicted,
            casualties_suffered: self.casualties_suffered + other.casualties_suffered,
        }
    }
}

/// Standing deltas for the home and the away team of a match
pub fn score_match(home: TeamTally, away: TeamTally, rules: &ScoringRules) -> (StandingDelta, StandingDelta) {
    (
        StandingDelta::for_team(home, away, rules),
        StandingDelta::for_team(away, home, rules),
    )
}
