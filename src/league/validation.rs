use std::collections::HashSet;
use uuid::Uuid;

use crate::config::league::LeagueSettings;
use crate::error::LeagueError;
use crate::models::bet::{BetType, PlaceBetRequest};
use crate::models::matches::{MatchResult, PlayerStatLine};

/// A bet request that passed input validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBet {
    pub team_id: Uuid,
    pub bet_type: BetType,
    pub bet_amount: i64,
    /// Always `None` for win bets
    pub target_value: Option<i32>,
    pub odds: i32,
}

/// Centralized input validation for results and bets
#[derive(Debug, Clone)]
pub struct LeagueValidator {
    settings: LeagueSettings,
}

impl LeagueValidator {
    pub fn new(settings: LeagueSettings) -> Self {
        Self { settings }
    }

    /// Validate a submitted match result.
    ///
    /// Team membership of the stat lines needs the database and is checked by the
    /// completion service; everything else is checked here.
    pub fn validate_match_result(&self, result: &MatchResult) -> Result<(), LeagueError> {
        self.validate_game_scores(result.home_score, result.away_score)?;
        self.validate_casualties(result.home_casualties, result.away_casualties)?;

        if result.home_completions < 0 || result.away_completions < 0 {
            return Err(LeagueError::validation("Completions cannot be negative"));
        }

        if result.home_winnings < 0 || result.away_winnings < 0 {
            return Err(LeagueError::validation("Winnings cannot be negative"));
        }

        self.validate_stat_lines(&result.player_stats)
    }

    pub fn validate_game_scores(&self, home_score: i32, away_score: i32) -> Result<(), LeagueError> {
        if home_score < 0 {
            return Err(LeagueError::validation(format!("Home score cannot be negative: {}", home_score)));
        }

        if away_score < 0 {
            return Err(LeagueError::validation(format!("Away score cannot be negative: {}", away_score)));
        }

        let max = self.settings.max_reasonable_score;
        if home_score > max {
            return Err(LeagueError::validation(format!("Home score too high: {} (max {})", home_score, max)));
        }

        if away_score > max {
            return Err(LeagueError::validation(format!("Away score too high: {} (max {})", away_score, max)));
        }

        Ok(())
    }

    pub fn validate_casualties(&self, home_casualties: i32, away_casualties: i32) -> Result<(), LeagueError> {
        for (side, value) in [("Home", home_casualties), ("Away", away_casualties)] {
            if value < 0 {
                return Err(LeagueError::validation(format!("{} casualties cannot be negative: {}", side, value)));
            }
            if value > self.settings.max_reasonable_score {
                return Err(LeagueError::validation(format!(
                    "{} casualties too high: {} (max {})",
                    side, value, self.settings.max_reasonable_score
                )));
            }
        }
        Ok(())
    }

    /// Per-line checks: no negative counters and no player listed twice
    pub fn validate_stat_lines(&self, lines: &[PlayerStatLine]) -> Result<(), LeagueError> {
        let mut seen = HashSet::new();
        for line in lines {
            if !seen.insert(line.player_id) {
                return Err(LeagueError::validation(format!(
                    "Duplicate stat line for player {}",
                    line.player_id
                )));
            }

            if line.touchdowns < 0
                || line.completions < 0
                || line.interceptions < 0
                || line.deflections < 0
                || line.casualties < 0
            {
                return Err(LeagueError::validation(format!(
                    "Negative statistic for player {}",
                    line.player_id
                )));
            }
        }
        Ok(())
    }

    /// At most one MVP per team. `team_of` maps each listed player to their team.
    pub fn validate_mvp_awards<F>(&self, lines: &[PlayerStatLine], team_of: F) -> Result<(), LeagueError>
    where
        F: Fn(Uuid) -> Option<Uuid>,
    {
        let mut mvp_teams = HashSet::new();
        for line in lines.iter().filter(|l| l.is_mvp) {
            let team_id = team_of(line.player_id).ok_or_else(|| {
                LeagueError::validation(format!("Player {} does not play in this match", line.player_id))
            })?;
            if !mvp_teams.insert(team_id) {
                return Err(LeagueError::validation(format!("Team {} has more than one MVP", team_id)));
            }
        }
        Ok(())
    }

    /// Validate bet input that does not depend on database state.
    ///
    /// The stake cap is enforced before the treasury is consulted, so an oversized
    /// stake is rejected regardless of balance.
    pub fn validate_bet_request(&self, request: &PlaceBetRequest) -> Result<ValidatedBet, LeagueError> {
        if request.bet_amount < self.settings.min_bet_amount {
            return Err(LeagueError::validation(format!(
                "Bet amount {} is below the minimum of {}",
                request.bet_amount, self.settings.min_bet_amount
            )));
        }

        if request.bet_amount > self.settings.max_bet_amount {
            return Err(LeagueError::validation(format!(
                "Bet amount {} exceeds the maximum of {}",
                request.bet_amount, self.settings.max_bet_amount
            )));
        }

        let target_value = if request.bet_type.requires_target() {
            match request.target_value {
                Some(target) if target >= 0 => Some(target),
                Some(target) => {
                    return Err(LeagueError::validation(format!(
                        "Target value cannot be negative: {}",
                        target
                    )))
                }
                None => {
                    return Err(LeagueError::validation(format!(
                        "A target value is required for {} bets",
                        request.bet_type.as_str()
                    )))
                }
            }
        } else {
            None
        };

        if request.team_id.is_nil() {
            return Err(LeagueError::validation("Team ID cannot be nil"));
        }

        Ok(ValidatedBet {
            team_id: request.team_id,
            bet_type: request.bet_type,
            bet_amount: request.bet_amount,
            target_value,
            odds: self.settings.odds.for_type(request.bet_type),
        })
    }
}

impl Default for LeagueValidator {
    fn default() -> Self {
        Self::new(LeagueSettings::default())
    }
}
