use serde::Deserialize;

use crate::models::bet::BetType;

/// League rules that are set per deployment rather than per league
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct LeagueSettings {
    /// Smallest stake a bet may carry, in gold
    pub min_bet_amount: i64,
    /// Largest stake a bet may carry, in gold
    pub max_bet_amount: i64,
    /// Upper bound for touchdowns and casualties on a match sheet
    pub max_reasonable_score: i32,
    pub odds: BetOdds,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            min_bet_amount: 1,
            max_bet_amount: 50_000,
            max_reasonable_score: 50,
            odds: BetOdds::default(),
        }
    }
}

/// Payout multiplier of each bet type. A bet keeps the odds it was placed at.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct BetOdds {
    pub win: i32,
    pub td_exact: i32,
    pub cas_exact: i32,
}

impl BetOdds {
    pub fn for_type(&self, bet_type: BetType) -> i32 {
        match bet_type {
            BetType::Win => self.win,
            BetType::TdExact => self.td_exact,
            BetType::CasExact => self.cas_exact,
        }
    }
}

impl Default for BetOdds {
    fn default() -> Self {
        Self {
            win: 2,
            td_exact: 5,
            cas_exact: 7,
        }
    }
}
