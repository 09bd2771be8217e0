use serde::{Deserialize, Serialize};

use crate::models::bet::{Bet, BetType};
use crate::models::matches::Match;

/// How a single bet settled against a final result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetOutcome {
    pub is_won: bool,
    /// Gold credited to the bettor, 0 for a lost bet
    pub payout: i64,
}

impl BetOutcome {
    fn lost() -> Self {
        Self { is_won: false, payout: 0 }
    }
}

/// Settle a bet against the final result of its match.
///
/// A bet on a team that did not play the match can never win.
pub fn settle(bet: &Bet, game: &Match) -> BetOutcome {
    let Some(side) = game.side_of(bet.team_id) else {
        tracing::warn!("Bet {} targets team {} which did not play match {}", bet.id, bet.team_id, game.id);
        return BetOutcome::lost();
    };

    let (own, opponent) = game.tallies_for(side);

    let won = match bet.bet_type {
        BetType::Win => own.touchdowns > opponent.touchdowns,
        BetType::TdExact => bet.target_value == Some(own.touchdowns),
        BetType::CasExact => bet.target_value == Some(own.casualties),
    };

    if won {
        BetOutcome {
            is_won: true,
            payout: bet.potential_payout(),
        }
    } else {
        BetOutcome::lost()
    }
}
