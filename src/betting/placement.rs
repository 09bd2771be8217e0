use sqlx::PgPool;
use uuid::Uuid;

use crate::config::league::LeagueSettings;
use crate::db::{bet_queries, match_queries};
use crate::error::LeagueError;
use crate::league::validation::LeagueValidator;
use crate::models::bet::{Bet, PlaceBetRequest};
use crate::models::matches::MatchStatus;
use crate::models::user::Actor;

/// Places, cancels and looks up bets
#[derive(Debug)]
pub struct BetPlacementService {
    pool: PgPool,
    validator: LeagueValidator,
}

impl BetPlacementService {
    pub fn new(pool: PgPool, settings: LeagueSettings) -> Self {
        Self {
            pool,
            validator: LeagueValidator::new(settings),
        }
    }

    /// Validate and place a bet, debiting the stake from the user's treasury.
    #[tracing::instrument(name = "Place bet", skip(self, request), fields(bet_type = ?request.bet_type, amount = request.bet_amount))]
    pub async fn place_bet(&self, user_id: Uuid, match_id: Uuid, request: &PlaceBetRequest) -> Result<Bet, LeagueError> {
        // Stake cap and target checks come before any balance lookup
        let validated = self.validator.validate_bet_request(request)?;

        let mut tx = self.pool.begin().await?;

        let game = match_queries::lock_match(&mut tx, match_id).await?;
        if game.status != MatchStatus::Scheduled {
            return Err(LeagueError::validation(format!(
                "Bets can only be placed on scheduled matches, this match is {}",
                game.status.as_str()
            )));
        }

        if !game.involves(validated.team_id) {
            return Err(LeagueError::validation(format!(
                "Team {} does not play in this match",
                validated.team_id
            )));
        }

        if bet_queries::user_coaches_team_in(&mut tx, user_id, &game).await? {
            return Err(LeagueError::validation("You cannot bet on a match your own team is playing"));
        }

        if bet_queries::user_has_bet_on_match(&mut tx, user_id, match_id).await? {
            return Err(LeagueError::DuplicateBet { match_id });
        }

        let available = bet_queries::lock_treasury(&mut tx, user_id).await?;
        if validated.bet_amount > available {
            return Err(LeagueError::InsufficientFunds {
                requested: validated.bet_amount,
                available,
            });
        }

        bet_queries::adjust_treasury(&mut tx, user_id, -validated.bet_amount).await?;
        let bet = bet_queries::insert_bet(&mut tx, user_id, match_id, &validated).await?;

        tx.commit().await?;

        tracing::info!(
            "💰 User {} placed a {} bet of {}g on team {} in match {}",
            user_id,
            bet.bet_type.as_str(),
            bet.bet_amount,
            bet.team_id,
            match_id
        );
        Ok(bet)
    }

    /// Cancel an unresolved bet on a match that has not started and refund the stake.
    ///
    /// Locks the match before the bet, the same order result recording uses.
    #[tracing::instrument(name = "Cancel bet", skip(self))]
    pub async fn cancel_bet(&self, bet_id: Uuid, actor: Actor) -> Result<i64, LeagueError> {
        // A bet never moves to another match, so its match can be read unlocked
        let placed = bet_queries::get_bet(&self.pool, bet_id).await?;
        if placed.user_id != actor.user_id && !actor.is_admin() {
            return Err(LeagueError::Forbidden("You can only cancel your own bets".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let game = match_queries::lock_match(&mut tx, placed.match_id).await?;
        let bet = bet_queries::lock_bet(&mut tx, bet_id).await?;

        if bet.is_resolved {
            return Err(LeagueError::conflict(format!("Bet {} has already been resolved", bet_id)));
        }

        if game.status != MatchStatus::Scheduled {
            return Err(LeagueError::conflict(format!(
                "Match {} is {}, bets can no longer be cancelled",
                game.id,
                game.status.as_str()
            )));
        }

        let balance = bet_queries::adjust_treasury(&mut tx, bet.user_id, bet.bet_amount).await?;
        bet_queries::delete_bet(&mut tx, bet_id).await?;

        tx.commit().await?;

        tracing::info!("Bet {} cancelled, refunded {}g to user {}", bet_id, bet.bet_amount, bet.user_id);
        Ok(balance)
    }

    pub async fn list_bets(&self, user_id: Uuid) -> Result<Vec<Bet>, LeagueError> {
        bet_queries::bets_for_user(&self.pool, user_id).await
    }

    /// A single bet, visible to its owner and to admins
    pub async fn get_bet(&self, bet_id: Uuid, actor: Actor) -> Result<Bet, LeagueError> {
        let bet = bet_queries::get_bet(&self.pool, bet_id).await?;
        if bet.user_id != actor.user_id && !actor.is_admin() {
            return Err(LeagueError::Forbidden("You can only view your own bets".to_string()));
        }
        Ok(bet)
    }
}
