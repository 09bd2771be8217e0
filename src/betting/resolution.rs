use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::betting::evaluation::settle;
use crate::betting::notifications::{compose_message, insert_notification_in_tx};
use crate::db::{bet_queries, match_queries};
use crate::error::LeagueError;
use crate::models::bet::ResolutionSummary;
use crate::models::matches::{Match, MatchStatus};

/// Settles the pending bets of a completed match
#[derive(Debug)]
pub struct BetResolutionEngine {
    pool: PgPool,
}

impl BetResolutionEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve whatever bets on a completed match are still pending.
    /// A match that is not completed resolves nothing.
    #[tracing::instrument(name = "Resolve bets", skip(self))]
    pub async fn resolve_bets(&self, match_id: Uuid) -> Result<ResolutionSummary, LeagueError> {
        let mut tx = self.pool.begin().await?;

        let game = match_queries::lock_match(&mut tx, match_id).await?;
        if game.status != MatchStatus::Completed {
            tracing::info!("Match {} is {}, no bets to resolve", match_id, game.status.as_str());
            return Ok(ResolutionSummary::default());
        }

        let summary = self.resolve_bets_in_tx(&mut tx, &game).await?;
        tx.commit().await?;
        Ok(summary)
    }

    /// Resolve the pending bets of `game` inside the caller's transaction.
    ///
    /// Every pending bet is marked resolved exactly once, winners are credited and
    /// each bettor gets one notification.
    pub async fn resolve_bets_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: &Match,
    ) -> Result<ResolutionSummary, LeagueError> {
        let pending = bet_queries::lock_pending_bets(tx, game.id).await?;
        if pending.is_empty() {
            return Ok(ResolutionSummary::default());
        }

        let (home_name, away_name) = match_queries::team_names(tx, game).await?;
        let mut summary = ResolutionSummary::default();

        for bet in &pending {
            let outcome = settle(bet, game);

            if !bet_queries::settle_bet(tx, bet.id, &outcome).await? {
                tracing::warn!("Bet {} was resolved concurrently, skipping", bet.id);
                continue;
            }

            if outcome.is_won {
                bet_queries::adjust_treasury(tx, bet.user_id, outcome.payout).await?;
                summary.won_count += 1;
                summary.total_payout += outcome.payout;
            } else {
                summary.total_stakes_lost += bet.bet_amount;
            }

            let message = compose_message(bet, &outcome, game, &home_name, &away_name);
            let notification = insert_notification_in_tx(tx, bet, &message).await?;
            summary.notifications.push(notification);
            summary.resolved_count += 1;
        }

        tracing::info!(
            "🎲 Resolved {} bets for match {}: {} won, {}g paid out, {}g lost",
            summary.resolved_count,
            game.id,
            summary.won_count,
            summary.total_payout,
            summary.total_stakes_lost
        );
        Ok(summary)
    }
}
