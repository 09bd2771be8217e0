use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::betting::evaluation::BetOutcome;
use crate::error::LeagueError;
use crate::league::validation::ValidatedBet;
use crate::models::bet::Bet;
use crate::models::matches::Match;

pub async fn insert_bet(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    match_id: Uuid,
    bet: &ValidatedBet,
) -> Result<Bet, LeagueError> {
    let inserted = sqlx::query_as::<_, Bet>(
        r#"
        INSERT INTO bets (user_id, match_id, team_id, bet_type, target_value, bet_amount, odds)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(match_id)
    .bind(bet.team_id)
    .bind(bet.bet_type)
    .bind(bet.target_value)
    .bind(bet.bet_amount)
    .bind(bet.odds)
    .fetch_one(&mut **tx)
    .await;

    match inserted {
        Ok(bet) => Ok(bet),
        // Concurrent placement that slipped past the existence check
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(LeagueError::DuplicateBet { match_id })
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn user_has_bet_on_match(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    match_id: Uuid,
) -> Result<bool, LeagueError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM bets WHERE user_id = $1 AND match_id = $2)",
    )
    .bind(user_id)
    .bind(match_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(exists)
}

/// Whether the user coaches either team of the match
pub async fn user_coaches_team_in(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    game: &Match,
) -> Result<bool, LeagueError> {
    let coaches = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM teams WHERE coach_id = $1 AND (id = $2 OR id = $3))",
    )
    .bind(user_id)
    .bind(game.home_team_id)
    .bind(game.away_team_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(coaches)
}

/// Unresolved bets on a match, locked until the transaction ends
pub async fn lock_pending_bets(tx: &mut Transaction<'_, Postgres>, match_id: Uuid) -> Result<Vec<Bet>, LeagueError> {
    let bets = sqlx::query_as::<_, Bet>(
        r#"
        SELECT * FROM bets
        WHERE match_id = $1 AND NOT is_resolved
        ORDER BY placed_at, id
        FOR UPDATE
        "#,
    )
    .bind(match_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(bets)
}

/// Record a bet's outcome. Returns false if it had already been resolved.
pub async fn settle_bet(
    tx: &mut Transaction<'_, Postgres>,
    bet_id: Uuid,
    outcome: &BetOutcome,
) -> Result<bool, LeagueError> {
    let result = sqlx::query(
        r#"
        UPDATE bets
        SET is_resolved = TRUE, is_won = $2, payout = $3, resolved_at = NOW()
        WHERE id = $1 AND NOT is_resolved
        "#,
    )
    .bind(bet_id)
    .bind(outcome.is_won)
    .bind(outcome.payout)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn lock_bet(tx: &mut Transaction<'_, Postgres>, bet_id: Uuid) -> Result<Bet, LeagueError> {
    sqlx::query_as::<_, Bet>("SELECT * FROM bets WHERE id = $1 FOR UPDATE")
        .bind(bet_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| LeagueError::NotFound(format!("Bet {}", bet_id)))
}

pub async fn delete_bet(tx: &mut Transaction<'_, Postgres>, bet_id: Uuid) -> Result<(), LeagueError> {
    sqlx::query("DELETE FROM bets WHERE id = $1")
        .bind(bet_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn get_bet(pool: &PgPool, bet_id: Uuid) -> Result<Bet, LeagueError> {
    sqlx::query_as::<_, Bet>("SELECT * FROM bets WHERE id = $1")
        .bind(bet_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| LeagueError::NotFound(format!("Bet {}", bet_id)))
}

pub async fn bets_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Bet>, LeagueError> {
    let bets = sqlx::query_as::<_, Bet>("SELECT * FROM bets WHERE user_id = $1 ORDER BY placed_at DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(bets)
}

/// Current treasury of a user, with the row locked
pub async fn lock_treasury(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> Result<i64, LeagueError> {
    sqlx::query_scalar::<_, i64>("SELECT treasury FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| LeagueError::NotFound(format!("User {}", user_id)))
}

/// Add `amount` (negative to debit) to a treasury and return the new balance
pub async fn adjust_treasury(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    amount: i64,
) -> Result<i64, LeagueError> {
    let balance = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE users
        SET treasury = treasury + $2, updated_at = NOW()
        WHERE id = $1
        RETURNING treasury
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| LeagueError::NotFound(format!("User {}", user_id)))?;
    Ok(balance)
}
