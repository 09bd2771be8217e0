use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::betting::evaluation::BetOutcome;
use crate::error::LeagueError;
use crate::models::bet::{Bet, BetNotification, BetType};
use crate::models::common::format_gold;
use crate::models::matches::Match;

/// Human readable description of what a bet predicts
pub fn describe_bet(bet: &Bet, team_name: &str) -> String {
    match (bet.bet_type, bet.target_value) {
        (BetType::Win, _) => format!("{} wins the match", team_name),
        (BetType::TdExact, Some(target)) => format!("{} scores exactly {} touchdown(s)", team_name, target),
        (BetType::CasExact, Some(target)) => format!("{} inflicts exactly {} casualty(ies)", team_name, target),
        (BetType::TdExact, None) => format!("{} scores an exact number of touchdowns", team_name),
        (BetType::CasExact, None) => format!("{} inflicts an exact number of casualties", team_name),
    }
}

/// Message delivered to the bettor once the bet resolves
pub fn compose_message(bet: &Bet, outcome: &BetOutcome, game: &Match, home_name: &str, away_name: &str) -> String {
    let team_name = if bet.team_id == game.away_team_id { away_name } else { home_name };
    let match_result = format!(
        "{} {} - {} {}",
        home_name, game.home_score, game.away_score, away_name
    );

    if outcome.is_won {
        format!(
            "🎉 You won your bet! {} ({}). You bet {} and won {}.",
            describe_bet(bet, team_name),
            match_result,
            format_gold(bet.bet_amount),
            format_gold(outcome.payout)
        )
    } else {
        format!(
            "😞 You lost your bet. {} ({}). You lost {}.",
            describe_bet(bet, team_name),
            match_result,
            format_gold(bet.bet_amount)
        )
    }
}

pub async fn insert_notification_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    bet: &Bet,
    message: &str,
) -> Result<BetNotification, LeagueError> {
    let notification = sqlx::query_as::<_, BetNotification>(
        r#"
        INSERT INTO bet_notifications (user_id, bet_id, message)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(bet.user_id)
    .bind(bet.id)
    .bind(message)
    .fetch_one(&mut **tx)
    .await?;
    Ok(notification)
}

/// A user's bet notification inbox
#[derive(Debug)]
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first. Only unread ones unless `include_read` is set.
    pub async fn list(&self, user_id: Uuid, include_read: bool) -> Result<Vec<BetNotification>, LeagueError> {
        let notifications = sqlx::query_as::<_, BetNotification>(
            r#"
            SELECT * FROM bet_notifications
            WHERE user_id = $1 AND ($2 OR NOT is_read)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(include_read)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, LeagueError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bet_notifications WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Mark one notification read. Only its recipient may do so.
    pub async fn mark_read(&self, notification_id: Uuid, user_id: Uuid) -> Result<BetNotification, LeagueError> {
        let owner = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM bet_notifications WHERE id = $1")
            .bind(notification_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| LeagueError::NotFound(format!("Notification {}", notification_id)))?;

        if owner != user_id {
            return Err(LeagueError::Forbidden("Notification belongs to another user".to_string()));
        }

        let notification = sqlx::query_as::<_, BetNotification>(
            r#"
            UPDATE bet_notifications
            SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(notification_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(notification)
    }

    /// Returns how many notifications changed
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, LeagueError> {
        let result = sqlx::query(
            r#"
            UPDATE bet_notifications
            SET is_read = TRUE, read_at = NOW()
            WHERE user_id = $1 AND NOT is_read
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
