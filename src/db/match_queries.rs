use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::LeagueError;
use crate::league::ranking::PlayedScore;
use crate::league::scoring::ScoringRules;
use crate::models::league::League;
use crate::models::matches::{Match, MatchResult};

/// Lock a match row for the rest of the transaction
pub async fn lock_match(tx: &mut Transaction<'_, Postgres>, match_id: Uuid) -> Result<Match, LeagueError> {
    sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1 FOR UPDATE")
        .bind(match_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| LeagueError::NotFound(format!("Match {}", match_id)))
}

pub async fn get_match(pool: &PgPool, match_id: Uuid) -> Result<Match, LeagueError> {
    sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1")
        .bind(match_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| LeagueError::NotFound(format!("Match {}", match_id)))
}

/// League a season belongs to, for its scoring rules and commissioner
pub async fn league_for_season(
    tx: &mut Transaction<'_, Postgres>,
    season_id: Uuid,
) -> Result<League, LeagueError> {
    sqlx::query_as::<_, League>(
        r#"
        SELECT l.*
        FROM leagues l
        JOIN seasons s ON s.league_id = l.id
        WHERE s.id = $1
        "#,
    )
    .bind(season_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| LeagueError::NotFound(format!("League for season {}", season_id)))
}

/// Persist a finalized result and mark the match completed. `rules` are stored
/// with the result so a later correction reverses exactly what was applied.
pub async fn write_result(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
    result: &MatchResult,
    rules: &ScoringRules,
    validated_by: Uuid,
) -> Result<Match, LeagueError> {
    let updated = sqlx::query_as::<_, Match>(
        r#"
        UPDATE matches
        SET
            home_score = $2,
            away_score = $3,
            home_casualties = $4,
            away_casualties = $5,
            home_completions = $6,
            away_completions = $7,
            notes = $8,
            status = 'completed',
            played_at = COALESCE(played_at, NOW()),
            validated_by = $9,
            home_winnings = $10,
            away_winnings = $11,
            applied_win_points = $12,
            applied_draw_points = $13,
            applied_loss_points = $14,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(match_id)
    .bind(result.home_score)
    .bind(result.away_score)
    .bind(result.home_casualties)
    .bind(result.away_casualties)
    .bind(result.home_completions)
    .bind(result.away_completions)
    .bind(&result.notes)
    .bind(validated_by)
    .bind(result.home_winnings)
    .bind(result.away_winnings)
    .bind(rules.win_points)
    .bind(rules.draw_points)
    .bind(rules.loss_points)
    .fetch_one(&mut **tx)
    .await?;

    Ok(updated)
}

/// Set the resolved marker. Fails if another completion got there first.
pub async fn mark_resolved(tx: &mut Transaction<'_, Postgres>, match_id: Uuid) -> Result<(), LeagueError> {
    let result = sqlx::query(
        r#"
        UPDATE matches
        SET is_resolved = TRUE, resolved_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND is_resolved = FALSE
        "#,
    )
    .bind(match_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(LeagueError::conflict(format!("Match {} has already been resolved", match_id)));
    }
    Ok(())
}

/// Coach ids of the home and away team
pub async fn coaches_of(tx: &mut Transaction<'_, Postgres>, game: &Match) -> Result<(Uuid, Uuid), LeagueError> {
    let rows = sqlx::query_as::<_, (Uuid, Uuid)>("SELECT id, coach_id FROM teams WHERE id = $1 OR id = $2")
        .bind(game.home_team_id)
        .bind(game.away_team_id)
        .fetch_all(&mut **tx)
        .await?;

    let coaches: HashMap<Uuid, Uuid> = rows.into_iter().collect();
    let home = coaches
        .get(&game.home_team_id)
        .copied()
        .ok_or_else(|| LeagueError::NotFound(format!("Team {}", game.home_team_id)))?;
    let away = coaches
        .get(&game.away_team_id)
        .copied()
        .ok_or_else(|| LeagueError::NotFound(format!("Team {}", game.away_team_id)))?;
    Ok((home, away))
}

/// Names of the home and away team
pub async fn team_names(tx: &mut Transaction<'_, Postgres>, game: &Match) -> Result<(String, String), LeagueError> {
    let rows = sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM teams WHERE id = $1 OR id = $2")
        .bind(game.home_team_id)
        .bind(game.away_team_id)
        .fetch_all(&mut **tx)
        .await?;

    let mut names: HashMap<Uuid, String> = rows.into_iter().collect();
    let home = names.remove(&game.home_team_id).unwrap_or_else(|| "Home team".to_string());
    let away = names.remove(&game.away_team_id).unwrap_or_else(|| "Away team".to_string());
    Ok((home, away))
}

/// Team of every listed player that exists
pub async fn player_teams(
    tx: &mut Transaction<'_, Postgres>,
    player_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Uuid>, LeagueError> {
    if player_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, (Uuid, Uuid)>("SELECT id, team_id FROM players WHERE id = ANY($1)")
        .bind(player_ids)
        .fetch_all(&mut **tx)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Final scores of every resolved match of a season
pub async fn completed_scores_for_season(
    tx: &mut Transaction<'_, Postgres>,
    season_id: Uuid,
) -> Result<Vec<PlayedScore>, LeagueError> {
    let scores = sqlx::query_as::<_, PlayedScore>(
        r#"
        SELECT home_team_id, away_team_id, home_score, away_score
        FROM matches
        WHERE season_id = $1 AND status = 'completed' AND is_resolved
        "#,
    )
    .bind(season_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(scores)
}
