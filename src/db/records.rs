// Team career records and per-player match statistics.

use std::collections::HashMap;

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::error::LeagueError;
use crate::league::progression::level_for_spp;
use crate::league::scoring::StandingDelta;
use crate::models::matches::{MatchPlayerStats, PlayerStatLine};
use crate::models::team::LevelUp;

/// A player's level before and after one stat line was applied
#[derive(Debug, Clone)]
pub struct LevelChange {
    pub player_id: Uuid,
    pub name: String,
    pub previous_level: i32,
    pub level: i32,
}

impl LevelChange {
    pub fn level_up(&self) -> Option<LevelUp> {
        (self.level > self.previous_level).then(|| LevelUp {
            player_id: self.player_id,
            name: self.name.clone(),
            previous_level: self.previous_level,
            level: self.level,
        })
    }
}

/// Add a standing delta to a team's career record
pub async fn apply_team_record_delta(
    tx: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
    delta: &StandingDelta,
) -> Result<(), LeagueError> {
    sqlx::query(
        r#"
        UPDATE teams
        SET
            games_played = games_played + $2,
            wins = wins + $3,
            draws = draws + $4,
            losses = losses + $5,
            touchdowns_for = touchdowns_for + $6,
            touchdowns_against = touchdowns_against + $7,
            casualties_inflicted = casualties_inflicted + $8,
            casualties_suffered = casualties_suffered + $9,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(team_id)
    .bind(delta.played)
    .bind(delta.wins)
    .bind(delta.draws)
    .bind(delta.losses)
    .bind(delta.touchdowns_for)
    .bind(delta.touchdowns_against)
    .bind(delta.casualties_inflicted)
    .bind(delta.casualties_suffered)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Credit (or with a negative amount, take back) match winnings to a team's treasury
pub async fn credit_team_winnings(
    tx: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
    amount: i64,
) -> Result<i64, LeagueError> {
    let treasury = sqlx::query_scalar::<_, i64>(
        "UPDATE teams SET treasury = treasury + $2, updated_at = NOW() WHERE id = $1 RETURNING treasury",
    )
    .bind(team_id)
    .bind(amount)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| LeagueError::NotFound(format!("Team {}", team_id)))?;

    Ok(treasury)
}

pub async fn stat_lines_for_match(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
) -> Result<Vec<MatchPlayerStats>, LeagueError> {
    let lines = sqlx::query_as::<_, MatchPlayerStats>(
        "SELECT * FROM match_player_stats WHERE match_id = $1 ORDER BY team_id, player_id",
    )
    .bind(match_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(lines)
}

/// Add (`sign = 1`) or remove (`sign = -1`) one stat line from a player's career
/// and move the player to the level their new SPP total reaches
async fn apply_career_line(
    tx: &mut Transaction<'_, Postgres>,
    line: &PlayerStatLine,
    sign: i32,
) -> Result<LevelChange, LeagueError> {
    // `level` is not touched here, so RETURNING yields the level before this line
    let (name, spp, previous_level) = sqlx::query_as::<_, (String, i32, i32)>(
        r#"
        UPDATE players
        SET
            spp = spp + $2,
            touchdowns = touchdowns + $3,
            completions = completions + $4,
            interceptions = interceptions + $5,
            deflections = deflections + $6,
            casualties_inflicted = casualties_inflicted + $7,
            mvp_awards = mvp_awards + $8,
            games_played = games_played + $9
        WHERE id = $1
        RETURNING name, spp, level
        "#,
    )
    .bind(line.player_id)
    .bind(sign * line.spp())
    .bind(sign * line.touchdowns)
    .bind(sign * line.completions)
    .bind(sign * line.interceptions)
    .bind(sign * line.deflections)
    .bind(sign * line.casualties)
    .bind(sign * i32::from(line.is_mvp))
    .bind(sign)
    .fetch_one(&mut **tx)
    .await?;

    let level = level_for_spp(spp);
    if level != previous_level {
        sqlx::query("UPDATE players SET level = $2 WHERE id = $1")
            .bind(line.player_id)
            .bind(level)
            .execute(&mut **tx)
            .await?;
    }

    Ok(LevelChange {
        player_id: line.player_id,
        name,
        previous_level,
        level,
    })
}

/// Store the stat lines of a match and credit each player's career.
/// `team_of` must hold an entry for every listed player.
pub async fn record_stat_lines(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
    lines: &[PlayerStatLine],
    team_of: &HashMap<Uuid, Uuid>,
) -> Result<(Vec<MatchPlayerStats>, Vec<LevelChange>), LeagueError> {
    let mut stored = Vec::with_capacity(lines.len());
    let mut levels = Vec::with_capacity(lines.len());

    for line in lines {
        let team_id = team_of
            .get(&line.player_id)
            .copied()
            .ok_or_else(|| LeagueError::validation(format!("Player {} does not play in this match", line.player_id)))?;

        let row = sqlx::query_as::<_, MatchPlayerStats>(
            r#"
            INSERT INTO match_player_stats (
                match_id, player_id, team_id, touchdowns, completions,
                interceptions, deflections, casualties_inflicted, is_mvp, spp_earned, injury
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(match_id)
        .bind(line.player_id)
        .bind(team_id)
        .bind(line.touchdowns)
        .bind(line.completions)
        .bind(line.interceptions)
        .bind(line.deflections)
        .bind(line.casualties)
        .bind(line.is_mvp)
        .bind(line.spp())
        .bind(line.injury)
        .fetch_one(&mut **tx)
        .await?;

        levels.push(apply_career_line(tx, line, 1).await?);
        stored.push(row);
    }

    tracing::debug!("Recorded {} stat lines for match {}", stored.len(), match_id);
    Ok((stored, levels))
}

/// Take a match's stat lines back out of the players' careers and delete them.
/// Returns each affected player's level from before the removal.
pub async fn remove_stat_lines(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
) -> Result<HashMap<Uuid, i32>, LeagueError> {
    let existing = stat_lines_for_match(tx, match_id).await?;
    let mut levels_before = HashMap::with_capacity(existing.len());

    for row in &existing {
        let change = apply_career_line(tx, &row.as_line(), -1).await?;
        levels_before.insert(change.player_id, change.previous_level);
    }

    sqlx::query("DELETE FROM match_player_stats WHERE match_id = $1")
        .bind(match_id)
        .execute(&mut **tx)
        .await?;

    Ok(levels_before)
}
