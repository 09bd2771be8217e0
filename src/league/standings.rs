use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::match_queries;
use crate::error::LeagueError;
use crate::league::ranking::rank_standings;
use crate::league::scoring::{score_match, ScoringRules, StandingDelta};
use crate::models::league::*;
use crate::models::matches::{Match, MatchStatus};

/// Service responsible for managing league standings
#[derive(Debug)]
pub struct StandingsService {
    pool: PgPool,
}

impl StandingsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply a completed match to both teams' standings and set the match's resolved marker.
    ///
    /// The caller must hold the lock on the match row.
    pub async fn update_standings_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: &Match,
        rules: &ScoringRules,
    ) -> Result<(Standing, Standing), LeagueError> {
        if game.status != MatchStatus::Completed {
            return Err(LeagueError::validation(format!(
                "Match {} is {}, standings are only updated for completed matches",
                game.id,
                game.status.as_str()
            )));
        }

        if game.is_resolved {
            return Err(LeagueError::conflict(format!(
                "Standings for match {} have already been applied",
                game.id
            )));
        }

        tracing::info!(
            "🏆 Updating standings for match {}: {} (home team: {}, away team: {})",
            game.id,
            game.score_line(),
            game.home_team_id,
            game.away_team_id
        );

        // Marked first so the head-to-head pass of the ranking sees this result
        match_queries::mark_resolved(tx, game.id).await?;

        let (home_delta, away_delta) = score_match(game.home_tally(), game.away_tally(), rules);
        let standings = self.apply_match_deltas_in_tx(tx, game, &home_delta, &away_delta).await?;

        tracing::info!(
            "🏆 Points awarded: home team {} gets {} (+{} bonus), away team {} gets {} (+{} bonus)",
            game.home_team_id,
            home_delta.points,
            home_delta.bonus_points(),
            game.away_team_id,
            away_delta.points,
            away_delta.bonus_points()
        );

        Ok(standings)
    }

    /// Replace the contribution of `previous` with that of `corrected` for an
    /// already resolved match. The previous result is taken back out with the
    /// rules it was scored under, the corrected one goes in with `rules`.
    pub async fn correct_standings_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        previous: &Match,
        corrected: &Match,
        rules: &ScoringRules,
    ) -> Result<(Standing, Standing), LeagueError> {
        if !previous.is_resolved {
            return Err(LeagueError::conflict(format!(
                "Match {} has no applied result to correct",
                previous.id
            )));
        }

        let (home_delta, away_delta) = correction_deltas(previous, corrected, rules);

        tracing::info!(
            "Correcting standings for match {}: {} -> {}",
            corrected.id,
            previous.score_line(),
            corrected.score_line()
        );

        self.apply_match_deltas_in_tx(tx, corrected, &home_delta, &away_delta).await
    }

    async fn apply_match_deltas_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: &Match,
        home_delta: &StandingDelta,
        away_delta: &StandingDelta,
    ) -> Result<(Standing, Standing), LeagueError> {
        // Lock in a fixed order so two matches sharing a team cannot deadlock
        let mut teams = [(game.home_team_id, home_delta), (game.away_team_id, away_delta)];
        teams.sort_by_key(|(team_id, _)| *team_id);

        for (team_id, _) in &teams {
            self.get_or_create_in_tx(tx, game.season_id, *team_id).await?;
        }
        for (team_id, delta) in &teams {
            self.apply_delta_in_tx(tx, game.season_id, *team_id, delta).await?;
        }

        self.recalculate_positions_in_tx(tx, game.season_id).await?;

        let home = self.fetch_standing_in_tx(tx, game.season_id, game.home_team_id).await?;
        let away = self.fetch_standing_in_tx(tx, game.season_id, game.away_team_id).await?;
        Ok((home, away))
    }

    /// Locked standing row of a team, created with zeroed counters when missing
    pub async fn get_or_create_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        season_id: Uuid,
        team_id: Uuid,
    ) -> Result<Standing, LeagueError> {
        sqlx::query(
            r#"
            INSERT INTO standings (season_id, team_id)
            VALUES ($1, $2)
            ON CONFLICT (season_id, team_id) DO NOTHING
            "#,
        )
        .bind(season_id)
        .bind(team_id)
        .execute(&mut **tx)
        .await?;

        let standing = sqlx::query_as::<_, Standing>(
            "SELECT * FROM standings WHERE season_id = $1 AND team_id = $2 FOR UPDATE",
        )
        .bind(season_id)
        .bind(team_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(standing)
    }

    async fn apply_delta_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        season_id: Uuid,
        team_id: Uuid,
        delta: &StandingDelta,
    ) -> Result<Standing, LeagueError> {
        let standing = sqlx::query_as::<_, Standing>(
            r#"
            UPDATE standings
            SET
                played = played + $3,
                wins = wins + $4,
                draws = draws + $5,
                losses = losses + $6,
                points = points + $7,
                bonus_high_scoring = bonus_high_scoring + $8,
                bonus_opponent_high_scoring = bonus_opponent_high_scoring + $9,
                bonus_casualties = bonus_casualties + $10,
                bonus_points = bonus_points + $8 + $9 + $10,
                touchdowns_for = touchdowns_for + $11,
                touchdowns_against = touchdowns_against + $12,
                casualties_inflicted = casualties_inflicted + $13,
                casualties_suffered = casualties_suffered + $14,
                last_updated = NOW()
            WHERE season_id = $1 AND team_id = $2
            RETURNING *
            "#,
        )
        .bind(season_id)
        .bind(team_id)
        .bind(delta.played)
        .bind(delta.wins)
        .bind(delta.draws)
        .bind(delta.losses)
        .bind(delta.points)
        .bind(delta.bonus_high_scoring)
        .bind(delta.bonus_opponent_high_scoring)
        .bind(delta.bonus_casualties)
        .bind(delta.touchdowns_for)
        .bind(delta.touchdowns_against)
        .bind(delta.casualties_inflicted)
        .bind(delta.casualties_suffered)
        .fetch_one(&mut **tx)
        .await?;

        debug_assert!(
            standing.bonus_counters_consistent(),
            "bonus counters out of sync for team {}",
            team_id
        );
        Ok(standing)
    }

    async fn fetch_standing_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        season_id: Uuid,
        team_id: Uuid,
    ) -> Result<Standing, LeagueError> {
        let standing = sqlx::query_as::<_, Standing>("SELECT * FROM standings WHERE season_id = $1 AND team_id = $2")
            .bind(season_id)
            .bind(team_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(standing)
    }

    /// Recalculate all positions of a season with the full tie-break order
    async fn recalculate_positions_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        season_id: Uuid,
    ) -> Result<(), LeagueError> {
        let league = match_queries::league_for_season(tx, season_id).await?;
        let standings = Self::standings_with_teams(tx, season_id).await?;
        let results = match_queries::completed_scores_for_season(tx, season_id).await?;

        let ranked = rank_standings(standings, &results, &league.scoring_rules());

        for entry in &ranked {
            sqlx::query("UPDATE standings SET position = $1 WHERE id = $2")
                .bind(entry.standing.position)
                .bind(entry.standing.id)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    async fn standings_with_teams(
        tx: &mut Transaction<'_, Postgres>,
        season_id: Uuid,
    ) -> Result<Vec<StandingWithTeam>, LeagueError> {
        let rows = sqlx::query_as::<_, StandingWithTeam>(
            r#"
            SELECT s.*, t.name AS team_name
            FROM standings s
            JOIN teams t ON s.team_id = t.id
            WHERE s.season_id = $1
            "#,
        )
        .bind(season_id)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows)
    }

    /// Get league standings for a season, in table order
    pub async fn get_league_standings(&self, season_id: Uuid) -> Result<LeagueStandingsResponse, LeagueError> {
        let season = sqlx::query_as::<_, Season>("SELECT * FROM seasons WHERE id = $1")
            .bind(season_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| LeagueError::NotFound(format!("Season {}", season_id)))?;

        let league = sqlx::query_as::<_, League>("SELECT * FROM leagues WHERE id = $1")
            .bind(season.league_id)
            .fetch_one(&self.pool)
            .await?;

        let standings = sqlx::query_as::<_, StandingWithTeam>(
            r#"
            SELECT s.*, t.name AS team_name
            FROM standings s
            JOIN teams t ON s.team_id = t.id
            WHERE s.season_id = $1
            ORDER BY s.position ASC, t.name ASC
            "#,
        )
        .bind(season_id)
        .fetch_all(&self.pool)
        .await?;

        let last_updated = standings.iter().map(|s| s.standing.last_updated).max();

        Ok(LeagueStandingsResponse {
            season,
            scoring: league.scoring_rules(),
            standings,
            last_updated,
        })
    }

    /// Standings of a league's active season
    pub async fn get_current_standings(&self, league_id: Uuid) -> Result<LeagueStandingsResponse, LeagueError> {
        let season_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM seasons WHERE league_id = $1 AND is_active")
            .bind(league_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| LeagueError::NotFound(format!("Active season for league {}", league_id)))?;

        self.get_league_standings(season_id).await
    }
}

/// Net standing change of replacing `previous` with `corrected`
pub fn correction_deltas(previous: &Match, corrected: &Match, rules: &ScoringRules) -> (StandingDelta, StandingDelta) {
    let previous_rules = previous.applied_rules().unwrap_or(*rules);
    let (old_home, old_away) = score_match(previous.home_tally(), previous.away_tally(), &previous_rules);
    let (new_home, new_away) = score_match(corrected.home_tally(), corrected.away_tally(), rules);

    (old_home.reversed().combine(&new_home), old_away.reversed().combine(&new_away))
}
