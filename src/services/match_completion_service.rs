use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::betting::BetResolutionEngine;
use crate::config::league::LeagueSettings;
use crate::db::{injuries, match_queries, records};
use crate::error::LeagueError;
use crate::league::scoring::{score_match, ScoringRules, StandingDelta};
use crate::league::standings::{correction_deltas, StandingsService};
use crate::league::validation::LeagueValidator;
use crate::models::bet::ResolutionSummary;
use crate::models::matches::{CompletionReport, Match, MatchDetails, MatchPlayerStats, MatchResult, MatchStatus};
use crate::models::team::{LevelUp, Team};
use crate::models::user::Actor;

/// Records finalized match results. Standings, careers, injuries, winnings and bets
/// all change in one transaction.
#[derive(Debug)]
pub struct MatchCompletionService {
    pool: PgPool,
    standings: StandingsService,
    bets: BetResolutionEngine,
    validator: LeagueValidator,
}

impl MatchCompletionService {
    pub fn new(pool: PgPool, settings: LeagueSettings) -> Self {
        Self {
            standings: StandingsService::new(pool.clone()),
            bets: BetResolutionEngine::new(pool.clone()),
            validator: LeagueValidator::new(settings),
            pool,
        }
    }

    /// Record the result of a match.
    ///
    /// Coaches of either team, the league commissioner and admins may record a
    /// result. An admin re-submitting a resolved match corrects it. Any failure rolls
    /// back every write and leaves the match eligible for a retry.
    #[tracing::instrument(
        name = "Record match result",
        skip(self, result),
        fields(score = %format!("{} - {}", result.home_score, result.away_score))
    )]
    pub async fn record_result(
        &self,
        match_id: Uuid,
        result: &MatchResult,
        actor: Actor,
    ) -> Result<CompletionReport, LeagueError> {
        let mut tx = self.pool.begin().await?;

        let previous = match_queries::lock_match(&mut tx, match_id).await?;
        let league = match_queries::league_for_season(&mut tx, previous.season_id).await?;
        let (home_coach, away_coach) = match_queries::coaches_of(&mut tx, &previous).await?;

        let may_record = actor.is_admin()
            || actor.user_id == home_coach
            || actor.user_id == away_coach
            || actor.user_id == league.commissioner_id;
        if !may_record {
            return Err(LeagueError::Forbidden(
                "Only the coaches of this match, the commissioner or an admin can record its result".to_string(),
            ));
        }

        if previous.status == MatchStatus::Cancelled {
            return Err(LeagueError::validation(format!("Match {} has been cancelled", match_id)));
        }

        let correction = previous.is_resolved;
        if correction && !actor.is_admin() {
            return Err(LeagueError::validation(format!(
                "A result has already been recorded for match {}",
                match_id
            )));
        }

        self.validator.validate_match_result(result)?;
        let team_of = self.player_teams_in_match(&mut tx, &previous, result).await?;

        let rules = league.scoring_rules();
        let updated = match_queries::write_result(&mut tx, match_id, result, &rules, actor.user_id).await?;

        let (home_standing, away_standing) = if correction {
            self.standings
                .correct_standings_in_tx(&mut tx, &previous, &updated, &rules)
                .await?
        } else {
            self.standings.update_standings_in_tx(&mut tx, &updated, &rules).await?
        };

        let (home_record, away_record) = record_deltas(&previous, &updated, correction, &rules);
        records::apply_team_record_delta(&mut tx, updated.home_team_id, &home_record).await?;
        records::apply_team_record_delta(&mut tx, updated.away_team_id, &away_record).await?;

        let (home_winnings, away_winnings) = winnings_deltas(&previous, &updated, correction);
        records::credit_team_winnings(&mut tx, updated.home_team_id, home_winnings).await?;
        records::credit_team_winnings(&mut tx, updated.away_team_id, away_winnings).await?;

        let levels_before = if correction {
            let reversed = injuries::reverse_injuries(&mut tx, match_id).await?;
            let levels_before = records::remove_stat_lines(&mut tx, match_id).await?;
            tracing::debug!(
                "Reversed {} injuries and {} stat lines of match {}",
                reversed,
                levels_before.len(),
                match_id
            );
            levels_before
        } else {
            HashMap::new()
        };
        let (_, level_changes) = records::record_stat_lines(&mut tx, match_id, &result.player_stats, &team_of).await?;
        let injuries = injuries::apply_injuries(&mut tx, match_id, &result.player_stats).await?;

        // A correction reports only levels above those held before it
        let level_ups: Vec<LevelUp> = level_changes
            .into_iter()
            .filter_map(|mut change| {
                if let Some(before) = levels_before.get(&change.player_id) {
                    change.previous_level = *before;
                }
                change.level_up()
            })
            .collect();
        for level_up in &level_ups {
            tracing::info!("⭐ {} reached level {}", level_up.name, level_up.level);
        }

        // Resolved bets are never re-settled by a correction
        let bets = if correction {
            ResolutionSummary::default()
        } else {
            self.bets.resolve_bets_in_tx(&mut tx, &updated).await?
        };

        let game = match_queries::lock_match(&mut tx, match_id).await?;
        tx.commit().await?;

        tracing::info!(
            "✅ Recorded result for match {}: {}{}",
            match_id,
            game.score_line(),
            if correction { " (correction)" } else { "" }
        );

        Ok(CompletionReport {
            game,
            home_standing,
            away_standing,
            bets,
            level_ups,
            injuries,
            corrected: correction,
        })
    }

    /// Map every player with a stat line to their team, rejecting players from
    /// outside the match and a second MVP on one team
    async fn player_teams_in_match(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: &Match,
        result: &MatchResult,
    ) -> Result<HashMap<Uuid, Uuid>, LeagueError> {
        let player_ids = result.player_stats.iter().map(|line| line.player_id).collect();
        let team_of = match_queries::player_teams(tx, player_ids).await?;

        for line in &result.player_stats {
            match team_of.get(&line.player_id) {
                Some(team_id) if game.involves(*team_id) => {}
                _ => {
                    return Err(LeagueError::validation(format!(
                        "Player {} does not play for either team of this match",
                        line.player_id
                    )))
                }
            }
        }

        self.validator
            .validate_mvp_awards(&result.player_stats, |player_id| team_of.get(&player_id).copied())?;
        Ok(team_of)
    }

    /// A match with both teams, its stat lines and the injuries suffered in it
    pub async fn get_match(&self, match_id: Uuid) -> Result<MatchDetails, LeagueError> {
        let game = match_queries::get_match(&self.pool, match_id).await?;
        let team = |team_id: Uuid| {
            sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = $1")
                .bind(team_id)
                .fetch_one(&self.pool)
        };
        let home_team = team(game.home_team_id).await?;
        let away_team = team(game.away_team_id).await?;

        let player_stats = sqlx::query_as::<_, MatchPlayerStats>(
            "SELECT * FROM match_player_stats WHERE match_id = $1 ORDER BY team_id, player_id",
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;
        let injuries = injuries::injuries_for_match(&self.pool, match_id).await?;

        Ok(MatchDetails {
            game,
            home_team,
            away_team,
            player_stats,
            injuries,
        })
    }
}

/// Team record changes for a new result, or for replacing `previous` with `updated`
fn record_deltas(
    previous: &Match,
    updated: &Match,
    correction: bool,
    rules: &ScoringRules,
) -> (StandingDelta, StandingDelta) {
    if correction {
        correction_deltas(previous, updated, rules)
    } else {
        score_match(updated.home_tally(), updated.away_tally(), rules)
    }
}

/// Treasury change of each team: the full winnings of a new result, or the
/// difference to the previously credited winnings on a correction
fn winnings_deltas(previous: &Match, updated: &Match, correction: bool) -> (i64, i64) {
    if correction {
        (
            updated.home_winnings - previous.home_winnings,
            updated.away_winnings - previous.away_winnings,
        )
    } else {
        (updated.home_winnings, updated.away_winnings)
    }
}
