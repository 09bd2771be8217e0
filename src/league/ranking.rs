// Ordering of a season's standings table.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::league::scoring::ScoringRules;
use crate::models::common::MatchOutcome;
use crate::models::league::StandingWithTeam;

/// Final score of a completed match, enough to settle head-to-head ties
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PlayedScore {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
}

type HeadToHead = HashMap<Uuid, i32>;
type CmpFunc = fn(&StandingWithTeam, &StandingWithTeam, &HeadToHead) -> Ordering;

fn compare_head_to_head(a: &StandingWithTeam, b: &StandingWithTeam, h2h: &HeadToHead) -> Ordering {
    let a_points = h2h.get(&a.standing.team_id).copied().unwrap_or(0);
    let b_points = h2h.get(&b.standing.team_id).copied().unwrap_or(0);
    b_points.cmp(&a_points)
}

fn compare_touchdown_diff(a: &StandingWithTeam, b: &StandingWithTeam, _h2h: &HeadToHead) -> Ordering {
    b.standing.touchdown_diff().cmp(&a.standing.touchdown_diff())
}

fn compare_touchdowns_for(a: &StandingWithTeam, b: &StandingWithTeam, _h2h: &HeadToHead) -> Ordering {
    b.standing.touchdowns_for.cmp(&a.standing.touchdowns_for)
}

fn compare_casualties_inflicted(a: &StandingWithTeam, b: &StandingWithTeam, _h2h: &HeadToHead) -> Ordering {
    b.standing.casualties_inflicted.cmp(&a.standing.casualties_inflicted)
}

fn compare_team_name(a: &StandingWithTeam, b: &StandingWithTeam, _h2h: &HeadToHead) -> Ordering {
    a.team_name.cmp(&b.team_name)
}

// Applied in order to teams level on total points.
const TIE_BREAKERS: [CmpFunc; 5] = [
    compare_head_to_head,
    compare_touchdown_diff,
    compare_touchdowns_for,
    compare_casualties_inflicted,
    compare_team_name,
];

/// Points each team of `group` took off the other members of the group
fn head_to_head_points(group: &HashSet<Uuid>, results: &[PlayedScore], rules: &ScoringRules) -> HeadToHead {
    let mut points = HeadToHead::new();
    for result in results {
        if !group.contains(&result.home_team_id) || !group.contains(&result.away_team_id) {
            continue;
        }
        let home_outcome = MatchOutcome::from_scores(result.home_score, result.away_score);
        *points.entry(result.home_team_id).or_insert(0) += rules.points_for(home_outcome);
        *points.entry(result.away_team_id).or_insert(0) += rules.points_for(home_outcome.inverse());
    }
    points
}

/// Sort standings into table order and assign 1-based positions.
pub fn rank_standings(
    mut standings: Vec<StandingWithTeam>,
    results: &[PlayedScore],
    rules: &ScoringRules,
) -> Vec<StandingWithTeam> {
    standings.sort_by(|a, b| b.standing.total_points().cmp(&a.standing.total_points()));

    let mut start = 0;
    while start < standings.len() {
        let total = standings[start].standing.total_points();
        let end = standings[start..]
            .iter()
            .position(|s| s.standing.total_points() != total)
            .map_or(standings.len(), |offset| start + offset);

        if end - start > 1 {
            let group: HashSet<Uuid> = standings[start..end].iter().map(|s| s.standing.team_id).collect();
            let h2h = head_to_head_points(&group, results, rules);
            standings[start..end].sort_by(|a, b| {
                TIE_BREAKERS
                    .iter()
                    .map(|cmp| cmp(a, b, &h2h))
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }
        start = end;
    }

    for (index, entry) in standings.iter_mut().enumerate() {
        entry.standing.position = (index + 1) as i32;
    }
    standings
}
