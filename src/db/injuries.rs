// Lasting injuries from stat lines, and their reversal on correction.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::LeagueError;
use crate::league::progression::{Characteristic, InjuryType};
use crate::models::matches::PlayerStatLine;
use crate::models::team::{Player, PlayerInjury};

async fn lock_player(tx: &mut Transaction<'_, Postgres>, player_id: Uuid) -> Result<Player, LeagueError> {
    sqlx::query_as::<_, Player>("SELECT * FROM players WHERE id = $1 FOR UPDATE")
        .bind(player_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| LeagueError::NotFound(format!("Player {}", player_id)))
}

fn characteristic_value(player: &Player, characteristic: Characteristic) -> Option<i32> {
    match characteristic {
        Characteristic::Movement => Some(player.movement),
        Characteristic::Strength => Some(player.strength),
        Characteristic::Agility => Some(player.agility),
        Characteristic::Passing => player.passing,
        Characteristic::Armor => Some(player.armor),
    }
}

/// Apply the injury of one stat line to its player. Returns the stored injury,
/// or `None` when the injury leaves no lasting effect.
async fn apply_injury(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
    player_id: Uuid,
    injury: InjuryType,
) -> Result<Option<PlayerInjury>, LeagueError> {
    if !injury.is_lasting() {
        return Ok(None);
    }

    let player = lock_player(tx, player_id).await?;
    let mut stat_change = 0;

    match injury {
        InjuryType::MissNextGame => {
            sqlx::query("UPDATE players SET miss_next_game = TRUE WHERE id = $1")
                .bind(player_id)
                .execute(&mut **tx)
                .await?;
        }
        InjuryType::Niggling => {
            sqlx::query("UPDATE players SET niggling_injuries = niggling_injuries + 1 WHERE id = $1")
                .bind(player_id)
                .execute(&mut **tx)
                .await?;
        }
        InjuryType::Dead => {
            sqlx::query("UPDATE players SET is_dead = TRUE, is_active = FALSE WHERE id = $1")
                .bind(player_id)
                .execute(&mut **tx)
                .await?;
        }
        _ => {
            if let Some(characteristic) = injury.characteristic() {
                let current = characteristic_value(&player, characteristic);
                let reduced = Characteristic::reduced(current);
                if let (Some(before), Some(after)) = (current, reduced) {
                    stat_change = before - after;
                }
                if stat_change != 0 {
                    let statement = format!("UPDATE players SET {0} = {0} - $2 WHERE id = $1", characteristic.column());
                    sqlx::query(&statement)
                        .bind(player_id)
                        .bind(stat_change)
                        .execute(&mut **tx)
                        .await?;
                }
            }
        }
    }

    let stored = sqlx::query_as::<_, PlayerInjury>(
        r#"
        INSERT INTO player_injuries (player_id, match_id, injury_type, is_permanent, stat_change)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(player_id)
    .bind(match_id)
    .bind(injury)
    .bind(injury.is_permanent())
    .bind(stat_change)
    .fetch_one(&mut **tx)
    .await?;

    tracing::info!("🩹 {} suffered {} in match {}", player.name, injury.as_str(), match_id);
    Ok(Some(stored))
}

/// Apply the injuries entered on a match's stat lines
pub async fn apply_injuries(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
    lines: &[PlayerStatLine],
) -> Result<Vec<PlayerInjury>, LeagueError> {
    let mut injuries = Vec::new();
    for line in lines {
        if let Some(injury) = line.injury {
            if let Some(stored) = apply_injury(tx, match_id, line.player_id, injury).await? {
                injuries.push(stored);
            }
        }
    }
    Ok(injuries)
}

/// Undo every injury recorded for a match and delete the records
pub async fn reverse_injuries(tx: &mut Transaction<'_, Postgres>, match_id: Uuid) -> Result<usize, LeagueError> {
    let recorded = sqlx::query_as::<_, PlayerInjury>(
        "SELECT * FROM player_injuries WHERE match_id = $1 ORDER BY player_id",
    )
    .bind(match_id)
    .fetch_all(&mut **tx)
    .await?;

    for injury in &recorded {
        lock_player(tx, injury.player_id).await?;

        match injury.injury_type {
            InjuryType::MissNextGame => {
                sqlx::query("UPDATE players SET miss_next_game = FALSE WHERE id = $1")
                    .bind(injury.player_id)
                    .execute(&mut **tx)
                    .await?;
            }
            InjuryType::Niggling => {
                sqlx::query("UPDATE players SET niggling_injuries = GREATEST(niggling_injuries - 1, 0) WHERE id = $1")
                    .bind(injury.player_id)
                    .execute(&mut **tx)
                    .await?;
            }
            InjuryType::Dead => {
                sqlx::query("UPDATE players SET is_dead = FALSE, is_active = TRUE WHERE id = $1")
                    .bind(injury.player_id)
                    .execute(&mut **tx)
                    .await?;
            }
            other => {
                // A change of 0 means the characteristic was already at its floor
                if let Some(characteristic) = other.characteristic().filter(|_| injury.stat_change != 0) {
                    let statement = format!("UPDATE players SET {0} = {0} + $2 WHERE id = $1", characteristic.column());
                    sqlx::query(&statement)
                        .bind(injury.player_id)
                        .bind(injury.stat_change)
                        .execute(&mut **tx)
                        .await?;
                }
            }
        }
    }

    sqlx::query("DELETE FROM player_injuries WHERE match_id = $1")
        .bind(match_id)
        .execute(&mut **tx)
        .await?;

    Ok(recorded.len())
}

pub async fn injuries_for_match(pool: &PgPool, match_id: Uuid) -> Result<Vec<PlayerInjury>, LeagueError> {
    let injuries = sqlx::query_as::<_, PlayerInjury>(
        "SELECT * FROM player_injuries WHERE match_id = $1 ORDER BY occurred_at, player_id",
    )
    .bind(match_id)
    .fetch_all(pool)
    .await?;
    Ok(injuries)
}
