// src/routes/leagues.rs
use actix_web::{get, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::standings_handler;

/// Standings of the league's active season
#[get("/{league_id}/standings")]
async fn get_league_standings(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let league_id = path.into_inner();
    standings_handler::get_league_standings(league_id, pool).await
}

#[get("/seasons/{season_id}/standings")]
async fn get_season_standings(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let season_id = path.into_inner();
    standings_handler::get_season_standings(season_id, pool).await
}
