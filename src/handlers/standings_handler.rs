use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::error_response;
use crate::league::standings::StandingsService;
use crate::models::common::ApiResponse;

/// Standings of a league's active season
#[tracing::instrument(name = "Get league standings", skip(pool))]
pub async fn get_league_standings(league_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = StandingsService::new(pool.get_ref().clone());

    match service.get_current_standings(league_id).await {
        Ok(standings) => Ok(HttpResponse::Ok().json(ApiResponse::success("Standings retrieved", standings))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[tracing::instrument(name = "Get season standings", skip(pool))]
pub async fn get_season_standings(season_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = StandingsService::new(pool.get_ref().clone());

    match service.get_league_standings(season_id).await {
        Ok(standings) => Ok(HttpResponse::Ok().json(ApiResponse::success("Standings retrieved", standings))),
        Err(e) => Ok(error_response(&e)),
    }
}
