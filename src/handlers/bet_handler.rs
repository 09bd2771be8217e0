use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::betting::BetPlacementService;
use crate::config::league::LeagueSettings;
use crate::handlers::{actor_from_claims, error_response};
use crate::middleware::auth::Claims;
use crate::models::bet::PlaceBetRequest;
use crate::models::common::ApiResponse;

/// Place a bet on a scheduled match
#[tracing::instrument(
    name = "Place bet",
    skip(request, pool, settings, claims),
    fields(
        match_id = %match_id,
        team_id = %request.team_id,
        amount = %request.bet_amount,
        user = %claims.username
    )
)]
pub async fn place_bet(
    match_id: Uuid,
    request: web::Json<PlaceBetRequest>,
    pool: web::Data<PgPool>,
    settings: web::Data<LeagueSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let service = BetPlacementService::new(pool.get_ref().clone(), *settings.get_ref());

    match service.place_bet(actor.user_id, match_id, &request.into_inner()).await {
        Ok(bet) => Ok(HttpResponse::Created().json(ApiResponse::success("Bet placed", bet))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_bets(
    pool: web::Data<PgPool>,
    settings: web::Data<LeagueSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let service = BetPlacementService::new(pool.get_ref().clone(), *settings.get_ref());

    match service.list_bets(actor.user_id).await {
        Ok(bets) => Ok(HttpResponse::Ok().json(ApiResponse::success(format!("{} bets", bets.len()), bets))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_bet(
    bet_id: Uuid,
    pool: web::Data<PgPool>,
    settings: web::Data<LeagueSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let service = BetPlacementService::new(pool.get_ref().clone(), *settings.get_ref());

    match service.get_bet(bet_id, actor).await {
        Ok(bet) => Ok(HttpResponse::Ok().json(ApiResponse::success("Bet retrieved", bet))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Cancel a pending bet and refund the stake
#[tracing::instrument(name = "Cancel bet", skip(pool, settings, claims), fields(user = %claims.username))]
pub async fn cancel_bet(
    bet_id: Uuid,
    pool: web::Data<PgPool>,
    settings: web::Data<LeagueSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let service = BetPlacementService::new(pool.get_ref().clone(), *settings.get_ref());

    match service.cancel_bet(bet_id, actor).await {
        Ok(treasury) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            "Bet cancelled and stake refunded",
            json!({ "bet_id": bet_id, "treasury": treasury }),
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
