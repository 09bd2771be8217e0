use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::league::LeagueSettings;
use crate::handlers::{actor_from_claims, error_response};
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::matches::MatchResult;
use crate::services::MatchCompletionService;

/// Record the final result of a match
#[tracing::instrument(
    name = "Record match result",
    skip(result, pool, settings, claims),
    fields(
        match_id = %match_id,
        score = %format!("{} - {}", result.home_score, result.away_score),
        user = %claims.username
    )
)]
pub async fn record_match_result(
    match_id: Uuid,
    result: web::Json<MatchResult>,
    pool: web::Data<PgPool>,
    settings: web::Data<LeagueSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let service = MatchCompletionService::new(pool.get_ref().clone(), *settings.get_ref());

    match service.record_result(match_id, &result.into_inner(), actor).await {
        Ok(report) => {
            let message = if report.corrected {
                "Match result corrected"
            } else {
                "Match result recorded"
            };
            tracing::info!(
                "{} for match {}: {} bets resolved",
                message,
                match_id,
                report.bets.resolved_count
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(message, report)))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_match(
    match_id: Uuid,
    pool: web::Data<PgPool>,
    settings: web::Data<LeagueSettings>,
) -> Result<HttpResponse> {
    let service = MatchCompletionService::new(pool.get_ref().clone(), *settings.get_ref());

    match service.get_match(match_id).await {
        Ok(details) => Ok(HttpResponse::Ok().json(ApiResponse::success("Match retrieved", details))),
        Err(e) => Ok(error_response(&e)),
    }
}
