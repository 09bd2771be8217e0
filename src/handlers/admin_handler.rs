use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::betting::BetResolutionEngine;
use crate::handlers::error_response;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;

/// Resolve the bets of a completed match that are still pending
#[tracing::instrument(name = "Admin resolve bets", skip(pool, claims), fields(admin_user = %claims.username))]
pub async fn resolve_match_bets(
    match_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let engine = BetResolutionEngine::new(pool.get_ref().clone());

    match engine.resolve_bets(match_id).await {
        Ok(summary) => {
            tracing::info!("Admin {} resolved {} bets on match {}", claims.username, summary.resolved_count, match_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                format!("Resolved {} bets", summary.resolved_count),
                summary,
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
