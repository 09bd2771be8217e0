// src/routes/matches.rs
use actix_web::{get, put, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::league::LeagueSettings;
use crate::handlers::match_handler;
use crate::middleware::auth::Claims;
use crate::models::matches::MatchResult;

/// Record (or, for admins, correct) the result of a match
#[put("/{match_id}/result")]
async fn record_result(
    path: web::Path<Uuid>,
    result: web::Json<MatchResult>,
    pool: web::Data<PgPool>,
    settings: web::Data<LeagueSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    match_handler::record_match_result(match_id, result, pool, settings, claims).await
}

/// Get a match with its stat lines
#[get("/{match_id}")]
async fn get_match(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    settings: web::Data<LeagueSettings>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    match_handler::get_match(match_id, pool, settings).await
}
