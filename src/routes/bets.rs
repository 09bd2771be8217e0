// src/routes/bets.rs
use actix_web::{get, post, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::league::LeagueSettings;
use crate::handlers::{bet_handler, notification_handler};
use crate::middleware::auth::Claims;
use crate::models::bet::{NotificationsQuery, PlaceBetRequest};

/// Place a bet on a match
#[post("/matches/{match_id}")]
async fn place_bet(
    path: web::Path<Uuid>,
    request: web::Json<PlaceBetRequest>,
    pool: web::Data<PgPool>,
    settings: web::Data<LeagueSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    bet_handler::place_bet(match_id, request, pool, settings, claims).await
}

/// Bets of the authenticated user
#[get("")]
async fn list_bets(
    pool: web::Data<PgPool>,
    settings: web::Data<LeagueSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    bet_handler::list_bets(pool, settings, claims).await
}

#[get("/{bet_id}")]
async fn get_bet(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    settings: web::Data<LeagueSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let bet_id = path.into_inner();
    bet_handler::get_bet(bet_id, pool, settings, claims).await
}

/// Cancel a bet before its match is played
#[post("/{bet_id}/cancel")]
async fn cancel_bet(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    settings: web::Data<LeagueSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let bet_id = path.into_inner();
    bet_handler::cancel_bet(bet_id, pool, settings, claims).await
}

#[get("/notifications")]
async fn list_notifications(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
    query: web::Query<NotificationsQuery>,
) -> Result<HttpResponse> {
    notification_handler::list_notifications(pool, claims, query).await
}

#[get("/notifications/unread_count")]
async fn unread_count(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    notification_handler::unread_count(pool, claims).await
}

#[post("/notifications/{notification_id}/read")]
async fn mark_read(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let notification_id = path.into_inner();
    notification_handler::mark_read(notification_id, pool, claims).await
}

#[post("/notifications/read_all")]
async fn mark_all_read(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    notification_handler::mark_all_read(pool, claims).await
}
