use actix_web::HttpResponse;

use crate::error::LeagueError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::user::Actor;

pub mod admin_handler;
pub mod bet_handler;
pub mod health_handler;
pub mod match_handler;
pub mod notification_handler;
pub mod standings_handler;

/// Render a service error as a JSON `ApiResponse` with the matching status code
pub fn error_response(err: &LeagueError) -> HttpResponse {
    match err {
        LeagueError::Database(e) => tracing::error!("Database error: {}", e),
        other => tracing::warn!("Request rejected: {}", other),
    }

    HttpResponse::build(err.status_code()).json(ApiResponse::<()>::error_with_message(err.public_message(), err.kind()))
}

/// The acting user behind a set of validated claims
pub fn actor_from_claims(claims: &Claims) -> Result<Actor, HttpResponse> {
    claims.actor().ok_or_else(|| {
        tracing::error!("Invalid user id in token subject: {}", claims.sub);
        HttpResponse::Unauthorized().json(ApiResponse::<()>::error_with_message(
            "Invalid user ID in token",
            "unauthorized",
        ))
    })
}
