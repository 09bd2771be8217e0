use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::betting::NotificationService;
use crate::handlers::{actor_from_claims, error_response};
use crate::middleware::auth::Claims;
use crate::models::bet::NotificationsQuery;
use crate::models::common::ApiResponse;

/// List bet notifications of the authenticated user, unread only unless `?all=true`
pub async fn list_notifications(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
    query: web::Query<NotificationsQuery>,
) -> actix_web::Result<HttpResponse> {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let service = NotificationService::new(pool.get_ref().clone());

    match service.list(actor.user_id, query.all.unwrap_or(false)).await {
        Ok(notifications) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            format!("{} notifications", notifications.len()),
            notifications,
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn unread_count(pool: web::Data<PgPool>, claims: web::ReqData<Claims>) -> actix_web::Result<HttpResponse> {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let service = NotificationService::new(pool.get_ref().clone());

    match service.unread_count(actor.user_id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success("Unread notifications", json!({ "count": count })))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn mark_read(
    notification_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> actix_web::Result<HttpResponse> {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let service = NotificationService::new(pool.get_ref().clone());

    match service.mark_read(notification_id, actor.user_id).await {
        Ok(notification) => Ok(HttpResponse::Ok().json(ApiResponse::success("Notification marked as read", notification))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn mark_all_read(pool: web::Data<PgPool>, claims: web::ReqData<Claims>) -> actix_web::Result<HttpResponse> {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return Ok(response),
    };

    let service = NotificationService::new(pool.get_ref().clone());

    match service.mark_all_read(actor.user_id).await {
        Ok(updated) => {
            info!("Marked {} notifications read for user_id={}", updated, actor.user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                "All notifications marked as read",
                json!({ "updated": updated }),
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
