use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::models::common::ApiResponse;

/// Liveness check. Reports whether the database answers.
pub async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(ApiResponse::<()>::success_message("OK")),
        Err(e) => {
            tracing::error!("Health check failed to reach the database: {}", e);
            HttpResponse::ServiceUnavailable()
                .json(ApiResponse::<()>::error_with_message("Database unavailable", "database_error"))
        }
    }
}
