use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;

use crate::handlers::health_handler;

#[get("/health_check")]
async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    health_handler::health_check(pool).await
}
