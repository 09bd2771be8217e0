use actix_web::{post, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::admin_handler;
use crate::middleware::admin::AdminMiddleware;
use crate::middleware::auth::Claims;

pub fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AdminMiddleware)
            // Bet management routes
            .service(resolve_bets)
    );
}

/// Resolve any bets of a completed match that are still pending
#[post("/matches/{match_id}/resolve_bets")]
async fn resolve_bets(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    admin_handler::resolve_match_bets(match_id, pool, claims).await
}
