use actix_web::web;

pub mod admin;
pub mod bets;
pub mod health;
pub mod leagues;
pub mod matches;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health_check);

    // Match routes (require authentication)
    cfg.service(
        web::scope("/matches")
            .wrap(AuthMiddleware)
            .service(matches::record_result)
            .service(matches::get_match)
    );
    // Bet routes (require authentication). Notification paths go first so they
    // are not captured by `/{bet_id}`.
    cfg.service(
        web::scope("/bets")
            .wrap(AuthMiddleware)
            .service(bets::list_notifications)
            .service(bets::unread_count)
            .service(bets::mark_all_read)
            .service(bets::mark_read)
            .service(bets::place_bet)
            .service(bets::list_bets)
            .service(bets::get_bet)
            .service(bets::cancel_bet)
    );
    // Standings routes (require authentication)
    cfg.service(
        web::scope("/leagues")
            .wrap(AuthMiddleware)
            .service(leagues::get_season_standings)
            .service(leagues::get_league_standings)
    );
    admin::init_admin_routes(cfg);
}
