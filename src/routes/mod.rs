use actix_web::web;

pub mod auth;
pub mod backend_health;
pub mod game;
pub mod registration;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    cfg.service(
        web::scope("/api/auth")
            .service(registration::register)
            .service(auth::login),
    );

    // Game routes (require authentication)
    cfg.service(
        web::scope("/api/game")
            .wrap(AuthMiddleware)
            .service(game::current_game)
            .service(game::new_game)
            .service(game::score)
            .service(game::stats)
            .service(game::clear_stats),
    );
}
