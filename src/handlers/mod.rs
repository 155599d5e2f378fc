pub mod auth_handler;
pub mod backend_health_handler;
pub mod game_handler;
pub mod registration_handler;
