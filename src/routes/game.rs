use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;

use crate::handlers::game_handler;
use crate::middleware::auth::Claims;
use crate::models::game::{NewGameRequest, ScoreUpdateRequest};

#[get("")]
async fn current_game(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    game_handler::get_current_game(pool, claims).await
}

#[post("/new")]
async fn new_game(
    request: web::Json<NewGameRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    game_handler::start_new_game(request, pool, claims).await
}

#[put("/score")]
async fn score(
    request: web::Json<ScoreUpdateRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    game_handler::update_score(request, pool, claims).await
}

#[get("/stats")]
async fn stats(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    game_handler::get_game_stats(pool, claims).await
}

#[delete("/stats")]
async fn clear_stats(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    game_handler::clear_game_stats(pool, claims).await
}
