use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::middleware::auth::Claims;
use crate::models::game::{NewGameRequest, ScoreUpdateRequest};
use crate::services::{GameService, GameServiceError};

#[tracing::instrument(
    name = "Get current game",
    skip(pool, claims),
    fields(email = %claims.email)
)]
pub async fn get_current_game(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let user_id = match parse_user_id(&claims) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let service = GameService::new(pool.get_ref().clone());
    match service.current_game(user_id).await {
        Ok(Some(state)) => HttpResponse::Ok().json(state),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "status": "error",
            "message": "No active game found."
        })),
        Err(e) => error_response(e),
    }
}

#[tracing::instrument(
    name = "Start new game",
    skip(request, pool, claims),
    fields(email = %claims.email, game_type = ?request.game_type)
)]
pub async fn start_new_game(
    request: web::Json<NewGameRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let user_id = match parse_user_id(&claims) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let service = GameService::new(pool.get_ref().clone());
    match service.start_new_game(user_id, request.game_type).await {
        Ok(state) => HttpResponse::Ok().json(state),
        Err(e) => error_response(e),
    }
}

#[tracing::instrument(
    name = "Update score",
    skip(request, pool, claims),
    fields(email = %claims.email, team = %request.team, change = %request.change)
)]
pub async fn update_score(
    request: web::Json<ScoreUpdateRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let user_id = match parse_user_id(&claims) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let service = GameService::new(pool.get_ref().clone());
    match service.update_score(user_id, &request.team, request.change).await {
        Ok(state) => HttpResponse::Ok().json(state),
        Err(e) => error_response(e),
    }
}

#[tracing::instrument(
    name = "Get game stats",
    skip(pool, claims),
    fields(email = %claims.email)
)]
pub async fn get_game_stats(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let user_id = match parse_user_id(&claims) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let service = GameService::new(pool.get_ref().clone());
    match service.game_stats(user_id).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => error_response(e),
    }
}

#[tracing::instrument(
    name = "Clear game stats",
    skip(pool, claims),
    fields(email = %claims.email)
)]
pub async fn clear_game_stats(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let user_id = match parse_user_id(&claims) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let service = GameService::new(pool.get_ref().clone());
    if let Err(e) = service.clear_stats(user_id).await {
        return error_response(e);
    }

    // Echo the zeroed stats back so the client can render them directly
    match service.game_stats(user_id).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => error_response(e),
    }
}

fn parse_user_id(claims: &Claims) -> Result<Uuid, HttpResponse> {
    claims.user_id().ok_or_else(|| {
        tracing::error!("Failed to parse user ID from token subject");
        HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Invalid user ID"
        }))
    })
}

fn error_response(e: GameServiceError) -> HttpResponse {
    if e.is_client_error() {
        HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": e.to_string()
        }))
    } else {
        tracing::error!("Game operation failed: {:?}", e);
        HttpResponse::InternalServerError().finish()
    }
}
