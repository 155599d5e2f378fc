use actix_web::{web, HttpResponse};
use chrono::Utc;
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::handlers::auth_handler::issue_token;
use crate::models::auth::AuthResponse;
use crate::models::user::RegistrationRequest;
use crate::utils::password::hash_password;

#[tracing::instrument(
    name = "Adding a new user",
    // Don't show arguments
    skip(user_form, pool, jwt_settings),
    fields(
        email = %user_form.email
    )
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    if user_form.email.trim().is_empty() || user_form.password.expose_secret().is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": "Email and password are required"
        }));
    }

    let user_id = match insert_user(&user_form, &pool).await {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            tracing::info!("Registration rejected, email already taken");
            return HttpResponse::BadRequest().json(json!({
                "status": "error",
                "message": "An account with this email already exists"
            }));
        }
        Err(e) => {
            tracing::error!("Failed to insert user: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    let token = match issue_token(user_id, &user_form.email, &jwt_settings) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Error generating JWT token: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    HttpResponse::Ok().json(AuthResponse {
        token,
        email: user_form.email.clone(),
        user_id,
        display_name: user_form.display_name.clone(),
    })
}

async fn insert_user(
    user_form: &web::Json<RegistrationRequest>,
    pool: &PgPool,
) -> Result<Uuid, sqlx::Error> {
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO users (id, email, display_name, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(user_id)
    .bind(&user_form.email)
    .bind(&user_form.display_name)
    .bind(hash_password(user_form.password.expose_secret()))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(user_id)
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}
