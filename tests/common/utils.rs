use once_cell::sync::Lazy;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;
use uuid::Uuid;

use pickleball_backend::config::settings::{get_config, get_jwt_settings, DatabaseSettings};
use pickleball_backend::run;
use pickleball_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    let connection_pool = configure_db(&configuration.database).await;
    let jwt_settings = get_jwt_settings(&configuration);

    let server = run(listener, connection_pool.clone(), jwt_settings)
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

/// Register a fresh user and return (email, bearer token).
pub async fn create_test_user_and_login(app_address: &str) -> (String, String) {
    let client = Client::new();
    let email = format!("player{}@example.com", Uuid::new_v4());
    let password = "password123";

    let register_response = client
        .post(format!("{}/api/auth/register", app_address))
        .json(&json!({
            "email": email,
            "password": password,
            "displayName": "Test Player"
        }))
        .send()
        .await
        .expect("Failed to register user.");
    assert_eq!(200, register_response.status().as_u16());

    let login_response = client
        .post(format!("{}/api/auth/login", app_address))
        .json(&json!({
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to execute login request.");

    let login_response: serde_json::Value =
        login_response.json().await.expect("Failed to parse login response");
    let token = login_response["token"].as_str().expect("No token in response");

    (email, token.to_string())
}

/// Start a new game for the authenticated user, returning the response body.
pub async fn start_game(app_address: &str, token: &str, game_type: &str) -> serde_json::Value {
    let client = Client::new();
    let response = client
        .post(format!("{}/api/game/new", app_address))
        .bearer_auth(token)
        .json(&json!({ "gameType": game_type }))
        .send()
        .await
        .expect("Failed to start a new game.");
    assert_eq!(200, response.status().as_u16());

    response.json().await.expect("Failed to parse game state")
}

/// Apply a single ±1 score change, asserting it is accepted.
pub async fn update_score(
    app_address: &str,
    token: &str,
    team: &str,
    change: i32,
) -> serde_json::Value {
    let response = try_update_score(app_address, token, team, change).await;
    assert_eq!(200, response.status().as_u16());

    response.json().await.expect("Failed to parse game state")
}

/// Apply a score change without asserting on the status code.
pub async fn try_update_score(
    app_address: &str,
    token: &str,
    team: &str,
    change: i32,
) -> reqwest::Response {
    Client::new()
        .put(format!("{}/api/game/score", app_address))
        .bearer_auth(token)
        .json(&json!({ "team": team, "change": change }))
        .send()
        .await
        .expect("Failed to execute score update request.")
}

/// Score `n` points for one team.
pub async fn score_points(app_address: &str, token: &str, team: &str, n: u32) {
    for _ in 0..n {
        update_score(app_address, token, team, 1).await;
    }
}
