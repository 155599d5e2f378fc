use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

mod common;
use common::utils::spawn_app;

#[tokio::test]
async fn register_returns_200_and_a_token_for_valid_data() {
    // Arrange
    let test_app = spawn_app().await;
    let client = Client::new();
    let email = format!("player{}@example.com", Uuid::new_v4());

    // Act
    let response = client
        .post(format!("{}/api/auth/register", &test_app.address))
        .json(&json!({
            "email": email,
            "password": "password123",
            "displayName": "Dinker"
        }))
        .send()
        .await
        .expect("Failed to execute registration request.");

    // Assert
    assert_eq!(200, response.status().as_u16());

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse registration response as JSON");
    assert!(body.get("token").is_some(), "Response should contain a token");
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["displayName"], "Dinker");
    assert!(body.get("userId").is_some(), "Response should contain the user id");

    let saved = sqlx::query("SELECT email, display_name FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Failed to fetch saved user.");
    use sqlx::Row;
    assert_eq!(saved.get::<String, _>("email"), email);
}

#[tokio::test]
async fn register_returns_400_for_duplicate_email() {
    // Arrange
    let test_app = spawn_app().await;
    let client = Client::new();
    let email = format!("player{}@example.com", Uuid::new_v4());
    let request = json!({
        "email": email,
        "password": "password123"
    });

    let first = client
        .post(format!("{}/api/auth/register", &test_app.address))
        .json(&request)
        .send()
        .await
        .expect("Failed to execute registration request.");
    assert_eq!(200, first.status().as_u16());

    // Act - register the same email again
    let second = client
        .post(format!("{}/api/auth/register", &test_app.address))
        .json(&request)
        .send()
        .await
        .expect("Failed to execute registration request.");

    // Assert
    assert_eq!(400, second.status().as_u16());
}

#[tokio::test]
async fn register_returns_400_for_empty_email_or_password() {
    // Arrange
    let test_app = spawn_app().await;
    let client = Client::new();

    for body in [
        json!({ "email": "", "password": "password123" }),
        json!({ "email": "someone@example.com", "password": "" }),
    ] {
        // Act
        let response = client
            .post(format!("{}/api/auth/register", &test_app.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute registration request.");

        // Assert
        assert_eq!(400, response.status().as_u16());
    }
}
