//! End-to-end tests over a real TCP socket: the full register / login /
//! verify lifecycle as a caller on the wire would see it.

mod common;

use common::{TestClient, spawn_test_server};

use serde_json::json;

#[tokio::test]
async fn end_to_end_auth_lifecycle() {
    let addr = spawn_test_server().await;
    let mut client = TestClient::connect(addr).await;

    // Register succeeds and returns the projection plus a token
    let registered = client
        .call(
            "auth.register",
            json!({ "name": "A", "email": "a@x.com", "password": "Str0ng!pw" }),
        )
        .await;
    assert_eq!(registered["user"]["email"], "a@x.com");
    let original_token = registered["token"].as_str().unwrap().to_string();
    assert!(!original_token.is_empty());
    assert!(registered["user"].get("password_hash").is_none());

    // Registering the same email again is a 400 conflict
    let duplicate = client
        .call(
            "auth.register",
            json!({ "name": "B", "email": "a@x.com", "password": "0ther!pw" }),
        )
        .await;
    assert_eq!(duplicate["status"], 400);
    assert_eq!(duplicate["message"], "user already exists");

    // Login with the right password succeeds with a fresh token
    let logged_in = client
        .call(
            "auth.login",
            json!({ "email": "a@x.com", "password": "Str0ng!pw" }),
        )
        .await;
    assert_eq!(logged_in["user"]["email"], "a@x.com");
    assert!(!logged_in["token"].as_str().unwrap().is_empty());

    // Wrong password and unknown email produce identical generic errors
    let wrong_password = client
        .call(
            "auth.login",
            json!({ "email": "a@x.com", "password": "wrong" }),
        )
        .await;
    let unknown_email = client
        .call(
            "auth.login",
            json!({ "email": "nobody@x.com", "password": "Str0ng!pw" }),
        )
        .await;
    assert_eq!(wrong_password["status"], 400);
    assert_eq!(wrong_password["message"], unknown_email["message"]);

    // Let the clock tick so the rotated token's iat differs
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    // Verify rotates the token
    let verified = client
        .call("auth.verify", json!(original_token))
        .await;
    assert_eq!(verified["user"]["email"], "a@x.com");
    let rotated_token = verified["token"].as_str().unwrap();
    assert!(!rotated_token.is_empty());
    assert_ne!(rotated_token, original_token);

    // Garbage tokens are a 401 with a generic message
    let rejected = client.call("auth.verify", json!("garbage")).await;
    assert_eq!(rejected["status"], 401);
    assert_eq!(rejected["message"], "invalid token");
}

#[tokio::test]
async fn malformed_frame_gets_error_envelope_and_connection_survives() {
    let addr = spawn_test_server().await;
    let mut client = TestClient::connect(addr).await;

    let reply = client.send_raw("this is not json").await;
    assert_eq!(reply["status"], 400);

    // The connection is still usable afterwards
    let registered = client
        .call(
            "auth.register",
            json!({ "name": "A", "email": "a@x.com", "password": "Str0ng!pw" }),
        )
        .await;
    assert_eq!(registered["user"]["email"], "a@x.com");
}

#[tokio::test]
async fn concurrent_connections_race_for_one_email() {
    let addr = spawn_test_server().await;

    let register = |mut client: TestClient| async move {
        client
            .call(
                "auth.register",
                json!({ "name": "A", "email": "race@x.com", "password": "Str0ng!pw" }),
            )
            .await
    };

    let first = register(TestClient::connect(addr).await);
    let second = register(TestClient::connect(addr).await);
    let (first, second) = tokio::join!(first, second);

    let successes = [&first, &second]
        .iter()
        .filter(|reply| reply.get("token").is_some())
        .count();
    let conflicts = [&first, &second]
        .iter()
        .filter(|reply| reply["status"] == 400)
        .count();

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);
}
