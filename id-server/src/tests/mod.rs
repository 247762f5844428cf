
use crate::service::IdentityService;

use id_auth::{PasswordHasher, TokenSigner};
use id_core::{LoginRequest, RegisterRequest};
use id_db::UserRepository;

use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub(crate) const TEST_SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";
pub(crate) const TEST_TTL_SECS: i64 = 7200;
// Minimum bcrypt cost keeps the tests fast
pub(crate) const TEST_BCRYPT_COST: u32 = 4;

/// Identity service backed by an in-memory store with migrations run
pub(crate) async fn create_test_service() -> IdentityService {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    sqlx::migrate!("../crates/id-db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    IdentityService::new(
        Arc::new(UserRepository::new(pool)),
        PasswordHasher::new(TEST_BCRYPT_COST),
        TokenSigner::with_hs256(TEST_SECRET, TEST_TTL_SECS),
    )
}

pub(crate) fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        name: "A".to_string(),
        email: email.to_string(),
        password: "Str0ng!pw".to_string(),
    }
}

pub(crate) fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}
