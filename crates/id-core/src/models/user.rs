//! User entity - one account per email address.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered account. The email is the unique identifying key; the
/// uniqueness guarantee lives in the store's unique index, not here.
///
/// Deliberately not `Serialize`: the password hash must never cross the
/// RPC boundary. Callers see [`crate::UserProjection`] instead.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// bcrypt hash of the password. Never exposed outside the store
    /// adapter and the credential hasher.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id and creation timestamp.
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}
