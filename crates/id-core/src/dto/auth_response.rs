use crate::UserProjection;

use serde::{Deserialize, Serialize};

/// Success payload for all three auth operations: the user projection
/// (password hash stripped) plus a freshly signed session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserProjection,
    pub token: String,
}
