use crate::{AuthError, Result as AuthErrorResult};

use id_core::UserProjection;

use std::panic::Location;

use chrono::DateTime;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token claims: the user projection flattened into the payload,
/// plus the registered timing claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Account creation time (Unix seconds)
    pub created_at: i64,
    /// Issued at timestamp (Unix)
    pub iat: i64,
    /// Expiration timestamp (Unix)
    pub exp: i64,
}

impl Claims {
    pub fn from_projection(user: &UserProjection, iat: i64, exp: i64) -> Self {
        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at.timestamp(),
            iat,
            exp,
        }
    }

    /// Validate claims after JWT signature verification
    #[track_caller]
    pub fn validate(&self) -> AuthErrorResult<()> {
        if self.sub.is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "sub".to_string(),
                message: "sub (user id) cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.email.is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "email".to_string(),
                message: "email cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Strip the registered claims (`sub` marker, `iat`, `exp`) and return
    /// the user-identity fields.
    #[track_caller]
    pub fn into_projection(self) -> AuthErrorResult<UserProjection> {
        let id = Uuid::parse_str(&self.sub).map_err(|e| AuthError::InvalidClaim {
            claim: "sub".to_string(),
            message: format!("not a valid user id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let created_at =
            DateTime::from_timestamp(self.created_at, 0).ok_or_else(|| AuthError::InvalidClaim {
                claim: "created_at".to_string(),
                message: "not a valid timestamp".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(UserProjection {
            id,
            email: self.email,
            name: self.name,
            created_at,
        })
    }
}
