//! Identity service: orchestrates the store adapter, credential hasher,
//! and token signer into the three auth operations.
//!
//! Every operation is an independent transaction with no cross-call state.
//! All internal failures are translated into [`IdentityError`] and from
//! there into the uniform `{ status, message }` envelope; nothing crosses
//! the RPC boundary as a raw internal error.

use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use thiserror::Error;

use id_auth::{PasswordHasher, TokenSigner};
use id_core::{AuthResponse, ErrorEnvelope, LoginRequest, RegisterRequest, User, UserProjection};
use id_db::{DbError, UserStore};

/// One generic message for both "no such user" and "wrong password", so a
/// caller cannot enumerate registered emails from the response text.
const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";
/// One generic message for every token failure mode.
const INVALID_TOKEN_MESSAGE: &str = "invalid token";
const ALREADY_EXISTS_MESSAGE: &str = "user already exists";
const INTERNAL_MESSAGE: &str = "internal error";

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Registration conflict: email already taken {location}")]
    AlreadyExists { location: ErrorLocation },

    #[error("Invalid credentials {location}")]
    InvalidCredentials { location: ErrorLocation },

    #[error("Token rejected {location}")]
    Unauthorized { location: ErrorLocation },

    /// Store unreachable, malformed persisted data, or any other unexpected
    /// internal failure. The detail is for logs only; callers see a generic
    /// message.
    #[error("Infrastructure failure: {message} {location}")]
    Infrastructure {
        message: String,
        location: ErrorLocation,
    },
}

impl IdentityError {
    pub fn status(&self) -> u16 {
        match self {
            Self::AlreadyExists { .. } | Self::InvalidCredentials { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::Infrastructure { .. } => 500,
        }
    }

    /// The caller-facing envelope. Internal detail never leaks here.
    pub fn envelope(&self) -> ErrorEnvelope {
        let message = match self {
            Self::AlreadyExists { .. } => ALREADY_EXISTS_MESSAGE,
            Self::InvalidCredentials { .. } => INVALID_CREDENTIALS_MESSAGE,
            Self::Unauthorized { .. } => INVALID_TOKEN_MESSAGE,
            Self::Infrastructure { .. } => INTERNAL_MESSAGE,
        };

        ErrorEnvelope::new(self.status(), message)
    }
}

impl From<DbError> for IdentityError {
    #[track_caller]
    fn from(e: DbError) -> Self {
        match e {
            // The unique index rejecting an insert is the authoritative
            // duplicate signal, racing registrations included.
            DbError::Duplicate { .. } => Self::AlreadyExists {
                location: ErrorLocation::from(Location::caller()),
            },
            other => Self::Infrastructure {
                message: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;

pub struct IdentityService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    signer: TokenSigner,
}

impl IdentityService {
    /// Explicit construction: the service takes its three collaborators as
    /// arguments, no ambient wiring.
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, signer: TokenSigner) -> Self {
        Self {
            store,
            hasher,
            signer,
        }
    }

    /// Register a new account and issue its first session token.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse> {
        // Best-effort pre-check. The unique index consulted by create()
        // below remains the source of truth under concurrent registration.
        if self.store.find_by_email(&request.email).await?.is_some() {
            return Err(IdentityError::AlreadyExists {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let password_hash = self
            .hasher
            .hash(&request.password)
            .map_err(|e| IdentityError::Infrastructure {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let user = User::new(request.email, request.name, password_hash);
        self.store.create(&user).await?;

        self.respond(UserProjection::from(user))
    }

    /// Authenticate credentials and issue a session token.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        let Some(user) = self.store.find_by_email(&request.email).await? else {
            return Err(IdentityError::InvalidCredentials {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let valid = self
            .hasher
            .verify(&request.password, &user.password_hash)
            .map_err(|e| IdentityError::Infrastructure {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if !valid {
            return Err(IdentityError::InvalidCredentials {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.respond(UserProjection::from(user))
    }

    /// Validate a session token and rotate it.
    ///
    /// Expired and forged tokens both collapse to [`IdentityError::Unauthorized`];
    /// the failure mode is logged but not disclosed to the caller.
    #[track_caller]
    pub fn verify(&self, token: &str) -> Result<AuthResponse> {
        let projection = self
            .signer
            .verify(token)
            .and_then(id_auth::Claims::into_projection)
            .map_err(|e| {
                log::debug!("Token verification failed: {}", e);
                IdentityError::Unauthorized {
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        self.respond(projection)
    }

    /// Sign a fresh token over the projection and build the response.
    #[track_caller]
    fn respond(&self, user: UserProjection) -> Result<AuthResponse> {
        let token = self
            .signer
            .sign(&user)
            .map_err(|e| IdentityError::Infrastructure {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(AuthResponse { user, token })
    }
}
