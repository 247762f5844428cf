use crate::{AuthError, Claims, Result as AuthErrorResult};

use id_core::UserProjection;

use std::panic::Location;

use chrono::Utc;
use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Signs and verifies session tokens with a process-wide HS256 secret and
/// a fixed expiry duration. Constructed once at startup; no rotation.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenSigner {
    pub fn with_hs256(secret: &[u8], ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 30; // 30 second clock skew tolerance

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }

    /// Sign a token over the user projection. Expiry is the configured
    /// duration from the moment of signing.
    #[track_caller]
    pub fn sign(&self, user: &UserProjection) -> AuthErrorResult<String> {
        let iat = Utc::now().timestamp();
        let claims = Claims::from_projection(user, iat, iat + self.ttl_secs);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AuthError::JwtEncode {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    /// Validate a token and return its claims.
    ///
    /// `TokenExpired` when the embedded expiry has elapsed, `JwtDecode` for
    /// everything else (bad signature, garbage input, missing claims).
    #[track_caller]
    pub fn verify(&self, token: &str) -> AuthErrorResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired {
                        location: ErrorLocation::from(Location::caller()),
                    },
                    _ => AuthError::JwtDecode {
                        source: e,
                        location: ErrorLocation::from(Location::caller()),
                    },
                }
            })?;

        token_data.claims.validate()?;

        Ok(token_data.claims)
    }
}
