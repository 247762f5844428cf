use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Password hashing failed: {source} {location}")]
    Hash {
        #[source]
        source: bcrypt::BcryptError,
        location: ErrorLocation,
    },

    /// The stored hash could not be parsed. A mismatching password is NOT
    /// an error (verify returns `Ok(false)`); this fires only when the
    /// persisted hash itself is malformed.
    #[error("Malformed password hash: {source} {location}")]
    InvalidHash {
        #[source]
        source: bcrypt::BcryptError,
        location: ErrorLocation,
    },

    #[error("Token expired {location}")]
    TokenExpired { location: ErrorLocation },

    #[error("JWT encode failed: {source} {location}")]
    JwtEncode {
        #[source]
        source: jsonwebtoken::errors::Error,
        location: ErrorLocation,
    },

    #[error("JWT decode failed: {source} {location}")]
    JwtDecode {
        #[source]
        source: jsonwebtoken::errors::Error,
        location: ErrorLocation,
    },

    #[error("Invalid claim '{claim}': {message} {location}")]
    InvalidClaim {
        claim: String,
        message: String,
        location: ErrorLocation,
    },
}

pub type Result<T> = std::result::Result<T, AuthError>;
