use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_BCRYPT_COST, DEFAULT_TOKEN_TTL_SECS, MAX_BCRYPT_COST,
    MIN_BCRYPT_COST, MIN_JWT_SECRET_BYTES,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret. Required; there is no unauthenticated mode.
    pub jwt_secret: Option<String>,
    /// Token lifetime from the moment of signing.
    pub token_ttl_secs: u64,
    /// bcrypt work factor for password hashing.
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        match self.jwt_secret {
            None => {
                return Err(ConfigError::auth(
                    "auth.jwt_secret is required (set it in config.toml or ID_AUTH_JWT_SECRET)",
                ));
            }
            Some(ref secret) if secret.len() < MIN_JWT_SECRET_BYTES => {
                return Err(ConfigError::auth(format!(
                    "auth.jwt_secret must be at least {} bytes",
                    MIN_JWT_SECRET_BYTES
                )));
            }
            Some(_) => {}
        }

        if self.token_ttl_secs == 0 {
            return Err(ConfigError::auth("auth.token_ttl_secs must be > 0"));
        }

        if self.bcrypt_cost < MIN_BCRYPT_COST || self.bcrypt_cost > MAX_BCRYPT_COST {
            return Err(ConfigError::auth(format!(
                "auth.bcrypt_cost must be {}-{}, got {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, self.bcrypt_cost
            )));
        }

        Ok(())
    }
}
