//! Admin token claims and minting

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::errors::LagoonError;

/// Lifetime of a minted admin token, in seconds
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Claims for a Lagoon admin token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Lagoon role
    pub role: String,

    /// Issuer
    pub iss: String,

    /// Subject
    pub sub: String,

    /// Audience
    pub aud: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl AdminClaims {
    /// Build admin claims issued now, expiring in one hour.
    pub fn new() -> Self {
        let now = Utc::now().timestamp();
        Self {
            role: "admin".to_string(),
            iss: "lagoon-api".to_string(),
            sub: "lagoonadmin".to_string(),
            aud: "api.dev".to_string(),
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        }
    }
}

impl Default for AdminClaims {
    fn default() -> Self {
        Self::new()
    }
}

/// Mint an HS256-signed admin token from the configured JWT secret.
pub fn mint_admin_token(secret: &SecretString) -> Result<String, LagoonError> {
    let claims = AdminClaims::new();
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| LagoonError::Token(format!("failed to mint admin token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    #[test]
    fn minted_token_carries_admin_claims() {
        let secret = SecretString::from("super-secret".to_string());
        let token = mint_admin_token(&secret).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&["api.dev"]);
        let decoded = decode::<AdminClaims>(
            &token,
            &DecodingKey::from_secret(b"super-secret"),
            &validation,
        )
        .unwrap();

        assert_eq!(decoded.claims.role, "admin");
        assert_eq!(decoded.claims.iss, "lagoon-api");
        assert_eq!(decoded.claims.sub, "lagoonadmin");
        assert_eq!(decoded.claims.exp - decoded.claims.iat, TOKEN_LIFETIME_SECS);
    }
}
