//! Bearer token resolution

use secrecy::{ExposeSecret, SecretString};

use crate::authn::claims::mint_admin_token;
use crate::config::Settings;
use crate::errors::LagoonError;

/// Where the bearer token for API calls comes from.
///
/// A static token always wins; absent that, an admin token is minted from the
/// configured JWT secret on every request (minting is cheap and keeps the
/// one-hour expiry window fresh).
#[derive(Debug)]
pub enum TokenSource {
    /// A token supplied through configuration
    Static(SecretString),

    /// Mint an admin token from this HS256 secret
    Minted { secret: SecretString },
}

impl TokenSource {
    /// Pick the token source from resolved settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, LagoonError> {
        if let Some(token) = &settings.token {
            return Ok(TokenSource::Static(token.clone()));
        }
        if let Some(secret) = &settings.jwt_secret {
            return Ok(TokenSource::Minted {
                secret: secret.clone(),
            });
        }
        Err(LagoonError::Config(
            "no API token or JWT secret configured; set one explicitly or via \
             LAGOON_API_TOKEN / LAGOON_JWT_SECRET"
                .to_string(),
        ))
    }

    /// Produce the bearer string for an API call.
    pub fn bearer(&self) -> Result<String, LagoonError> {
        match self {
            TokenSource::Static(token) => Ok(token.expose_secret().to_string()),
            TokenSource::Minted { secret } => mint_admin_token(secret),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn static_token_wins_over_jwt_secret() {
        let settings = Settings {
            api_url: "http://localhost:7070/graphql".to_string(),
            token: Some(SecretString::from("static-token".to_string())),
            jwt_secret: Some(SecretString::from("secret".to_string())),
            insecure: false,
        };

        let source = TokenSource::from_settings(&settings).unwrap();
        assert_eq!(source.bearer().unwrap(), "static-token");
    }

    #[test]
    fn missing_credentials_is_a_config_error() {
        let settings = Settings {
            api_url: "http://localhost:7070/graphql".to_string(),
            token: None,
            jwt_secret: None,
            insecure: false,
        };

        let err = TokenSource::from_settings(&settings).unwrap_err();
        assert!(matches!(err, LagoonError::Config(_)));
    }
}
