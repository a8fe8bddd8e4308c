//! Provider configuration and resolution

use secrecy::SecretString;
use serde::Deserialize;

/// Environment variable for the GraphQL endpoint URL
pub const ENV_API_URL: &str = "LAGOON_API_URL";

/// Environment variable for a static bearer token
pub const ENV_API_TOKEN: &str = "LAGOON_API_TOKEN";

/// Environment variable for the JWT signing secret
pub const ENV_JWT_SECRET: &str = "LAGOON_JWT_SECRET";

/// Environment variable disabling TLS certificate verification
pub const ENV_INSECURE: &str = "LAGOON_INSECURE";

/// Endpoint used when nothing else is configured (local lagoon-core)
pub const DEFAULT_API_URL: &str = "http://localhost:7070/graphql";

/// Return the first candidate that is present and non-empty.
///
/// Configuration precedence (explicit parameter > host configuration >
/// environment variable > default) is expressed by the order in which
/// candidates are passed, instead of fallthrough scattered across call sites.
pub fn first_non_empty<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_flag(name: &str) -> Option<bool> {
    env_var(name).map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
}

/// One layer of configuration: every field optional. Two layers are fed into
/// [`Settings::resolve`]: explicit per-provider parameters and the host's
/// stack configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialSettings {
    /// GraphQL endpoint URL
    #[serde(default)]
    pub api_url: Option<String>,

    /// Static bearer token
    #[serde(default)]
    pub token: Option<String>,

    /// HS256 secret used to mint an admin token when no static token is set
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Disable TLS certificate verification
    #[serde(default)]
    pub insecure: Option<bool>,
}

/// Fully resolved provider settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// GraphQL endpoint URL
    pub api_url: String,

    /// Static bearer token, if configured
    pub token: Option<SecretString>,

    /// JWT signing secret, if configured
    pub jwt_secret: Option<SecretString>,

    /// Whether TLS certificate verification is disabled. Intended only for
    /// local clusters with self-signed certificates.
    pub insecure: bool,
}

impl Settings {
    /// Resolve settings from the two configuration layers plus the process
    /// environment and built-in defaults.
    pub fn resolve(explicit: PartialSettings, host: PartialSettings) -> Self {
        let api_url = first_non_empty([explicit.api_url, host.api_url, env_var(ENV_API_URL)])
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token = first_non_empty([explicit.token, host.token, env_var(ENV_API_TOKEN)])
            .map(SecretString::from);

        let jwt_secret =
            first_non_empty([explicit.jwt_secret, host.jwt_secret, env_var(ENV_JWT_SECRET)])
                .map(SecretString::from);

        let insecure = explicit
            .insecure
            .or(host.insecure)
            .or_else(|| env_flag(ENV_INSECURE))
            .unwrap_or(false);

        Self {
            api_url,
            token,
            jwt_secret,
            insecure,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::resolve(PartialSettings::default(), PartialSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_empty_skips_blank_candidates() {
        let resolved = first_non_empty([None, Some("".to_string()), Some("  ".to_string()), Some("value".to_string())]);
        assert_eq!(resolved.as_deref(), Some("value"));
    }

    #[test]
    fn first_non_empty_returns_none_when_exhausted() {
        assert_eq!(first_non_empty([None, Some(String::new())]), None);
    }

    #[test]
    fn explicit_layer_wins_over_host_layer() {
        let explicit = PartialSettings {
            api_url: Some("https://api.example.com/graphql".to_string()),
            ..Default::default()
        };
        let host = PartialSettings {
            api_url: Some("https://other.example.com/graphql".to_string()),
            insecure: Some(true),
            ..Default::default()
        };

        let settings = Settings::resolve(explicit, host);
        assert_eq!(settings.api_url, "https://api.example.com/graphql");
        assert!(settings.insecure);
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let settings = Settings::resolve(PartialSettings::default(), PartialSettings::default());
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert!(!settings.insecure);
    }
}
