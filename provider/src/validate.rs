//! Input validators and enumerated field types
//!
//! Every validator is a pure function that runs strictly before any network
//! call. Errors always name the offending field and say what a valid value
//! looks like.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::errors::LagoonError;

/// Maximum project name length
pub const MAX_PROJECT_NAME_LEN: usize = 58;

/// Maximum deploy target / environment name length (Kubernetes-imposed)
pub const MAX_K8S_NAME_LEN: usize = 63;

static PROJECT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9-]*[a-z0-9]$").unwrap());

static DEPLOY_TARGET_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$").unwrap());

static ENVIRONMENT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9./_-]*[A-Za-z0-9])?$").unwrap());

static SSH_GIT_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^git@[A-Za-z0-9._-]+:[^\s]+$").unwrap());

/// Validate a Lagoon project name: lowercase, alphanumeric plus hyphens,
/// must start with a letter and end alphanumeric.
pub fn validate_project_name(name: &str) -> Result<(), LagoonError> {
    if name.len() > MAX_PROJECT_NAME_LEN {
        return Err(LagoonError::validation(
            "project name",
            format!(
                "'{}' is {} characters long, maximum is {}",
                name,
                name.len(),
                MAX_PROJECT_NAME_LEN
            ),
        ));
    }
    if !PROJECT_NAME_RE.is_match(name) {
        return Err(LagoonError::validation(
            "project name",
            format!(
                "'{}' must be lowercase alphanumeric with hyphens, starting with a \
                 letter and ending with a letter or digit",
                name
            ),
        ));
    }
    Ok(())
}

/// Validate a deploy target name. Same shape as a project name except a
/// leading digit is allowed; the 63-character cap is Kubernetes-imposed.
pub fn validate_deploy_target_name(name: &str) -> Result<(), LagoonError> {
    if name.len() > MAX_K8S_NAME_LEN {
        return Err(LagoonError::validation(
            "deploy target name",
            format!(
                "'{}' is {} characters long, maximum is {}",
                name,
                name.len(),
                MAX_K8S_NAME_LEN
            ),
        ));
    }
    if !DEPLOY_TARGET_NAME_RE.is_match(name) {
        return Err(LagoonError::validation(
            "deploy target name",
            format!(
                "'{}' must be lowercase alphanumeric with hyphens, starting and \
                 ending with a letter or digit",
                name
            ),
        ));
    }
    Ok(())
}

/// Validate an environment name: alphanumeric start and end, interior may
/// contain `.`, `/`, `-` and `_` (branch names like `feature/login`).
pub fn validate_environment_name(name: &str) -> Result<(), LagoonError> {
    if name.len() > MAX_K8S_NAME_LEN {
        return Err(LagoonError::validation(
            "environment name",
            format!(
                "'{}' is {} characters long, maximum is {}",
                name,
                name.len(),
                MAX_K8S_NAME_LEN
            ),
        ));
    }
    if !ENVIRONMENT_NAME_RE.is_match(name) {
        return Err(LagoonError::validation(
            "environment name",
            format!(
                "'{}' must start and end with a letter or digit; interior characters \
                 may also be '.', '/', '-' or '_'",
                name
            ),
        ));
    }
    Ok(())
}

/// Validate a git URL: either SSH form (`git@host:path`) or HTTP(S) with a
/// non-empty path.
pub fn validate_git_url(value: &str) -> Result<(), LagoonError> {
    if value.starts_with("git@") {
        if SSH_GIT_URL_RE.is_match(value) {
            return Ok(());
        }
        return Err(LagoonError::validation(
            "git_url",
            format!("'{}' is not a valid SSH git URL (expected git@host:path)", value),
        ));
    }

    let parsed = Url::parse(value).map_err(|e| {
        LagoonError::validation("git_url", format!("'{}' is not a valid URL: {}", value, e))
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(LagoonError::validation(
            "git_url",
            format!("'{}' must use the http, https or SSH (git@) form", value),
        ));
    }
    if parsed.path().trim_matches('/').is_empty() {
        return Err(LagoonError::validation(
            "git_url",
            format!("'{}' is missing a repository path", value),
        ));
    }
    Ok(())
}

/// Validate an HTTP(S) URL with a non-empty host (console URLs, webhooks).
pub fn validate_http_url(field: &str, value: &str) -> Result<(), LagoonError> {
    let parsed = Url::parse(value).map_err(|e| {
        LagoonError::validation(field, format!("'{}' is not a valid URL: {}", value, e))
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(LagoonError::validation(
            field,
            format!("'{}' must be an http or https URL", value),
        ));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(LagoonError::validation(
            field,
            format!("'{}' is missing a host", value),
        ));
    }
    Ok(())
}

/// Validate a user-supplied regular expression (branch/PR match patterns).
/// The pattern must compile; the compiler error is surfaced with the field
/// name attached.
pub fn validate_pattern(field: &str, pattern: &str) -> Result<(), LagoonError> {
    Regex::new(pattern).map_err(|e| {
        LagoonError::validation(field, format!("invalid regular expression: {}", e))
    })?;
    Ok(())
}

/// Strictly parse a positive integer ID.
pub fn parse_positive_int(field: &str, value: &str) -> Result<i64, LagoonError> {
    let parsed: i64 = value.trim().parse().map_err(|_| {
        LagoonError::validation(field, format!("'{}' must be a positive integer", value))
    })?;
    validate_positive_int(field, parsed)?;
    Ok(parsed)
}

/// Reject zero and negative IDs.
pub fn validate_positive_int(field: &str, value: i64) -> Result<(), LagoonError> {
    if value <= 0 {
        return Err(LagoonError::validation(
            field,
            format!("'{}' must be a positive integer", value),
        ));
    }
    Ok(())
}

/// Bounds-check a TCP port.
pub fn validate_port(field: &str, port: i64) -> Result<u16, LagoonError> {
    if !(1..=65535).contains(&port) {
        return Err(LagoonError::validation(
            field,
            format!("'{}' must be between 1 and 65535", port),
        ));
    }
    Ok(port as u16)
}

fn invalid_choice(field: &str, value: &str, allowed: &[&str]) -> LagoonError {
    LagoonError::validation(
        field,
        format!("'{}' is not one of: {}", value, allowed.join(", ")),
    )
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal, {
            $($variant:ident => ($text:literal, $wire:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Lowercase canonical form
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// SCREAMING_SNAKE form used in GraphQL documents
            pub fn as_graphql(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// All accepted lowercase forms
            pub fn choices() -> &'static [&'static str] {
                &[$($text),+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = LagoonError;

            // Case-insensitive, normalizes to the lowercase canonical form
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(invalid_choice($field, other, Self::choices())),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum! {
    /// How an environment was deployed
    DeployType, "deploy_type", {
        Branch => ("branch", "BRANCH"),
        Pullrequest => ("pullrequest", "PULLREQUEST"),
    }
}

string_enum! {
    /// Classification of an environment
    EnvironmentType, "environment_type", {
        Production => ("production", "PRODUCTION"),
        Development => ("development", "DEVELOPMENT"),
        Standby => ("standby", "STANDBY"),
    }
}

string_enum! {
    /// Visibility/application context of a variable
    VariableScope, "scope", {
        Build => ("build", "BUILD"),
        Runtime => ("runtime", "RUNTIME"),
        Global => ("global", "GLOBAL"),
        ContainerRegistry => ("container_registry", "CONTAINER_REGISTRY"),
        InternalContainerRegistry => ("internal_container_registry", "INTERNAL_CONTAINER_REGISTRY"),
    }
}

string_enum! {
    /// Cloud provider a deploy target runs on
    CloudProvider, "cloud_provider", {
        Aws => ("aws", "AWS"),
        Google => ("google", "GOOGLE"),
        Azure => ("azure", "AZURE"),
        Openstack => ("openstack", "OPENSTACK"),
        Other => ("other", "OTHER"),
    }
}

string_enum! {
    /// Permission level required to invoke a task
    TaskPermission, "permission", {
        Guest => ("guest", "GUEST"),
        Developer => ("developer", "DEVELOPER"),
        Maintainer => ("maintainer", "MAINTAINER"),
    }
}

string_enum! {
    /// Notification delivery channel
    NotificationKind, "notification_type", {
        Slack => ("slack", "SLACK"),
        RocketChat => ("rocketchat", "ROCKETCHAT"),
        Email => ("email", "EMAIL"),
        MicrosoftTeams => ("microsoftteams", "MICROSOFTTEAMS"),
    }
}

string_enum! {
    /// Advanced task flavor
    TaskKind, "task_type", {
        Command => ("command", "COMMAND"),
        Image => ("image", "IMAGE"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_names_accept_the_documented_shape() {
        assert!(validate_project_name("test-project").is_ok());
        assert!(validate_project_name("my-site2").is_ok());
        assert!(validate_project_name(&format!("a{}", "b".repeat(57))).is_ok());
    }

    #[test]
    fn project_names_reject_each_rule_violation() {
        // leading digit
        assert!(validate_project_name("1project").is_err());
        // uppercase
        assert!(validate_project_name("Project").is_err());
        // trailing hyphen
        assert!(validate_project_name("project-").is_err());
        // underscores
        assert!(validate_project_name("my_project").is_err());
        // too long
        assert!(validate_project_name(&"a".repeat(59)).is_err());

        let err = validate_project_name("Bad").unwrap_err();
        assert!(err.to_string().contains("project name"));
    }

    #[test]
    fn deploy_target_names_allow_leading_digit() {
        assert!(validate_deploy_target_name("1cluster").is_ok());
        assert!(validate_deploy_target_name("us-east-1").is_ok());
        assert!(validate_deploy_target_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn environment_names_allow_branch_separators() {
        assert!(validate_environment_name("main").is_ok());
        assert!(validate_environment_name("feature/login-2").is_ok());
        assert!(validate_environment_name("v1.2_rc").is_ok());
        assert!(validate_environment_name("-dash").is_err());
        assert!(validate_environment_name("dash-").is_err());
        assert!(validate_environment_name(&"x".repeat(64)).is_err());
    }

    #[test]
    fn git_urls_accept_ssh_and_https_forms() {
        assert!(validate_git_url("git@github.com:test/test-repo.git").is_ok());
        assert!(validate_git_url("https://github.com/test/test-repo.git").is_ok());
        assert!(validate_git_url("git@github.com").is_err());
        assert!(validate_git_url("https://github.com/").is_err());
        assert!(validate_git_url("ftp://github.com/repo").is_err());
    }

    #[test]
    fn http_urls_require_scheme_and_host() {
        assert!(validate_http_url("console_url", "https://console.example.com").is_ok());
        assert!(validate_http_url("webhook", "http://hooks.example.com/x").is_ok());
        assert!(validate_http_url("webhook", "ssh://hooks.example.com").is_err());
        assert!(validate_http_url("webhook", "not a url").is_err());
    }

    #[test]
    fn patterns_must_compile() {
        assert!(validate_pattern("branches", "^(main|develop)$").is_ok());

        let err = validate_pattern("branches", "[unclosed").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("branches"));
        assert!(message.contains("invalid regular expression"));
    }

    #[test]
    fn port_bounds_are_inclusive() {
        assert!(validate_port("ssh_port", 1).is_ok());
        assert!(validate_port("ssh_port", 65535).is_ok());
        assert!(validate_port("ssh_port", 0).is_err());
        assert!(validate_port("ssh_port", 65536).is_err());
    }

    #[test]
    fn positive_int_parsing_is_strict() {
        assert_eq!(parse_positive_int("project_id", "123").unwrap(), 123);
        assert!(parse_positive_int("project_id", "0").is_err());
        assert!(parse_positive_int("project_id", "-3").is_err());
        assert!(parse_positive_int("project_id", "12a").is_err());
        assert!(parse_positive_int("project_id", "").is_err());
    }

    #[test]
    fn enums_match_case_insensitively_and_normalize() {
        let scope: VariableScope = "Container_Registry".parse().unwrap();
        assert_eq!(scope, VariableScope::ContainerRegistry);
        assert_eq!(scope.as_str(), "container_registry");
        assert_eq!(scope.as_graphql(), "CONTAINER_REGISTRY");

        let deploy: DeployType = "BRANCH".parse().unwrap();
        assert_eq!(deploy, DeployType::Branch);
    }

    #[test]
    fn enum_errors_enumerate_the_valid_set() {
        let err = "webhook".parse::<NotificationKind>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("notification_type"));
        assert!(message.contains("slack"));
        assert!(message.contains("microsoftteams"));
    }
}
