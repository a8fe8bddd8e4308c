//! Import-ID codec
//!
//! The host's import operation supplies only an opaque string ID with no
//! prior state; refresh supplies the same ID plus full prior state. Composite
//! identities are encoded into colon-delimited strings so both paths can be
//! served by a single `read` implementation that branches once on
//! [`is_import_scenario`].

use serde_json::Value;

use crate::errors::LagoonError;
use crate::validate::{parse_positive_int, NotificationKind};

/// Expected form of an environment import ID
pub const ENVIRONMENT_ID_FORM: &str = "project_id:environment_name";

/// Expected form of a variable import ID (empty environment_id means
/// project scope)
pub const VARIABLE_ID_FORM: &str = "project_id:environment_id:variable_name";

/// Expected form of a deploy target config import ID
pub const DEPLOY_TARGET_CONFIG_ID_FORM: &str = "project_id:config_id";

/// Expected form of a project notification import ID
pub const PROJECT_NOTIFICATION_ID_FORM: &str = "project_name:notification_type:notification_name";

/// Detect whether a `read` call is an import (bare ID, no usable state) or a
/// refresh (full prior state available). True when the state map is absent,
/// empty, or missing any of the fields a refresh would need.
pub fn is_import_scenario(state: &Value, required_fields: &[&str]) -> bool {
    match state.as_object() {
        None => true,
        Some(map) if map.is_empty() => true,
        Some(map) => required_fields
            .iter()
            .any(|field| map.get(*field).map_or(true, Value::is_null)),
    }
}

fn wrong_arity(form: &str, id: &str) -> LagoonError {
    LagoonError::validation(
        "import ID",
        format!("expected '{}', got '{}'", form, id),
    )
}

fn empty_component(field: &str) -> LagoonError {
    LagoonError::validation(field, "must not be empty")
}

/// Parse an environment import ID of the form `project_id:environment_name`.
pub fn parse_environment_id(id: &str) -> Result<(i64, String), LagoonError> {
    let parts: Vec<&str> = id.split(':').collect();
    if parts.len() != 2 {
        return Err(wrong_arity(ENVIRONMENT_ID_FORM, id));
    }
    let project_id = parse_positive_int("project_id", parts[0])?;
    if parts[1].is_empty() {
        return Err(empty_component("environment_name"));
    }
    Ok((project_id, parts[1].to_string()))
}

/// Encode an environment import ID.
pub fn environment_import_id(project_id: i64, environment_name: &str) -> String {
    format!("{}:{}", project_id, environment_name)
}

/// Parse a variable import ID of the form
/// `project_id:environment_id:variable_name`. An empty `environment_id`
/// component denotes a project-scoped variable.
pub fn parse_variable_id(id: &str) -> Result<(i64, Option<i64>, String), LagoonError> {
    let parts: Vec<&str> = id.split(':').collect();
    if parts.len() != 3 {
        return Err(wrong_arity(VARIABLE_ID_FORM, id));
    }
    let project_id = parse_positive_int("project_id", parts[0])?;
    let environment_id = if parts[1].is_empty() {
        None
    } else {
        Some(parse_positive_int("environment_id", parts[1])?)
    };
    if parts[2].is_empty() {
        return Err(empty_component("variable_name"));
    }
    Ok((project_id, environment_id, parts[2].to_string()))
}

/// Encode a variable import ID.
pub fn variable_import_id(project_id: i64, environment_id: Option<i64>, name: &str) -> String {
    match environment_id {
        Some(env) => format!("{}:{}:{}", project_id, env, name),
        None => format!("{}::{}", project_id, name),
    }
}

/// Synthesize the durable local ID for a variable: `p{project}_{name}` for
/// project scope, `p{project}e{env}_{name}` for environment scope. Stable
/// across delete-then-recreate updates, unlike the server-side row ID.
pub fn variable_local_id(project_id: i64, environment_id: Option<i64>, name: &str) -> String {
    match environment_id {
        Some(env) => format!("p{}e{}_{}", project_id, env, name),
        None => format!("p{}_{}", project_id, name),
    }
}

/// Parse a deploy target config import ID of the form `project_id:config_id`.
pub fn parse_deploy_target_config_id(id: &str) -> Result<(i64, i64), LagoonError> {
    let parts: Vec<&str> = id.split(':').collect();
    if parts.len() != 2 {
        return Err(wrong_arity(DEPLOY_TARGET_CONFIG_ID_FORM, id));
    }
    let project_id = parse_positive_int("project_id", parts[0])?;
    let config_id = parse_positive_int("config_id", parts[1])?;
    Ok((project_id, config_id))
}

/// Encode a deploy target config import ID.
pub fn deploy_target_config_import_id(project_id: i64, config_id: i64) -> String {
    format!("{}:{}", project_id, config_id)
}

/// Parse a project notification ID of the form
/// `project_name:notification_type:notification_name`. The association has no
/// server-side ID of its own; the tuple is the identity.
pub fn parse_project_notification_id(
    id: &str,
) -> Result<(String, NotificationKind, String), LagoonError> {
    let parts: Vec<&str> = id.split(':').collect();
    if parts.len() != 3 {
        return Err(wrong_arity(PROJECT_NOTIFICATION_ID_FORM, id));
    }
    if parts[0].is_empty() {
        return Err(empty_component("project_name"));
    }
    let kind: NotificationKind = parts[1].parse()?;
    if parts[2].is_empty() {
        return Err(empty_component("notification_name"));
    }
    Ok((parts[0].to_string(), kind, parts[2].to_string()))
}

/// Encode a project notification ID.
pub fn project_notification_id(project_name: &str, kind: NotificationKind, name: &str) -> String {
    format!("{}:{}:{}", project_name, kind, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn import_scenario_detection() {
        assert!(is_import_scenario(&json!({}), &["name", "project_id"]));
        assert!(is_import_scenario(&Value::Null, &["name"]));
        assert!(is_import_scenario(
            &json!({"name": "main"}),
            &["name", "project_id"]
        ));
        assert!(is_import_scenario(
            &json!({"name": "main", "project_id": null}),
            &["name", "project_id"]
        ));
        assert!(!is_import_scenario(
            &json!({"name": "main", "project_id": 3}),
            &["name", "project_id"]
        ));
    }

    #[test]
    fn environment_id_round_trip() {
        assert_eq!(parse_environment_id("123:main").unwrap(), (123, "main".to_string()));
        assert_eq!(environment_import_id(123, "main"), "123:main");

        let (project, name) = parse_environment_id(&environment_import_id(7, "feature/x")).unwrap();
        assert_eq!((project, name.as_str()), (7, "feature/x"));
    }

    #[test]
    fn environment_id_rejects_malformed_input() {
        assert!(parse_environment_id("123").is_err());
        assert!(parse_environment_id("123:main:extra").is_err());
        assert!(parse_environment_id("abc:main").is_err());
        assert!(parse_environment_id("0:main").is_err());
        assert!(parse_environment_id("123:").is_err());

        let err = parse_environment_id("nope").unwrap_err().to_string();
        assert!(err.contains(ENVIRONMENT_ID_FORM));
    }

    #[test]
    fn variable_id_distinguishes_project_and_environment_scope() {
        assert_eq!(
            parse_variable_id("123::API_KEY").unwrap(),
            (123, None, "API_KEY".to_string())
        );
        assert_eq!(
            parse_variable_id("123:45:API_KEY").unwrap(),
            (123, Some(45), "API_KEY".to_string())
        );
        assert_eq!(variable_import_id(123, None, "API_KEY"), "123::API_KEY");
        assert_eq!(variable_import_id(123, Some(45), "API_KEY"), "123:45:API_KEY");
    }

    #[test]
    fn variable_id_rejects_malformed_input() {
        assert!(parse_variable_id("123:API_KEY").is_err());
        assert!(parse_variable_id("123:-1:API_KEY").is_err());
        assert!(parse_variable_id("123:45:").is_err());

        let err = parse_variable_id("x::API_KEY").unwrap_err().to_string();
        assert!(err.contains("project_id"));
    }

    #[test]
    fn variable_local_ids() {
        assert_eq!(variable_local_id(1, None, "API_KEY"), "p1_API_KEY");
        assert_eq!(variable_local_id(1, Some(2), "API_KEY"), "p1e2_API_KEY");
    }

    #[test]
    fn deploy_target_config_id_round_trip() {
        assert_eq!(parse_deploy_target_config_id("3:17").unwrap(), (3, 17));
        assert_eq!(deploy_target_config_import_id(3, 17), "3:17");
        assert!(parse_deploy_target_config_id("3").is_err());
        assert!(parse_deploy_target_config_id("3:0").is_err());

        let err = parse_deploy_target_config_id("3:x").unwrap_err().to_string();
        assert!(err.contains("config_id"));
    }

    #[test]
    fn project_notification_id_round_trip() {
        let (project, kind, name) =
            parse_project_notification_id("my-site:slack:ops-alerts").unwrap();
        assert_eq!(project, "my-site");
        assert_eq!(kind, NotificationKind::Slack);
        assert_eq!(name, "ops-alerts");
        assert_eq!(
            project_notification_id("my-site", NotificationKind::Slack, "ops-alerts"),
            "my-site:slack:ops-alerts"
        );
    }

    #[test]
    fn project_notification_id_rejects_unknown_kind() {
        let err = parse_project_notification_id("my-site:pager:oncall")
            .unwrap_err()
            .to_string();
        assert!(err.contains("notification_type"));
    }
}
