//! Resource lifecycle tests against a mock GraphQL endpoint

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lagoon_provider::config::{PartialSettings, Settings};
use lagoon_provider::{LagoonProvider, ResourceLifecycle};

fn provider_for(server: &MockServer) -> LagoonProvider {
    let settings = Settings::resolve(
        PartialSettings {
            api_url: Some(format!("{}/graphql", server.uri())),
            token: Some("test-token".to_string()),
            ..Default::default()
        },
        PartialSettings::default(),
    );
    LagoonProvider::new(&settings).unwrap()
}

fn resource(server: &MockServer, kind: &str) -> Box<dyn ResourceLifecycle> {
    provider_for(server).resource(kind).unwrap()
}

#[tokio::test]
async fn project_create_returns_the_server_assigned_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("addProject"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "addProject": {
                    "id": 1,
                    "name": "test-project",
                    "gitUrl": "git@github.com:test/test-repo.git",
                    "kubernetes": { "id": 1 }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let project = resource(&server, "lagoon:project");
    let created = project
        .create(json!({
            "name": "test-project",
            "git_url": "git@github.com:test/test-repo.git",
            "deploytarget_id": 1
        }))
        .await
        .unwrap();

    assert_eq!(created.id, "1");
    assert_eq!(created.outs["name"], "test-project");
    assert_eq!(created.outs["git_url"], "git@github.com:test/test-repo.git");
    assert_eq!(created.outs["deploytarget_id"], 1);
}

#[tokio::test]
async fn project_create_rejects_invalid_inputs_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(0)
        .mount(&server)
        .await;

    let project = resource(&server, "lagoon:project");
    let err = project
        .create(json!({
            "name": "Invalid Name",
            "git_url": "git@github.com:test/test-repo.git"
        }))
        .await
        .unwrap_err();

    assert!(err.is_validation());
}

#[tokio::test]
async fn project_update_with_unchanged_inputs_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(0)
        .mount(&server)
        .await;

    let state = json!({
        "id": 1,
        "name": "test-project",
        "git_url": "git@github.com:test/test-repo.git",
        "deploytarget_id": 1
    });
    let inputs = json!({
        "name": "test-project",
        "git_url": "git@github.com:test/test-repo.git",
        "deploytarget_id": 1
    });

    let project = resource(&server, "lagoon:project");
    let updated = project.update("1", state.clone(), inputs).await.unwrap();

    assert_eq!(updated.outs, state);
}

#[tokio::test]
async fn variable_update_deletes_the_old_row_and_creates_a_new_one() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("deleteEnvVariable"))
        .and(body_partial_json(json!({ "variables": { "input": { "id": 5 } } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "deleteEnvVariable": "success" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("addEnvVariable"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "addEnvVariable": {
                    "id": 9,
                    "name": "API_KEY",
                    "value": "new-value",
                    "scope": "BUILD"
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let variable = resource(&server, "lagoon:variable");
    let updated = variable
        .update(
            "p1_API_KEY",
            json!({
                "id": 5,
                "project_id": 1,
                "name": "API_KEY",
                "value": "old-value",
                "scope": "build"
            }),
            json!({
                "project_id": 1,
                "name": "API_KEY",
                "value": "new-value",
                "scope": "build"
            }),
        )
        .await
        .unwrap();

    // the server row ID changed, the durable local identity did not
    assert_eq!(updated.outs["id"], 9);
    assert_eq!(updated.outs["value"], "new-value");
}

#[tokio::test]
async fn variable_recreate_swallows_an_api_delete_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("deleteEnvVariable"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Unauthorized: variable does not exist" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("addEnvVariable"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "addEnvVariable": {
                    "id": 10,
                    "name": "API_KEY",
                    "value": "new-value",
                    "scope": "BUILD"
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let variable = resource(&server, "lagoon:variable");
    let updated = variable
        .update(
            "p1_API_KEY",
            json!({
                "id": 5,
                "project_id": 1,
                "name": "API_KEY",
                "value": "old-value",
                "scope": "build"
            }),
            json!({
                "project_id": 1,
                "name": "API_KEY",
                "value": "new-value",
                "scope": "build"
            }),
        )
        .await
        .unwrap();

    assert_eq!(updated.outs["id"], 10);
}

#[tokio::test]
async fn variable_recreate_propagates_a_connection_delete_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("deleteEnvVariable"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("addEnvVariable"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(0)
        .mount(&server)
        .await;

    let variable = resource(&server, "lagoon:variable");
    let err = variable
        .update(
            "p1_API_KEY",
            json!({
                "id": 5,
                "project_id": 1,
                "name": "API_KEY",
                "value": "old-value",
                "scope": "build"
            }),
            json!({
                "project_id": 1,
                "name": "API_KEY",
                "value": "new-value",
                "scope": "build"
            }),
        )
        .await
        .unwrap_err();

    assert!(err.is_connection());
}

#[tokio::test]
async fn task_update_deletes_the_old_definition_and_creates_a_new_one() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("deleteAdvancedTaskDefinition"))
        .and(body_partial_json(json!({ "variables": { "id": 21 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "deleteAdvancedTaskDefinition": "success" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("addAdvancedTaskDefinition"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "addAdvancedTaskDefinition": {
                    "id": 22,
                    "name": "clear-cache",
                    "type": "COMMAND",
                    "service": "cli",
                    "command": "drush cr --all",
                    "environment": 4
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let task = resource(&server, "lagoon:task");
    let updated = task
        .update(
            "21",
            json!({
                "id": 21,
                "name": "clear-cache",
                "task_type": "command",
                "service": "cli",
                "command": "drush cr",
                "environment_id": 4
            }),
            json!({
                "name": "clear-cache",
                "task_type": "command",
                "service": "cli",
                "command": "drush cr --all",
                "environment_id": 4
            }),
        )
        .await
        .unwrap();

    // the server-side definition ID changed with the recreate
    assert_eq!(updated.outs["id"], 22);
    assert_eq!(updated.outs["command"], "drush cr --all");
}

#[tokio::test]
async fn deploy_target_config_weight_is_sent_unmodified() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("addDeployTargetConfig"))
        .and(body_partial_json(json!({
            "variables": { "input": { "weight": 42 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "addDeployTargetConfig": {
                    "id": 7,
                    "project": { "id": 1 },
                    "deployTarget": { "id": 3 },
                    "branches": "^(main|develop)$",
                    "pullrequests": "false",
                    "weight": 42
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = resource(&server, "lagoon:deploy-target-config");
    let created = config
        .create(json!({
            "project_id": 1,
            "deploytarget_id": 3,
            "branches": "^(main|develop)$",
            "pullrequests": "false",
            "weight": 42
        }))
        .await
        .unwrap();

    assert_eq!(created.id, "1:7");
    assert_eq!(created.outs["weight"], 42);
}

#[tokio::test]
async fn environment_read_of_a_missing_environment_returns_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("environmentByName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "environmentByName": null }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let environment = resource(&server, "lagoon:environment");
    let read = environment
        .read(
            "1:main",
            json!({
                "id": 3,
                "name": "main",
                "project_id": 1,
                "deploy_type": "branch",
                "environment_type": "production"
            }),
        )
        .await
        .unwrap();

    assert!(read.is_none());
}
