//! Transport-level tests against a mock GraphQL endpoint

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lagoon_provider::config::{PartialSettings, Settings};
use lagoon_provider::{LagoonClient, LagoonError};

fn settings_for(server: &MockServer) -> Settings {
    Settings::resolve(
        PartialSettings {
            api_url: Some(format!("{}/graphql", server.uri())),
            token: Some("test-token".to_string()),
            ..Default::default()
        },
        PartialSettings::default(),
    )
}

#[tokio::test]
async fn execute_returns_the_data_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "data": { "allProjects": [] }
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = LagoonClient::new(&settings_for(&server)).unwrap();
    let data = client
        .execute("query { allProjects { id } }", json!({}))
        .await
        .unwrap();

    assert_eq!(data["allProjects"], json!([]));
}

#[tokio::test]
async fn graphql_errors_aggregate_into_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [
                { "message": "first problem" },
                { "message": "second problem" }
            ]
        })))
        .mount(&server)
        .await;

    let client = LagoonClient::new(&settings_for(&server)).unwrap();
    let err = client.execute("query { x }", json!({})).await.unwrap_err();

    assert!(err.is_api());
    let message = err.to_string();
    assert!(message.contains("first problem"));
    assert!(message.contains("second problem"));
}

#[tokio::test]
async fn non_2xx_status_is_a_connection_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = LagoonClient::new(&settings_for(&server)).unwrap();
    let err = client.execute("query { x }", json!({})).await.unwrap_err();

    assert!(err.is_connection());
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn unknown_field_error_falls_back_to_the_legacy_document() {
    let server = MockServer::start().await;

    // Current-schema document asks for the kubernetes relation; the old
    // server rejects it by name.
    Mock::given(method("POST"))
        .and(body_string_contains("kubernetes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [
                { "message": "Cannot query field \"kubernetes\" on type \"Project\"." }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("openshift"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "projectByName": {
                    "id": 12,
                    "name": "legacy-project",
                    "gitUrl": "git@github.com:test/legacy.git",
                    "openshift": { "id": 4 }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = LagoonClient::new(&settings_for(&server)).unwrap();
    let project = client
        .project_by_name("legacy-project")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(project.id, 12);
    assert_eq!(project.deploy_target_id, Some(4));
}

#[tokio::test]
async fn non_schema_errors_do_not_trigger_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Project not found" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = LagoonClient::new(&settings_for(&server)).unwrap();
    let err = client.project_by_name("missing").await.unwrap_err();

    assert!(matches!(err, LagoonError::Api(_)));
}

#[tokio::test]
async fn missing_credentials_fail_before_any_request() {
    let settings = Settings::resolve(
        PartialSettings {
            api_url: Some("http://localhost:7070/graphql".to_string()),
            ..Default::default()
        },
        PartialSettings::default(),
    );

    // Guard against ambient credentials leaking into the test environment.
    if std::env::var("LAGOON_API_TOKEN").is_ok() || std::env::var("LAGOON_JWT_SECRET").is_ok() {
        return;
    }

    assert!(matches!(
        LagoonClient::new(&settings),
        Err(LagoonError::Config(_))
    ));
}
