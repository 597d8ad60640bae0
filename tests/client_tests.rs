//! Integration tests for client construction and the project lifecycle.

use genius_client::mocks::{MemorySessionStore, MockResponse, MockTransport};
use genius_client::transport::HttpMethod;
use genius_client::{
    BasicCredentials, FeedQuery, GeniusClient, GeniusConfig, GeniusError, Pagination,
    ProjectDescriptor, ProvisionOptions, Session,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use test_case::test_case;

fn credentials() -> BasicCredentials {
    BasicCredentials::new("a", "b")
}

fn descriptor() -> ProjectDescriptor {
    ProjectDescriptor::new("test", "something", "123@email.com")
}

fn item() -> Value {
    json!({"title": "a", "description": "b", "external_url": "c", "image_url": "d"})
}

/// Helper to create a bootstrap client with mock collaborators.
fn bootstrap_client(
    transport: &Arc<MockTransport>,
    store: &Arc<MemorySessionStore>,
) -> GeniusClient {
    GeniusClient::builder()
        .credentials(credentials())
        .project(descriptor())
        .transport(transport.clone())
        .session_store(store.clone())
        .build()
        .unwrap()
}

#[test_case(false, false, false, false ; "nothing")]
#[test_case(true, false, false, false ; "credentials only")]
#[test_case(false, true, false, false ; "descriptor only")]
#[test_case(true, true, false, true ; "bootstrap pair")]
#[test_case(false, false, true, true ; "session only")]
#[test_case(true, false, true, false ; "credentials and session")]
#[test_case(false, true, true, false ; "descriptor and session")]
#[test_case(true, true, true, false ; "all three")]
fn test_identity_combinations(
    with_credentials: bool,
    with_descriptor: bool,
    with_session: bool,
    accepted: bool,
) {
    let mut builder = GeniusClient::builder()
        .transport(Arc::new(MockTransport::new()))
        .session_store(Arc::new(MemorySessionStore::new()));
    if with_credentials {
        builder = builder.credentials(credentials());
    }
    if with_descriptor {
        builder = builder.project(descriptor());
    }
    if with_session {
        builder = builder.session(Session::new("test", "123456789"));
    }

    match builder.build() {
        Ok(_) => assert!(accepted, "construction should have failed"),
        Err(GeniusError::InvalidConfiguration { .. }) => {
            assert!(!accepted, "construction should have succeeded")
        }
        Err(other) => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_project_activates_and_persists_session() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_json(&json!({"access_token": "abc"}));
    let store = Arc::new(MemorySessionStore::new());
    let mut client = bootstrap_client(&transport, &store);

    client.create_project().await.unwrap();

    let session = client.session().unwrap();
    assert_eq!(session.project_name(), "test");
    assert_eq!(session.token(), "abc");

    let saved = store.saved().unwrap();
    assert_eq!(saved.to_json(), json!({"project_name": "test", "token": "abc"}));

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.path, "hackathon/project/create");
    assert_eq!(request.authorization(), Some("Basic YTpi"));
    assert_eq!(
        request.json_body().unwrap(),
        json!({
            "project_name": "test",
            "project_summary": "something",
            "hacker_email": "123@email.com"
        })
    );
}

#[tokio::test]
async fn test_resource_calls_use_new_token_after_create_project() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_json(&json!({"access_token": "abc"}));
    transport.queue_json(&json!(["1", "2", "3"]));
    let store = Arc::new(MemorySessionStore::new());
    let mut client = bootstrap_client(&transport, &store);

    client.create_project().await.unwrap();
    let listed = client.items().list(Pagination::default()).await.unwrap();

    assert_eq!(listed, json!(["1", "2", "3"]));
    let request = transport.last_request().unwrap();
    assert_eq!(request.path, "platform/project/test/items/list");
    assert_eq!(request.authorization(), Some("Bearer abc"));
}

#[tokio::test]
async fn test_create_project_twice_is_rejected_without_request() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_json(&json!({"access_token": "abc"}));
    let store = Arc::new(MemorySessionStore::new());
    let mut client = bootstrap_client(&transport, &store);

    client.create_project().await.unwrap();
    let second = client.create_project().await;

    assert!(matches!(second, Err(GeniusError::Precondition { .. })));
    assert_eq!(transport.request_count(), 1);
    assert_eq!(client.session().unwrap().token(), "abc");
}

#[tokio::test]
async fn test_create_project_on_session_client_is_rejected() {
    let transport = Arc::new(MockTransport::new());
    let mut client = GeniusClient::builder()
        .session(Session::new("test", "123456789"))
        .transport(transport.clone())
        .session_store(Arc::new(MemorySessionStore::new()))
        .build()
        .unwrap();

    assert!(matches!(
        client.create_project().await,
        Err(GeniusError::Precondition { .. })
    ));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_create_project_upstream_failure_stays_in_bootstrap() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_error(401, "bad credentials");
    let store = Arc::new(MemorySessionStore::new());
    let mut client = bootstrap_client(&transport, &store);

    let error = client.create_project().await.unwrap_err();

    assert_eq!(error.status(), Some(401));
    assert!(error.is_unauthorized());
    assert!(!client.is_active());
    assert!(store.saved().is_none());
}

#[tokio::test]
async fn test_create_project_without_access_token() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_json(&json!({"token": "abc"}));
    let store = Arc::new(MemorySessionStore::new());
    let mut client = bootstrap_client(&transport, &store);

    assert!(matches!(
        client.create_project().await,
        Err(GeniusError::Serialization { .. })
    ));
    assert!(!client.is_active());
}

#[tokio::test]
async fn test_create_project_storage_failure_keeps_session() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_json(&json!({"access_token": "abc"}));
    let store = Arc::new(MemorySessionStore::failing());
    let mut client = bootstrap_client(&transport, &store);

    assert!(matches!(
        client.create_project().await,
        Err(GeniusError::Storage { .. })
    ));
    assert_eq!(client.session().unwrap().token(), "abc");
}

#[tokio::test]
async fn test_create_project_writes_token_file() {
    let dir = tempfile::tempdir().unwrap();
    let project_dir = dir.path().join("genius_project");
    let transport = Arc::new(MockTransport::new());
    transport.queue_json(&json!({"access_token": "abc"}));

    let mut client = GeniusClient::builder()
        .credentials(credentials())
        .project(descriptor())
        .project_dir(&project_dir)
        .transport(transport.clone())
        .build()
        .unwrap();
    client.create_project().await.unwrap();

    let written: Value = serde_json::from_str(
        &std::fs::read_to_string(project_dir.join("token.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(written, json!({"project_name": "test", "token": "abc"}));

    let config = GeniusConfig::builder()
        .project_dir(&project_dir)
        .build()
        .unwrap();
    let resumed = GeniusClient::from_saved_session(config).unwrap();
    assert_eq!(resumed.session().unwrap().token(), "abc");
}

#[test]
fn test_from_saved_session_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeniusConfig::builder()
        .project_dir(dir.path())
        .build()
        .unwrap();

    assert!(matches!(
        GeniusClient::from_saved_session(config),
        Err(GeniusError::ConfigLoad { .. })
    ));
}

#[tokio::test]
async fn test_resource_operations_in_bootstrap_fail_before_dispatch() {
    let transport = Arc::new(MockTransport::new());
    transport.set_default(MockResponse::json(&json!({})));
    let store = Arc::new(MemorySessionStore::new());
    let client = bootstrap_client(&transport, &store);

    let results = vec![
        client.items().add(vec![item()]).await,
        client.items().get("1").await,
        client.items().list(Pagination::default()).await,
        client.items().update("1", item()).await,
        client.items().delete("1").await,
        client.policies().add(vec![json!({"policy": "p"})]).await,
        client.policies().list().await,
        client.policies().enable("1", true).await,
        client.instructions().list().await,
        client.models().list().await,
        client.models().train(None).await,
        client.models().activate("m").await,
        client.project().update(json!({"project_summary": "new"})).await,
        client.data().feed(&FeedQuery::default(), None).await,
        client.data().batch(&FeedQuery::default(), None).await,
    ];

    for result in results {
        assert!(
            matches!(result, Err(GeniusError::Precondition { .. })),
            "expected Precondition, got {result:?}"
        );
    }
    assert!(matches!(
        client.data().batch_to_items(&FeedQuery::default(), None).await,
        Err(GeniusError::Precondition { .. })
    ));
    assert!(matches!(
        client.models().promote_most_recent().await,
        Err(GeniusError::Precondition { .. })
    ));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_provision_runs_every_step_in_order() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_json(&json!({"access_token": "abc"}));
    transport.queue_json(&json!({"created": 1}));
    transport.queue_json(&json!({"created": 1}));
    transport.queue_json(&json!({"status": "training"}));
    let store = Arc::new(MemorySessionStore::new());
    let mut client = bootstrap_client(&transport, &store);

    let report = client
        .provision(vec![item()], vec![json!({"policy": "Prefer chairs"})])
        .await
        .unwrap();

    assert_eq!(report.training, json!({"status": "training"}));
    assert!(!report.removed_ai_generated);
    let paths: Vec<String> = transport.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "hackathon/project/create",
            "platform/project/test/items/create",
            "platform/test/models/policies",
            "platform/test/models/train",
        ]
    );
    assert!(store.saved().is_some());
}

#[tokio::test]
async fn test_provision_with_ai_instruction_removal() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_json(&json!({"access_token": "abc"}));
    transport.queue_json(&json!({"created": 1}));
    transport.queue_json(&json!([{"id": "gen-1", "promptlet": "generated"}]));
    transport.queue(MockResponse::empty());
    transport.queue_json(&json!({"created": 1}));
    transport.queue_json(&json!({"status": "training"}));
    let store = Arc::new(MemorySessionStore::new());
    let mut client = bootstrap_client(&transport, &store);

    let report = client
        .provision_with(
            vec![item()],
            vec![json!({"policy": "Prefer chairs"})],
            ProvisionOptions::new().remove_ai_generated(true),
        )
        .await
        .unwrap();

    assert!(report.removed_ai_generated);
    let calls: Vec<(HttpMethod, String)> = transport
        .requests()
        .into_iter()
        .map(|r| (r.method, r.path))
        .collect();
    assert_eq!(
        calls,
        vec![
            (HttpMethod::Post, "hackathon/project/create".to_string()),
            (HttpMethod::Post, "platform/project/test/items/create".to_string()),
            (HttpMethod::Get, "hackathon/test/model/instruction/list".to_string()),
            (
                HttpMethod::Delete,
                "hackathon/test/model/instruction/gen-1/delete".to_string()
            ),
            (HttpMethod::Post, "platform/test/models/policies".to_string()),
            (HttpMethod::Post, "platform/test/models/train".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_provision_validates_before_creating_project() {
    let transport = Arc::new(MockTransport::new());
    let store = Arc::new(MemorySessionStore::new());
    let mut client = bootstrap_client(&transport, &store);

    let result = client
        .provision(vec![item()], vec![json!({"promptlet": "legacy field"})])
        .await;

    assert!(matches!(result, Err(GeniusError::Validation { .. })));
    assert_eq!(transport.request_count(), 0);
    assert!(!client.is_active());
}
