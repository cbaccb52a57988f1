use super::flow::*;
use super::*;
use crate::flow::{Phase, RetryOutcome};
use crate::wizard::Transition;
use httpmock::prelude::*;
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use serde_json::json;
use std::time::Duration;

fn projects_for(server: &MockServer) -> FirebaseProjects {
    let client = ClientBuilder::new(Client::new()).build();
    FirebaseProjects::new_with_client(client, server.url("/crm/v1"), server.url("/firebase/v1beta1"))
}

fn flow_for(server: &MockServer) -> CreateProjectFlow {
    CreateProjectFlow::new(projects_for(server)).with_poll_interval(Duration::ZERO)
}

#[tokio::test]
async fn test_create_gcp_project_returns_operation() {
    let server = MockServer::start();
    let projects = projects_for(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/crm/v1/projects")
            .header("content-type", "application/json")
            .json_body(json!({
                "projectId": "demo-project",
                "name": "Demo Project"
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "name": "operations/cp.7" }));
    });

    let operation = projects
        .create_gcp_project("demo-project", "Demo Project")
        .await
        .unwrap();
    assert_eq!(operation.name, "operations/cp.7");
    assert!(!operation.is_terminal());

    mock.assert();
}

#[tokio::test]
async fn test_add_google_analytics_sends_account() {
    let server = MockServer::start();
    let projects = projects_for(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/firebase/v1beta1/projects/demo-project:addGoogleAnalytics")
            .json_body(json!({ "analyticsAccountId": "12345" }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "name": "operations/ga.1", "done": true }));
    });

    let operation = projects.add_google_analytics("demo-project", "12345").await.unwrap();
    assert!(operation.succeeded());
    mock.assert();
}

#[tokio::test]
async fn test_list_projects_passes_paging() {
    let server = MockServer::start();
    let projects = projects_for(&server);

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/firebase/v1beta1/projects")
            .query_param("pageSize", "2")
            .query_param("pageToken", "next");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "results": [
                    { "name": "projects/a-project", "projectId": "a-project", "displayName": "A" }
                ],
                "nextPageToken": "after"
            }));
    });

    let page = projects.list_projects(Some(2), Some("next")).await.unwrap();
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].display_name.as_deref(), Some("A"));
    assert_eq!(page.next_page_token.as_deref(), Some("after"));
    mock.assert();
}

#[tokio::test]
async fn test_wizard_rejects_missing_details() {
    let server = MockServer::start();
    let mut flow = flow_for(&server);

    assert_eq!(flow.next().await, Transition::Blocked);
    let state = flow.snapshot();
    assert_eq!(state.wizard_step, STEP_DETAILS);
    assert_eq!(state.error.unwrap().cause, CreateProjectError::EmptyDisplayName);

    flow.edit(|d| d.with_display_name("Demo").with_project_id("Demo_Project"));
    assert_eq!(flow.next().await, Transition::Blocked);
    assert_eq!(
        flow.snapshot().error.unwrap().cause,
        CreateProjectError::InvalidProjectId
    );

    flow.edit(|d| d.with_project_id(""));
    assert_eq!(flow.next().await, Transition::Blocked);
    assert_eq!(
        flow.snapshot().error.unwrap().cause,
        CreateProjectError::EmptyProjectId
    );
}

#[tokio::test]
async fn test_wizard_requires_analytics_account_when_enabled() {
    let server = MockServer::start();
    let mut flow = flow_for(&server);

    flow.edit(|d| d.with_display_name("Demo Project").with_analytics(true));
    assert_eq!(flow.next().await, Transition::Moved(STEP_ANALYTICS));
    assert_eq!(flow.next().await, Transition::Blocked);

    let state = flow.snapshot();
    assert_eq!(state.wizard_step, STEP_ANALYTICS);
    assert_eq!(state.error.unwrap().cause, CreateProjectError::MissingAnalyticsAccount);

    flow.edit(|d| d.with_analytics_account("998877"));
    assert_eq!(flow.next().await, Transition::Moved(STEP_REVIEW));
}

#[test]
fn test_display_name_prefills_project_id() {
    let draft = ProjectDraft::default().with_display_name("Demo Project");
    assert_eq!(draft.project_id, "demo-project");

    let draft = draft.with_display_name("Demo Project Two");
    assert_eq!(draft.project_id, "demo-project-two");

    let draft = draft.with_project_id("custom-id").with_display_name("Renamed");
    assert_eq!(draft.project_id, "custom-id");
}

#[tokio::test]
async fn test_create_project_flow_runs_all_operations() {
    let server = MockServer::start();

    let create = server.mock(|when, then| {
        when.method(POST).path("/crm/v1/projects");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "name": "operations/cp.1" }));
    });
    let create_status = server.mock(|when, then| {
        when.method(GET).path("/crm/v1/operations/cp.1");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "name": "operations/cp.1",
                "done": true,
                "response": { "projectId": "demo-project", "projectNumber": "42" }
            }));
    });
    let add_firebase = server.mock(|when, then| {
        when.method(POST)
            .path("/firebase/v1beta1/projects/demo-project:addFirebase");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "name": "operations/fb.1" }));
    });
    let firebase_status = server.mock(|when, then| {
        when.method(GET).path("/firebase/v1beta1/operations/fb.1");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "name": "operations/fb.1", "done": true }));
    });

    let mut flow = flow_for(&server);
    flow.edit(|d| d.with_display_name("Demo Project"));
    assert_eq!(flow.next().await, Transition::Moved(STEP_ANALYTICS));
    assert_eq!(flow.next().await, Transition::Moved(STEP_REVIEW));
    assert_eq!(flow.next().await, Transition::Finished);

    let state = flow.snapshot();
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(state.completed_steps, 3);
    assert!(state.error.is_none());

    create.assert();
    create_status.assert();
    add_firebase.assert();
    firebase_status.assert();
}

#[tokio::test]
async fn test_failed_add_firebase_resumes_on_retry() {
    let server = MockServer::start();

    let create = server.mock(|when, then| {
        when.method(POST).path("/crm/v1/projects");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "name": "operations/cp.2", "done": true }));
    });
    let mut rejected = server.mock(|when, then| {
        when.method(POST)
            .path("/firebase/v1beta1/projects/demo-project:addFirebase");
        then.status(403)
            .header("content-type", "application/json")
            .json_body(json!({
                "error": {
                    "code": 403,
                    "message": "The caller does not have permission",
                    "status": "PERMISSION_DENIED"
                }
            }));
    });

    let mut flow = flow_for(&server);
    flow.edit(|d| d.with_display_name("Demo Project"));
    flow.next().await;
    flow.next().await;
    assert_eq!(flow.next().await, Transition::Finished);

    let state = flow.snapshot();
    assert_eq!(state.phase, Phase::Failed { step: 2 });
    let error = state.error.unwrap();
    assert_eq!(error.cause, CreateProjectError::AddFirebaseFailed);
    assert!(error.retryable);
    assert!(error.message.contains("The caller does not have permission"));

    rejected.delete();
    let accepted = server.mock(|when, then| {
        when.method(POST)
            .path("/firebase/v1beta1/projects/demo-project:addFirebase");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "name": "operations/fb.2", "done": true }));
    });

    assert_eq!(flow.retry().await, RetryOutcome::Finished);
    assert_eq!(flow.snapshot().phase, Phase::Finished);

    create.assert_hits(1);
    accepted.assert_hits(1);
}

#[tokio::test]
async fn test_operation_error_surfaces_as_step_failure() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/crm/v1/projects");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "name": "operations/cp.3" }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/crm/v1/operations/cp.3");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "name": "operations/cp.3",
                "done": true,
                "error": { "code": 6, "message": "Requested entity already exists" }
            }));
    });

    let mut flow = flow_for(&server);
    flow.edit(|d| d.with_display_name("Demo Project"));
    flow.next().await;
    flow.next().await;
    flow.next().await;

    let state = flow.snapshot();
    assert_eq!(state.phase, Phase::Failed { step: 1 });
    assert_eq!(state.completed_steps, 1);
    assert_eq!(
        state.error.unwrap().message,
        "Could not create the project: Requested entity already exists"
    );
}

#[tokio::test]
async fn test_failed_status_read_ends_poll_without_retry() {
    let server = MockServer::start();
    let projects = FirebaseProjects::with_base_urls(
        crate::core::testing::mock_auth(&server),
        server.url("/crm/v1"),
        server.url("/firebase/v1beta1"),
    );

    let crm_status = server.mock(|when, then| {
        when.method(GET).path("/crm/v1/operations/cp.9");
        then.status(503);
    });
    let firebase_status = server.mock(|when, then| {
        when.method(GET).path("/firebase/v1beta1/operations/op-1");
        then.status(503);
    });

    let poller = crate::operation::OperationPoller::new(projects.firebase_operations())
        .with_interval(Duration::ZERO);
    let operation = poller.wait("operations/op-1").await;
    let status = operation.error.unwrap();
    assert_eq!(status.code, crate::operation::Status::INTERNAL);
    assert!(!poller.await_completion("operations/op-1").await);
    firebase_status.assert_hits(2);

    let poller = crate::operation::OperationPoller::new(projects.crm_operations())
        .with_interval(Duration::ZERO);
    assert!(!poller.await_completion("operations/cp.9").await);
    crm_status.assert_hits(1);
}
