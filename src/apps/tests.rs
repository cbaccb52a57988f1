use super::flow::*;
use super::models::*;
use super::*;
use crate::flow::{Phase, RetryOutcome};
use crate::wizard::Transition;
use httpmock::prelude::*;
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use serde_json::json;
use std::time::Duration;

const SHA1: &str = "DA:39:A3:EE:5E:6B:4B:0D:32:55:BF:EF:95:60:18:90:AF:D8:07:09";

fn apps_for(server: &MockServer) -> FirebaseApps {
    let client = ClientBuilder::new(Client::new()).build();
    FirebaseApps::new_with_client(client, server.url("/v1beta1"))
}

fn flow_for(server: &MockServer) -> CreateAppFlow {
    CreateAppFlow::new(apps_for(server), "demo-project").with_poll_interval(Duration::ZERO)
}

#[test]
fn test_sha_certificate_from_fingerprint() {
    let cert = ShaCertificate::from_fingerprint(SHA1);
    assert_eq!(cert.sha_hash, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    assert_eq!(cert.cert_type, ShaCertificateType::Sha1);

    let pasted = ShaCertificate::from_fingerprint(&format!("  {}\n", SHA1));
    assert_eq!(pasted, cert);

    let body = serde_json::to_value(&cert).unwrap();
    assert_eq!(
        body,
        json!({ "shaHash": "da39a3ee5e6b4b0d3255bfef95601890afd80709", "certType": "SHA_1" })
    );
}

#[tokio::test]
async fn test_create_ios_app_request() {
    let server = MockServer::start();
    let apps = apps_for(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta1/projects/demo-project/iosApps")
            .json_body(json!({
                "bundleId": "com.example.ios",
                "displayName": "Demo iOS"
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "name": "operations/workflows/ios1" }));
    });

    let request = CreateIosAppRequest {
        bundle_id: "com.example.ios".to_string(),
        display_name: Some("Demo iOS".to_string()),
        app_store_id: None,
    };
    let operation = apps.create_ios_app("demo-project", &request).await.unwrap();
    assert_eq!(operation.name, "operations/workflows/ios1");
    mock.assert();
}

#[tokio::test]
async fn test_details_validation_depends_on_platform() {
    let server = MockServer::start();
    let mut flow = flow_for(&server);

    assert_eq!(flow.next().await, Transition::Moved(STEP_DETAILS));
    assert_eq!(flow.next().await, Transition::Blocked);
    assert_eq!(flow.snapshot().error.unwrap().cause, CreateAppError::EmptyPackageName);

    flow.edit(|d| d.with_package_name("example"));
    assert_eq!(flow.next().await, Transition::Blocked);
    assert_eq!(flow.snapshot().error.unwrap().cause, CreateAppError::InvalidPackageName);

    flow.edit(|d| d.with_package_name("com.example.app").with_sha_certificate("1234"));
    assert_eq!(flow.next().await, Transition::Blocked);
    assert_eq!(flow.snapshot().error.unwrap().cause, CreateAppError::InvalidShaCertificate);

    flow.back();
    flow.edit(|d| d.with_platform(AppPlatform::Ios));
    flow.next().await;
    assert_eq!(flow.next().await, Transition::Blocked);
    assert_eq!(flow.snapshot().error.unwrap().cause, CreateAppError::EmptyBundleId);

    flow.edit(|d| d.with_bundle_id("bundle"));
    assert_eq!(flow.next().await, Transition::Blocked);
    assert_eq!(flow.snapshot().error.unwrap().cause, CreateAppError::InvalidBundleId);

    flow.back();
    flow.edit(|d| d.with_platform(AppPlatform::Web));
    flow.next().await;
    assert_eq!(flow.next().await, Transition::Blocked);
    assert_eq!(flow.snapshot().error.unwrap().cause, CreateAppError::EmptyDisplayName);
}

#[tokio::test]
async fn test_android_app_with_sha_certificate() {
    let server = MockServer::start();

    let register = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta1/projects/demo-project/androidApps")
            .json_body(json!({
                "packageName": "com.example.app",
                "displayName": "Demo"
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "name": "operations/workflows/a1" }));
    });
    let status = server.mock(|when, then| {
        when.method(GET).path("/v1beta1/operations/workflows/a1");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "name": "operations/workflows/a1",
                "done": true,
                "response": {
                    "name": "projects/demo-project/androidApps/1:42:android:abc",
                    "appId": "1:42:android:abc",
                    "packageName": "com.example.app",
                    "displayName": "Demo"
                }
            }));
    });
    let sha = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta1/projects/demo-project/androidApps/1:42:android:abc/sha")
            .json_body(json!({
                "shaHash": "da39a3ee5e6b4b0d3255bfef95601890afd80709",
                "certType": "SHA_1"
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "name": "projects/demo-project/androidApps/1:42:android:abc/sha/s1",
                "shaHash": "da39a3ee5e6b4b0d3255bfef95601890afd80709",
                "certType": "SHA_1"
            }));
    });

    let mut flow = flow_for(&server);
    flow.next().await;
    flow.edit(|d| {
        d.with_package_name("com.example.app")
            .with_display_name("Demo")
            .with_sha_certificate(format!("{}\n", SHA1))
    });
    assert_eq!(flow.next().await, Transition::Moved(STEP_REVIEW));
    assert_eq!(flow.next().await, Transition::Finished);

    let state = flow.snapshot();
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(state.completed_steps, 3);

    let app = flow.registered_app().unwrap();
    assert_eq!(app.app_id, "1:42:android:abc");
    assert_eq!(app.package_name.as_deref(), Some("com.example.app"));

    register.assert();
    status.assert();
    sha.assert();
}

#[tokio::test]
async fn test_failed_sha_step_does_not_register_twice() {
    let server = MockServer::start();

    let register = server.mock(|when, then| {
        when.method(POST).path("/v1beta1/projects/demo-project/androidApps");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "name": "operations/workflows/a2",
                "done": true,
                "response": { "name": "projects/demo-project/androidApps/app-2", "appId": "app-2" }
            }));
    });
    let mut broken = server.mock(|when, then| {
        when.method(POST).path("/v1beta1/projects/demo-project/androidApps/app-2/sha");
        then.status(409)
            .header("content-type", "application/json")
            .json_body(json!({
                "error": { "code": 409, "message": "Certificate already exists", "status": "ALREADY_EXISTS" }
            }));
    });

    let mut flow = flow_for(&server);
    flow.next().await;
    flow.edit(|d| d.with_package_name("com.example.app").with_sha_certificate(SHA1));
    flow.next().await;
    flow.next().await;

    let state = flow.snapshot();
    assert_eq!(state.phase, Phase::Failed { step: 2 });
    assert_eq!(state.error.unwrap().cause, CreateAppError::AddShaCertificateFailed);

    broken.delete();
    let fixed = server.mock(|when, then| {
        when.method(POST).path("/v1beta1/projects/demo-project/androidApps/app-2/sha");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "shaHash": "da39a3ee5e6b4b0d3255bfef95601890afd80709", "certType": "SHA_1" }));
    });

    assert_eq!(flow.retry().await, RetryOutcome::Finished);
    register.assert_hits(1);
    fixed.assert_hits(1);
}

#[tokio::test]
async fn test_web_app_registration() {
    let server = MockServer::start();

    let register = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta1/projects/demo-project/webApps")
            .json_body(json!({ "displayName": "Dashboard" }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "name": "operations/workflows/w1",
                "done": true,
                "response": { "name": "projects/demo-project/webApps/w1", "appId": "1:42:web:w1" }
            }));
    });

    let mut flow = flow_for(&server);
    flow.edit(|d| d.with_platform(AppPlatform::Web));
    flow.next().await;
    flow.edit(|d| d.with_display_name("Dashboard"));
    flow.next().await;
    assert_eq!(flow.next().await, Transition::Finished);

    assert_eq!(flow.snapshot().completed_steps, 2);
    assert_eq!(flow.registered_app().unwrap().app_id, "1:42:web:w1");
    register.assert();
}

#[tokio::test]
async fn test_app_status_reads_are_not_retried() {
    let server = MockServer::start();
    let apps = FirebaseApps::with_base_url(crate::core::testing::mock_auth(&server), server.url("/v1beta1"));

    let status = server.mock(|when, then| {
        when.method(GET).path("/v1beta1/operations/workflows/a9");
        then.status(503);
    });

    let poller =
        crate::operation::OperationPoller::new(apps.operations()).with_interval(Duration::ZERO);
    assert!(!poller.await_completion("operations/workflows/a9").await);
    status.assert_hits(1);
}
