use super::models::*;
use super::*;
use httpmock::prelude::*;
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use serde_json::json;

fn storage_for(server: &MockServer) -> CloudStorage {
    let client = ClientBuilder::new(Client::new()).build();
    CloudStorage::new_with_client(client, server.url("/storage/v1"))
}

const BUCKET: &str = "demo-project.appspot.com";

#[test]
fn test_object_names_are_one_path_segment() {
    let storage = CloudStorage::new_with_client(
        ClientBuilder::new(Client::new()).build(),
        "https://storage.googleapis.com/storage/v1".to_string(),
    );

    let url = storage.objects_url(BUCKET, Some("photos/cat 1.png")).unwrap();

    assert_eq!(
        url.as_str(),
        "https://storage.googleapis.com/storage/v1/b/demo-project.appspot.com/o/photos%2Fcat%201.png"
    );
    assert_eq!(default_bucket_name("demo-project"), BUCKET);
}

#[tokio::test]
async fn test_list_buckets() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/storage/v1/b")
            .query_param("project", "demo-project");
        then.status(200).json_body(json!({
            "items": [{ "name": BUCKET, "location": "US", "storageClass": "STANDARD" }]
        }));
    });

    let buckets = storage_for(&server).list_buckets("demo-project", None).await.unwrap();

    mock.assert();
    assert_eq!(buckets.items[0].name, BUCKET);
    assert!(buckets.next_page_token.is_none());
}

#[tokio::test]
async fn test_list_folder_returns_objects_and_prefixes() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/storage/v1/b/{}/o", BUCKET))
            .query_param("prefix", "photos/")
            .query_param("delimiter", "/");
        then.status(200).json_body(json!({
            "items": [{ "name": "photos/cat.png", "size": "2048", "contentType": "image/png" }],
            "prefixes": ["photos/2026/"],
            "nextPageToken": "page-2"
        }));
    });

    let page = storage_for(&server)
        .list_objects(BUCKET, &ListObjectsOptions::folder("photos/"))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(page.items[0].size_bytes(), Some(2048));
    assert_eq!(page.prefixes, vec!["photos/2026/"]);
    assert_eq!(page.next_page_token.as_deref(), Some("page-2"));
}

#[tokio::test]
async fn test_empty_bucket_listing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/storage/v1/b/{}/o", BUCKET));
        then.status(200).json_body(json!({ "kind": "storage#objects" }));
    });

    let page = storage_for(&server)
        .list_objects(BUCKET, &ListObjectsOptions::folder(""))
        .await
        .unwrap();

    assert!(page.items.is_empty() && page.prefixes.is_empty());
}

#[tokio::test]
async fn test_get_metadata_and_delete_object() {
    let server = MockServer::start();
    let get = server.mock(|when, then| {
        when.method(GET).path(format!("/storage/v1/b/{}/o/readme.txt", BUCKET));
        then.status(200)
            .json_body(json!({ "name": "readme.txt", "bucket": BUCKET, "size": "12" }));
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path(format!("/storage/v1/b/{}/o/readme.txt", BUCKET));
        then.status(204);
    });

    let storage = storage_for(&server);
    let metadata = storage.get_object_metadata(BUCKET, "readme.txt").await.unwrap();
    storage.delete_object(BUCKET, "readme.txt").await.unwrap();

    get.assert();
    delete.assert();
    assert_eq!(metadata.size_bytes(), Some(12));
}

#[tokio::test]
async fn test_missing_object_is_an_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/storage/v1/b/{}/o/gone.txt", BUCKET));
        then.status(404).json_body(json!({
            "error": { "code": 404, "message": "No such object: demo-project.appspot.com/gone.txt" }
        }));
    });

    match storage_for(&server).get_object_metadata(BUCKET, "gone.txt").await {
        Err(ConsoleError::ApiError(message)) => assert!(message.contains("No such object")),
        other => panic!("unexpected result: {:?}", other),
    }
}
