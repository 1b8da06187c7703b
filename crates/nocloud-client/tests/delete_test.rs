#[path = "helpers/mod.rs"]
mod helpers;

use helpers::*;
use nocloud_client::{ErrorCode, ErrorMetadata, NoCloudError};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("media-{:03}", i)).collect()
}

fn batch_ids(request: &wiremock::Request) -> Vec<String> {
    let body: serde_json::Value = request.body_json().unwrap();
    serde_json::from_value(body["mediaIds"].clone()).unwrap()
}

#[tokio::test]
async fn test_delete_single_id() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/storage/m1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.delete("m1").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].headers.get("authorization").unwrap(),
        "Bearer test-api-key"
    );
}

#[tokio::test]
async fn test_delete_250_ids_in_three_sequential_batches() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BATCH_DELETE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "deleted": true })))
        .expect(3)
        .mount(&server)
        .await;

    let ids = make_ids(250);
    let client = test_client(&server);
    client.delete(ids.clone()).await.unwrap();

    let batches: Vec<Vec<String>> = requests_to(&server, BATCH_DELETE_PATH)
        .await
        .iter()
        .map(batch_ids)
        .collect();

    let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
    // Batches arrive in order and cover every id exactly once
    assert_eq!(batches.concat(), ids);
}

#[tokio::test]
async fn test_delete_single_element_collection_uses_single_call() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/storage/only"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(BATCH_DELETE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.delete(vec!["only".to_string()]).await.unwrap();
}

#[tokio::test]
async fn test_delete_empty_collection_is_noop() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    client.delete(Vec::<String>::new()).await.unwrap();

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_exactly_one_full_batch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BATCH_DELETE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.delete(make_ids(100)).await.unwrap();
}

#[tokio::test]
async fn test_delete_stops_at_first_failing_batch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BATCH_DELETE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(BATCH_DELETE_PATH))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({ "message": "database unavailable" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.delete(make_ids(250)).await.unwrap_err();

    match &err {
        NoCloudError::BatchDeleteFailed {
            batch_index,
            batch_count,
            offset,
            batch_len,
            source,
        } => {
            assert_eq!(*batch_index, 1);
            assert_eq!(*batch_count, 3);
            assert_eq!(*offset, 100);
            assert_eq!(*batch_len, 100);
            assert!(matches!(
                source.as_ref(),
                NoCloudError::Api {
                    status: 500,
                    code: ErrorCode::Internal,
                    ..
                }
            ));
        }
        other => panic!("expected BatchDeleteFailed, got {other:?}"),
    }
    assert_eq!(err.http_status_code(), 500);

    // The third batch is never attempted
    assert_eq!(requests_to(&server, BATCH_DELETE_PATH).await.len(), 2);
}

#[tokio::test]
async fn test_delete_not_found_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/v1/storage/.+$"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({ "message": "Media not found" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.delete("missing").await.unwrap_err();

    match err {
        NoCloudError::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 404);
            assert_eq!(code, ErrorCode::NotFound);
            assert_eq!(message, "Media not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_escapes_id_in_path() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/storage/folder%2Ffile%20one"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.delete("folder/file one").await.unwrap();
}

#[tokio::test]
async fn test_delete_rejects_empty_id_before_any_request() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    let err = client.delete("").await.unwrap_err();
    assert!(matches!(err, NoCloudError::InvalidMediaId(_)), "{err:?}");
    assert_eq!(err.http_status_code(), 400);

    let mut ids = make_ids(150);
    ids[120] = String::new();
    let err = client.delete(ids).await.unwrap_err();
    assert!(matches!(err, NoCloudError::InvalidMediaId(_)), "{err:?}");

    // No batch is sent when any id is empty
    assert!(server.received_requests().await.unwrap().is_empty());
}
