//! Batch operations against a mocked Bulk API endpoint.

use salesforce_bulk_jobs::{Batch, BulkClient, Record};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SESSION_ID: &str = "123456789";
const API_VERSION: &str = "24.0";

fn client(server: &MockServer) -> BulkClient {
    BulkClient::new(server.uri(), SESSION_ID)
        .expect("client should build")
        .with_api_version(API_VERSION)
}

fn api_path(path: &str) -> String {
    format!("/services/async/{}/{}", API_VERSION, path)
}

#[test]
fn state_is_matches_any_case() {
    let mut batch = Batch::default();

    batch.state = Some("Completed".to_string());
    assert!(batch.state_is("Completed"));

    batch.state = Some("COMPLETED".to_string());
    assert!(batch.state_is("completed"));

    batch.state = Some("Failed".to_string());
    assert!(!batch.state_is("Queued"));
}

#[test]
fn state_predicates_require_a_state() {
    let mut batch = Batch::default();

    batch.state = Some("Queued".to_string());
    assert!(batch.is_queued());
    batch.state = Some("InProgress".to_string());
    assert!(batch.is_in_progress());
    batch.state = Some("Completed".to_string());
    assert!(batch.is_completed());
    batch.state = Some("Failed".to_string());
    assert!(batch.is_failed());

    batch.state = None;
    assert!(!batch.is_queued());
    assert!(!batch.is_in_progress());
    assert!(!batch.is_completed());
    assert!(!batch.is_failed());
}

#[tokio::test]
async fn add_batch_posts_csv_and_returns_queued_batch() {
    let server = MockServer::start().await;
    let job_id = "750E00000004NRfIAM";

    Mock::given(method("POST"))
        .and(path(api_path(&format!("job/{}/batch", job_id))))
        .and(header("Content-Type", "text/csv; charset=UTF-8"))
        .and(header("X-SFDC-Session", SESSION_ID))
        .and(body_string(include_str!("fixtures/batch_create_request.csv")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/batch_create_response.xml")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rows = vec![
        Record::new()
            .field("Id__c", "12345")
            .field("Title__c", "This is a test video")
            .null("IsPreview__c"),
        Record::new()
            .field("Id__c", "23456")
            .field("Title__c", "A second test!")
            .field("IsPreview__c", true),
    ];

    let batch = client(&server).add_batch(job_id, &rows).await.unwrap();

    assert_eq!(batch.id, "751E00000004ZmUIAU");
    assert_eq!(batch.job_id, job_id);
    assert_eq!(batch.state.as_deref(), Some("Queued"));
    assert!(batch.is_queued());
}

#[tokio::test]
async fn batch_info_list_returns_batches_in_order() {
    let server = MockServer::start().await;
    let job_id = "750E00000004N97IAE";

    Mock::given(method("GET"))
        .and(path(api_path(&format!("job/{}/batch", job_id))))
        .and(header("X-SFDC-Session", SESSION_ID))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/batch_info_list_response.xml")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let batches = client(&server).batch_info_list(job_id).await.unwrap();

    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].job_id, job_id);
    assert_eq!(batches[0].id, "751E00000004ZRbIAM");
    assert_eq!(batches[1].job_id, job_id);
    assert_eq!(batches[1].id, "751E00000004ZQsIAM");
    assert!(batches[1].is_failed());
    assert!(batches[1].state_message.is_some());
}

#[tokio::test]
async fn batch_info_returns_single_batch() {
    let server = MockServer::start().await;
    let job_id = "750E00000004N97IAE";
    let batch_id = "751E00000004ZRbIAM";

    Mock::given(method("GET"))
        .and(path(api_path(&format!("job/{}/batch/{}", job_id, batch_id))))
        .and(header("X-SFDC-Session", SESSION_ID))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/batch_info_response.xml")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let batch = client(&server).batch_info(job_id, batch_id).await.unwrap();

    assert_eq!(batch.job_id, job_id);
    assert_eq!(batch.state.as_deref(), Some("Completed"));
    assert_eq!(batch.number_records_processed, 2);
}

#[tokio::test]
async fn batch_result_list_parses_csv_results() {
    let server = MockServer::start().await;
    let job_id = "750E00000004NRa";
    let batch_id = "751E00000004ZmK";

    Mock::given(method("GET"))
        .and(path(api_path(&format!("job/{}/batch/{}/result", job_id, batch_id))))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/batch_result_list_response.csv")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let results = client(&server)
        .batch_result_list(job_id, batch_id)
        .await
        .unwrap();

    assert_eq!(results.job_id, job_id);
    assert_eq!(results.batch_id, batch_id);
    assert_eq!(results.len(), 2);

    let first = results.first().unwrap();
    assert!(first.success);
    assert!(!first.created);
    assert!(!first.has_error());
    assert_eq!(first.error, "");
}

#[tokio::test]
async fn http_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("job/750x/batch")))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).batch_info_list("750x").await.unwrap_err();
    assert_eq!(err.client_error().and_then(|e| e.status()), Some(500));
}
