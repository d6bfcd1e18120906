//! Job and batch lifecycle against a real org.

use std::time::Duration;

use super::common::{require_client, unique_name, TEST_PREFIX};
use salesforce_bulk::{BulkClient, CreateJobRequest, JobState, Operation, Record};

/// Poll a batch until it stops changing state.
async fn wait_for_batch(client: &BulkClient, job_id: &str, batch_id: &str) -> salesforce_bulk::Batch {
    for _ in 0..60 {
        let batch = client
            .batch_info(job_id, batch_id)
            .await
            .expect("batch_info should succeed");
        if batch.parsed_state().is_some_and(|s| s.is_terminal()) {
            return batch;
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
    panic!("batch {batch_id} did not finish in time");
}

#[tokio::test]
async fn test_insert_batch_lifecycle() {
    let Some(client) = require_client().await else { return; };

    let job = client
        .create_job(CreateJobRequest::new("Account", Operation::Insert))
        .await
        .expect("create_job should succeed");
    assert_eq!(job.state, JobState::Open);
    assert_eq!(job.operation, Operation::Insert);

    let rows = vec![
        Record::new()
            .field("Name", unique_name("Alpha"))
            .field("NumberOfEmployees", 10),
        Record::new()
            .field("Name", unique_name("Beta"))
            .null("NumberOfEmployees"),
    ];

    let batch = client
        .add_batch(&job.id, &rows)
        .await
        .expect("add_batch should succeed");
    assert_eq!(batch.job_id, job.id);
    assert!(!batch.id.is_empty());

    let batches = client
        .batch_info_list(&job.id)
        .await
        .expect("batch_info_list should succeed");
    assert!(batches.iter().any(|b| b.id == batch.id));

    let closed = client.close_job(&job.id).await.expect("close_job should succeed");
    assert_eq!(closed.state, JobState::Closed);

    let batch = wait_for_batch(&client, &job.id, &batch.id).await;
    assert!(batch.is_completed(), "batch ended as {:?}: {:?}", batch.state, batch.state_message);

    let results = client
        .batch_result_list(&job.id, &batch.id)
        .await
        .expect("batch_result_list should succeed");
    assert_eq!(results.job_id, job.id);
    assert_eq!(results.batch_id, batch.id);
    assert_eq!(results.len(), 2);
    for result in &results {
        assert!(result.success, "row failed: {}", result.error);
        assert!(result.created);
        assert!(!result.has_error());
    }

    // Clean up with a delete job over the created ids.
    let delete = client
        .create_job(CreateJobRequest::new("Account", Operation::Delete))
        .await
        .expect("create delete job should succeed");
    let ids: Vec<Record> = results
        .iter()
        .map(|r| Record::new().field("Id", r.id.as_str()))
        .collect();
    let _ = client.add_batch(&delete.id, &ids).await;
    let _ = client.close_job(&delete.id).await;
}

#[tokio::test]
async fn test_query_batch_results() {
    #[derive(Debug, serde::Deserialize)]
    struct Account {
        #[serde(rename = "Id")]
        id: String,
        #[serde(rename = "Name")]
        name: String,
    }

    let Some(client) = require_client().await else { return; };

    let job = client
        .create_job(CreateJobRequest::new("Account", Operation::Query))
        .await
        .expect("create_job should succeed");

    let soql = format!("SELECT Id, Name FROM Account WHERE Name LIKE '{}%' LIMIT 10", TEST_PREFIX);
    let batch = client
        .add_batch_csv(&job.id, soql)
        .await
        .expect("query batch should be accepted");
    client.close_job(&job.id).await.expect("close_job should succeed");

    let batch = wait_for_batch(&client, &job.id, &batch.id).await;
    assert!(batch.is_completed(), "batch ended as {:?}", batch.state);

    let result_ids = client
        .query_result_ids(&job.id, &batch.id)
        .await
        .expect("query_result_ids should succeed");
    assert!(!result_ids.is_empty());

    let accounts: Vec<Account> = client
        .query_records(&job.id, &batch.id, &result_ids[0])
        .await
        .expect("query_records should succeed");
    for account in &accounts {
        assert!(account.id.starts_with("001"));
        assert!(account.name.starts_with(TEST_PREFIX));
    }
}

#[tokio::test]
async fn test_abort_job() {
    let Some(client) = require_client().await else { return; };

    let job = client
        .create_job(CreateJobRequest::new("Contact", Operation::Update))
        .await
        .expect("create_job should succeed");

    let aborted = client.abort_job(&job.id).await.expect("abort_job should succeed");
    assert_eq!(aborted.state, JobState::Aborted);

    let info = client.job_info(&job.id).await.expect("job_info should succeed");
    assert_eq!(info.state, JobState::Aborted);
    assert_eq!(info.number_batches_total, 0);
}
