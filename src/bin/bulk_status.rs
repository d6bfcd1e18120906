//! Print the state of a Bulk API job and its batches.
//!
//! ```sh
//! export SF_INSTANCE_URL='https://na1.salesforce.com' SF_SESSION_ID='00D...'
//! # or: export SF_USERNAME=... SF_PASSWORD=... SF_SECURITY_TOKEN=...
//! cargo run --bin bulk-status -- 750E00000004NRfIAM [751E00000004ZmUIAU]
//! ```
//!
//! With a batch id, the batch's per-row results are printed once it has
//! completed. Set `RUST_LOG=salesforce_bulk_jobs=debug` to trace requests.

use chrono::{DateTime, Utc};
use salesforce_bulk::{Batch, BulkClient, PasswordLogin, SalesforceCredentials};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(job_id) = args.next() else {
        eprintln!("Usage: bulk-status <job-id> [batch-id]");
        std::process::exit(2);
    };
    let batch_id = args.next();

    let client = connect().await.unwrap_or_else(|e| {
        eprintln!("Error: Failed to authenticate: {e}");
        std::process::exit(1);
    });
    info!(instance_url = %client.instance_url(), "Connected");

    let job = client.job_info(&job_id).await.unwrap_or_else(|e| {
        eprintln!("Error: Failed to fetch job {job_id}: {e}");
        std::process::exit(1);
    });

    println!("Job {} ({} {})", job.id, job.operation, job.object);
    println!("  state:     {}", job.state);
    println!("  created:   {}", timestamp(job.created_date));
    println!(
        "  batches:   {} total, {} queued, {} in progress, {} completed, {} failed",
        job.number_batches_total,
        job.number_batches_queued,
        job.number_batches_in_progress,
        job.number_batches_completed,
        job.number_batches_failed
    );
    println!(
        "  records:   {} processed, {} failed",
        job.number_records_processed, job.number_records_failed
    );

    match batch_id {
        Some(batch_id) => print_batch_with_results(&client, &job_id, &batch_id).await,
        None => print_batches(&client, &job_id).await,
    }
}

/// Use an existing session when one is configured, otherwise log in.
async fn connect() -> Result<BulkClient, Box<dyn std::error::Error>> {
    if std::env::var("SF_SESSION_ID").is_ok() {
        let creds = SalesforceCredentials::from_env()?;
        return Ok(BulkClient::from_credentials(&creds)?);
    }

    let login = PasswordLogin::from_env()?;
    Ok(BulkClient::login(&login).await?)
}

async fn print_batches(client: &BulkClient, job_id: &str) {
    let batches = client.batch_info_list(job_id).await.unwrap_or_else(|e| {
        eprintln!("Error: Failed to list batches: {e}");
        std::process::exit(1);
    });

    println!();
    if batches.is_empty() {
        println!("No batches.");
    }
    for batch in &batches {
        print_batch(batch);
    }
}

async fn print_batch_with_results(client: &BulkClient, job_id: &str, batch_id: &str) {
    let batch = client.batch_info(job_id, batch_id).await.unwrap_or_else(|e| {
        eprintln!("Error: Failed to fetch batch {batch_id}: {e}");
        std::process::exit(1);
    });

    println!();
    print_batch(&batch);

    if !batch.is_completed() {
        return;
    }

    let results = client
        .batch_result_list(job_id, batch_id)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Failed to fetch results: {e}");
            std::process::exit(1);
        });

    println!();
    for (row, result) in results.iter().enumerate() {
        if result.has_error() {
            println!("  row {:>5}  FAILED   {}", row + 1, result.error);
        } else {
            let action = if result.created { "created" } else { "updated" };
            println!("  row {:>5}  {:<8} {}", row + 1, action, result.id);
        }
    }
}

fn print_batch(batch: &Batch) {
    println!(
        "Batch {}  {:<12} {} processed, {} failed  (created {})",
        batch.id,
        batch.state.as_deref().unwrap_or("-"),
        batch.number_records_processed,
        batch.number_records_failed,
        timestamp(batch.created_date)
    );
    if let Some(message) = &batch.state_message {
        println!("  {message}");
    }
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}
