//! Tails the request-log stream and logs each shipped record.

use std::time::Duration;

use anyhow::Context;
use geoitems_infra::config::DEFAULT_LOG_STREAM_NAME;
use geoitems_infra::log_stream::{process_records, RedisStreamLogSink};
use tracing::{info, warn};

const BATCH_SIZE: usize = 100;
const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    geoitems_observability::init();

    let redis_url = std::env::var("REDIS_URL").context("REDIS_URL must be set")?;
    let stream_name =
        std::env::var("LOG_STREAM_NAME").unwrap_or_else(|_| DEFAULT_LOG_STREAM_NAME.to_string());
    let stream = RedisStreamLogSink::new(&redis_url, stream_name)?;

    info!(stream = stream.stream_key(), "consuming request logs");

    let mut last_id: Option<String> = None;
    loop {
        let batch = match stream.read_after(last_id.as_deref(), BATCH_SIZE).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!("failed to read log stream: {e}");
                tokio::time::sleep(POLL_INTERVAL).await;
                continue;
            }
        };

        if batch.is_empty() {
            tokio::time::sleep(POLL_INTERVAL).await;
            continue;
        }

        let summary = process_records(&batch);
        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            "processed log batch"
        );
        if summary.last_id.is_some() {
            last_id = summary.last_id;
        }
    }
}
