use geoitems_observability::RequestLogRecord;
use tracing::{info, warn};

/// One raw entry read back from the log stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    /// Stream-assigned entry id.
    pub id: String,
    pub partition: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub processed: usize,
    pub skipped: usize,
    /// Id of the last entry seen, processed or not; resume reading after it.
    pub last_id: Option<String>,
}

/// Decode and log a batch of shipped request records.
///
/// Entries that are not valid records are logged and skipped; they never
/// stop the rest of the batch.
pub fn process_records(records: &[StreamRecord]) -> ProcessSummary {
    let mut summary = ProcessSummary::default();

    for record in records {
        summary.last_id = Some(record.id.clone());

        match serde_json::from_slice::<RequestLogRecord>(&record.data) {
            Ok(entry) => {
                info!(
                    target: "log_stream",
                    entry_id = %record.id,
                    request_id = %entry.request_id,
                    operation = %entry.operation,
                    status_code = entry.status_code,
                    latency_ms = entry.latency_ms,
                    cold_start = entry.cold_start,
                    "request log"
                );
                summary.processed += 1;
            }
            Err(e) => {
                warn!(
                    target: "log_stream",
                    entry_id = %record.id,
                    partition = ?record.partition,
                    "skipping malformed log record: {e}"
                );
                summary.skipped += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn shipped(id: &str, status_code: u16) -> StreamRecord {
        let record = RequestLogRecord {
            request_id: Uuid::now_v7(),
            timestamp: Utc::now(),
            service: "items-api".to_string(),
            operation: "GetItems".to_string(),
            method: "GET".to_string(),
            path: "/items".to_string(),
            status_code,
            latency_ms: 1.5,
            cold_start: false,
        };
        StreamRecord {
            id: id.to_string(),
            partition: Some(record.partition_key()),
            data: serde_json::to_vec(&record).unwrap(),
        }
    }

    #[test]
    fn processes_every_valid_record() {
        let summary = process_records(&[shipped("1-0", 200), shipped("2-0", 404)]);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.last_id.as_deref(), Some("2-0"));
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let garbage = StreamRecord {
            id: "2-0".to_string(),
            partition: None,
            data: b"{not json".to_vec(),
        };
        let wrong_shape = StreamRecord {
            id: "3-0".to_string(),
            partition: None,
            data: br#"{"hello":"world"}"#.to_vec(),
        };

        let summary = process_records(&[shipped("1-0", 200), garbage, wrong_shape, shipped("4-0", 201)]);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.last_id.as_deref(), Some("4-0"));
    }

    #[test]
    fn empty_batch_is_an_empty_summary() {
        assert_eq!(process_records(&[]), ProcessSummary::default());
    }
}
