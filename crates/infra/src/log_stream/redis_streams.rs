//! Redis Streams log sink.
//!
//! Each record is appended with `XADD <stream> MAXLEN ~ <n> * partition <request_id> data <json>`.
//! The sync redis client is driven from `spawn_blocking` so request handlers
//! never block the runtime.

use std::sync::Arc;

use async_trait::async_trait;
use geoitems_observability::{LogShipError, LogSink, RequestLogRecord};
use tracing::instrument;

use super::consumer::StreamRecord;

pub const DEFAULT_MAX_LEN: usize = 100_000;

pub struct RedisStreamLogSink {
    client: Arc<redis::Client>,
    stream_key: String,
    max_len: usize,
}

impl RedisStreamLogSink {
    pub fn new(redis_url: impl AsRef<str>, stream_key: impl Into<String>) -> Result<Self, LogShipError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| LogShipError::Transport(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            stream_key: stream_key.into(),
            max_len: DEFAULT_MAX_LEN,
        })
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn stream_key(&self) -> &str {
        &self.stream_key
    }

    /// Read up to `count` entries after `after_id` (from the start when `None`).
    pub async fn read_after(
        &self,
        after_id: Option<&str>,
        count: usize,
    ) -> Result<Vec<StreamRecord>, LogShipError> {
        let client = self.client.clone();
        let stream_key = self.stream_key.clone();
        // "(" makes the start id exclusive.
        let start = after_id.map_or_else(|| "-".to_string(), |id| format!("({id}"));

        tokio::task::spawn_blocking(move || -> Result<Vec<StreamRecord>, LogShipError> {
            let mut conn = client
                .get_connection()
                .map_err(|e| LogShipError::Transport(e.to_string()))?;

            let entries: Vec<redis::Value> = redis::cmd("XRANGE")
                .arg(&stream_key)
                .arg(&start)
                .arg("+")
                .arg("COUNT")
                .arg(count)
                .query(&mut conn)
                .map_err(|e| LogShipError::Transport(format!("XRANGE failed: {e}")))?;

            Ok(entries.into_iter().filter_map(parse_entry).collect())
        })
        .await
        .map_err(|e| LogShipError::Transport(e.to_string()))?
    }
}

#[async_trait]
impl LogSink for RedisStreamLogSink {
    #[instrument(
        skip(self, record),
        fields(stream_key = %self.stream_key, request_id = %record.request_id),
        err
    )]
    async fn ship(&self, record: &RequestLogRecord) -> Result<(), LogShipError> {
        let payload =
            serde_json::to_string(record).map_err(|e| LogShipError::Serialization(e.to_string()))?;
        let partition = record.partition_key();
        let client = self.client.clone();
        let stream_key = self.stream_key.clone();
        let max_len = self.max_len;

        tokio::task::spawn_blocking(move || -> Result<(), LogShipError> {
            let mut conn = client
                .get_connection()
                .map_err(|e| LogShipError::Transport(e.to_string()))?;

            let _: String = redis::cmd("XADD")
                .arg(&stream_key)
                .arg("MAXLEN")
                .arg("~")
                .arg(max_len)
                .arg("*")
                .arg("partition")
                .arg(&partition)
                .arg("data")
                .arg(&payload)
                .query(&mut conn)
                .map_err(|e| LogShipError::Transport(format!("XADD failed: {e}")))?;
            Ok(())
        })
        .await
        .map_err(|e| LogShipError::Transport(e.to_string()))?
    }
}

/// Entry format: `[id, [field1, value1, field2, value2, ...]]`.
fn parse_entry(entry: redis::Value) -> Option<StreamRecord> {
    let redis::Value::Bulk(mut parts) = entry else {
        return None;
    };
    if parts.len() < 2 {
        return None;
    }
    let fields = parts.pop()?;
    let redis::Value::Data(id) = parts.swap_remove(0) else {
        return None;
    };
    let redis::Value::Bulk(fields) = fields else {
        return None;
    };

    let mut record = StreamRecord {
        id: String::from_utf8_lossy(&id).into_owned(),
        partition: None,
        data: Vec::new(),
    };
    for pair in fields.chunks_exact(2) {
        if let (redis::Value::Data(key), redis::Value::Data(value)) = (&pair[0], &pair[1]) {
            match key.as_slice() {
                b"partition" => record.partition = Some(String::from_utf8_lossy(value).into_owned()),
                b"data" => record.data = value.clone(),
                _ => {}
            }
        }
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(s: &str) -> redis::Value {
        redis::Value::Data(s.as_bytes().to_vec())
    }

    #[test]
    fn parses_an_xrange_entry() {
        let entry = redis::Value::Bulk(vec![
            data("1700000000000-0"),
            redis::Value::Bulk(vec![data("partition"), data("abc"), data("data"), data("{}")]),
        ]);
        let record = parse_entry(entry).unwrap();
        assert_eq!(record.id, "1700000000000-0");
        assert_eq!(record.partition.as_deref(), Some("abc"));
        assert_eq!(record.data, b"{}");
    }

    #[test]
    fn rejects_entries_of_the_wrong_shape() {
        assert!(parse_entry(data("x")).is_none());
        assert!(parse_entry(redis::Value::Bulk(vec![data("1-0")])).is_none());
    }

    #[test]
    fn rejects_unparseable_urls() {
        assert!(RedisStreamLogSink::new("not a url", "logs").is_err());
    }
}
