//! Request-log stream: producer side (a [`LogSink`](geoitems_observability::LogSink)
//! over Redis Streams) and a consumer that decodes shipped records.

pub mod consumer;
#[cfg(feature = "redis")]
pub mod redis_streams;

pub use consumer::{process_records, ProcessSummary, StreamRecord};
#[cfg(feature = "redis")]
pub use redis_streams::RedisStreamLogSink;
