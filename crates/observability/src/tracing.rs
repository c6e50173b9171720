//! Tracing/logging initialization.
//!
//! JSON lines with timestamps and the event target, so metric events
//! (`metrics`) and stream consumer events (`log_stream`) can be routed apart
//! downstream. The filter comes from `RUST_LOG`, then `LOG_LEVEL`, then
//! defaults to `info`.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Service name attached to request spans.
pub const SERVICE_NAME: &str = "items-api";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| std::env::var("LOG_LEVEL").map(|level| EnvFilter::new(level.to_lowercase())))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = json_subscriber(filter, std::io::stdout).try_init();
}

/// The JSON subscriber used by [`init`], writing to `writer`.
pub fn json_subscriber<W>(
    filter: EnvFilter,
    writer: W,
) -> impl ::tracing::Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_current_span(true)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .with_writer(writer)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApiMetric, Operation};
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn metric_lines_keep_their_target() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = json_subscriber(EnvFilter::new("info"), move || writer.clone());

        ::tracing::subscriber::with_default(subscriber, || {
            ApiMetric::new(Operation::GetItems, 200, Duration::from_millis(3)).emit();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let line: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(line["target"], "metrics");
        assert_eq!(line["fields"]["operation"], "GetItems");
        assert_eq!(line["fields"]["status_code"], 200);
    }
}
