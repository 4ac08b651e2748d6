//! Tracing bootstrap and the persisted-log sink.
//!
//! Every event that passes the env filter is written to stderr by the
//! fmt layer and, when log persistence is enabled, appended to the log
//! collection with the rolling retention window applied on each write.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use warden_store::LogCollection;
use warden_types::{LogRecord, Severity};

/// Install the global subscriber. `RUST_LOG` controls the filter,
/// defaulting to `info`.
pub fn init(store_sink: Option<StoreLogLayer>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(store_sink)
        .init();
}

thread_local! {
    // Guards against recursion when appending a record itself emits
    // events (store-level warnings, append failures).
    static IN_SINK: Cell<bool> = const { Cell::new(false) };
}

/// Layer that appends every event to the log collection.
pub struct StoreLogLayer {
    log: LogCollection,
    window_ms: u64,
}

impl StoreLogLayer {
    pub fn new(log: LogCollection, window_ms: u64) -> Self {
        Self { log, window_ms }
    }

    fn severity(level: &Level) -> Severity {
        match *level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warn,
            Level::INFO => Severity::Info,
            _ => Severity::Debug,
        }
    }
}

impl<S: Subscriber> Layer<S> for StoreLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if IN_SINK.get() {
            return;
        }
        // Store-internal chatter stays out of the store it describes.
        if event.metadata().target().starts_with("warden_store") {
            return;
        }
        IN_SINK.set(true);

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if !visitor.message.is_empty() {
            let timestamp = epoch_ms();
            let record = LogRecord::new(
                Self::severity(event.metadata().level()),
                timestamp,
                visitor.message,
            );
            // A failed append is dropped; the fmt layer already wrote
            // the event to stderr.
            let _ = self.log.append(&record, self.window_ms);
        }

        IN_SINK.set(false);
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}
