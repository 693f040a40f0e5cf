//! Log store collaborator: the bridge reads a bounded recent window and can
//! request a full clear; it never writes entries itself. The in-memory store
//! doubles as the sink for a tracing layer so the standalone binary has real
//! log content to serve.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

pub trait LogStore: Send + Sync {
    /// The most recent `limit` entries, oldest first, taken from a single
    /// consistent snapshot of the buffer. Newest-last lets a feed append
    /// without re-sorting.
    fn recent(&self, limit: usize) -> Result<Vec<LogEntry>>;

    /// Purge the buffer. Clearing an empty buffer succeeds silently.
    fn clear(&self) -> Result<()>;
}

/// Bounded ring buffer of log entries. The store is the sole writer of its
/// sequence; entries are immutable once pushed.
pub struct MemoryLogStore {
    capacity: usize,
    entries: RwLock<VecDeque<LogEntry>>,
}

impl MemoryLogStore {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, entries: RwLock::new(VecDeque::new()) }
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.entries.write();
        if self.capacity > 0 && entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl LogStore for MemoryLogStore {
    fn recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let entries = self.entries.read();
        let skip = entries.len().saturating_sub(limit);
        Ok(entries.iter().skip(skip).cloned().collect())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }
}

/// Tracing layer that copies events into a [`MemoryLogStore`].
pub struct LogCapture {
    store: Arc<MemoryLogStore>,
}

impl LogCapture {
    pub fn new(store: Arc<MemoryLogStore>) -> Self {
        Self { store }
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let Some(message) = visitor.message else { return };
        let level = match *event.metadata().level() {
            Level::ERROR => LogLevel::Error,
            Level::WARN => LogLevel::Warning,
            Level::INFO => LogLevel::Info,
            _ => LogLevel::Debug,
        };
        self.store.push(LogEntry { timestamp: Utc::now(), level, message });
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize, level: LogLevel) -> LogEntry {
        LogEntry { timestamp: Utc::now(), level, message: format!("line {n}") }
    }

    #[test]
    fn recent_is_newest_bounded_oldest_first() {
        let store = MemoryLogStore::new(100);
        for n in 1..=5 {
            store.push(entry(n, LogLevel::Info));
        }
        let got = store.recent(2).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].message, "line 4");
        assert_eq!(got[1].message, "line 5");
    }

    #[test]
    fn recent_with_large_limit_returns_everything() {
        let store = MemoryLogStore::new(100);
        for n in 1..=3 {
            store.push(entry(n, LogLevel::Warning));
        }
        assert_eq!(store.recent(50).unwrap().len(), 3);
        assert_eq!(store.recent(0).unwrap().len(), 0);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let store = MemoryLogStore::new(3);
        for n in 1..=5 {
            store.push(entry(n, LogLevel::Error));
        }
        let got = store.recent(10).unwrap();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].message, "line 3");
        assert_eq!(got[2].message, "line 5");
    }

    #[test]
    fn clear_is_idempotent() {
        let store = MemoryLogStore::new(10);
        store.push(entry(1, LogLevel::Info));
        store.clear().unwrap();
        assert!(store.is_empty());
        // Second clear on an empty buffer succeeds silently
        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn level_names_serialize_as_shown_to_the_ui() {
        assert_eq!(serde_json::to_string(&LogLevel::Error).unwrap(), "\"Error\"");
        assert_eq!(serde_json::to_string(&LogLevel::Warning).unwrap(), "\"Warning\"");
        assert_eq!(serde_json::to_string(&LogLevel::Info).unwrap(), "\"Info\"");
    }

    #[test]
    fn capture_layer_records_events() {
        use tracing_subscriber::prelude::*;

        let store = Arc::new(MemoryLogStore::new(16));
        let subscriber = tracing_subscriber::registry().with(LogCapture::new(store.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("hello from the bridge");
            tracing::warn!("something looks off");
        });
        let got = store.recent(10).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].level, LogLevel::Info);
        assert_eq!(got[0].message, "hello from the bridge");
        assert_eq!(got[1].level, LogLevel::Warning);
    }
}
