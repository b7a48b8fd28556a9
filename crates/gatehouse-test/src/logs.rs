//! Capturing `tracing` output in tests.
//!
//! [`capture_logs`] installs a JSON `fmt` subscriber as the thread default
//! for the duration of a closure and hands back what it wrote. Tests can
//! then assert on the warnings the chain builder emits without touching
//! the global subscriber.

use parking_lot::Mutex;
use serde_json::Value;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// In-memory sink the capturing subscriber writes to.
#[derive(Debug, Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a capturing subscriber and returns its result together
/// with every event logged while it ran, at any level.
///
/// # Example
///
/// ```
/// use gatehouse_test::capture_logs;
///
/// let ((), logs) = capture_logs(|| tracing::warn!(chain = "api", "middleware not registered"));
/// assert!(logs.contains("WARN", "middleware not registered"));
/// ```
pub fn capture_logs<F, R>(f: F) -> (R, CapturedLogs)
where
    F: FnOnce() -> R,
{
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(buffer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);

    let raw = buffer.0.lock().clone();
    (result, CapturedLogs::parse(&raw))
}

/// Events written during [`capture_logs`], one JSON object per event.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    events: Vec<Value>,
}

impl CapturedLogs {
    fn parse(raw: &[u8]) -> Self {
        let events = String::from_utf8_lossy(raw)
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();
        Self { events }
    }

    /// Returns every captured event.
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Returns the events logged at `level` (`"WARN"`, `"INFO"`, ...).
    pub fn at_level<'a>(&'a self, level: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.events
            .iter()
            .filter(move |event| event["level"].as_str() == Some(level))
    }

    /// Returns the message of every captured event.
    pub fn messages(&self) -> Vec<&str> {
        self.events.iter().filter_map(message).collect()
    }

    /// Returns true if an event at `level` has a message containing
    /// `needle`.
    pub fn contains(&self, level: &str, needle: &str) -> bool {
        self.at_level(level)
            .filter_map(message)
            .any(|msg| msg.contains(needle))
    }

    /// Returns the value of `field` on every event at `level`.
    pub fn field_values<'a>(&'a self, level: &'a str, field: &str) -> Vec<&'a Value> {
        self.at_level(level)
            .filter_map(|event| event["fields"].get(field))
            .collect()
    }

    /// Returns the number of captured events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn message(event: &Value) -> Option<&str> {
    event["fields"]["message"].as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_levels_and_fields() {
        let (value, logs) = capture_logs(|| {
            tracing::info!(chain = "web", "chain built");
            tracing::warn!(middleware = "csrf", "middleware missing");
            tracing::debug!("detail");
            7
        });

        assert_eq!(value, 7);
        assert_eq!(logs.len(), 3);
        assert!(logs.contains("WARN", "missing"));
        assert!(!logs.contains("INFO", "missing"));
        assert_eq!(logs.field_values("WARN", "middleware"), vec!["csrf"]);
        assert_eq!(logs.messages(), vec!["chain built", "middleware missing", "detail"]);
    }

    #[test]
    fn test_nothing_logged() {
        let ((), logs) = capture_logs(|| {});
        assert!(logs.is_empty());
    }
}
