//! Tracing layer that records log events for test assertions.
//!
//! # Usage
//!
//! 1. Create a `LogCapture`
//! 2. Run the code under test inside `tracing::dispatcher::with_default(&capture.dispatch(), ..)`
//! 3. Query the recorded events with `contains` or `events`

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// One recorded log event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    /// Module path of the emitting call site
    pub target: String,
    /// The event message followed by its fields as `name=value`
    pub text: String,
}

/// Visitor that flattens the message and all fields of an event.
struct TextVisitor {
    message: String,
    fields: String,
}

impl TextVisitor {
    fn new() -> Self {
        Self {
            message: String::new(),
            fields: String::new(),
        }
    }

    fn into_text(self) -> String {
        format!("{}{}", self.message, self.fields)
    }
}

impl Visit for TextVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }
}

/// Shared recorder of log events; clones observe the same buffer.
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dispatcher that feeds this capture.
    pub fn dispatch(&self) -> Dispatch {
        Dispatch::new(tracing_subscriber::registry().with(self.clone()))
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// True if an event at `level` contains every one of `needles`.
    pub fn contains(&self, level: Level, needles: &[&str]) -> bool {
        self.events()
            .iter()
            .filter(|event| event.level == level)
            .any(|event| needles.iter().all(|needle| event.text.contains(needle)))
    }
}

impl<S> Layer<S> for LogCapture
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = TextVisitor::new();
        event.record(&mut visitor);

        let entry = CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            text: visitor.into_text(),
        };

        if let Ok(mut events) = self.events.lock() {
            events.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_message_and_fields() {
        let capture = LogCapture::new();
        tracing::dispatcher::with_default(&capture.dispatch(), || {
            tracing::error!(input = "a.fits", status = 1, "renderer failed");
            tracing::info!("unrelated");
        });

        let events = capture.events();
        assert_eq!(events.len(), 2);
        assert!(capture.contains(Level::ERROR, &["renderer failed", "input=a.fits", "status=1"]));
        assert!(!capture.contains(Level::WARN, &["renderer failed"]));
        assert!(events
            .iter()
            .all(|event| event.target == "test_helpers::log_capture::tests"));
    }

    #[test]
    fn test_clones_share_buffer() {
        let capture = LogCapture::new();
        let other = capture.clone();
        tracing::dispatcher::with_default(&other.dispatch(), || {
            tracing::warn!("shared");
        });
        assert!(capture.contains(Level::WARN, &["shared"]));
    }
}
