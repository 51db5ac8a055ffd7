//! This module provides a `tracing` layer that feeds host log events into a
//! `CaptureStore`.
//!
//! Rust has no mutable global console to patch, so interception is realized
//! as sink registration: the layer is composed into the host's subscriber
//! once, and the store's enabled flag decides whether an event is captured.
//! The layer never swallows events, so host-visible logging output is
//! unaffected by capture.
use std::sync::Arc;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    Layer,
};

use super::CaptureStore;
use crate::entry::CaptureLevel;
use crate::error::CaptureError;
use crate::value::RawValue;

/// A `tracing` layer that records events into a [`CaptureStore`].
pub struct CaptureLayer {
    store: Arc<CaptureStore>,
}

impl CaptureLayer {
    /// Creates a new `CaptureLayer`.
    ///
    /// # Arguments
    ///
    /// * `store` - The store that will receive captured events.
    pub fn new(store: Arc<CaptureStore>) -> Self {
        Self { store }
    }

    /// Installs a registry carrying this layer as the global default
    /// subscriber.
    ///
    /// Hosts that already build their own subscriber should instead compose
    /// `CaptureLayer::new(store)` into it with `.with(..)`.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::InstallLayer`] if a global default subscriber
    /// is already set.
    pub fn init_subscriber(store: Arc<CaptureStore>) -> Result<(), CaptureError> {
        let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(store));
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(())
    }
}

/// Maps a tracing level onto the capture level vocabulary.
///
/// `log` and `table` have no tracing counterpart; they are reachable through
/// [`CaptureStore::record`] directly.
fn capture_level(level: &Level) -> CaptureLevel {
    if *level == Level::ERROR {
        CaptureLevel::Error
    } else if *level == Level::WARN {
        CaptureLevel::Warn
    } else if *level == Level::INFO {
        CaptureLevel::Info
    } else if *level == Level::DEBUG {
        CaptureLevel::Debug
    } else {
        CaptureLevel::Trace
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    /// Turns one event into one capture entry: the `message` field becomes
    /// the first argument (carrying any `[prefix]` tag), remaining fields
    /// become a second, map-shaped argument.
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !self.store.enabled() {
            return;
        }

        let mut visitor = ArgumentVisitor::default();
        event.record(&mut visitor);

        let mut args = vec![RawValue::Text(visitor.message)];
        if !visitor.fields.is_empty() {
            args.push(RawValue::Map(std::rc::Rc::new(std::cell::RefCell::new(
                visitor.fields,
            ))));
        }

        self.store.record(capture_level(event.metadata().level()), &args);
    }
}

/// A `tracing::field::Visit` implementation that splits an event into its
/// message and the rest of its fields.
#[derive(Default)]
struct ArgumentVisitor {
    message: String,
    fields: Vec<(String, RawValue)>,
}

impl ArgumentVisitor {
    fn push(&mut self, field: &tracing::field::Field, value: RawValue) {
        self.fields.push((field.name().to_string(), value));
    }
}

impl tracing::field::Visit for ArgumentVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push(field, RawValue::Text(format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push(field, RawValue::from(value));
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.push(field, RawValue::from(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.push(field, RawValue::from(value));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.push(field, RawValue::from(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.push(field, RawValue::from(value));
    }

    fn record_error(
        &mut self,
        field: &tracing::field::Field,
        value: &(dyn std::error::Error + 'static),
    ) {
        self.push(
            field,
            RawValue::Error(crate::value::ErrorValue::new("Error", value.to_string())),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CaptureValue;

    fn scoped_capture(store: &Arc<CaptureStore>, body: impl FnOnce()) {
        let subscriber =
            tracing_subscriber::registry().with(CaptureLayer::new(Arc::clone(store)));
        tracing::subscriber::with_default(subscriber, body);
    }

    #[test]
    fn events_are_captured_with_prefix_and_fields() {
        let store = Arc::new(CaptureStore::new());
        store.set_enabled(true);
        scoped_capture(&store, || {
            tracing::warn!(user_id = "u1", in_seconds = 45, "[auth] token expiring");
        });

        let entries = store.entries();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.level, CaptureLevel::Warn);
        assert_eq!(entry.prefix.as_deref(), Some("auth"));
        assert!(entry.summary.starts_with("[auth] token expiring"));
        assert_eq!(
            entry.args[1].get("user_id").and_then(CaptureValue::as_str),
            Some("u1")
        );
        assert_eq!(
            entry.args[1].get("in_seconds"),
            Some(&CaptureValue::Number(serde_json::Number::from(45)))
        );
    }

    #[test]
    fn disabled_store_drops_events() {
        let store = Arc::new(CaptureStore::new());
        scoped_capture(&store, || {
            tracing::info!("not captured");
        });
        assert!(store.is_empty());
    }

    #[test]
    fn every_tracing_level_maps_onto_a_capture_level() {
        let store = Arc::new(CaptureStore::new());
        store.set_enabled(true);
        scoped_capture(&store, || {
            tracing::error!("e");
            tracing::warn!("w");
            tracing::info!("i");
            tracing::debug!("d");
            tracing::trace!("t");
        });

        let levels: Vec<CaptureLevel> = store
            .entries()
            .iter()
            .rev()
            .map(|entry| entry.level)
            .collect();
        assert_eq!(
            levels,
            vec![
                CaptureLevel::Error,
                CaptureLevel::Warn,
                CaptureLevel::Info,
                CaptureLevel::Debug,
                CaptureLevel::Trace,
            ]
        );
    }

    #[test]
    fn message_only_events_have_a_single_argument() {
        let store = Arc::new(CaptureStore::new());
        store.set_enabled(true);
        scoped_capture(&store, || {
            tracing::info!("plain message");
        });
        assert_eq!(store.entries()[0].args.len(), 1);
    }
}
