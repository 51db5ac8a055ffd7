//! This module contains the capture store: a bounded, newest-first buffer of
//! captured entries plus the toggle, configuration, and subscription surface
//! around it.
//!
//! Every public operation is total: no input shape, storage failure, or
//! configuration value makes the store panic or return an error.
pub mod collector;
pub mod settings;

pub use collector::CaptureLayer;
pub use settings::{SettingsStore, SledSettingsStore};

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::entry::{CaptureEntry, CaptureLevel, EntryBuilder};
use crate::value::RawValue;

/// Retention ceiling applied when no explicit bound has been set.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
/// Upper bound accepted by [`CaptureStore::set_max_entries`].
pub const MAX_ENTRIES_CEILING: usize = 10_000;

/// Notification emitted to subscribers after each successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    EntryAppended,
    Cleared,
    EnabledChanged(bool),
    MaxEntriesChanged(usize),
}

type SubscriberFn = Arc<dyn Fn(&StoreEvent) + Send + Sync>;
type SubscriberList = Arc<Mutex<Vec<(u64, SubscriberFn)>>>;

thread_local! {
    /// Set while the store is appending or notifying on this thread, so any
    /// logging performed inside that path is dropped instead of recursing
    /// back into capture.
    static IN_CAPTURE: Cell<bool> = Cell::new(false);
}

/// RAII holder of the re-entrancy flag: clears it on drop, so the flag
/// cannot stay stuck when a subscriber callback panics and unwinds through
/// the append/notify path.
struct CaptureGuard;

impl CaptureGuard {
    fn set() -> Self {
        IN_CAPTURE.with(|flag| flag.set(true));
        CaptureGuard
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        IN_CAPTURE.with(|flag| flag.set(false));
    }
}

/// Process-wide store of captured log entries.
///
/// Entries are held newest-first; insertion past the retention bound evicts
/// from the oldest end. The store never discards entries on disable, only on
/// [`clear`](CaptureStore::clear) or trimming.
pub struct CaptureStore {
    entries: Mutex<VecDeque<Arc<CaptureEntry>>>,
    max_entries: AtomicUsize,
    enabled: AtomicBool,
    builder: EntryBuilder,
    settings: Option<Arc<dyn SettingsStore>>,
    subscribers: SubscriberList,
    next_subscriber_id: AtomicU64,
}

impl Default for CaptureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureStore {
    /// Creates a store with no durable flag persistence.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Creates a store that persists its enabled flag through `settings`.
    pub fn with_settings(settings: Arc<dyn SettingsStore>) -> Self {
        Self::build(Some(settings))
    }

    fn build(settings: Option<Arc<dyn SettingsStore>>) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            max_entries: AtomicUsize::new(DEFAULT_MAX_ENTRIES),
            enabled: AtomicBool::new(false),
            builder: EntryBuilder::new(),
            settings,
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_subscriber_id: AtomicU64::new(1),
        }
    }

    /// Applies the persisted enabled flag, defaulting to off when the flag
    /// is absent, unparseable, or storage is unavailable.
    ///
    /// Reads only; it does not write the flag back.
    pub fn initialize(&self) {
        let stored = self
            .settings
            .as_ref()
            .and_then(|settings| settings.load_enabled())
            .unwrap_or(false);
        self.apply_enabled(stored, false);
    }

    /// Whether logging calls are currently being captured.
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Turns capture on or off and persists the flag best-effort.
    ///
    /// Toggling never discards already-captured entries. Persistence
    /// failures are swallowed; the in-memory flag stays authoritative for
    /// the session.
    pub fn set_enabled(&self, next: bool) {
        self.apply_enabled(next, true);
    }

    fn apply_enabled(&self, next: bool, persist: bool) {
        let changed = self.enabled.swap(next, Ordering::SeqCst) != next;
        if persist {
            if let Some(settings) = &self.settings {
                settings.store_enabled(next);
            }
        }
        if changed {
            self.notify(&StoreEvent::EnabledChanged(next));
        }
    }

    /// The current retention bound.
    pub fn max_entries(&self) -> usize {
        self.max_entries.load(Ordering::SeqCst)
    }

    /// Sets the retention bound.
    ///
    /// Values outside `[1, 10_000]` keep the previous bound. A shrinking
    /// bound trims existing history from the oldest end immediately.
    pub fn set_max_entries(&self, requested: i64) {
        if requested < 1 || requested > MAX_ENTRIES_CEILING as i64 {
            return;
        }
        let next = requested as usize;
        if self.max_entries.swap(next, Ordering::SeqCst) == next {
            return;
        }
        {
            let mut entries = self.entries.lock().unwrap();
            if entries.len() > next {
                entries.truncate(next);
            }
        }
        self.notify(&StoreEvent::MaxEntriesChanged(next));
    }

    /// Captures one logging call.
    ///
    /// No-op while capture is disabled, and no-op when called from inside
    /// the store's own append/notify path (re-entrancy guard).
    pub fn record(&self, level: CaptureLevel, args: &[RawValue]) {
        if !self.enabled() {
            return;
        }
        if IN_CAPTURE.with(Cell::get) {
            return;
        }
        let _guard = CaptureGuard::set();

        {
            // The id is allocated while the lock is held, so id order and
            // newest-first position always agree across threads.
            let mut entries = self.entries.lock().unwrap();
            let entry = Arc::new(self.builder.build(level, args));
            entries.push_front(entry);
            let max = self.max_entries();
            if entries.len() > max {
                entries.truncate(max);
            }
        }
        self.notify_guarded(&StoreEvent::EntryAppended);
    }

    /// Newest-first snapshot of the captured entries.
    ///
    /// The snapshot is read-only: entries are immutable and shared, so a
    /// consumer can hold it across later mutations.
    pub fn entries(&self) -> Vec<Arc<CaptureEntry>> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }

    /// Number of currently retained entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Discards all entries; the enabled flag and retention bound are kept.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
        self.notify(&StoreEvent::Cleared);
    }

    /// Registers an observer invoked after each successful mutation.
    ///
    /// The returned guard unsubscribes when dropped. Callbacks run with the
    /// re-entrancy guard set, so logging they perform is never captured.
    pub fn subscribe(
        &self,
        callback: impl Fn(&StoreEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .unwrap()
            .push((id, Arc::new(callback)));
        Subscription {
            id,
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Notifies subscribers with the re-entrancy guard held for the call.
    fn notify(&self, event: &StoreEvent) {
        if IN_CAPTURE.with(Cell::get) {
            self.notify_guarded(event);
            return;
        }
        let _guard = CaptureGuard::set();
        self.notify_guarded(event);
    }

    /// Invokes subscribers without touching the guard; callers hold it.
    ///
    /// The list is snapshotted first so a callback can subscribe or drop a
    /// subscription without deadlocking.
    fn notify_guarded(&self, event: &StoreEvent) {
        let snapshot: Vec<SubscriberFn> = self
            .subscribers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }
}

/// Guard for one observer registration; dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    subscribers: SubscriberList,
}

impl Subscription {
    /// Removes the observer now instead of at drop time.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.subscribers
            .lock()
            .unwrap()
            .retain(|(id, _)| *id != self.id);
    }
}
