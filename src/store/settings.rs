//! This module defines the storage interface and implementation for the one
//! durable piece of capture state: the enabled flag.
use anyhow::Result;
use sled::Db;

/// Key holding the enabled flag inside the settings tree.
const ENABLED_KEY: &str = "console-capture.enabled";

/// A trait for persisting the capture enabled flag.
///
/// Both operations are best-effort: storage can be unavailable or fail at
/// any time, and the in-memory flag stays authoritative for the session, so
/// neither operation reports errors.
pub trait SettingsStore: Send + Sync {
    /// Reads the persisted flag.
    ///
    /// Returns `None` when the flag is absent, unparseable, or the read
    /// fails; callers treat all of those as "off".
    fn load_enabled(&self) -> Option<bool>;

    /// Writes the flag. Failures are swallowed.
    fn store_enabled(&self, enabled: bool);
}

/// A `SettingsStore` implementation using `sled` for storage.
pub struct SledSettingsStore {
    tree: sled::Tree,
}

impl SledSettingsStore {
    /// Creates a new `SledSettingsStore` on an already opened database.
    ///
    /// # Errors
    ///
    /// This function will return an error if the `settings` tree cannot be
    /// opened.
    pub fn new(db: Db) -> Result<Self> {
        let tree = db.open_tree("settings")?;
        Ok(Self { tree })
    }

    /// Opens (or creates) a database at `path` and wraps its settings tree.
    ///
    /// # Errors
    ///
    /// This function will return an error if the database cannot be opened.
    pub fn open(path: &str) -> Result<Self> {
        let db = sled::open(path)?;
        Self::new(db)
    }
}

impl SettingsStore for SledSettingsStore {
    fn load_enabled(&self) -> Option<bool> {
        // The stored values are the literal strings "true"/"false"; anything
        // else reads as absent.
        match self.tree.get(ENABLED_KEY) {
            Ok(Some(raw)) if raw.as_ref() == b"true" => Some(true),
            Ok(Some(raw)) if raw.as_ref() == b"false" => Some(false),
            _ => None,
        }
    }

    fn store_enabled(&self, enabled: bool) {
        let value = if enabled { "true" } else { "false" };
        // Storage can be unavailable or full; fail soft either way.
        if self.tree.insert(ENABLED_KEY, value).is_ok() {
            let _ = self.tree.flush();
        }
    }
}
