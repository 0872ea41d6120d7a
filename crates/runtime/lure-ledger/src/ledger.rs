//! Session ledger
//!
//! Append-only audit log for one session, mirrored to a `KvStore` after
//! every append. Recording never fails: store errors are logged and dropped
//! so the decoy keeps working when persistence does not.

use std::sync::Arc;

use lure_core::{EventKind, LogEntry, Result};
use serde_json::{Map, Value};
use tracing::warn;

use crate::keys;
use crate::store::KvStore;

pub struct SessionLedger {
    session_id: String,
    prefix: String,
    store: Arc<dyn KvStore>,
    entries: Vec<LogEntry>,
    view_open: bool,
}

impl SessionLedger {
    /// Open the ledger for `session_id`, picking up anything already persisted
    pub fn open(store: Arc<dyn KvStore>, session_id: impl Into<String>, prefix: impl Into<String>) -> Self {
        let session_id = session_id.into();
        let prefix = prefix.into();

        let entries = match load_entries(store.as_ref(), &prefix, &session_id) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(session = %session_id, error = %e, "discarding unreadable ledger");
                Vec::new()
            }
        };

        Self {
            session_id,
            prefix,
            store,
            entries,
            view_open: false,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Append an entry stamped with now and this session
    pub fn record(&mut self, event: EventKind, data: Map<String, Value>) -> &LogEntry {
        let entry = LogEntry::new(self.session_id.clone(), event, data);
        self.entries.push(entry);
        self.persist();
        &self.entries[self.entries.len() - 1]
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Log view text: one line per entry
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(LogEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The full log as a JSON array document
    pub fn export_all(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|e| {
            warn!(error = %e, "ledger export failed");
            "[]".to_string()
        })
    }

    /// Download name for `export_all`
    pub fn export_file_name(&self) -> String {
        format!("{}.json", keys::log_key(&self.prefix, &self.session_id))
    }

    /// Drop every entry, in memory and in the store
    pub fn clear(&mut self) {
        self.entries.clear();
        let key = keys::log_key(&self.prefix, &self.session_id);
        if let Err(e) = self.store.remove(&key) {
            warn!(session = %self.session_id, error = %e, "ledger clear not persisted");
        }
    }

    pub fn open_view(&mut self) {
        self.view_open = true;
    }

    pub fn close_view(&mut self) {
        self.view_open = false;
    }

    pub fn is_view_open(&self) -> bool {
        self.view_open
    }

    fn persist(&self) {
        let key = keys::log_key(&self.prefix, &self.session_id);
        let written = serde_json::to_string(&self.entries)
            .map_err(lure_core::Error::from)
            .and_then(|json| self.store.set(&key, &json));

        if let Err(e) = written {
            warn!(session = %self.session_id, error = %e, "ledger append not persisted");
        }
    }
}

/// Read a session's persisted log without opening a ledger
pub fn load_entries(store: &dyn KvStore, prefix: &str, session_id: &str) -> Result<Vec<LogEntry>> {
    match store.get(&keys::log_key(prefix, session_id))? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use lure_core::{payload, Error};
    use serde_json::json;

    /// Store that refuses every write, like a full browser quota
    struct FullStore;

    impl KvStore for FullStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("quota exceeded".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(Error::Storage("quota exceeded".to_string()))
        }
    }

    fn ledger() -> (Arc<MemoryStore>, SessionLedger) {
        let store = Arc::new(MemoryStore::new());
        let ledger = SessionLedger::open(store.clone(), "abc123", "honeypot_logs");
        (store, ledger)
    }

    #[test]
    fn test_record_appends_in_order() {
        let (_, mut ledger) = ledger();
        ledger.record(EventKind::SessionStart, payload(json!({ "ua": "test" })));
        ledger.record(EventKind::TerminalCommand, payload(json!({ "cmd": "ls" })));

        let kinds: Vec<_> = ledger.entries().iter().map(|e| e.event.clone()).collect();
        assert_eq!(kinds, vec![EventKind::SessionStart, EventKind::TerminalCommand]);
        assert!(ledger.entries().iter().all(|e| e.session == "abc123"));
    }

    #[test]
    fn test_record_persists_and_reopens() {
        let (store, mut ledger) = ledger();
        ledger.record(EventKind::AppOpened, payload(json!({ "app": "terminal" })));

        let reopened = SessionLedger::open(store, "abc123", "honeypot_logs");
        assert_eq!(reopened.entries(), ledger.entries());
    }

    #[test]
    fn test_export_roundtrip_preserves_order() {
        let (_, mut ledger) = ledger();
        for i in 0..20 {
            ledger.record(EventKind::TerminalCommand, payload(json!({ "cmd": format!("echo {}", i) })));
        }

        let parsed: Vec<LogEntry> = serde_json::from_str(&ledger.export_all()).unwrap();
        assert_eq!(parsed, ledger.entries());
        assert_eq!(ledger.export_file_name(), "honeypot_logs_abc123.json");
    }

    #[test]
    fn test_clear_wipes_store() {
        let (store, mut ledger) = ledger();
        ledger.record(EventKind::SessionStart, Map::new());
        ledger.clear();

        assert!(ledger.is_empty());
        assert!(load_entries(store.as_ref(), "honeypot_logs", "abc123").unwrap().is_empty());
    }

    #[test]
    fn test_write_failures_are_swallowed() {
        let mut ledger = SessionLedger::open(Arc::new(FullStore), "s", "p");
        ledger.record(EventKind::SessionStart, Map::new());
        ledger.clear();
        ledger.record(EventKind::LogsCleared, Map::new());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_corrupt_store_starts_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set("p_s", "{not json").unwrap();
        let ledger = SessionLedger::open(store, "s", "p");
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_render_lines() {
        let (_, mut ledger) = ledger();
        ledger.record(EventKind::SessionStart, Map::new());
        ledger.record(EventKind::LogsCleared, Map::new());
        let rendered = ledger.render();
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.lines().nth(1).unwrap().contains("logs_cleared"));
    }
}
