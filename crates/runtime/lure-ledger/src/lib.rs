//! Lure Ledger
//!
//! Persistence for decoy sessions:
//! - KvStore: string key-value backend (memory or JSON files)
//! - SessionLedger: append-only audit log with list/clear/export
//! - keys: the storage key layout shared with the capture view

pub mod ledger;
pub mod store;

pub use ledger::{load_entries, SessionLedger};
pub use store::{JsonFileStore, KvStore, MemoryStore};

/// Storage key layout, all scoped by session id
pub mod keys {
    /// Ordered log array
    pub fn log_key(prefix: &str, session_id: &str) -> String {
        format!("{}_{}", prefix, session_id)
    }

    /// One-shot lockdown flag, `"1"` once set
    pub fn lockdown_flag_key(session_id: &str) -> String {
        format!("lure_lockdown_triggered_{}", session_id)
    }

    /// Lockdown payload JSON for the capture view
    pub fn lockdown_payload_key(session_id: &str) -> String {
        format!("lure_lockdown_payload_{}", session_id)
    }

    /// Resumable session state JSON
    pub fn state_key(session_id: &str) -> String {
        format!("lure_state_{}", session_id)
    }
}
