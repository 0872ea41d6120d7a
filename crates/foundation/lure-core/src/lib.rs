//! Lure Core
//!
//! Shared vocabulary for the decoy desktop:
//! - Session: opaque id, start time, working directory
//! - ViolationCounters: escalation score for one session
//! - LogEntry / EventKind: append-only audit records
//! - VirtualFilesystem + path resolution: the fake `/home/guest` tree
//! - LockdownPayload: snapshot handed to the capture view
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      LURE SESSION                        │
//! │                                                          │
//! │   visitor ──► terminal / files ──► classifier            │
//! │                                        │                 │
//! │                  ┌─────────────────────┤                 │
//! │                  ▼                     ▼                 │
//! │              LEDGER               COUNTERS ──► LOCKDOWN  │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod counters;
pub mod event;
pub mod lockdown;
pub mod path;
pub mod session;
pub mod vfs;

pub use counters::{ViolationCounters, ViolationKind};
pub use event::{payload, EventKind, LogEntry};
pub use lockdown::LockdownPayload;
pub use session::{Session, SessionState};
pub use vfs::{FolderEntry, VirtualFilesystem, HOME};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid block pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidPattern {
            pattern: "(".to_string(),
            reason: "unclosed group".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid block pattern '(': unclosed group");
    }
}
