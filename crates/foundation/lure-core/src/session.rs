//! Session identity and resumable state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::counters::ViolationCounters;

/// Length of the opaque session token, in hex chars
const ID_LEN: usize = 12;

/// One visitor session: created at page load, `cwd` is the only mutable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: String,
    started_at: DateTime<Utc>,
    /// Current working directory shared by the terminal and file browser
    pub cwd: String,
}

impl Session {
    /// Fresh session starting in `home`
    pub fn new(home: impl Into<String>) -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(ID_LEN);

        Self {
            id,
            started_at: Utc::now(),
            cwd: home.into(),
        }
    }

    /// Session with a known id, for tests and resume fallbacks
    pub fn with_id(id: impl Into<String>, home: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            started_at: Utc::now(),
            cwd: home.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whole seconds since start, rounded to nearest
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        let millis = (now - self.started_at).num_milliseconds().max(0);
        (millis + 500) / 1000
    }
}

/// Everything the engine needs to pick a session back up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub session: Session,
    pub counters: ViolationCounters,
    /// Last sensitive file target
    pub last_file: Option<String>,
    /// Last blocked command
    pub last_command: Option<String>,
}

impl SessionState {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            counters: ViolationCounters::new(),
            last_file: None,
            last_command: None,
        }
    }
}
