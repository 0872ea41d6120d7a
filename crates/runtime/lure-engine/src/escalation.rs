//! Escalation state
//!
//! ```text
//!   Normal ──(total_violations >= threshold)──► LockedDown
//!                                                  │
//!                                     terminal; never fires again
//! ```
//!
//! The one-shot flag lives here and is checked-and-set in a single call.
//! Persisting the flag lets a resumed session start already locked down.

use lure_core::{LockdownPayload, Result};
use lure_ledger::{keys, KvStore};
use serde::{Deserialize, Serialize};

/// Stored value of a set lockdown flag
const FLAG_SET: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscalationState {
    Normal,
    LockedDown,
}

impl EscalationState {
    pub fn name(&self) -> &str {
        match self {
            Self::Normal => "normal",
            Self::LockedDown => "locked_down",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Escalation {
    threshold: u32,
    state: EscalationState,
}

impl Escalation {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            state: EscalationState::Normal,
        }
    }

    /// Start locked down when the persisted flag says so
    pub fn restore(threshold: u32, store: &dyn KvStore, session_id: &str) -> Result<Self> {
        let mut escalation = Self::new(threshold);
        if load_flag(store, session_id)? {
            escalation.state = EscalationState::LockedDown;
        }
        Ok(escalation)
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn state(&self) -> EscalationState {
        self.state
    }

    pub fn is_locked_down(&self) -> bool {
        self.state == EscalationState::LockedDown
    }

    /// Flip to `LockedDown` if `total` has reached the threshold.
    /// Returns true only on the call that performs the transition.
    pub fn try_lock(&mut self, total: u32) -> bool {
        if self.is_locked_down() || total < self.threshold {
            return false;
        }
        self.state = EscalationState::LockedDown;
        true
    }
}

pub fn load_flag(store: &dyn KvStore, session_id: &str) -> Result<bool> {
    Ok(store.get(&keys::lockdown_flag_key(session_id))?.as_deref() == Some(FLAG_SET))
}

/// Write the flag and the payload for the capture view
pub fn persist_lockdown(store: &dyn KvStore, payload: &LockdownPayload) -> Result<()> {
    store.set(&keys::lockdown_flag_key(&payload.session_id), FLAG_SET)?;
    store.set(
        &keys::lockdown_payload_key(&payload.session_id),
        &serde_json::to_string(payload)?,
    )
}

pub fn load_payload(store: &dyn KvStore, session_id: &str) -> Result<Option<LockdownPayload>> {
    match store.get(&keys::lockdown_payload_key(session_id))? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}
