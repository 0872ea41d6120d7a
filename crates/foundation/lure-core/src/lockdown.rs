//! Lockdown payload: the data contract with the capture view.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::session::SessionState;

/// Minimum reported session length, in seconds
pub const MIN_SESSION_SECONDS: i64 = 5;

/// Reason recorded when the violation threshold trips
pub const THRESHOLD_REASON: &str = "violation_threshold_reached";

/// Snapshot taken once, at the lockdown transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockdownPayload {
    pub capture_id: String,
    pub session_id: String,
    pub session_seconds: i64,
    /// Synthetic address shown to the visitor; never a real lookup
    pub ip: String,
    pub location: String,
    pub unauthorized_file_attempts: u32,
    pub blocked_command_attempts: u32,
    pub terminal_command_attempts: u32,
    pub total_violations: u32,
    pub last_file: String,
    pub last_command: String,
    pub reason: String,
}

impl LockdownPayload {
    pub fn capture<R: Rng + ?Sized>(
        state: &SessionState,
        capture_id: &str,
        location: &str,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        let counters = &state.counters;

        Self {
            capture_id: capture_id.to_string(),
            session_id: state.session.id().to_string(),
            session_seconds: state.session.elapsed_seconds(now).max(MIN_SESSION_SECONDS),
            ip: synthetic_ip(rng),
            location: location.to_string(),
            unauthorized_file_attempts: counters.unauthorized_file_attempts(),
            blocked_command_attempts: counters.blocked_command_attempts(),
            terminal_command_attempts: counters.terminal_command_attempts(),
            total_violations: counters.total_violations(),
            last_file: state.last_file.clone().unwrap_or_else(|| "-".to_string()),
            last_command: state.last_command.clone().unwrap_or_else(|| "-".to_string()),
            reason: THRESHOLD_REASON.to_string(),
        }
    }
}

/// Private-range address that looks plausible on the capture screen
pub fn synthetic_ip<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("192.168.{}.{}", rng.gen_range(0..255), rng.gen_range(0..255))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::ViolationKind;
    use crate::session::Session;

    #[test]
    fn test_capture_snapshot() {
        let mut state = SessionState::new(Session::with_id("feedc0ffee00", "/home/guest"));
        state.counters.record_terminal_command();
        state.counters.record_violation(ViolationKind::UnauthorizedFile);
        state.last_file = Some("secrets.txt".to_string());

        let payload = LockdownPayload::capture(
            &state,
            "VF_DECOY_2026_001",
            "Andheri, IN",
            state.session.started_at(),
            &mut rand::thread_rng(),
        );

        assert_eq!(payload.session_id, "feedc0ffee00");
        assert_eq!(payload.session_seconds, MIN_SESSION_SECONDS);
        assert_eq!(payload.total_violations, 1);
        assert_eq!(payload.last_file, "secrets.txt");
        assert_eq!(payload.last_command, "-");
        assert!(payload.ip.starts_with("192.168."));
    }

    #[test]
    fn test_payload_wire_names() {
        let state = SessionState::new(Session::with_id("s", "/home/guest"));
        let payload = LockdownPayload::capture(
            &state,
            "cap",
            "loc",
            Utc::now(),
            &mut rand::thread_rng(),
        );
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["captureId"], "cap");
        assert_eq!(value["sessionSeconds"], MIN_SESSION_SECONDS);
        assert_eq!(value["reason"], THRESHOLD_REASON);
    }

    #[test]
    fn test_synthetic_ip_octets() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let ip = synthetic_ip(&mut rng);
            let octets: Vec<u32> = ip.split('.').map(|o| o.parse().unwrap()).collect();
            assert_eq!(octets.len(), 4);
            assert!(octets[2] < 255 && octets[3] < 255);
        }
    }
}
