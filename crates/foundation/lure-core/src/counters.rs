//! Violation counters
//!
//! `total_violations` is only ever moved together with one of its two
//! sub-counters, so it always equals their sum.

use serde::{Deserialize, Serialize};

/// Kinds of violation that count toward lockdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Input matched a block rule
    BlockedCommand,
    /// A sensitive decoy file was opened or read
    UnauthorizedFile,
}

impl ViolationKind {
    pub fn name(&self) -> &str {
        match self {
            Self::BlockedCommand => "blocked_command",
            Self::UnauthorizedFile => "unauthorized_file",
        }
    }
}

/// Per-session escalation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationCounters {
    unauthorized_file_attempts: u32,
    blocked_command_attempts: u32,
    terminal_command_attempts: u32,
    total_violations: u32,
}

impl ViolationCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one violation; returns the new total
    pub fn record_violation(&mut self, kind: ViolationKind) -> u32 {
        match kind {
            ViolationKind::BlockedCommand => {
                self.blocked_command_attempts = self.blocked_command_attempts.saturating_add(1)
            }
            ViolationKind::UnauthorizedFile => {
                self.unauthorized_file_attempts = self.unauthorized_file_attempts.saturating_add(1)
            }
        }
        self.total_violations = self
            .unauthorized_file_attempts
            .saturating_add(self.blocked_command_attempts);
        self.total_violations
    }

    /// Count one raw terminal submission, independent of outcome
    pub fn record_terminal_command(&mut self) -> u32 {
        self.terminal_command_attempts = self.terminal_command_attempts.saturating_add(1);
        self.terminal_command_attempts
    }

    pub fn unauthorized_file_attempts(&self) -> u32 {
        self.unauthorized_file_attempts
    }

    pub fn blocked_command_attempts(&self) -> u32 {
        self.blocked_command_attempts
    }

    pub fn terminal_command_attempts(&self) -> u32 {
        self.terminal_command_attempts
    }

    pub fn total_violations(&self) -> u32 {
        self.total_violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum() {
        let mut counters = ViolationCounters::new();
        counters.record_violation(ViolationKind::BlockedCommand);
        counters.record_violation(ViolationKind::UnauthorizedFile);
        counters.record_violation(ViolationKind::UnauthorizedFile);
        counters.record_terminal_command();

        assert_eq!(counters.blocked_command_attempts(), 1);
        assert_eq!(counters.unauthorized_file_attempts(), 2);
        assert_eq!(counters.total_violations(), 3);
        assert_eq!(counters.terminal_command_attempts(), 1);
    }

    #[test]
    fn test_terminal_commands_are_not_violations() {
        let mut counters = ViolationCounters::new();
        for _ in 0..10 {
            counters.record_terminal_command();
        }
        assert_eq!(counters.total_violations(), 0);
    }

    #[test]
    fn test_wire_names() {
        let mut counters = ViolationCounters::new();
        counters.record_violation(ViolationKind::BlockedCommand);
        let json = serde_json::to_value(counters).unwrap();
        assert_eq!(json["blockedCommandAttempts"], 1);
        assert_eq!(json["totalViolations"], 1);
    }
}
