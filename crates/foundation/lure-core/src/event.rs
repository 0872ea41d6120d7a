//! Audit log entries

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Event tags written to the ledger. The set is open: anything not listed
/// round-trips through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    SessionStart,
    AppOpened,
    AppClosed,
    StartMenuOpened,
    StartMenuClosed,
    TerminalCommand,
    BlockedCommand,
    AttemptedSensitiveFile,
    Violation,
    LockdownRedirect,
    FilesOpenFolder,
    FilesSelected,
    FileOpened,
    LogsCleared,
    LogsDownloaded,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::SessionStart => "session_start",
            Self::AppOpened => "app_opened",
            Self::AppClosed => "app_closed",
            Self::StartMenuOpened => "start_menu_opened",
            Self::StartMenuClosed => "start_menu_closed",
            Self::TerminalCommand => "terminal_command",
            Self::BlockedCommand => "blocked_command",
            Self::AttemptedSensitiveFile => "attempted_sensitive_file",
            Self::Violation => "violation",
            Self::LockdownRedirect => "lockdown_redirect",
            Self::FilesOpenFolder => "files_open_folder",
            Self::FilesSelected => "files_selected",
            Self::FileOpened => "file_opened",
            Self::LogsCleared => "logs_cleared",
            Self::LogsDownloaded => "logs_downloaded",
            Self::Other(tag) => tag,
        }
    }

    pub fn parse(tag: &str) -> Self {
        match tag {
            "session_start" => Self::SessionStart,
            "app_opened" => Self::AppOpened,
            "app_closed" => Self::AppClosed,
            "start_menu_opened" => Self::StartMenuOpened,
            "start_menu_closed" => Self::StartMenuClosed,
            "terminal_command" => Self::TerminalCommand,
            "blocked_command" => Self::BlockedCommand,
            "attempted_sensitive_file" => Self::AttemptedSensitiveFile,
            "violation" => Self::Violation,
            "lockdown_redirect" => Self::LockdownRedirect,
            "files_open_folder" => Self::FilesOpenFolder,
            "files_selected" => Self::FilesSelected,
            "file_opened" => Self::FileOpened,
            "logs_cleared" => Self::LogsCleared,
            "logs_downloaded" => Self::LogsDownloaded,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse(&tag))
    }
}

/// One ledger record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the event happened
    pub ts: DateTime<Utc>,
    /// Session the event belongs to
    pub session: String,
    /// Event tag
    pub event: EventKind,
    /// Event payload
    pub data: Map<String, Value>,
}

impl LogEntry {
    pub fn new(session: impl Into<String>, event: EventKind, data: Map<String, Value>) -> Self {
        Self {
            ts: Utc::now(),
            session: session.into(),
            event,
            data,
        }
    }

    /// Single display line: `<ts>  <event>  <data>`
    pub fn render(&self) -> String {
        format!(
            "{}  {}  {}",
            self.ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.event,
            Value::Object(self.data.clone())
        )
    }
}

/// Turn a `json!({...})` literal into a payload map. Non-objects are wrapped
/// under `value`.
pub fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_kind_roundtrip_open_set() {
        assert_eq!(EventKind::parse("blocked_command"), EventKind::BlockedCommand);
        assert_eq!(
            EventKind::parse("window_dragged"),
            EventKind::Other("window_dragged".to_string())
        );
        assert_eq!(EventKind::Other("x".into()).as_str(), "x");
    }

    #[test]
    fn test_entry_wire_format() {
        let entry = LogEntry::new(
            "a1b2c3d4e5f6",
            EventKind::TerminalCommand,
            payload(json!({ "cmd": "ls", "cwd": "/home/guest" })),
        );
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["session"], "a1b2c3d4e5f6");
        assert_eq!(value["event"], "terminal_command");
        assert_eq!(value["data"]["cmd"], "ls");
        assert!(value["ts"].is_string());
    }

    #[test]
    fn test_render_line() {
        let entry = LogEntry::new("s", EventKind::LogsCleared, Map::new());
        let line = entry.render();
        assert!(line.contains("  logs_cleared  {}"));
    }

    #[test]
    fn test_payload_wraps_scalars() {
        assert!(payload(Value::Null).is_empty());
        assert_eq!(payload(json!(3))["value"], 3);
    }
}
