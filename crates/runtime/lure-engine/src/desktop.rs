//! Desktop events: boot, app windows, start menu, log export and history

use lure_core::{payload, EventKind};
use serde_json::{json, Map};
use tracing::info;

use crate::engine::DecoyEngine;
use crate::ui::DesktopUi;

pub const GREETING: &str =
    "Restricted terminal session initialized.\nType 'help' for available commands.\n";

/// Desktop windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum App {
    Terminal,
    Files,
    Logs,
}

impl App {
    pub fn name(&self) -> &str {
        match self {
            Self::Terminal => "terminal",
            Self::Files => "files",
            Self::Logs => "logs",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "terminal" => Some(Self::Terminal),
            "files" => Some(Self::Files),
            "logs" => Some(Self::Logs),
            _ => None,
        }
    }
}

/// A downloadable copy of the session log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogExport {
    pub file_name: String,
    pub json: String,
    pub bytes: usize,
}

impl<U: DesktopUi> DecoyEngine<U> {
    /// Page load: log the visitor, open the terminal and home folder, greet
    pub fn boot(&mut self, user_agent: &str) {
        self.log(EventKind::SessionStart, payload(json!({ "ua": user_agent })));
        info!(session = %self.state.session.id(), ua = %user_agent, "session started");

        self.open_app(App::Terminal, "boot");
        let home = self.fs.root().to_string();
        self.open_folder(&home);
        self.ui.render_output(GREETING);
    }

    pub fn open_app(&mut self, app: App, source: &str) {
        self.log(
            EventKind::AppOpened,
            payload(json!({ "app": app.name(), "source": source })),
        );

        if app == App::Logs {
            self.ledger.open_view();
            self.ui.open_log_view();
            let rendered = self.ledger.render();
            self.ui.render_log_view(&rendered);
        }
    }

    pub fn close_app(&mut self, app: App) {
        self.log(EventKind::AppClosed, payload(json!({ "app": app.name() })));

        if app == App::Logs {
            self.ledger.close_view();
            self.ui.close_log_view();
        }
    }

    /// Returns whether the menu is now open
    pub fn toggle_start_menu(&mut self) -> bool {
        self.start_menu_open = !self.start_menu_open;
        let event = if self.start_menu_open {
            EventKind::StartMenuOpened
        } else {
            EventKind::StartMenuClosed
        };
        self.log(event, Map::new());
        self.start_menu_open
    }

    /// Export the log, then note the download in it
    pub fn download_logs(&mut self) -> LogExport {
        let json = self.ledger.export_all();
        let export = LogExport {
            file_name: self.ledger.export_file_name(),
            bytes: json.len(),
            json,
        };
        self.log(EventKind::LogsDownloaded, payload(json!({ "bytes": export.bytes })));
        export
    }

    /// Wipe the log; counters stay as they are
    pub fn clear_logs(&mut self) {
        self.ledger.clear();
        self.log(EventKind::LogsCleared, Map::new());
    }

    /// ArrowUp
    pub fn history_previous(&mut self) -> Option<String> {
        self.history.previous().map(str::to_string)
    }

    /// ArrowDown
    pub fn history_next(&mut self) -> Option<String> {
        self.history.next().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lure_config::LureConfig;
    use lure_core::LogEntry;
    use lure_ledger::MemoryStore;

    use super::*;
    use crate::ui::{RecordingUi, UiCall};

    fn engine() -> DecoyEngine<RecordingUi> {
        DecoyEngine::new(LureConfig::default(), Arc::new(MemoryStore::new()), RecordingUi::new()).unwrap()
    }

    fn kinds(engine: &DecoyEngine<RecordingUi>) -> Vec<String> {
        engine.ledger().entries().iter().map(|e| e.event.as_str().to_string()).collect()
    }

    #[test]
    fn test_boot_sequence() {
        let mut engine = engine();
        engine.boot("Mozilla/5.0 (test)");

        assert_eq!(kinds(&engine), vec!["session_start", "app_opened", "files_open_folder"]);
        assert_eq!(engine.ledger().entries()[0].data["ua"], "Mozilla/5.0 (test)");
        assert!(engine.ui().output().ends_with(GREETING));
    }

    #[test]
    fn test_log_view_follows_records() {
        let mut engine = engine();
        engine.open_app(App::Logs, "start_menu");
        engine.execute("whoami");

        let last_view = engine.ui().calls.iter().rev().find_map(|call| match call {
            UiCall::LogView(text) => Some(text.clone()),
            _ => None,
        });
        assert!(last_view.unwrap().contains("terminal_command"));

        engine.close_app(App::Logs);
        assert!(!engine.ledger().is_view_open());
        assert_eq!(engine.ui().calls.last(), Some(&UiCall::CloseLogView));
    }

    #[test]
    fn test_start_menu_toggles() {
        let mut engine = engine();
        assert!(engine.toggle_start_menu());
        assert!(!engine.toggle_start_menu());
        assert_eq!(kinds(&engine), vec!["start_menu_opened", "start_menu_closed"]);
    }

    #[test]
    fn test_download_roundtrip() {
        let mut engine = engine();
        engine.boot("ua");
        engine.execute("ls");
        engine.execute("rm -rf /");
        let before: Vec<LogEntry> = engine.ledger().entries().to_vec();

        let export = engine.download_logs();
        let parsed: Vec<LogEntry> = serde_json::from_str(&export.json).unwrap();
        assert_eq!(parsed, before);
        assert_eq!(export.bytes, export.json.len());
        assert_eq!(
            export.file_name,
            format!("honeypot_logs_{}.json", engine.session().id())
        );

        let last = engine.ledger().entries().last().unwrap();
        assert_eq!(last.event.as_str(), "logs_downloaded");
        assert_eq!(last.data["bytes"], export.bytes);
    }

    #[test]
    fn test_clear_keeps_counters() {
        let mut engine = engine();
        engine.execute("rm -rf /");
        engine.clear_logs();

        assert_eq!(kinds(&engine), vec!["logs_cleared"]);
        assert_eq!(engine.counters().total_violations(), 1);
    }

    #[test]
    fn test_history_navigation() {
        let mut engine = engine();
        engine.execute("ls");
        engine.execute("   ");
        engine.execute("pwd");

        assert_eq!(engine.history_previous().as_deref(), Some("pwd"));
        assert_eq!(engine.history_previous().as_deref(), Some("ls"));
        assert_eq!(engine.history_previous().as_deref(), Some("ls"));
        assert_eq!(engine.history_next().as_deref(), Some("pwd"));
    }

    #[test]
    fn test_app_names() {
        assert_eq!(App::parse("LOGS"), Some(App::Logs));
        assert_eq!(App::parse("browser"), None);
        assert_eq!(App::Files.name(), "files");
    }
}
