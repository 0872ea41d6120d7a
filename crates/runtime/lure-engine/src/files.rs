//! File browser events
//!
//! Shares cwd with the terminal, and opening a file goes through the same
//! access check as `cat`, so both surfaces count violations identically.

use lure_core::vfs::join;
use lure_core::{payload, EventKind, LockdownPayload};
use serde_json::json;
use tracing::debug;

use crate::classifier::{classify_file, FileAccess};
use crate::engine::DecoyEngine;
use crate::ui::DesktopUi;

pub const PREVIEW_HINT: &str = "Preview: (select a file)\n";
pub const NO_PREVIEW: &str = "No preview available (simulated binary or unknown file).\n";

impl<U: DesktopUi> DecoyEngine<U> {
    /// Show `path` in the browser and make it the cwd.
    /// Unknown folders are logged but leave cwd alone; returns whether it opened.
    pub fn open_folder(&mut self, path: &str) -> bool {
        let found = self.fs.exists(path);
        self.log(
            EventKind::FilesOpenFolder,
            payload(json!({ "path": path, "found": found })),
        );

        if found {
            self.change_directory(path.to_string());
            self.ui.show_preview(PREVIEW_HINT);
        } else {
            debug!(path = %path, "folder not in decoy tree");
            self.ui.show_preview(&format!("Folder not found: {}\n", path));
        }
        found
    }

    /// Single click
    pub fn select(&mut self, path: &str, name: &str) {
        let is_dir = self.fs.is_dir(path, name);
        self.log(
            EventKind::FilesSelected,
            payload(json!({ "path": path, "name": name, "isDir": is_dir })),
        );

        let kind = if is_dir { "Folder" } else { "File" };
        self.ui
            .show_preview(&format!("Selected: {}\nType: {}\nPath: {}\n", name, kind, path));
    }

    /// Double click: folders open, files go through `open_file`
    pub fn activate(&mut self, path: &str, name: &str) -> Option<LockdownPayload> {
        if self.fs.is_dir(path, name) {
            self.open_folder(&join(path, name));
            None
        } else {
            self.open_file(path, name)
        }
    }

    /// Open a file in the preview pane. Returns the lockdown payload if this
    /// open tripped it.
    pub fn open_file(&mut self, path: &str, name: &str) -> Option<LockdownPayload> {
        self.log(EventKind::FileOpened, payload(json!({ "path": path, "name": name })));

        let (content, lockdown) = match classify_file(name, &self.policy) {
            FileAccess::Denied => ("ACCESS DENIED\n", self.flag_sensitive(&join(path, name))),
            FileAccess::Decoy(content) => (content, None),
            FileAccess::Missing => (NO_PREVIEW, None),
        };

        self.ui.show_preview(&format!(
            "Opened: {}\nPath: {}\n\n--- Content ---\n{}",
            name, path, content
        ));
        lockdown
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lure_config::LureConfig;
    use lure_ledger::MemoryStore;

    use crate::engine::DecoyEngine;
    use crate::ui::{RecordingUi, UiCall};

    use super::*;

    fn engine() -> DecoyEngine<RecordingUi> {
        DecoyEngine::new(LureConfig::default(), Arc::new(MemoryStore::new()), RecordingUi::new()).unwrap()
    }

    #[test]
    fn test_open_folder_moves_cwd() {
        let mut engine = engine();
        assert!(engine.open_folder("/home/guest/Documents"));
        assert_eq!(engine.cwd(), "/home/guest/Documents");
        assert_eq!(engine.prompt(), "guest@workstation:~/Documents$");

        let shown = engine.ui().calls.iter().any(|call| {
            matches!(call, UiCall::Folder { path, entries } if path == "/home/guest/Documents" && entries.len() == 2)
        });
        assert!(shown);
    }

    #[test]
    fn test_open_unknown_folder_keeps_cwd() {
        let mut engine = engine();
        assert!(!engine.open_folder("/etc"));
        assert_eq!(engine.cwd(), "/home/guest");
        let entry = engine.ledger().entries().last().unwrap();
        assert_eq!(entry.data["found"], false);
    }

    #[test]
    fn test_select_logs_kind() {
        let mut engine = engine();
        engine.select("/home/guest", "Documents");
        engine.select("/home/guest", "notes.log");

        let entries = engine.ledger().entries();
        assert_eq!(entries[0].data["isDir"], true);
        assert_eq!(entries[1].data["isDir"], false);
        assert_eq!(
            engine.ui().last_preview(),
            Some("Selected: notes.log\nType: File\nPath: /home/guest\n")
        );
    }

    #[test]
    fn test_open_sensitive_file_counts_like_cat() {
        let mut engine = engine();
        engine.open_file("/home/guest/Documents", "keys.backup");

        assert_eq!(engine.counters().unauthorized_file_attempts(), 1);
        assert_eq!(engine.counters().total_violations(), 1);
        assert_eq!(engine.state().last_file.as_deref(), Some("/home/guest/Documents/keys.backup"));
        assert!(engine.ui().last_preview().unwrap().ends_with("ACCESS DENIED\n"));

        let kinds: Vec<_> = engine.ledger().entries().iter().map(|e| e.event.as_str().to_string()).collect();
        assert_eq!(kinds, vec!["file_opened", "attempted_sensitive_file", "violation"]);
    }

    #[test]
    fn test_open_decoy_and_unknown() {
        let mut engine = engine();
        engine.open_file("/home/guest/Downloads", "readme.md");
        assert_eq!(
            engine.ui().last_preview(),
            Some("Opened: readme.md\nPath: /home/guest/Downloads\n\n--- Content ---\n# README\nDecoy workstation environment.\n")
        );

        engine.open_file("/home/guest/Downloads", "setup.bin");
        assert!(engine.ui().last_preview().unwrap().ends_with(NO_PREVIEW));
        assert_eq!(engine.counters().total_violations(), 0);
    }

    #[test]
    fn test_activate_and_mixed_lockdown() {
        let mut engine = engine();
        assert!(engine.activate("/home/guest", "Downloads").is_none());
        assert_eq!(engine.cwd(), "/home/guest/Downloads");

        for _ in 0..2 {
            engine.execute("cat ../secrets.txt");
        }
        for _ in 0..2 {
            assert!(engine.activate("/home/guest", "secrets.txt").is_none());
        }
        let capture = engine.activate("/home/guest", "secrets.txt").unwrap();
        assert_eq!(capture.total_violations, 5);
        assert!(engine.is_locked_down());
    }
}
