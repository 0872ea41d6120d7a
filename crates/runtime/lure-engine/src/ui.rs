//! Desktop boundary
//!
//! The engine owns no rendering. Everything it wants shown goes through
//! [`DesktopUi`]; a browser front end, a terminal, or a test recorder can sit
//! behind it.

use lure_core::FolderEntry;

pub trait DesktopUi: Send {
    /// Append text to the terminal surface
    fn render_output(&mut self, text: &str);

    /// Echo a submitted line after the prompt
    fn echo_input(&mut self, prompt: &str, input: &str) {
        self.render_output(&format!("{} {}\n", prompt, input));
    }

    fn clear_output(&mut self) {}

    /// Prompt changed, usually after `cd`
    fn refresh_prompt(&mut self, _prompt: &str) {}

    fn open_log_view(&mut self) {}

    /// Replace the log view contents
    fn render_log_view(&mut self, _rendered: &str) {}

    fn close_log_view(&mut self) {}

    /// File browser now shows `path`
    fn show_folder(&mut self, _path: &str, _entries: &[FolderEntry]) {}

    /// File browser preview pane
    fn show_preview(&mut self, _text: &str) {}

    /// Fire-and-forget redirect
    fn navigate_to(&mut self, _url: &str) {}
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullUi;

impl DesktopUi for NullUi {
    fn render_output(&mut self, _text: &str) {}
}

/// One call made on a [`RecordingUi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCall {
    Output(String),
    Clear,
    Prompt(String),
    OpenLogView,
    LogView(String),
    CloseLogView,
    Folder { path: String, entries: Vec<FolderEntry> },
    Preview(String),
    Navigate(String),
}

/// Keeps every call in order; handy for embedding tests
#[derive(Debug, Default, Clone)]
pub struct RecordingUi {
    pub calls: Vec<UiCall>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// All terminal output concatenated
    pub fn output(&self) -> String {
        self.calls
            .iter()
            .filter_map(|call| match call {
                UiCall::Output(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                UiCall::Navigate(url) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_preview(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            UiCall::Preview(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl DesktopUi for RecordingUi {
    fn render_output(&mut self, text: &str) {
        self.calls.push(UiCall::Output(text.to_string()));
    }

    fn clear_output(&mut self) {
        self.calls.push(UiCall::Clear);
    }

    fn refresh_prompt(&mut self, prompt: &str) {
        self.calls.push(UiCall::Prompt(prompt.to_string()));
    }

    fn open_log_view(&mut self) {
        self.calls.push(UiCall::OpenLogView);
    }

    fn render_log_view(&mut self, rendered: &str) {
        self.calls.push(UiCall::LogView(rendered.to_string()));
    }

    fn close_log_view(&mut self) {
        self.calls.push(UiCall::CloseLogView);
    }

    fn show_folder(&mut self, path: &str, entries: &[FolderEntry]) {
        self.calls.push(UiCall::Folder {
            path: path.to_string(),
            entries: entries.to_vec(),
        });
    }

    fn show_preview(&mut self, text: &str) {
        self.calls.push(UiCall::Preview(text.to_string()));
    }

    fn navigate_to(&mut self, url: &str) {
        self.calls.push(UiCall::Navigate(url.to_string()));
    }
}
