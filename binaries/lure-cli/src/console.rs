//! Stdout desktop and the interactive shell loop
//!
//! Lines starting with `:` are desktop actions (log window, file browser,
//! export). Everything else is typed into the decoy terminal.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use lure_core::FolderEntry;
use lure_engine::{App, DecoyTerminal, DesktopUi};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Renders the desktop to stdout
pub struct ConsoleUi {
    /// Repeat typed lines; off when a human is already looking at them
    echo: bool,
    folder: Option<(String, Vec<FolderEntry>)>,
    preview: String,
    redirected: Option<String>,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self {
            echo: !io::stdin().is_terminal(),
            folder: None,
            preview: String::new(),
            redirected: None,
        }
    }

    pub fn print_folder(&self) {
        let Some((path, entries)) = &self.folder else {
            return;
        };
        println!("{}", path.as_str().bold());
        for entry in entries {
            if entry.is_dir {
                println!("  [dir]  {}", entry.name.as_str().cyan());
            } else {
                println!("  [file] {}", entry.name);
            }
        }
    }

    pub fn print_preview(&self) {
        print!("{}", self.preview);
        if !self.preview.ends_with('\n') {
            println!();
        }
    }

    pub fn redirected(&self) -> Option<&str> {
        self.redirected.as_deref()
    }
}

impl DesktopUi for ConsoleUi {
    fn render_output(&mut self, text: &str) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn echo_input(&mut self, prompt: &str, input: &str) {
        if self.echo {
            self.render_output(&format!("{} {}\n", prompt, input));
        }
    }

    fn clear_output(&mut self) {
        let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
    }

    fn open_log_view(&mut self) {
        println!("{}", "---- session log ----".bold());
    }

    fn render_log_view(&mut self, rendered: &str) {
        if rendered.is_empty() {
            println!("{}", "(empty)".dim());
        } else {
            println!("{}", rendered.dim());
        }
    }

    fn close_log_view(&mut self) {
        println!("{}", "---------------------".bold());
    }

    fn show_folder(&mut self, path: &str, entries: &[FolderEntry]) {
        self.folder = Some((path.to_string(), entries.to_vec()));
    }

    fn show_preview(&mut self, text: &str) {
        self.preview = text.to_string();
    }

    fn navigate_to(&mut self, url: &str) {
        println!();
        println!("{}", format!("[lockdown] session redirected to {}", url).red().bold());
        self.redirected = Some(url.to_string());
    }
}

/// Desktop-side actions available from the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Logs,
    Files,
    Open(String),
    Export,
    ClearLogs,
    Help,
    Quit,
    Unknown(String),
}

impl Action {
    /// `None` for ordinary terminal input
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix(':')?;
        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).unwrap_or_default();

        Some(match name {
            "logs" => Self::Logs,
            "files" => Self::Files,
            "open" if !arg.is_empty() => Self::Open(arg.to_string()),
            "export" => Self::Export,
            "clear-logs" => Self::ClearLogs,
            "help" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Unknown(rest.to_string()),
        })
    }
}

/// Read lines until EOF or `:quit`
pub async fn run_shell(terminal: DecoyTerminal<ConsoleUi>, user_agent: &str) -> Result<()> {
    terminal.with_engine(|engine| engine.boot(user_agent)).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let prompt = terminal.with_engine(|engine| engine.prompt()).await;
        print!("{} ", prompt.as_str().green().bold());
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match Action::parse(&line) {
            Some(Action::Quit) => break,
            Some(action) => run_action(&terminal, action).await?,
            None => {
                terminal.submit(&line).await;
            }
        }
    }

    let session = terminal.with_engine(|engine| engine.session().id().to_string()).await;
    println!("Session {} saved.", session.as_str().bold());
    Ok(())
}

async fn run_action(terminal: &DecoyTerminal<ConsoleUi>, action: Action) -> Result<()> {
    match action {
        Action::Logs => {
            terminal
                .with_engine(|engine| {
                    engine.open_app(App::Logs, "shell");
                    engine.close_app(App::Logs);
                })
                .await;
        }
        Action::Files => {
            terminal
                .with_engine(|engine| {
                    engine.open_app(App::Files, "shell");
                    let cwd = engine.cwd().to_string();
                    engine.open_folder(&cwd);
                    engine.ui().print_folder();
                })
                .await;
        }
        Action::Open(name) => {
            terminal
                .with_engine(|engine| {
                    let cwd = engine.cwd().to_string();
                    let is_dir = engine.filesystem().is_dir(&cwd, &name);
                    engine.activate(&cwd, &name);
                    if is_dir {
                        engine.ui().print_folder();
                    } else {
                        engine.ui().print_preview();
                    }
                })
                .await;
        }
        Action::Export => {
            let export = terminal.with_engine(|engine| engine.download_logs()).await;
            let path = PathBuf::from(&export.file_name);
            std::fs::write(&path, &export.json)?;
            println!("Wrote {} ({} bytes)", path.display(), export.bytes);
        }
        Action::ClearLogs => {
            terminal.with_engine(|engine| engine.clear_logs()).await;
            println!("Logs cleared.");
        }
        Action::Help => print_actions(),
        Action::Quit => {}
        Action::Unknown(name) => {
            println!("Unknown action ':{}'. Try :help", name);
        }
    }
    Ok(())
}

fn print_actions() {
    println!("Desktop actions:");
    println!("  :logs          Show the session log");
    println!("  :files         Show the current folder");
    println!("  :open <name>   Open a file or folder from the current folder");
    println!("  :export        Download the log as JSON");
    println!("  :clear-logs    Clear the session log");
    println!("  :quit          Leave the shell");
}
