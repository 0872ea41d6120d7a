//! Simulated commands
//!
//! Each handler is a pure function of its arguments and a read-only view of
//! the session; anything that must change session state comes back as an
//! [`Effect`] for the engine to apply.

use lure_core::path;
use lure_core::VirtualFilesystem;

use crate::classifier::{classify_file, FileAccess};
use crate::policy::Policy;

/// Allow-listed commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Ls,
    Dir,
    Whoami,
    Pwd,
    Cd,
    Cat,
    Type,
    Echo,
    Clear,
    Uname,
    Id,
    Date,
    Ps,
    Netstat,
}

impl Command {
    /// Lowercased base command to handler
    pub fn parse(base: &str) -> Option<Self> {
        Some(match base {
            "help" => Self::Help,
            "ls" => Self::Ls,
            "dir" => Self::Dir,
            "whoami" => Self::Whoami,
            "pwd" => Self::Pwd,
            "cd" => Self::Cd,
            "cat" => Self::Cat,
            "type" => Self::Type,
            "echo" => Self::Echo,
            "clear" => Self::Clear,
            "uname" => Self::Uname,
            "id" => Self::Id,
            "date" => Self::Date,
            "ps" => Self::Ps,
            "netstat" => Self::Netstat,
            _ => return None,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Help => "help",
            Self::Ls => "ls",
            Self::Dir => "dir",
            Self::Whoami => "whoami",
            Self::Pwd => "pwd",
            Self::Cd => "cd",
            Self::Cat => "cat",
            Self::Type => "type",
            Self::Echo => "echo",
            Self::Clear => "clear",
            Self::Uname => "uname",
            Self::Id => "id",
            Self::Date => "date",
            Self::Ps => "ps",
            Self::Netstat => "netstat",
        }
    }

    /// Run the simulated command
    pub fn run(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandOutput {
        match self {
            Self::Help => CommandOutput::text(
                "Available: help, ls/dir, whoami, pwd, cd, cat/type, echo, clear,\n          \
                 uname, id, date, ps, netstat\n",
            ),
            Self::Clear => CommandOutput::effect(Effect::ClearScreen),
            Self::Ls | Self::Dir => {
                let items = ctx.fs.list(ctx.cwd);
                if items.is_empty() {
                    CommandOutput::text("\n")
                } else {
                    CommandOutput::text(format!("{}\n", items.join("  ")))
                }
            }
            Self::Whoami => CommandOutput::text(format!("{}\n", ctx.user)),
            Self::Pwd => CommandOutput::text(format!("{}\n", ctx.cwd)),
            Self::Cd => change_directory(args, ctx),
            Self::Cat | Self::Type => read_file(self.name(), args, ctx),
            Self::Echo => CommandOutput::text(format!("{}\n", echo_remainder(ctx.input))),
            Self::Uname => CommandOutput::text(format!(
                "Linux {} 6.1.0-hardened #1 SMP (simulated)\n",
                ctx.hostname
            )),
            Self::Id => CommandOutput::text(format!(
                "uid=1001({0}) gid=1001({0}) groups=1001({0})\n",
                ctx.user
            )),
            Self::Date => CommandOutput::text(format!(
                "{}\n",
                chrono::Local::now().format("%a %b %d %Y %H:%M:%S GMT%z")
            )),
            Self::Ps => CommandOutput::text(
                "  PID TTY      TIME CMD\n  \
                 101 pts/0    00:00:00 shell\n  \
                 214 pts/0    00:00:00 monitor\n",
            ),
            Self::Netstat => CommandOutput::text(
                "Active Internet connections (simulated)\n\
                 Proto Local Address      Foreign Address    State\n\
                 tcp   10.0.0.23:22       10.0.0.1:51234     ESTABLISHED\n",
            ),
        }
    }
}

/// Read-only session view handed to handlers
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    /// Trimmed input line as typed
    pub input: &'a str,
    pub cwd: &'a str,
    pub home: &'a str,
    pub user: &'a str,
    pub hostname: &'a str,
    pub fs: &'a VirtualFilesystem,
    pub policy: &'a Policy,
}

/// State changes requested by a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Move cwd to an existing folder
    ChangeDirectory(String),
    /// Wipe the terminal surface
    ClearScreen,
    /// A sensitive file was read: count it
    SensitiveFile { target: String },
}

/// Handler result
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub text: String,
    pub effects: Vec<Effect>,
}

impl CommandOutput {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            effects: Vec::new(),
        }
    }

    fn effect(effect: Effect) -> Self {
        Self {
            text: String::new(),
            effects: vec![effect],
        }
    }
}

fn change_directory(args: &[String], ctx: &CommandContext<'_>) -> CommandOutput {
    let target = args.first().map(String::as_str).unwrap_or("~");
    let next = path::resolve(ctx.cwd, target, ctx.home);

    if ctx.fs.exists(&next) {
        CommandOutput::effect(Effect::ChangeDirectory(next))
    } else {
        CommandOutput::text(format!("cd: no such file or directory: {}\n", target))
    }
}

fn read_file(base: &str, args: &[String], ctx: &CommandContext<'_>) -> CommandOutput {
    let Some(target) = args.first() else {
        return CommandOutput::text(format!("{}: missing file operand\n", base));
    };

    match classify_file(target, ctx.policy) {
        FileAccess::Denied => CommandOutput {
            text: "ACCESS DENIED\n".to_string(),
            effects: vec![Effect::SensitiveFile {
                target: target.clone(),
            }],
        },
        FileAccess::Decoy(content) => CommandOutput::text(content),
        FileAccess::Missing => CommandOutput::text(format!("{}: {}: No such file\n", base, target)),
    }
}

/// Everything after the leading `echo` word, internal spacing intact
fn echo_remainder(input: &str) -> &str {
    let trimmed = input.trim_start();
    match trimmed.get(..4) {
        Some(word) if word.eq_ignore_ascii_case("echo") => trimmed[4..].trim_start(),
        _ => trimmed,
    }
}
