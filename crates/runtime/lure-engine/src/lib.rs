//! Lure Engine
//!
//! Interaction classification and escalation for the decoy desktop.
//!
//! ```text
//! ┌──────────┐   raw input   ┌────────────┐  Blocked / Unrecognized / Allowed
//! │ terminal │──────────────►│ classifier │─────────────────┐
//! └──────────┘               └────────────┘                 ▼
//! ┌──────────┐  open_file    ┌────────────┐   effects  ┌──────────┐
//! │  files   │──────────────►│ file check │───────────►│  engine  │──► ledger
//! └──────────┘               └────────────┘            └────┬─────┘
//!                                                            │ violation
//!                                                            ▼
//!                                                     ┌────────────┐
//!                                                     │ escalation │──► navigate_to
//!                                                     └────────────┘   (once)
//! ```
//!
//! - `Policy`: ordered block rules, allow-list, sensitive and decoy files
//! - `DecoyEngine`: session owner; every desktop event goes through it
//! - `DecoyTerminal`: async front with the realism delay
//! - `DesktopUi`: the rendering boundary

pub mod classifier;
pub mod commands;
pub mod desktop;
pub mod engine;
pub mod escalation;
pub mod files;
pub mod history;
pub mod policy;
pub mod terminal;
pub mod ui;

pub use classifier::{classify, classify_file, Classification, FileAccess};
pub use commands::{Command, CommandContext, CommandOutput, Effect};
pub use desktop::{App, LogExport, GREETING};
pub use engine::{CommandReport, DecoyEngine, Outcome, Submission, BLOCKED_MESSAGE};
pub use escalation::{Escalation, EscalationState};
pub use history::CommandHistory;
pub use policy::{BlockCategory, BlockRule, Policy};
pub use terminal::DecoyTerminal;
pub use ui::{DesktopUi, NullUi, RecordingUi, UiCall};
