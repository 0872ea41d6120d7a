//! Decoy engine
//!
//! Owns one session: its counters, cwd, ledger and escalation state. Every
//! UI event lands here, is classified, logged, counted, and may trip the
//! one-shot lockdown.
//!
//! A terminal submission is split in two so the async wrapper can sleep in
//! between: [`DecoyEngine::begin`] records the attempt, and
//! [`DecoyEngine::complete`] classifies and dispatches it.

use std::sync::Arc;

use chrono::Utc;
use lure_config::LureConfig;
use lure_core::{
    path, payload, EventKind, LockdownPayload, Result, Session, SessionState, ViolationCounters,
    ViolationKind, VirtualFilesystem,
};
use lure_ledger::{keys, KvStore, SessionLedger};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::classifier::{classify, Classification};
use crate::commands::{Command, CommandContext, Effect};
use crate::escalation::{self, Escalation, EscalationState};
use crate::history::CommandHistory;
use crate::policy::Policy;
use crate::ui::DesktopUi;

/// Shown for any input caught by a block rule
pub const BLOCKED_MESSAGE: &str = "Blocked: command not permitted in this environment.\n";

/// What happened to one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Empty input
    Ignored,
    Blocked { rule: String },
    Unrecognized { base: String },
    Executed { command: Command },
    /// Allowed command that touched a sensitive file
    UnauthorizedFile { target: String },
}

/// Result of a terminal submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    pub outcome: Outcome,
    /// Text rendered to the terminal for this submission
    pub output: String,
    /// Set only on the submission that tripped lockdown
    pub lockdown: Option<LockdownPayload>,
}

impl CommandReport {
    pub fn ignored() -> Self {
        Self {
            outcome: Outcome::Ignored,
            output: String::new(),
            lockdown: None,
        }
    }
}

/// A recorded, not yet classified, submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    input: String,
}

impl Submission {
    pub fn input(&self) -> &str {
        &self.input
    }
}

pub struct DecoyEngine<U: DesktopUi> {
    pub(crate) config: LureConfig,
    pub(crate) policy: Policy,
    pub(crate) fs: VirtualFilesystem,
    pub(crate) state: SessionState,
    pub(crate) ledger: SessionLedger,
    pub(crate) escalation: Escalation,
    pub(crate) store: Arc<dyn KvStore>,
    pub(crate) history: CommandHistory,
    pub(crate) ui: U,
    pub(crate) start_menu_open: bool,
}

impl<U: DesktopUi> DecoyEngine<U> {
    /// Fresh session on the stock workstation tree
    pub fn new(config: LureConfig, store: Arc<dyn KvStore>, ui: U) -> Result<Self> {
        let fs = VirtualFilesystem::workstation();
        let state = SessionState::new(Session::new(fs.root()));
        Self::build(config, store, ui, fs, state)
    }

    /// Pick up a persisted session; unknown ids start clean under that id
    pub fn resume(
        config: LureConfig,
        store: Arc<dyn KvStore>,
        ui: U,
        session_id: &str,
    ) -> Result<Self> {
        let fs = VirtualFilesystem::workstation();
        let state = match store.get(&keys::state_key(session_id)) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(session = %session_id, error = %e, "discarding unreadable session state");
                SessionState::new(Session::with_id(session_id, fs.root()))
            }),
            Ok(None) => SessionState::new(Session::with_id(session_id, fs.root())),
            Err(e) => return Err(e),
        };
        Self::build(config, store, ui, fs, state)
    }

    fn build(
        config: LureConfig,
        store: Arc<dyn KvStore>,
        ui: U,
        fs: VirtualFilesystem,
        state: SessionState,
    ) -> Result<Self> {
        config.validate()?;
        let policy = Policy::with_extra_patterns(&config.extra_block_patterns)?;
        let session_id = state.session.id().to_string();
        let escalation = Escalation::restore(config.threshold, store.as_ref(), &session_id)?;
        let ledger = SessionLedger::open(store.clone(), session_id.as_str(), config.log_prefix.as_str());

        info!(
            session = %session_id,
            threshold = config.threshold,
            locked_down = escalation.is_locked_down(),
            "decoy session ready"
        );

        Ok(Self {
            config,
            policy,
            fs,
            state,
            ledger,
            escalation,
            store,
            history: CommandHistory::new(),
            ui,
            start_menu_open: false,
        })
    }

    /// Record a terminal submission: echo, history, counter and log.
    /// Empty input is dropped and yields `None`.
    pub fn begin(&mut self, raw: &str) -> Option<Submission> {
        let input = raw.trim();
        if input.is_empty() {
            return None;
        }

        let prompt = self.prompt();
        self.ui.echo_input(&prompt, input);
        self.history.push(input);
        self.state.counters.record_terminal_command();

        let cwd = self.state.session.cwd.clone();
        self.log(EventKind::TerminalCommand, payload(json!({ "cmd": input, "cwd": cwd })));
        self.save_state();

        Some(Submission {
            input: input.to_string(),
        })
    }

    /// Classify and dispatch a submission recorded by `begin`
    pub fn complete(&mut self, submission: Submission) -> CommandReport {
        let input = submission.input;
        let classification = classify(&input, &self.policy);
        debug!(session = %self.state.session.id(), input = %input, ?classification, "classified");

        match classification {
            Classification::Empty => CommandReport::ignored(),
            Classification::Blocked { rule, category } => {
                self.log(
                    EventKind::BlockedCommand,
                    payload(json!({
                        "cmd": input,
                        "reason": "pattern_match",
                        "rule": rule,
                        "category": category.name(),
                    })),
                );
                self.ui.render_output(BLOCKED_MESSAGE);
                self.state.last_command = Some(input.clone());
                let lockdown = self.record_violation(
                    ViolationKind::BlockedCommand,
                    payload(json!({ "cmd": input })),
                );

                CommandReport {
                    outcome: Outcome::Blocked { rule },
                    output: BLOCKED_MESSAGE.to_string(),
                    lockdown,
                }
            }
            Classification::Unrecognized { base } => {
                let output = format!("'{}' is not recognized. Type 'help'.\n", base);
                self.ui.render_output(&output);
                CommandReport {
                    outcome: Outcome::Unrecognized { base },
                    output,
                    lockdown: None,
                }
            }
            Classification::Allowed { command, args } => self.dispatch(command, &args, &input),
        }
    }

    /// `begin` then `complete`, without the realism delay
    pub fn execute(&mut self, raw: &str) -> CommandReport {
        match self.begin(raw) {
            Some(submission) => self.complete(submission),
            None => CommandReport::ignored(),
        }
    }

    fn dispatch(&mut self, command: Command, args: &[String], input: &str) -> CommandReport {
        let home = self.fs.root().to_string();
        let ctx = CommandContext {
            input,
            cwd: &self.state.session.cwd,
            home: &home,
            user: &self.config.user,
            hostname: &self.config.hostname,
            fs: &self.fs,
            policy: &self.policy,
        };
        let result = command.run(args, &ctx);

        if !result.text.is_empty() {
            self.ui.render_output(&result.text);
        }

        let mut outcome = Outcome::Executed { command };
        let mut lockdown = None;

        for effect in result.effects {
            match effect {
                Effect::ChangeDirectory(next) => self.change_directory(next),
                Effect::ClearScreen => self.ui.clear_output(),
                Effect::SensitiveFile { target } => {
                    lockdown = self.flag_sensitive(&target).or(lockdown);
                    outcome = Outcome::UnauthorizedFile { target };
                }
            }
        }

        CommandReport {
            outcome,
            output: result.text,
            lockdown,
        }
    }

    /// Move cwd; prompt and file browser follow
    pub(crate) fn change_directory(&mut self, next: String) {
        self.state.session.cwd = next;
        let prompt = self.prompt();
        self.ui.refresh_prompt(&prompt);
        let entries = self.fs.entries(&self.state.session.cwd);
        self.ui.show_folder(&self.state.session.cwd, &entries);
        self.save_state();
    }

    /// Shared sensitive-file path for `cat`/`type` and the file browser
    pub(crate) fn flag_sensitive(&mut self, target: &str) -> Option<LockdownPayload> {
        let cwd = self.state.session.cwd.clone();
        self.log(
            EventKind::AttemptedSensitiveFile,
            payload(json!({ "file": target, "cwd": cwd })),
        );
        self.state.last_file = Some(target.to_string());
        self.record_violation(
            ViolationKind::UnauthorizedFile,
            payload(json!({ "file": target, "path": cwd })),
        )
    }

    /// Count one violation, log it, then check the threshold
    fn record_violation(
        &mut self,
        kind: ViolationKind,
        detail: Map<String, Value>,
    ) -> Option<LockdownPayload> {
        self.state.counters.record_violation(kind);

        let counters = self.state.counters;
        let mut data = payload(json!({
            "kind": kind.name(),
            "unauthorizedFileAttempts": counters.unauthorized_file_attempts(),
            "blockedCommandAttempts": counters.blocked_command_attempts(),
            "terminalCommandAttempts": counters.terminal_command_attempts(),
            "totalViolations": counters.total_violations(),
        }));
        data.extend(detail);
        self.log(EventKind::Violation, data);
        self.save_state();

        self.check_threshold()
    }

    fn check_threshold(&mut self) -> Option<LockdownPayload> {
        let total = self.state.counters.total_violations();
        if !self.escalation.try_lock(total) {
            return None;
        }

        let capture = LockdownPayload::capture(
            &self.state,
            &self.config.capture_id,
            &self.config.location,
            Utc::now(),
            &mut rand::thread_rng(),
        );

        if let Err(e) = escalation::persist_lockdown(self.store.as_ref(), &capture) {
            warn!(session = %capture.session_id, error = %e, "lockdown flag not persisted");
        }

        let data = serde_json::to_value(&capture).map(payload).unwrap_or_default();
        self.log(EventKind::LockdownRedirect, data);

        info!(
            session = %capture.session_id,
            total_violations = capture.total_violations,
            url = %self.config.lockdown_url,
            "violation threshold reached, locking down"
        );
        self.ui.navigate_to(&self.config.lockdown_url);

        Some(capture)
    }

    /// Append to the ledger and keep an open log view current
    pub(crate) fn log(&mut self, event: EventKind, data: Map<String, Value>) {
        self.ledger.record(event, data);
        if self.ledger.is_view_open() {
            let rendered = self.ledger.render();
            self.ui.render_log_view(&rendered);
        }
    }

    fn save_state(&self) {
        let key = keys::state_key(self.state.session.id());
        let written = serde_json::to_string(&self.state)
            .map_err(lure_core::Error::from)
            .and_then(|json| self.store.set(&key, &json));

        if let Err(e) = written {
            warn!(session = %self.state.session.id(), error = %e, "session state not persisted");
        }
    }

    /// `user@host:~/Documents$`
    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$",
            self.config.user,
            self.config.hostname,
            path::shorten(&self.state.session.cwd, self.fs.root())
        )
    }

    pub fn session(&self) -> &Session {
        &self.state.session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn counters(&self) -> &ViolationCounters {
        &self.state.counters
    }

    pub fn cwd(&self) -> &str {
        &self.state.session.cwd
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    pub fn config(&self) -> &LureConfig {
        &self.config
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn filesystem(&self) -> &VirtualFilesystem {
        &self.fs
    }

    pub fn escalation_state(&self) -> EscalationState {
        self.escalation.state()
    }

    pub fn is_locked_down(&self) -> bool {
        self.escalation.is_locked_down()
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }
}
