//! Input classification
//!
//! Pure functions over the raw input and the policy. Total over every string:
//! empty, whitespace, unicode and hostile payloads all land in some variant.

use crate::commands::Command;
use crate::policy::{BlockCategory, Policy};

/// How one terminal submission is treated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Nothing but whitespace; dropped without a trace
    Empty,
    /// Matched a block rule; never dispatched
    Blocked {
        rule: String,
        category: BlockCategory,
    },
    /// Base command is not on the allow-list
    Unrecognized { base: String },
    /// Allow-listed command with its arguments
    Allowed { command: Command, args: Vec<String> },
}

/// Classify one raw terminal submission
pub fn classify(raw: &str, policy: &Policy) -> Classification {
    let input = raw.trim();
    if input.is_empty() {
        return Classification::Empty;
    }

    if let Some(rule) = policy.blocking_rule(input) {
        return Classification::Blocked {
            rule: rule.name.clone(),
            category: rule.category,
        };
    }

    let mut tokens = input.split_whitespace();
    let base = tokens.next().unwrap_or_default().to_lowercase();

    match Command::parse(&base) {
        Some(command) if policy.is_allowed(&base) => Classification::Allowed {
            command,
            args: tokens.map(str::to_string).collect(),
        },
        _ => Classification::Unrecognized { base },
    }
}

/// Result of reading or opening a file, shared by `cat`/`type` and the
/// file browser so both surfaces count violations the same way
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAccess {
    /// Sensitive target: a violation
    Denied,
    /// Known decoy file with canned contents
    Decoy(&'static str),
    /// Nothing to show
    Missing,
}

pub fn classify_file(target: &str, policy: &Policy) -> FileAccess {
    if policy.is_sensitive(target) {
        FileAccess::Denied
    } else if let Some(content) = policy.decoy_content(target) {
        FileAccess::Decoy(content)
    } else {
        FileAccess::Missing
    }
}
