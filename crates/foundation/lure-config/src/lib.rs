//! Lure configuration
//!
//! YAML file (default `~/.config/lure/config.yaml`) with environment
//! overrides:
//!
//! ```text
//! LURE_THRESHOLD      violations before lockdown (default: 5)
//! LURE_STATE_DIR      where session state and logs are written
//! LURE_LOCKDOWN_URL   capture view target
//! LURE_DELAY_MS       realism delay as `min-max` (default: 60-220)
//! ```

use std::path::{Path, PathBuf};

use lure_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Runtime configuration for one decoy deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LureConfig {
    /// Violations needed to trip lockdown
    pub threshold: u32,
    /// Where the visitor is sent on lockdown
    pub lockdown_url: String,
    /// Fixed id shown on the capture view
    pub capture_id: String,
    /// Location string shown on the capture view
    pub location: String,
    /// Decoy account name
    pub user: String,
    /// Decoy machine name
    pub hostname: String,
    /// Realism delay lower bound
    pub delay_min_ms: u64,
    /// Realism delay upper bound
    pub delay_max_ms: u64,
    /// Prefix of the persisted log key and export file name
    pub log_prefix: String,
    /// Directory for persisted state; `None` uses the platform data dir
    pub state_dir: Option<PathBuf>,
    /// Extra block regexes, checked after the built-in rules
    pub extra_block_patterns: Vec<String>,
}

impl Default for LureConfig {
    fn default() -> Self {
        Self {
            threshold: 5,
            lockdown_url: "lockdown/index.html".to_string(),
            capture_id: "VF_DECOY_2026_001".to_string(),
            location: "Andheri, IN".to_string(),
            user: "guest".to_string(),
            hostname: "workstation".to_string(),
            delay_min_ms: 60,
            delay_max_ms: 220,
            log_prefix: "honeypot_logs".to_string(),
            state_dir: None,
            extra_block_patterns: Vec::new(),
        }
    }
}

impl LureConfig {
    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// `~/.config/lure/config.yaml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lure")
            .join("config.yaml")
    }

    /// Load from the default path if it exists, else defaults; env applied last
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load(&path)?
        } else {
            Self::default()
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Directory for persisted state, resolved
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("lure")
        })
    }

    /// Apply `LURE_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("LURE_THRESHOLD") {
            self.threshold = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("LURE_THRESHOLD is not a number: {}", raw)))?;
        }
        if let Some(dir) = lookup("LURE_STATE_DIR") {
            self.state_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = lookup("LURE_LOCKDOWN_URL") {
            self.lockdown_url = url;
        }
        if let Some(raw) = lookup("LURE_DELAY_MS") {
            let (min, max) = parse_delay(&raw)?;
            self.delay_min_ms = min;
            self.delay_max_ms = max;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 {
            return Err(Error::Config("threshold must be at least 1".to_string()));
        }
        if self.delay_min_ms > self.delay_max_ms {
            return Err(Error::Config(format!(
                "delay_min_ms ({}) exceeds delay_max_ms ({})",
                self.delay_min_ms, self.delay_max_ms
            )));
        }
        if self.lockdown_url.trim().is_empty() {
            return Err(Error::Config("lockdown_url is empty".to_string()));
        }
        Ok(())
    }
}

/// `"60-220"` or a single `"100"`
fn parse_delay(raw: &str) -> Result<(u64, u64)> {
    let bad = || Error::Config(format!("LURE_DELAY_MS must be `min-max`: {}", raw));
    match raw.split_once('-') {
        Some((min, max)) => Ok((
            min.trim().parse().map_err(|_| bad())?,
            max.trim().parse().map_err(|_| bad())?,
        )),
        None => {
            let fixed = raw.trim().parse().map_err(|_| bad())?;
            Ok((fixed, fixed))
        }
    }
}
