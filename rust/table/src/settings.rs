use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use holdem_engine::engine::TableConfig;

/// Names of the environment variables read by [`TableSettings::load`].
pub const CONFIG_ENV: &str = "HOLDEM_CONFIG";
pub const SEED_ENV: &str = "HOLDEM_SEED";
pub const OPPONENTS_ENV: &str = "HOLDEM_OPPONENTS";

pub const MAX_OPPONENTS: usize = 9;

/// Per-table settings. Every field has a default, so a TOML file only needs
/// the values it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableSettings {
    pub small_blind: u32,
    pub big_blind: u32,
    /// Number of computer-controlled seats.
    pub opponents: usize,
    /// Starting stack of every computer seat.
    pub ai_stack: u32,
    pub turn_timeout_ms: u64,
    /// Pause before a computer seat acts.
    pub ai_think_ms: u64,
    pub next_hand_delay_ms: u64,
    pub ai_strategy: String,
    pub seed: Option<u64>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            small_blind: 20,
            big_blind: 40,
            opponents: 3,
            ai_stack: 2_000,
            turn_timeout_ms: 30_000,
            ai_think_ms: 700,
            next_hand_delay_ms: 3_000,
            ai_strategy: "baseline".to_string(),
            seed: None,
        }
    }
}

impl TableSettings {
    /// Validate settings values
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.small_blind == 0 || self.big_blind < self.small_blind {
            return Err(SettingsError::InvalidValue(format!(
                "blinds {}/{} must be positive with big >= small",
                self.small_blind, self.big_blind
            )));
        }

        if self.opponents == 0 || self.opponents > MAX_OPPONENTS {
            return Err(SettingsError::InvalidValue(format!(
                "opponents must be between 1 and {MAX_OPPONENTS}"
            )));
        }

        if self.ai_stack < self.big_blind {
            return Err(SettingsError::InvalidValue(
                "ai_stack must cover at least one big blind".to_string(),
            ));
        }

        if self.turn_timeout_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "turn_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.ai_strategy.is_empty() {
            return Err(SettingsError::InvalidValue(
                "ai_strategy cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            small_blind: self.small_blind,
            big_blind: self.big_blind,
        }
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_ms)
    }

    pub fn ai_think(&self) -> Duration {
        Duration::from_millis(self.ai_think_ms)
    }

    pub fn next_hand_delay(&self) -> Duration {
        Duration::from_millis(self.next_hand_delay_ms)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Defaults, then the file named by `HOLDEM_CONFIG`, then the
    /// `HOLDEM_SEED` / `HOLDEM_OPPONENTS` overrides.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    pub fn load_with<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup(CONFIG_ENV).filter(|p| !p.is_empty()) {
            Some(path) => {
                let s = std::fs::read_to_string(path)?;
                toml::from_str(&s)?
            }
            None => Self::default(),
        };
        settings.apply_overrides(lookup)?;
        settings.validate()?;
        Ok(settings)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup(SEED_ENV).filter(|s| !s.is_empty()) {
            self.seed = Some(
                seed.parse()
                    .map_err(|_| SettingsError::InvalidValue(format!("invalid seed: {seed}")))?,
            );
        }
        if let Some(count) = lookup(OPPONENTS_ENV).filter(|s| !s.is_empty()) {
            self.opponents = count.parse().map_err(|_| {
                SettingsError::InvalidValue(format!("invalid opponent count: {count}"))
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}
