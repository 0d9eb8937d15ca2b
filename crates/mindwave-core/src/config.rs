//! TOML-based application configuration.
//!
//! All gameplay timing constants live here so they can be tuned without
//! touching code: the pacer phase table, the sequence playback windows and
//! advance delay, the reflex arming window and cooldown.
//!
//! Configuration is stored at `~/.config/mindwave/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// A named breathing phase with its duration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseConfig {
    pub name: String,
    pub duration_ms: u64,
}

/// Breathing pacer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacerConfig {
    /// Period of the progress tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Ordered phase table, cycled indefinitely.
    #[serde(default = "default_phases")]
    pub phases: Vec<PhaseConfig>,
}

/// Memory-game configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// How long each symbol stays lit during playback.
    #[serde(default = "default_symbol_active_ms")]
    pub symbol_active_ms: u64,
    /// Dark gap between played-back symbols.
    #[serde(default = "default_symbol_gap_ms")]
    pub symbol_gap_ms: u64,
    /// Delay between completing a level and the next one starting.
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
}

/// Reaction-game configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflexConfig {
    /// Inclusive lower bound of the random arming delay.
    #[serde(default = "default_min_arm_delay_ms")]
    pub min_arm_delay_ms: u64,
    /// Exclusive upper bound of the random arming delay.
    #[serde(default = "default_max_arm_delay_ms")]
    pub max_arm_delay_ms: u64,
    /// Cooldown after a click (valid or early) before the next wait.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Latency at or above which a click earns zero points.
    #[serde(default = "default_latency_budget_ms")]
    pub latency_budget_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/mindwave/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pacer: PacerConfig,
    #[serde(default)]
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub reflex: ReflexConfig,
}

// Default functions
fn default_tick_interval_ms() -> u64 {
    100
}
fn default_phases() -> Vec<PhaseConfig> {
    vec![
        PhaseConfig {
            name: "Inhale".into(),
            duration_ms: 4_000,
        },
        PhaseConfig {
            name: "Hold".into(),
            duration_ms: 3_000,
        },
        PhaseConfig {
            name: "Exhale".into(),
            duration_ms: 4_000,
        },
    ]
}
fn default_symbol_active_ms() -> u64 {
    500
}
fn default_symbol_gap_ms() -> u64 {
    250
}
fn default_advance_delay_ms() -> u64 {
    1_000
}
fn default_min_arm_delay_ms() -> u64 {
    2_000
}
fn default_max_arm_delay_ms() -> u64 {
    5_000
}
fn default_cooldown_ms() -> u64 {
    1_500
}
fn default_latency_budget_ms() -> u64 {
    1_000
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            phases: default_phases(),
        }
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            symbol_active_ms: default_symbol_active_ms(),
            symbol_gap_ms: default_symbol_gap_ms(),
            advance_delay_ms: default_advance_delay_ms(),
        }
    }
}

impl Default for ReflexConfig {
    fn default() -> Self {
        Self {
            min_arm_delay_ms: default_min_arm_delay_ms(),
            max_arm_delay_ms: default_max_arm_delay_ms(),
            cooldown_ms: default_cooldown_ms(),
            latency_budget_ms: default_latency_budget_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pacer: PacerConfig::default(),
            sequence: SequenceConfig::default(),
            reflex: ReflexConfig::default(),
        }
    }
}

impl Config {
    /// Path to the config file.
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mindwave")
            .join("config.toml")
    }

    /// Load from disk, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let config: Self =
            toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to disk, creating the parent directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Reject timing values the engines cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pacer.tick_interval_ms == 0 {
            return Err(invalid("pacer.tick_interval_ms", "must be non-zero"));
        }
        if self.pacer.phases.is_empty() {
            return Err(invalid("pacer.phases", "at least one phase is required"));
        }
        if let Some(phase) = self.pacer.phases.iter().find(|p| p.duration_ms == 0) {
            return Err(invalid(
                "pacer.phases",
                &format!("phase '{}' has zero duration", phase.name),
            ));
        }
        if self.sequence.symbol_active_ms == 0 {
            return Err(invalid("sequence.symbol_active_ms", "must be non-zero"));
        }
        if self.reflex.min_arm_delay_ms >= self.reflex.max_arm_delay_ms {
            return Err(invalid(
                "reflex.min_arm_delay_ms",
                "must be less than max_arm_delay_ms",
            ));
        }
        Ok(())
    }

    /// Get a value by dotted key, e.g. `"reflex.cooldown_ms"`.
    pub fn get(&self, key: &str) -> Option<toml::Value> {
        let root = toml::Value::try_from(self).ok()?;
        let mut node = &root;
        for part in key.split('.') {
            node = node.get(part)?;
        }
        Some(node.clone())
    }

    /// Set a value by dotted key. The new value must parse as the same
    /// TOML type as the current one.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let current = self.get(key).ok_or_else(|| ConfigError::InvalidValue {
            key: key.into(),
            message: "unknown key".into(),
        })?;

        let parsed = match current {
            toml::Value::Integer(_) => value
                .parse::<i64>()
                .map(toml::Value::Integer)
                .map_err(|_| invalid(key, "expected an integer"))?,
            toml::Value::Boolean(_) => value
                .parse::<bool>()
                .map(toml::Value::Boolean)
                .map_err(|_| invalid(key, "expected true or false"))?,
            toml::Value::String(_) => toml::Value::String(value.into()),
            _ => return Err(invalid(key, "key is not settable from the CLI")),
        };

        let mut root =
            toml::Value::try_from(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        let mut node = &mut root;
        let parts: Vec<&str> = key.split('.').collect();
        for part in &parts[..parts.len() - 1] {
            node = node
                .get_mut(part)
                .ok_or_else(|| invalid(key, "unknown key"))?;
        }
        match node.as_table_mut() {
            Some(table) => {
                table.insert(parts[parts.len() - 1].to_string(), parsed);
            }
            None => return Err(invalid(key, "unknown key")),
        }

        let updated: Self =
            root.try_into().map_err(|e: toml::de::Error| invalid(key, &e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.into(),
        message: message.into(),
    }
}
