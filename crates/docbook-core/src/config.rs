//! Client configuration, stored as JSON next to the app data.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Default slot length in minutes.
pub const DEFAULT_SLOT_INTERVAL_MINUTES: u32 = 15;

/// Tunables for the booking flow and backend client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocBookConfig {
    /// Length of each bookable slot
    pub slot_interval_minutes: u32,
    /// Per-request timeout for backend calls
    pub request_timeout_secs: u64,
    /// Extra attempts for idempotent reads after a transient failure
    pub read_retries: u32,
    /// Base URL of the appointment backend
    pub api_base_url: String,
}

impl Default for DocBookConfig {
    fn default() -> Self {
        Self {
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
            request_timeout_secs: 10,
            read_retries: 1,
            api_base_url: "http://localhost:8080/api".into(),
        }
    }
}

impl DocBookConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config = Self::from_json(&contents)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Parse and validate a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.slot_interval_minutes == 0 {
            bail!("slot_interval_minutes must be positive");
        }
        if self.slot_interval_minutes > 24 * 60 {
            bail!("slot_interval_minutes must not exceed one day");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be positive");
        }
        if self.api_base_url.trim().is_empty() {
            bail!("api_base_url must not be empty");
        }
        Ok(())
    }
}
