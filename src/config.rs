use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chunking::{CHUNK_MAX_SIZE_WARNING, ChunkSizeChecker};

/// Overrides the configured warning threshold (bytes, must be > 0).
pub const MAX_CHUNK_BYTES_ENV: &str = "CHUNKGUARD_MAX_CHUNK_BYTES";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GuardSettings {
    /// Chunks strictly larger than this many bytes are reported (default: 1 GiB)
    pub max_chunk_bytes: u64,
    /// When set, logs are also written to daily files in this directory
    pub log_dir: Option<PathBuf>,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            max_chunk_bytes: CHUNK_MAX_SIZE_WARNING,
            log_dir: None,
        }
    }
}

impl GuardSettings {
    /// Threshold after applying overrides: explicit value, then
    /// `CHUNKGUARD_MAX_CHUNK_BYTES`, then the stored setting.
    pub fn effective_max_chunk_bytes(&self, explicit: Option<u64>) -> u64 {
        pick_max_chunk_bytes(explicit, env_max_chunk_bytes(), self.max_chunk_bytes)
    }

    pub fn checker(&self, explicit: Option<u64>) -> ChunkSizeChecker {
        ChunkSizeChecker::new(self.effective_max_chunk_bytes(explicit))
    }
}

/// Zero never counts as a threshold; a stored zero falls back to the default.
fn pick_max_chunk_bytes(explicit: Option<u64>, env: Option<u64>, stored: u64) -> u64 {
    [explicit, env, Some(stored)]
        .into_iter()
        .flatten()
        .find(|&v| v > 0)
        .unwrap_or(CHUNK_MAX_SIZE_WARNING)
}

pub fn env_max_chunk_bytes() -> Option<u64> {
    parse_max_chunk_bytes(std::env::var(MAX_CHUNK_BYTES_ENV).ok().as_deref())
}

fn parse_max_chunk_bytes(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&v| v > 0)
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chunkguard")
        .join("config.json")
}

/// Loads settings from the default location.
pub fn load_config() -> Result<GuardSettings> {
    load_config_from(&get_config_path())
}

/// A missing file yields the default settings.
///
/// # Errors
///
/// Returns error if the file exists but cannot be read or parsed. Callers
/// decide whether to fall back to [`GuardSettings::default`].
pub fn load_config_from(path: &Path) -> Result<GuardSettings> {
    if !path.exists() {
        return Ok(GuardSettings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))
}

pub fn save_config(settings: &GuardSettings) -> Result<()> {
    save_config_to(settings, &get_config_path())
}

pub fn save_config_to(settings: &GuardSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;
    Ok(())
}
