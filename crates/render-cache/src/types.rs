//! Cache types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Input document and rendered output belonging to one render request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPair {
    pub key: String,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// A tracked artifact and the time it was registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a single eviction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Entries tracked when the sweep started
    pub scanned: usize,
    /// Expired files removed from disk
    pub evicted: usize,
    /// Expired entries whose file was already gone
    pub already_absent: usize,
    /// Expired files that could not be removed (entry cleared anyway)
    pub failed: usize,
}

impl SweepReport {
    /// Number of registry entries cleared by this sweep
    pub fn cleared(&self) -> usize {
        self.evicted + self.already_absent + self.failed
    }
}

/// Retention policy for the eviction loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionConfig {
    /// Maximum age of an artifact before it becomes eligible for eviction
    pub retention: Duration,
    /// Time between eviction passes
    pub sweep_interval: Duration,
}

impl Default for EvictionConfig {
    fn default() -> Self {
        Self {
            retention: Duration::from_secs(60 * 60),      // 1 hour
            sweep_interval: Duration::from_secs(10 * 60), // 10 minutes
        }
    }
}
