//! Service configuration parsed from environment variables

use render_cache::EvictionConfig;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CACHE_DIR: &str = "./cache";
const DEFAULT_RETENTION_SECS: u64 = 60 * 60;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 10 * 60;
const DEFAULT_RENDERER: &str = "wkhtmltopdf";
const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub cache_dir: PathBuf,
    pub retention: Duration,
    pub sweep_interval: Duration,
    pub renderer_path: PathBuf,
    /// `None` lets the renderer run until it exits on its own
    pub render_timeout: Option<Duration>,
    pub max_body_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            retention: Duration::from_secs(DEFAULT_RETENTION_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            renderer_path: PathBuf::from(DEFAULT_RENDERER),
            render_timeout: Some(Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS)),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServiceConfig {
    /// Parse configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse configuration from an arbitrary variable lookup. Unset or
    /// unparsable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let port = lookup("PORT")
            .and_then(|s| s.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let cache_dir = lookup("CACHE_DIR")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));

        let renderer_path = lookup("WKHTMLTOPDF_PATH")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RENDERER));

        let render_timeout = match number("RENDER_TIMEOUT_SECS", DEFAULT_RENDER_TIMEOUT_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let max_body_bytes = lookup("MAX_BODY_BYTES")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        Self {
            port,
            cache_dir,
            retention: Duration::from_secs(number("CACHE_RETENTION_SECS", DEFAULT_RETENTION_SECS)),
            sweep_interval: Duration::from_secs(number(
                "CACHE_SWEEP_INTERVAL_SECS",
                DEFAULT_SWEEP_INTERVAL_SECS,
            )),
            renderer_path,
            render_timeout,
            max_body_bytes,
        }
    }

    pub fn eviction(&self) -> EvictionConfig {
        EvictionConfig {
            retention: self.retention,
            sweep_interval: self.sweep_interval,
        }
    }
}
