use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::RetryConfig;

pub const EVENT_INDEX_URL: &str =
    "http://www.ufcstats.com/statistics/events/completed?page=all";

const DEFAULT_CHECKPOINT_INTERVAL: usize = 500;
const DEFAULT_DELAY_MIN_MS: u64 = 1000;
const DEFAULT_DELAY_MAX_MS: u64 = 2500;

/// Everything one build run needs, threaded explicitly through the
/// pipeline instead of living in globals.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub event_index_url: String,
    pub retry: RetryConfig,
    /// Politeness delay bounds applied before every outbound request.
    pub delay_min: Duration,
    pub delay_max: Duration,
    /// Full-table snapshot is rewritten every this many rows.
    pub checkpoint_interval: usize,
    pub checkpoint_path: PathBuf,
    pub output_path: PathBuf,
    /// Fixed seed for the outcome coin flips; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Optional cap on events processed, for smoke runs.
    pub event_limit: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            event_index_url: EVENT_INDEX_URL.to_string(),
            retry: RetryConfig::default(),
            delay_min: Duration::from_millis(DEFAULT_DELAY_MIN_MS),
            delay_max: Duration::from_millis(DEFAULT_DELAY_MAX_MS),
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            checkpoint_path: PathBuf::from("data/raw/progress.json"),
            output_path: PathBuf::from("data/raw/fights_dataset.json"),
            seed: None,
            event_limit: None,
        }
    }
}

impl PipelineConfig {
    /// Defaults with `MMA_*` environment overrides applied.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(interval) = env_parse::<usize>("MMA_CHECKPOINT_INTERVAL") {
            cfg.checkpoint_interval = interval.max(1);
        }
        if let Some(ms) = env_parse::<u64>("MMA_DELAY_MIN_MS") {
            cfg.delay_min = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("MMA_DELAY_MAX_MS") {
            cfg.delay_max = Duration::from_millis(ms);
        }
        if cfg.delay_max < cfg.delay_min {
            cfg.delay_max = cfg.delay_min;
        }
        cfg
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|val| val.trim().parse().ok())
}
