//! Configuration for the equity simulator.

use crate::error::{PokerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Trials per RNG stream when the batch count is not given.
const TRIALS_PER_BATCH: u64 = 1_000;

/// Upper bound on derived batch counts.
const MAX_DERIVED_BATCHES: u64 = 256;

/// Configuration for a Monte Carlo equity run.
///
/// # Example
/// ```
/// use holdem_equity::equity::SimulationConfig;
///
/// let config = SimulationConfig::default().with_trials(20_000).with_seed(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.batch_count(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of random board completions to deal.
    pub trials: u64,

    /// Random seed for reproducibility.
    ///
    /// With a seed and a fixed batch count the result does not depend on how
    /// many threads ran the batches. If `None`, each batch seeds from entropy.
    pub seed: Option<u64>,

    /// Number of worker threads. `None` uses the global rayon pool.
    pub num_threads: Option<usize>,

    /// Number of independent RNG streams the trials are split into.
    ///
    /// `None` derives one batch per thousand trials (at least 1, at most 256).
    pub batches: Option<usize>,

    /// Stop dealing new trials after this many milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            seed: None,
            num_threads: None,
            batches: None,
            time_limit_ms: None,
        }
    }
}

impl SimulationConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the trial count.
    pub fn with_trials(mut self, trials: u64) -> Self {
        self.trials = trials;
        self
    }

    /// Builder method: set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set the number of threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Builder method: set the number of RNG batches.
    pub fn with_batches(mut self, batches: usize) -> Self {
        self.batches = Some(batches);
        self
    }

    /// Builder method: set a wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_ms = Some(limit.as_millis() as u64);
        self
    }

    /// Wall-clock limit, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Number of batches the trials are split into, never more than `trials`.
    pub fn batch_count(&self) -> usize {
        let derived = self
            .batches
            .map(|b| b as u64)
            .unwrap_or_else(|| (self.trials / TRIALS_PER_BATCH).clamp(1, MAX_DERIVED_BATCHES));
        derived.clamp(1, self.trials.max(1)) as usize
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(PokerError::InvalidConfig {
                detail: "trials must be positive".to_string(),
            });
        }
        if self.num_threads == Some(0) {
            return Err(PokerError::InvalidConfig {
                detail: "num_threads must be positive".to_string(),
            });
        }
        if self.batches == Some(0) {
            return Err(PokerError::InvalidConfig {
                detail: "batches must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Split `total` items into `n` contiguous batch sizes.
///
/// The first `total % n` batches get one extra item, so sizes differ by at
/// most one and sum to `total`.
pub fn batch_sizes(total: u64, n: usize) -> Vec<u64> {
    let n = n.max(1) as u64;
    let (k, m) = (total / n, total % n);
    (0..n).map(|i| k + u64::from(i < m)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.trials, 10_000);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_count(), 10);
    }

    #[test]
    fn test_builders() {
        let config = SimulationConfig::new()
            .with_trials(500)
            .with_seed(42)
            .with_threads(2)
            .with_batches(8)
            .with_time_limit(Duration::from_secs(3));
        assert_eq!(config.trials, 500);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.num_threads, Some(2));
        assert_eq!(config.batch_count(), 8);
        assert_eq!(config.time_limit(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_batch_count_bounds() {
        assert_eq!(SimulationConfig::new().with_trials(3).batch_count(), 1);
        assert_eq!(
            SimulationConfig::new().with_trials(3).with_batches(10).batch_count(),
            3
        );
        assert_eq!(
            SimulationConfig::new().with_trials(10_000_000).batch_count(),
            256
        );
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            SimulationConfig::new().with_trials(0).validate(),
            Err(PokerError::InvalidConfig { .. })
        ));
        assert!(SimulationConfig::new().with_threads(0).validate().is_err());
        assert!(SimulationConfig::new().with_batches(0).validate().is_err());
    }

    #[test]
    fn test_from_json() {
        let config = SimulationConfig::from_json_str(r#"{"trials": 2000, "seed": 9}"#).unwrap();
        assert_eq!(config.trials, 2000);
        assert_eq!(config.seed, Some(9));
        assert!(config.num_threads.is_none());

        assert!(matches!(
            SimulationConfig::from_json_str(r#"{"trials": 0}"#),
            Err(PokerError::InvalidConfig { .. })
        ));
        assert!(matches!(
            SimulationConfig::from_json_str("{"),
            Err(PokerError::Json(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json_file("/nonexistent/config.json"),
            Err(PokerError::Io(_))
        ));
    }

    #[test]
    fn test_batch_sizes() {
        assert_eq!(batch_sizes(10, 3), vec![4, 3, 3]);
        assert_eq!(batch_sizes(9, 3), vec![3, 3, 3]);
        assert_eq!(batch_sizes(2, 4), vec![1, 1, 0, 0]);
        assert_eq!(batch_sizes(7, 0), vec![7]);
        assert_eq!(batch_sizes(20_000, 20).iter().sum::<u64>(), 20_000);
    }
}
