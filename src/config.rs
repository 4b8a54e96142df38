//! Experiment configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dataset::{check_noise_fraction, GroundTruth};
use crate::error::{KnnError, Result};
use crate::knn::NeighborStrategy;

/// Options recognized by [`crate::Experiment`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExperimentConfig {
    /// Number of points in the ground-truth function.
    pub ground_truth_size: usize,
    pub train_count: usize,
    pub test_count: usize,
    /// Widest neighbor table kept for the sweep; every evaluated k must be <= this.
    pub k_max: usize,
    /// Probability that a generated label is replaced by a fresh random draw.
    pub noise_fraction: f64,
    /// `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Neighbors consulted when labeling points from the ground truth.
    pub oracle_k: usize,
    pub strategy: NeighborStrategy,
}

impl ExperimentConfig {
    pub const DEFAULT_GROUND_TRUTH_SIZE: usize = 100;
    pub const DEFAULT_TRAIN_COUNT: usize = 1000;
    pub const DEFAULT_TEST_COUNT: usize = 4000;
    pub const DEFAULT_K_MAX: usize = 200;
    pub const DEFAULT_NOISE_FRACTION: f64 = 0.2;
    pub const DEFAULT_ORACLE_K: usize = GroundTruth::DEFAULT_ORACLE_K;

    pub fn with_ground_truth_size(mut self, size: usize) -> Self {
        self.ground_truth_size = size;
        self
    }

    pub fn with_train_count(mut self, count: usize) -> Self {
        self.train_count = count;
        self
    }

    pub fn with_test_count(mut self, count: usize) -> Self {
        self.test_count = count;
        self
    }

    pub fn with_k_max(mut self, k_max: usize) -> Self {
        self.k_max = k_max;
        self
    }

    pub fn with_noise_fraction(mut self, noise_fraction: f64) -> Self {
        self.noise_fraction = noise_fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_strategy(mut self, strategy: NeighborStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Rejects configurations that would otherwise fail midway through an experiment.
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("ground_truth_size", self.ground_truth_size),
            ("train_count", self.train_count),
            ("test_count", self.test_count),
            ("k_max", self.k_max),
            ("oracle_k", self.oracle_k),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(KnnError::invalid(format!("{} must be greater than 0", name)));
            }
        }
        if self.oracle_k > self.ground_truth_size {
            return Err(KnnError::invalid(format!(
                "oracle_k ({}) exceeds ground_truth_size ({})",
                self.oracle_k, self.ground_truth_size
            )));
        }
        check_noise_fraction(self.noise_fraction)
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            ground_truth_size: Self::DEFAULT_GROUND_TRUTH_SIZE,
            train_count: Self::DEFAULT_TRAIN_COUNT,
            test_count: Self::DEFAULT_TEST_COUNT,
            k_max: Self::DEFAULT_K_MAX,
            noise_fraction: Self::DEFAULT_NOISE_FRACTION,
            seed: None,
            oracle_k: Self::DEFAULT_ORACLE_K,
            strategy: NeighborStrategy::FullSort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ExperimentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ground_truth_size, 100);
        assert_eq!(config.oracle_k, 3);
        assert_eq!(ExperimentConfig::DEFAULT_ORACLE_K, GroundTruth::DEFAULT_ORACLE_K);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_rejects_zero_counts() {
        let config = ExperimentConfig::default().with_train_count(0);
        assert!(matches!(config.validate(), Err(KnnError::InvalidArgument(_))));
        let config = ExperimentConfig::default().with_k_max(0);
        assert!(matches!(config.validate(), Err(KnnError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_bad_noise_fraction() {
        for bad in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let config = ExperimentConfig::default().with_noise_fraction(bad);
            assert!(config.validate().is_err(), "noise_fraction {} should be rejected", bad);
        }
        assert!(ExperimentConfig::default().with_noise_fraction(1.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_oracle_k_above_ground_truth_size() {
        let config = ExperimentConfig::default().with_ground_truth_size(2);
        assert!(config.validate().is_err());
    }
}
