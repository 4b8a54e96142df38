//! Accuracy sweeps over k using one cached neighbor table.

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common_types::{Label, PointSet};
use crate::config::ExperimentConfig;
use crate::dataset::{decision_grid, DatasetGenerator, GroundTruth, LabeledDataset};
use crate::error::{KnnError, Result};
use crate::knn::{accuracy, classify, compute_neighbors, predict_uncached, NeighborStrategy, NeighborTable};
use crate::sampler::experiment_rng;

/// Accuracy of one k, and how long producing it took.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SweepRecord {
    pub k: usize,
    pub accuracy: f64,
    pub elapsed: Duration,
}

/// Test-set accuracy of a k-NN classifier trained on a fixed training set.
///
/// The test-vs-train table is built once, `k_max` wide; every `evaluate(k)`
/// only re-slices it.
#[derive(Debug, Clone)]
pub struct EvaluationLoop {
    table: NeighborTable,
    train_labels: Vec<Label>,
    test_labels: Vec<Label>,
}

impl EvaluationLoop {
    pub fn new(train: &PointSet, test: &PointSet, k_max: usize, strategy: NeighborStrategy) -> Result<Self> {
        let table = compute_neighbors(test, train, k_max, strategy)?;
        Self::from_table(table, train, test)
    }

    /// Reuses a table already built for `test` against `train`.
    ///
    /// Fails if the table was built for any other pair of sets.
    pub fn from_table(table: NeighborTable, train: &PointSet, test: &PointSet) -> Result<Self> {
        if !table.is_for(test.id(), train.id()) {
            return Err(KnnError::invalid(
                "neighbor table was not built for this (test, train) pair",
            ));
        }
        Ok(EvaluationLoop {
            table,
            train_labels: train.labels().to_vec(),
            test_labels: test.labels().to_vec(),
        })
    }

    pub fn table(&self) -> &NeighborTable {
        &self.table
    }

    /// Largest k this loop can evaluate.
    pub fn k_max(&self) -> usize {
        self.table.k_max()
    }

    pub fn predict(&self, k: usize) -> Result<Vec<Label>> {
        classify(&self.table, &self.train_labels, k)
    }

    /// Fraction of test points whose prediction matches their label, in [0, 1].
    pub fn evaluate(&self, k: usize) -> Result<f64> {
        let predicted = self.predict(k)?;
        accuracy(&predicted, &self.test_labels)
    }

    /// Evaluates every k in order. All ks are checked before any is evaluated.
    pub fn sweep<I>(&self, ks: I) -> Result<Vec<SweepRecord>>
    where
        I: IntoIterator<Item = usize>,
    {
        let ks: Vec<usize> = ks.into_iter().collect();
        check_ks(&ks, self.k_max())?;
        ks.into_iter()
            .map(|k| {
                let start = Instant::now();
                let accuracy = self.evaluate(k)?;
                let elapsed = start.elapsed();
                info!(k, accuracy, elapsed_us = elapsed.as_micros() as u64, "Evaluated k");
                Ok(SweepRecord { k, accuracy, elapsed })
            })
            .collect()
    }
}

fn check_ks(ks: &[usize], k_max: usize) -> Result<()> {
    match ks.iter().find(|&&k| k == 0 || k > k_max) {
        Some(&k) => Err(KnnError::invalid(format!("k must be within 1..={}, got {}", k_max, k))),
        None => Ok(()),
    }
}

/// Ground truth, training and test sets, and the cached evaluation table.
#[derive(Debug)]
pub struct Experiment {
    config: ExperimentConfig,
    ground_truth: GroundTruth,
    train: LabeledDataset,
    test: LabeledDataset,
    evaluation: EvaluationLoop,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        let mut generator = DatasetGenerator::new(experiment_rng(config.seed)).with_strategy(config.strategy);

        let ground_truth = generator.generate_ground_truth_with_oracle_k(config.ground_truth_size, config.oracle_k)?;
        let train = generator.generate_labeled_set(config.train_count, &ground_truth, config.noise_fraction)?;
        let test = generator.generate_labeled_set(config.test_count, &ground_truth, config.noise_fraction)?;
        let evaluation = EvaluationLoop::new(train.set(), test.set(), config.k_max, config.strategy)?;

        info!(
            train = train.len(),
            test = test.len(),
            k_max = evaluation.k_max(),
            train_counts = ?train.set().label_counts(),
            "Experiment ready"
        );
        Ok(Experiment { config, ground_truth, train, test, evaluation })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn ground_truth(&self) -> &GroundTruth {
        &self.ground_truth
    }

    pub fn train(&self) -> &LabeledDataset {
        &self.train
    }

    pub fn test(&self) -> &LabeledDataset {
        &self.test
    }

    pub fn evaluation(&self) -> &EvaluationLoop {
        &self.evaluation
    }

    pub fn evaluate(&self, k: usize) -> Result<f64> {
        self.evaluation.evaluate(k)
    }

    pub fn sweep<I>(&self, ks: I) -> Result<Vec<SweepRecord>>
    where
        I: IntoIterator<Item = usize>,
    {
        self.evaluation.sweep(ks)
    }

    /// Same sweep, rebuilding the neighbor table for every k.
    pub fn reference_sweep<I>(&self, ks: I) -> Result<Vec<SweepRecord>>
    where
        I: IntoIterator<Item = usize>,
    {
        let ks: Vec<usize> = ks.into_iter().collect();
        check_ks(&ks, self.evaluation.k_max())?;
        ks.into_iter()
            .map(|k| {
                let start = Instant::now();
                let predicted = predict_uncached(self.test.points(), self.train.set(), k, self.config.strategy)?;
                let accuracy = accuracy(&predicted, self.test.labels())?;
                Ok(SweepRecord { k, accuracy, elapsed: start.elapsed() })
            })
            .collect()
    }

    /// Unit-square grid labeled by the trained classifier with `k` neighbors.
    pub fn decision_grid(&self, resolution: usize, k: usize) -> Result<PointSet> {
        decision_grid(resolution, self.train.set(), k, self.config.strategy)
    }

    /// Unit-square grid labeled by the ground-truth function itself.
    pub fn ground_truth_grid(&self, resolution: usize) -> Result<PointSet> {
        decision_grid(resolution, self.ground_truth.set(), self.ground_truth.oracle_k(), self.config.strategy)
    }
}
