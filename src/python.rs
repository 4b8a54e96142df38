//! Python bindings, so plotting can stay on the Python side.

use pyo3::prelude::*;

use crate::common_types::PointSet;
use crate::config::ExperimentConfig;
use crate::error::KnnError;
use crate::evaluation::Experiment;
use crate::knn::NeighborStrategy;

impl From<KnnError> for PyErr {
    fn from(err: KnnError) -> Self {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
    }
}

/// Python-side counts are signed; negatives are rejected rather than wrapped.
fn to_count(name: &str, value: i64) -> Result<usize, KnnError> {
    usize::try_from(value)
        .map_err(|_| KnnError::InvalidArgument(format!("{} must not be negative, got {}", name, value)))
}

/// `(points, labels)` with labels as 0/1 integers.
fn to_py_data(set: &PointSet) -> (Vec<(f64, f64)>, Vec<u8>) {
    let points = set.points().iter().map(|p| (p[0], p[1])).collect();
    let labels = set.labels().iter().map(|l| l.as_u8()).collect();
    (points, labels)
}

/// Python-friendly representation of NeighborStrategy
#[pyclass(name = "NeighborStrategy")]
#[derive(Clone)]
enum PyNeighborStrategy {
    FullSort,
    BoundedHeap,
}

impl From<PyNeighborStrategy> for NeighborStrategy {
    fn from(val: PyNeighborStrategy) -> Self {
        match val {
            PyNeighborStrategy::FullSort => NeighborStrategy::FullSort,
            PyNeighborStrategy::BoundedHeap => NeighborStrategy::BoundedHeap,
        }
    }
}

#[pyclass(name = "KnnExperiment")]
struct PyKnnExperiment {
    experiment: Experiment,
}

#[pymethods]
impl PyKnnExperiment {
    #[new]
    #[pyo3(signature = (
        ground_truth_size = 100,
        train_count = 1000,
        test_count = 4000,
        k_max = 200,
        noise_fraction = 0.2,
        seed = None,
        strategy = None
    ))]
    fn new(
        ground_truth_size: i64,
        train_count: i64,
        test_count: i64,
        k_max: i64,
        noise_fraction: f64,
        seed: Option<u64>,
        strategy: Option<PyNeighborStrategy>,
    ) -> PyResult<Self> {
        let mut config = ExperimentConfig::default()
            .with_ground_truth_size(to_count("ground_truth_size", ground_truth_size)?)
            .with_train_count(to_count("train_count", train_count)?)
            .with_test_count(to_count("test_count", test_count)?)
            .with_k_max(to_count("k_max", k_max)?)
            .with_noise_fraction(noise_fraction)
            .with_strategy(strategy.map(Into::into).unwrap_or_default());
        config.seed = seed;
        Ok(PyKnnExperiment { experiment: Experiment::new(config)? })
    }

    fn classify_and_evaluate(&self, k: i64) -> PyResult<f64> {
        Ok(self.experiment.evaluate(to_count("k", k)?)?)
    }

    /// `[(k, accuracy, elapsed_seconds), ...]`
    fn sweep(&self, ks: Vec<i64>) -> PyResult<Vec<(usize, f64, f64)>> {
        let ks = ks.into_iter().map(|k| to_count("k", k)).collect::<Result<Vec<_>, _>>()?;
        let records = self.experiment.sweep(ks)?;
        Ok(records.iter().map(|r| (r.k, r.accuracy, r.elapsed.as_secs_f64())).collect())
    }

    fn reference_sweep(&self, ks: Vec<i64>) -> PyResult<Vec<(usize, f64, f64)>> {
        let ks = ks.into_iter().map(|k| to_count("k", k)).collect::<Result<Vec<_>, _>>()?;
        let records = self.experiment.reference_sweep(ks)?;
        Ok(records.iter().map(|r| (r.k, r.accuracy, r.elapsed.as_secs_f64())).collect())
    }

    fn ground_truth(&self) -> (Vec<(f64, f64)>, Vec<u8>) {
        to_py_data(self.experiment.ground_truth().set())
    }

    fn train_data(&self) -> (Vec<(f64, f64)>, Vec<u8>) {
        to_py_data(self.experiment.train().set())
    }

    fn test_data(&self) -> (Vec<(f64, f64)>, Vec<u8>) {
        to_py_data(self.experiment.test().set())
    }

    fn decision_grid(&self, resolution: i64, k: i64) -> PyResult<(Vec<(f64, f64)>, Vec<u8>)> {
        let grid = self.experiment.decision_grid(to_count("resolution", resolution)?, to_count("k", k)?)?;
        Ok(to_py_data(&grid))
    }

    fn ground_truth_grid(&self, resolution: i64) -> PyResult<(Vec<(f64, f64)>, Vec<u8>)> {
        let grid = self.experiment.ground_truth_grid(to_count("resolution", resolution)?)?;
        Ok(to_py_data(&grid))
    }
}

/// A Python module implemented in Rust. The name must match `lib.name` in Cargo.toml.
#[pymodule]
fn knn_sweep(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyNeighborStrategy>()?;
    m.add_class::<PyKnnExperiment>()?;
    Ok(())
}
