// Pipeline stages, leaves first
pub mod common_types;
pub mod error;
pub mod config;
pub mod sampler;
pub mod knn;
pub mod dataset;
pub mod evaluation;

#[cfg(feature = "python")]
mod python;

pub use common_types::{Label, LabelCounts, Point, PointSet, SetId};
pub use config::ExperimentConfig;
pub use dataset::{decision_grid, inject_noise, DatasetGenerator, GroundTruth, LabeledDataset};
pub use error::{KnnError, Result};
pub use evaluation::{EvaluationLoop, Experiment, SweepRecord};
pub use knn::{accuracy, classify, compute_neighbors, predict_uncached, NeighborStrategy, NeighborTable};
pub use sampler::{experiment_rng, ExperimentRng, PointSampler};
