//! Ground-truth function and datasets labeled by querying it.

use rand::Rng;
use tracing::{debug, info};

use crate::common_types::{Label, Point, PointSet, SetId};
use crate::error::{KnnError, Result};
use crate::knn::{build_table, classify, NeighborStrategy, NeighborTable};
use crate::sampler::PointSampler;

/// Random points with random labels. A point's true label is the majority
/// vote of its `oracle_k` nearest ground-truth points.
#[derive(Debug, Clone)]
pub struct GroundTruth {
    set: PointSet,
    oracle_k: usize,
}

impl GroundTruth {
    pub const DEFAULT_ORACLE_K: usize = 3;

    /// Wraps an existing point set, e.g. a hand-built fixture.
    pub fn from_set(set: PointSet, oracle_k: usize) -> Result<Self> {
        if set.is_empty() {
            return Err(KnnError::invalid("ground truth must contain at least one point"));
        }
        if oracle_k == 0 || oracle_k > set.len() {
            return Err(KnnError::invalid(format!(
                "oracle_k must be within 1..={}, got {}",
                set.len(),
                oracle_k
            )));
        }
        Ok(GroundTruth { set, oracle_k })
    }

    pub fn set(&self) -> &PointSet {
        &self.set
    }

    pub fn oracle_k(&self) -> usize {
        self.oracle_k
    }

    /// True labels of `points` plus the table they were voted from.
    pub fn label(&self, query_set: SetId, points: &[Point], strategy: NeighborStrategy) -> Result<(Vec<Label>, NeighborTable)> {
        let table = build_table(query_set, points, &self.set, self.oracle_k, strategy)?;
        let labels = classify(&table, self.set.labels(), self.oracle_k)?;
        Ok((labels, table))
    }
}

/// Points labeled by the ground truth, plus the table used to label them.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    set: PointSet,
    oracle_table: NeighborTable,
    relabeled: usize,
}

impl LabeledDataset {
    pub fn set(&self) -> &PointSet {
        &self.set
    }

    pub fn points(&self) -> &[Point] {
        self.set.points()
    }

    pub fn labels(&self) -> &[Label] {
        self.set.labels()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Neighbor table of this dataset against the ground truth.
    pub fn oracle_table(&self) -> &NeighborTable {
        &self.oracle_table
    }

    /// How many labels were overwritten by noise injection.
    pub fn relabeled(&self) -> usize {
        self.relabeled
    }
}

/// Samples the ground truth and datasets drawn from it.
#[derive(Debug)]
pub struct DatasetGenerator<R> {
    sampler: PointSampler<R>,
    strategy: NeighborStrategy,
}

impl<R: Rng> DatasetGenerator<R> {
    pub fn new(rng: R) -> Self {
        DatasetGenerator { sampler: PointSampler::new(rng), strategy: NeighborStrategy::default() }
    }

    pub fn with_strategy(mut self, strategy: NeighborStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn generate_ground_truth(&mut self, size: usize) -> Result<GroundTruth> {
        self.generate_ground_truth_with_oracle_k(size, GroundTruth::DEFAULT_ORACLE_K)
    }

    pub fn generate_ground_truth_with_oracle_k(&mut self, size: usize, oracle_k: usize) -> Result<GroundTruth> {
        if size == 0 {
            return Err(KnnError::invalid("ground truth size must be greater than 0"));
        }
        let points = self.sampler.sample_points(size);
        let labels = self.sampler.sample_labels(size);
        let set = PointSet::new(points, labels)?;
        info!(size, counts = ?set.label_counts(), "Generated ground truth");
        GroundTruth::from_set(set, oracle_k)
    }

    /// `count` uniform points labeled by `ground_truth`, then noised.
    pub fn generate_labeled_set(
        &mut self,
        count: usize,
        ground_truth: &GroundTruth,
        noise_fraction: f64,
    ) -> Result<LabeledDataset> {
        check_noise_fraction(noise_fraction)?;
        if count == 0 {
            return Err(KnnError::invalid("labeled set count must be greater than 0"));
        }

        let id = SetId::next();
        let points = self.sampler.sample_points(count);
        let (mut labels, oracle_table) = ground_truth.label(id, &points, self.strategy)?;
        let relabeled = inject_noise(&mut labels, noise_fraction, self.sampler.rng_mut())?;
        let set = PointSet::with_id(id, points, labels)?;

        info!(count, noise_fraction, relabeled, counts = ?set.label_counts(), "Generated labeled set");
        Ok(LabeledDataset { set, oracle_table, relabeled })
    }
}

pub(crate) fn check_noise_fraction(noise_fraction: f64) -> Result<()> {
    if !noise_fraction.is_finite() || !(0.0..=1.0).contains(&noise_fraction) {
        return Err(KnnError::invalid(format!(
            "noise_fraction must be within [0, 1], got {}",
            noise_fraction
        )));
    }
    Ok(())
}

/// Replaces each label with a fresh uniform draw with probability `noise_fraction`.
///
/// All selection draws happen before any replacement draw. Returns the number
/// of selected positions; with `noise_fraction == 0` no randomness is consumed.
pub fn inject_noise<R: Rng>(labels: &mut [Label], noise_fraction: f64, rng: &mut R) -> Result<usize> {
    check_noise_fraction(noise_fraction)?;
    if noise_fraction == 0.0 {
        return Ok(0);
    }
    let selected: Vec<usize> = (0..labels.len()).filter(|_| rng.gen_bool(noise_fraction)).collect();
    for &i in &selected {
        labels[i] = Label::from(rng.gen_bool(0.5));
    }
    debug!(selected = selected.len(), "Injected label noise");
    Ok(selected.len())
}

/// Largest grid `decision_grid` will build (a 4096 × 4096 grid).
pub const MAX_GRID_POINTS: usize = 1 << 24;

/// `resolution` evenly spaced values over [0, 1], endpoints included.
fn linspace(resolution: usize) -> Vec<f64> {
    if resolution == 1 {
        return vec![0.0];
    }
    let step = 1.0 / (resolution - 1) as f64;
    (0..resolution).map(|i| i as f64 * step).collect()
}

/// Labels a `resolution × resolution` grid over the unit square by majority
/// vote of `k` neighbors in `reference`.
///
/// Point `i * resolution + j` is `(x_i, y_j)`.
pub fn decision_grid(
    resolution: usize,
    reference: &PointSet,
    k: usize,
    strategy: NeighborStrategy,
) -> Result<PointSet> {
    if resolution == 0 {
        return Err(KnnError::invalid("grid resolution must be greater than 0"));
    }
    let total = resolution
        .checked_mul(resolution)
        .filter(|&n| n <= MAX_GRID_POINTS)
        .ok_or_else(|| KnnError::invalid(format!("grid resolution {} is too large", resolution)))?;
    let axis = linspace(resolution);
    let mut points: Vec<Point> = Vec::with_capacity(total);
    points.extend(axis.iter().flat_map(|&x| axis.iter().map(move |&y| [x, y])));

    let id = SetId::next();
    let table = build_table(id, &points, reference, k, strategy)?;
    let labels = classify(&table, reference.labels(), k)?;
    PointSet::with_id(id, points, labels)
}
