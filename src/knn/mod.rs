//! Neighbor indexing and majority-vote classification.
//!
//! The expensive step, sorting every reference point by distance from every
//! query point, runs once per (query set, reference set) pair and yields a
//! [`NeighborTable`]. Classifying for any `k <= k_max` then only re-reads a
//! prefix of each row.

pub mod classifier;
pub(crate) mod heap_utils;
pub mod neighbor_table;

use num_traits::{AsPrimitive, Float};
use ordered_float::OrderedFloat;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::common_types::{Label, Point, PointSet, SetId};
use crate::error::{KnnError, Result};
use heap_utils::KBestNeighbors;
pub use classifier::{accuracy, classify};
pub use neighbor_table::NeighborTable;

/// How the sorted neighbor rows are produced. Both yield identical tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NeighborStrategy {
    /// Dense M×N distance matrix, stable argsort of each row, then truncate.
    #[default]
    FullSort,
    /// Per query, keep only the `k_max` best candidates in a bounded heap.
    BoundedHeap,
}

/// Sum of squared coordinate differences.
pub fn squared_euclidean<F: Float>(a: &[F], b: &[F]) -> F {
    a.iter()
        .zip(b.iter())
        .fold(F::zero(), |acc, (x, y)| {
            let diff = *x - *y;
            acc + diff * diff
        })
}

/// Euclidean (L2) distance, widened to f64.
pub fn euclidean_distance<F: Float + AsPrimitive<f64>>(a: &[F], b: &[F]) -> f64 {
    squared_euclidean(a, b).as_().sqrt()
}

/// Sorted neighbor table of `queries` against `references`, `min(k_max, references.len())` wide.
pub fn compute_neighbors(
    queries: &PointSet,
    references: &PointSet,
    k_max: usize,
    strategy: NeighborStrategy,
) -> Result<NeighborTable> {
    build_table(queries.id(), queries.points(), references, k_max, strategy)
}

/// Same as [`compute_neighbors`] for query points that have no labels (yet).
pub(crate) fn build_table(
    query_set: SetId,
    queries: &[Point],
    references: &PointSet,
    k_max: usize,
    strategy: NeighborStrategy,
) -> Result<NeighborTable> {
    if queries.is_empty() {
        return Err(KnnError::invalid("query set is empty"));
    }
    if references.is_empty() {
        return Err(KnnError::invalid("reference set is empty"));
    }
    if k_max == 0 {
        return Err(KnnError::invalid("k_max must be greater than 0"));
    }
    check_finite("query", queries)?;
    check_finite("reference", references.points())?;

    let refs = references.points();
    let width = k_max.min(refs.len());
    debug!(
        queries = queries.len(),
        references = refs.len(),
        width,
        ?strategy,
        "Computing neighbor table"
    );

    let indices = match strategy {
        NeighborStrategy::FullSort => full_sort_rows(queries, refs, width),
        NeighborStrategy::BoundedHeap => bounded_heap_rows(queries, refs, width),
    };
    Ok(NeighborTable::from_rows(query_set, references.id(), refs.len(), width, indices))
}

fn check_finite(role: &str, points: &[Point]) -> Result<()> {
    match points.iter().position(|p| !p.iter().all(|c| c.is_finite())) {
        Some(i) => Err(KnnError::invalid(format!(
            "{} point {} has a non-finite coordinate: {:?}",
            role, i, points[i]
        ))),
        None => Ok(()),
    }
}

fn full_sort_rows(queries: &[Point], refs: &[Point], width: usize) -> Vec<usize> {
    let n = refs.len();
    // Squared distances sort the same as true distances.
    let distances: Vec<f64> = queries
        .iter()
        .flat_map(|q| refs.iter().map(move |r| squared_euclidean(q, r)))
        .collect();

    let mut indices = Vec::with_capacity(queries.len() * width);
    let mut order: Vec<usize> = Vec::with_capacity(n);
    for row in distances.chunks_exact(n) {
        order.clear();
        order.extend(0..n);
        // Stable: equal distances keep ascending reference index.
        order.sort_by_key(|&j| OrderedFloat(row[j]));
        indices.extend_from_slice(&order[..width]);
    }
    indices
}

fn bounded_heap_rows(queries: &[Point], refs: &[Point], width: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity(queries.len() * width);
    for q in queries {
        let mut best = KBestNeighbors::new(width);
        for (j, r) in refs.iter().enumerate() {
            best.add(squared_euclidean(q, r), j);
        }
        debug_assert_eq!(best.len(), width);
        indices.extend(best.into_sorted_indices());
    }
    indices
}

/// Builds a fresh `k`-wide table and classifies from it, with no reuse across k.
///
/// This is the per-k baseline a cached sweep is compared against.
pub fn predict_uncached(
    queries: &[Point],
    references: &PointSet,
    k: usize,
    strategy: NeighborStrategy,
) -> Result<Vec<Label>> {
    let table = build_table(SetId::next(), queries, references, k, strategy)?;
    classify(&table, references.labels(), k)
}
