//! Dense table of reference indices sorted by distance from each query point.

use crate::common_types::SetId;
use crate::error::{KnnError, Result};

/// `num_queries × width` reference indices, row-major.
///
/// Row `i` lists reference indices in non-decreasing distance from query `i`,
/// ties broken by ascending reference index. Never mutated after construction;
/// narrower views come from [`NeighborTable::truncated`] or [`NeighborTable::row_prefix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborTable {
    query_set: SetId,
    reference_set: SetId,
    reference_len: usize,
    num_queries: usize,
    width: usize,
    indices: Vec<usize>,
}

impl NeighborTable {
    pub(crate) fn from_rows(
        query_set: SetId,
        reference_set: SetId,
        reference_len: usize,
        width: usize,
        indices: Vec<usize>,
    ) -> Self {
        debug_assert!(width == 0 || indices.len() % width == 0);
        let num_queries = if width == 0 { 0 } else { indices.len() / width };
        NeighborTable { query_set, reference_set, reference_len, num_queries, width, indices }
    }

    pub fn num_queries(&self) -> usize {
        self.num_queries
    }

    /// Number of neighbors kept per row, `min(k_max, reference_len)`.
    pub fn k_max(&self) -> usize {
        self.width
    }

    pub fn reference_len(&self) -> usize {
        self.reference_len
    }

    pub fn query_set(&self) -> SetId {
        self.query_set
    }

    pub fn reference_set(&self) -> SetId {
        self.reference_set
    }

    /// True when this table was built for exactly this (query, reference) pair.
    pub fn is_for(&self, query_set: SetId, reference_set: SetId) -> bool {
        self.query_set == query_set && self.reference_set == reference_set
    }

    pub fn row(&self, i: usize) -> &[usize] {
        &self.indices[i * self.width..(i + 1) * self.width]
    }

    /// First `k` neighbors of row `i`. Callers check `k <= k_max()`.
    pub fn row_prefix(&self, i: usize, k: usize) -> &[usize] {
        &self.row(i)[..k]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.indices.chunks_exact(self.width.max(1)).take(self.num_queries)
    }

    /// Copy of the table narrowed to its first `k` columns.
    pub fn truncated(&self, k: usize) -> Result<NeighborTable> {
        self.check_k(k)?;
        let indices = self.rows().flat_map(|row| row[..k].iter().copied()).collect();
        Ok(NeighborTable::from_rows(self.query_set, self.reference_set, self.reference_len, k, indices))
    }

    pub(crate) fn check_k(&self, k: usize) -> Result<()> {
        if k == 0 {
            return Err(KnnError::invalid("k must be greater than 0"));
        }
        if k > self.width {
            return Err(KnnError::invalid(format!(
                "k ({}) exceeds the neighbor table width ({})",
                k, self.width
            )));
        }
        Ok(())
    }
}
