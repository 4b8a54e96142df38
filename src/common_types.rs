//! This module contains the data structures shared by the sampler, the neighbor indexer and the classifier.

use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{KnnError, Result};

/// A point in the unit square, `[x, y]`.
pub type Point = [f64; 2];

/// Binary class label.
///
/// Kept as a closed enum so the majority vote counts `One` votes explicitly
/// instead of summing arbitrary integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Label {
    Zero,
    One,
}

impl Label {
    pub fn as_u8(self) -> u8 {
        match self {
            Label::Zero => 0,
            Label::One => 1,
        }
    }
}

impl From<bool> for Label {
    fn from(value: bool) -> Self {
        if value { Label::One } else { Label::Zero }
    }
}

impl TryFrom<u8> for Label {
    type Error = KnnError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Label::Zero),
            1 => Ok(Label::One),
            other => Err(KnnError::invalid(format!("label must be 0 or 1, got {}", other))),
        }
    }
}

/// Identity of a point set, used to key neighbor tables to the sets they were built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetId(u64);

static NEXT_SET_ID: AtomicU64 = AtomicU64::new(0);

impl SetId {
    pub(crate) fn next() -> Self {
        SetId(NEXT_SET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Number of points carrying each label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelCounts {
    pub zeros: usize,
    pub ones: usize,
}

/// Index-aligned points and labels: `labels[i]` belongs to `points[i]`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPointSet"))]
pub struct PointSet {
    #[cfg_attr(feature = "serde", serde(skip))]
    id: SetId,
    points: Vec<Point>,
    labels: Vec<Label>,
}

/// Unchecked wire form; deserialized sets go through [`PointSet::new`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawPointSet {
    points: Vec<Point>,
    labels: Vec<Label>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPointSet> for PointSet {
    type Error = KnnError;

    fn try_from(raw: RawPointSet) -> Result<Self> {
        PointSet::new(raw.points, raw.labels)
    }
}

impl PointSet {
    pub fn new(points: Vec<Point>, labels: Vec<Label>) -> Result<Self> {
        Self::with_id(SetId::next(), points, labels)
    }

    /// Builds a set under an identity reserved before its labels were known.
    pub(crate) fn with_id(id: SetId, points: Vec<Point>, labels: Vec<Label>) -> Result<Self> {
        if points.len() != labels.len() {
            return Err(KnnError::DimensionMismatch { expected: points.len(), actual: labels.len() });
        }
        Ok(PointSet { id, points, labels })
    }

    pub fn id(&self) -> SetId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn label_counts(&self) -> LabelCounts {
        let ones = self.labels.iter().filter(|&&l| l == Label::One).count();
        LabelCounts { zeros: self.labels.len() - ones, ones }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_set_rejects_length_mismatch() {
        let err = PointSet::new(vec![[0.0, 0.0], [1.0, 1.0]], vec![Label::One]).unwrap_err();
        assert_eq!(err, KnnError::DimensionMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn test_point_sets_get_distinct_ids() {
        let a = PointSet::new(vec![[0.5, 0.5]], vec![Label::Zero]).unwrap();
        let b = PointSet::new(vec![[0.5, 0.5]], vec![Label::Zero]).unwrap();
        assert_ne!(a.id(), b.id(), "Each constructed set should have its own identity.");
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_label_counts() {
        let set = PointSet::new(
            vec![[0.1, 0.1], [0.2, 0.2], [0.3, 0.3]],
            vec![Label::One, Label::Zero, Label::One],
        )
        .unwrap();
        assert_eq!(set.label_counts(), LabelCounts { zeros: 1, ones: 2 });
    }

    #[test]
    fn test_label_conversions() {
        assert_eq!(Label::from(true), Label::One);
        assert_eq!(Label::from(false), Label::Zero);
        assert_eq!(Label::try_from(1u8).unwrap(), Label::One);
        assert!(Label::try_from(2u8).is_err());
        assert_eq!(Label::One.as_u8(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates_lengths() {
        let ok: PointSet = serde_json::from_str(r#"{"points":[[0.1,0.2]],"labels":["One"]}"#).unwrap();
        assert_eq!(ok.labels(), &[Label::One]);

        let mismatched = serde_json::from_str::<PointSet>(r#"{"points":[[0.1,0.2],[0.3,0.4]],"labels":["One"]}"#);
        let err = mismatched.unwrap_err().to_string();
        assert!(err.contains("Dimension mismatch"), "Unexpected error: {}", err);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip_gets_fresh_identity() {
        let set = PointSet::new(vec![[0.5, 0.25]], vec![Label::Zero]).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        let back: PointSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.points(), set.points());
        assert_ne!(back.id(), set.id());
    }
}
