//! Majority vote over a precomputed neighbor table.

use crate::common_types::Label;
use crate::error::{KnnError, Result};
use super::neighbor_table::NeighborTable;

/// Predicts one label per table row from its first `k` neighbors.
///
/// A row votes `One` only when strictly more than `k / 2` (floor division)
/// neighbors are `One`; an even split goes to `Zero`.
pub fn classify(table: &NeighborTable, reference_labels: &[Label], k: usize) -> Result<Vec<Label>> {
    if reference_labels.len() != table.reference_len() {
        return Err(KnnError::DimensionMismatch {
            expected: table.reference_len(),
            actual: reference_labels.len(),
        });
    }
    table.check_k(k)?;

    let threshold = k / 2;
    let predictions = (0..table.num_queries())
        .map(|i| {
            let votes = table.row_prefix(i, k).iter().filter(|&&idx| reference_labels[idx] == Label::One).count();
            Label::from(votes > threshold)
        })
        .collect();
    Ok(predictions)
}

/// Fraction of positions where `predicted` and `actual` agree.
pub fn accuracy(predicted: &[Label], actual: &[Label]) -> Result<f64> {
    if predicted.len() != actual.len() {
        return Err(KnnError::DimensionMismatch { expected: actual.len(), actual: predicted.len() });
    }
    if actual.is_empty() {
        return Err(KnnError::invalid("cannot compute accuracy of an empty label set"));
    }
    let correct = predicted.iter().zip(actual).filter(|(p, a)| p == a).count();
    Ok(correct as f64 / actual.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common_types::SetId;

    fn single_row_table(row: Vec<usize>, reference_len: usize) -> NeighborTable {
        let width = row.len();
        NeighborTable::from_rows(SetId::next(), SetId::next(), reference_len, width, row)
    }

    #[test]
    fn test_even_split_goes_to_zero() {
        let labels = vec![Label::One, Label::One, Label::Zero, Label::Zero];
        let table = single_row_table(vec![0, 2, 1, 3], 4);
        let predicted = classify(&table, &labels, 4).unwrap();
        assert_eq!(predicted, vec![Label::Zero], "2 of 4 votes for One must resolve to Zero.");
    }

    #[test]
    fn test_strict_majority_wins() {
        let labels = vec![Label::One, Label::One, Label::Zero, Label::One, Label::Zero];
        let table = single_row_table(vec![0, 1, 2, 3, 4], 5);
        assert_eq!(classify(&table, &labels, 3).unwrap(), vec![Label::One]);
        assert_eq!(classify(&table, &labels, 1).unwrap(), vec![Label::One]);
        assert_eq!(classify(&table, &labels, 5).unwrap(), vec![Label::One]);
    }

    #[test]
    fn test_uses_only_prefix() {
        let labels = vec![Label::Zero, Label::One, Label::One];
        let table = single_row_table(vec![0, 1, 2], 3);
        assert_eq!(classify(&table, &labels, 1).unwrap(), vec![Label::Zero]);
        assert_eq!(classify(&table, &labels, 3).unwrap(), vec![Label::One]);
    }

    #[test]
    fn test_rejects_k_wider_than_table() {
        let labels = vec![Label::Zero, Label::One];
        let table = single_row_table(vec![0, 1], 2);
        assert!(matches!(classify(&table, &labels, 3), Err(KnnError::InvalidArgument(_))));
        assert!(matches!(classify(&table, &labels, 0), Err(KnnError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_label_length_mismatch() {
        let table = single_row_table(vec![0, 1], 2);
        let err = classify(&table, &[Label::One], 1).unwrap_err();
        assert_eq!(err, KnnError::DimensionMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn test_accuracy() {
        let predicted = vec![Label::One, Label::Zero, Label::One, Label::One];
        let actual = vec![Label::One, Label::One, Label::One, Label::Zero];
        assert!((accuracy(&predicted, &actual).unwrap() - 0.5).abs() < 1e-12);
        assert!(accuracy(&[], &[]).is_err());
    }
}
