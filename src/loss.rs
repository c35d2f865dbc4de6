use ndarray::{Array1, Array2};

use crate::error::{NetError, Result};

/// Checks that every label indexes one of `num_classes` classes.
pub fn validate_labels(labels: &Array1<usize>, num_classes: usize) -> Result<()> {
    match labels.iter().position(|&label| label >= num_classes) {
        Some(index) => Err(NetError::LabelOutOfRange {
            index,
            label: labels[index],
            num_classes,
        }),
        None => Ok(()),
    }
}

/// Checks a labelled batch of `rows` rows: one label per row, at least one row,
/// and every label in range.
pub fn validate_batch(labels: &Array1<usize>, rows: usize, num_classes: usize) -> Result<()> {
    if labels.len() != rows {
        return Err(NetError::dimension_mismatch(rows, labels.len(), "label count"));
    }
    if rows == 0 {
        return Err(NetError::empty("loss batch"));
    }
    validate_labels(labels, num_classes)
}

/// N×C indicator matrix with a single 1 per row at the row's label.
///
/// # Panics
///
/// If a label is not below `num_classes`. Check with [`validate_labels`] first.
pub fn one_hot(labels: &Array1<usize>, num_classes: usize) -> Array2<f64> {
    let mut delta = Array2::zeros((labels.len(), num_classes));
    for (i, &label) in labels.iter().enumerate() {
        delta[[i, label]] = 1.0;
    }
    delta
}

/// Mean over rows of `-log_probs[i, labels[i]]`, where `log_probs` is a
/// row-wise log-softmax.
///
/// # Panics
///
/// If `labels` is not a valid batch for `log_probs`. Check with
/// [`validate_batch`] first.
pub fn cross_entropy(log_probs: &Array2<f64>, labels: &Array1<usize>) -> f64 {
    let total: f64 = labels
        .iter()
        .enumerate()
        .map(|(i, &label)| -log_probs[[i, label]])
        .sum();
    total / labels.len() as f64
}

/// L2 penalty `reg * (sum(W1^2) + sum(W2^2))`. The coefficient is not halved,
/// so the matching gradient is `2 * reg * W`.
pub fn l2_penalty(reg: f64, w1: &Array2<f64>, w2: &Array2<f64>) -> f64 {
    reg * (w1.mapv(|w| w * w).sum() + w2.mapv(|w| w * w).sum())
}
