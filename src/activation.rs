use ndarray::{Array2, Axis};

/// Elementwise `max(0, z)`
pub fn relu(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(|x| x.max(0.0))
}

/// Derivative of ReLU evaluated at the pre-activation: 1 where `z > 0`, else 0
pub fn relu_mask(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(|x| if x > 0.0 { 1.0 } else { 0.0 })
}

/// Row-wise softmax.
///
/// Each row is shifted by its maximum before exponentiating. The shift cancels
/// in the ratio, so the probabilities are unchanged while large logits no
/// longer overflow.
pub fn softmax_rows(logits: &Array2<f64>) -> Array2<f64> {
    let mut out = logits.clone();
    for mut row in out.axis_iter_mut(Axis(0)) {
        let max = row.fold(f64::NEG_INFINITY, |m, &x| m.max(x));
        row.mapv_inplace(|x| (x - max).exp());
        let sum_of_exponentials = row.sum();
        row.mapv_inplace(|x| x / sum_of_exponentials);
    }
    out
}

/// Row-wise log-softmax, `z - max - ln(sum(exp(z - max)))`.
///
/// Stays finite where `softmax_rows` underflows a probability to zero.
pub fn log_softmax_rows(logits: &Array2<f64>) -> Array2<f64> {
    let mut out = logits.clone();
    for mut row in out.axis_iter_mut(Axis(0)) {
        let max = row.fold(f64::NEG_INFINITY, |m, &x| m.max(x));
        let log_sum = row.fold(0.0, |acc, &x| acc + (x - max).exp()).ln();
        row.mapv_inplace(|x| x - max - log_sum);
    }
    out
}
