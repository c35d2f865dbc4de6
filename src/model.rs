use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::activation::{log_softmax_rows, relu, relu_mask, softmax_rows};
use crate::error::{NetError, Result};
use crate::hyperparameters::{validate_reg, NetConfig, TrainHyperparameters};
use crate::loss::{cross_entropy, l2_penalty, one_hot, validate_batch, validate_labels};
use crate::optimizer::Sgd;
use crate::params::{Gradients, Params};
use crate::sampler::BatchSampler;

/// A two-layer fully-connected classifier:
///
/// input - fully connected - ReLU - fully connected - softmax
///
/// trained with softmax cross-entropy and L2 regularization on both weight
/// matrices.
#[derive(Debug, Clone)]
pub struct TwoLayerNet {
    params: Params,
    rng: StdRng,
}

/// Result of [`TwoLayerNet::loss`]
#[derive(Debug, Clone, PartialEq)]
pub enum LossOutput {
    /// Class probabilities, N×C. Returned when no labels are given.
    Scores(Array2<f64>),

    /// Total loss and the gradient of every parameter
    Loss { loss: f64, grads: Gradients },
}

/// Per-run training curves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainHistory {
    /// Batch loss at every iteration
    pub loss_history: Vec<f64>,
    /// Accuracy on the current batch at every epoch boundary
    pub train_acc_history: Vec<f64>,
    /// Accuracy on the full validation set at every epoch boundary
    pub val_acc_history: Vec<f64>,
}

struct Forward {
    z2: Array2<f64>,
    a2: Array2<f64>,
    z3: Array2<f64>,
    scores: Array2<f64>,
}

impl TwoLayerNet {
    /// Create a network with the default weight scale and an entropy-seeded RNG
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize) -> Result<Self> {
        Self::from_config(&NetConfig::new(input_size, hidden_size, output_size))
    }

    pub fn from_config(config: &NetConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let params = Params::init(
            config.input_size,
            config.hidden_size,
            config.output_size,
            config.std,
            &mut rng,
        );

        Ok(TwoLayerNet { params, rng })
    }

    /// Wrap existing parameters. `seed` drives the epoch shuffles in `train`.
    pub fn from_params(params: Params, seed: u64) -> Result<Self> {
        let (d, h) = params.w1.dim();
        let c = params.w2.ncols();
        for (name, value) in [("input_size", d), ("hidden_size", h), ("output_size", c)] {
            if value == 0 {
                return Err(NetError::invalid_config(name, value, "must be positive"));
            }
        }
        if params.b1.len() != h {
            return Err(NetError::dimension_mismatch(h, params.b1.len(), "b1 length"));
        }
        if params.w2.nrows() != h {
            return Err(NetError::dimension_mismatch(h, params.w2.nrows(), "W2 rows"));
        }
        if params.b2.len() != c {
            return Err(NetError::dimension_mismatch(c, params.b2.len(), "b2 length"));
        }

        Ok(TwoLayerNet {
            params,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    fn check_features(&self, x: &Array2<f64>) -> Result<()> {
        let expected = self.params.input_size();
        if x.ncols() != expected {
            return Err(NetError::dimension_mismatch(
                expected,
                x.ncols(),
                "input features",
            ));
        }
        Ok(())
    }

    fn forward(&self, x: &Array2<f64>) -> Result<Forward> {
        self.check_features(x)?;
        let p = &self.params;

        let z2 = x.dot(&p.w1) + &p.b1;
        let a2 = relu(&z2);
        let z3 = a2.dot(&p.w2) + &p.b2;
        let scores = softmax_rows(&z3);

        Ok(Forward { z2, a2, z3, scores })
    }

    /// Class probabilities for each row of `x`
    pub fn scores(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        Ok(self.forward(x)?.scores)
    }

    /// Forward pass, and with labels also the loss and backward pass.
    ///
    /// # Arguments
    ///
    /// * `x` - Input data, N×D
    /// * `y` - Optional labels, each in `0..C`
    /// * `reg` - L2 regularization strength
    pub fn loss(
        &self,
        x: &Array2<f64>,
        y: Option<&Array1<usize>>,
        reg: f64,
    ) -> Result<LossOutput> {
        match y {
            None => Ok(LossOutput::Scores(self.scores(x)?)),
            Some(y) => {
                let (loss, grads) = self.loss_and_grads(x, y, reg)?;
                Ok(LossOutput::Loss { loss, grads })
            }
        }
    }

    /// Loss on a labelled batch and the analytic gradient of every parameter
    pub fn loss_and_grads(
        &self,
        x: &Array2<f64>,
        y: &Array1<usize>,
        reg: f64,
    ) -> Result<(f64, Gradients)> {
        validate_reg(reg)?;
        let p = &self.params;
        let n = x.nrows();
        validate_batch(y, n, p.output_size())?;
        let Forward { z2, a2, z3, scores } = self.forward(x)?;

        // Taken from the log-softmax so a vanishing true-class probability stays finite
        let data_loss = cross_entropy(&log_softmax_rows(&z3), y);
        let loss = data_loss + l2_penalty(reg, &p.w1, &p.w2);

        // Softmax cross-entropy gradient w.r.t. the logits, averaged over the batch
        let delta = one_hot(y, p.output_size());
        let dz3 = (scores - delta) / n as f64;

        let w2_grad = a2.t().dot(&dz3) + &p.w2 * (2.0 * reg);
        let b2_grad = dz3.sum_axis(Axis(0));

        let dz2 = dz3.dot(&p.w2.t()) * relu_mask(&z2);

        let w1_grad = x.t().dot(&dz2) + &p.w1 * (2.0 * reg);
        let b1_grad = dz2.sum_axis(Axis(0));

        let grads = Gradients {
            w1: w1_grad,
            b1: b1_grad,
            w2: w2_grad,
            b2: b2_grad,
        };
        Ok((loss, grads))
    }

    /// Train with minibatch SGD.
    ///
    /// The learning rate is multiplied by `learning_rate_decay` at every epoch
    /// boundary, where batch and validation accuracy are also recorded.
    pub fn train(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<usize>,
        x_val: &Array2<f64>,
        y_val: &Array1<usize>,
        hp: &TrainHyperparameters,
    ) -> Result<TrainHistory> {
        hp.validate()?;
        self.check_features(x)?;
        self.check_features(x_val)?;
        if y.len() != x.nrows() {
            return Err(NetError::dimension_mismatch(x.nrows(), y.len(), "training labels"));
        }
        if y_val.len() != x_val.nrows() {
            return Err(NetError::dimension_mismatch(
                x_val.nrows(),
                y_val.len(),
                "validation labels",
            ));
        }
        if x_val.nrows() == 0 {
            return Err(NetError::empty("validation data"));
        }
        let num_classes = self.params.output_size();
        validate_labels(y, num_classes)?;
        validate_labels(y_val, num_classes)?;

        let num_train = x.nrows();
        let mut sampler = BatchSampler::new(num_train, hp.batch_size, hp.batch_order)?;
        if num_train < hp.batch_size {
            tracing::warn!(
                "Training set has {} rows, fewer than batch size {}; every batch is the full set",
                num_train,
                hp.batch_size
            );
        }

        let mut sgd = Sgd::new(hp.learning_rate);
        let mut history = TrainHistory::default();

        for it in 0..hp.num_iters {
            let batch = sampler.next_batch(it, &mut self.rng);
            let x_batch = x.select(Axis(0), &batch);
            let y_batch = y.select(Axis(0), &batch);

            let (loss, grads) = self.loss_and_grads(&x_batch, &y_batch, hp.reg)?;
            history.loss_history.push(loss);

            sgd.step(&mut self.params, &grads);

            if hp.verbose && it % 100 == 0 {
                tracing::info!("iteration {} / {}: loss {}", it, hp.num_iters, loss);
            }

            if sampler.is_epoch_start(it) {
                let train_acc = self.accuracy(&x_batch, &y_batch)?;
                let val_acc = self.accuracy(x_val, y_val)?;
                history.train_acc_history.push(train_acc);
                history.val_acc_history.push(val_acc);

                sgd.decay(hp.learning_rate_decay);
                tracing::debug!(
                    iteration = it,
                    train_acc,
                    val_acc,
                    learning_rate = sgd.learning_rate,
                    "epoch boundary"
                );
            }
        }

        Ok(history)
    }

    /// Index of the most probable class for each row. Ties go to the lowest index.
    ///
    /// Fails with [`NetError::NonFiniteScores`] if a row of scores holds NaN.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let scores = self.scores(x)?;
        scores
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                argmax(row.iter()).ok_or(NetError::NonFiniteScores { row: i })
            })
            .collect()
    }

    /// Fraction of rows of `x` whose prediction equals the label
    pub fn accuracy(&self, x: &Array2<f64>, y: &Array1<usize>) -> Result<f64> {
        if y.len() != x.nrows() {
            return Err(NetError::dimension_mismatch(x.nrows(), y.len(), "label count"));
        }
        if y.is_empty() {
            return Err(NetError::empty("accuracy data"));
        }
        let predictions = self.predict(x)?;
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(pred, label)| pred == label)
            .count();
        Ok(correct as f64 / y.len() as f64)
    }
}

/// First index of the maximum, or `None` if any value is not finite
fn argmax<'a>(values: impl Iterator<Item = &'a f64>) -> Option<usize> {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &v) in values.enumerate() {
        if !v.is_finite() {
            return None;
        }
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    Some(best)
}
