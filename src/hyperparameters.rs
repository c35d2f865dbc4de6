use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};

/// Default standard deviation of the initial weights
pub const DEFAULT_STD: f64 = 1e-4;

/// Shape and initialization settings for a two-layer network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetConfig {
    /// Number of input features (D)
    pub input_size: usize,

    /// Width of the hidden layer (H)
    pub hidden_size: usize,

    /// Number of classes (C)
    pub output_size: usize,

    /// Scale applied to standard normal samples when initializing weights
    #[serde(default = "default_std")]
    pub std: f64,

    /// Seed for initialization and epoch shuffles; drawn from entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_std() -> f64 {
    DEFAULT_STD
}

impl NetConfig {
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize) -> Self {
        NetConfig {
            input_size,
            hidden_size,
            output_size,
            std: DEFAULT_STD,
            seed: None,
        }
    }

    pub fn with_std(mut self, std: f64) -> Self {
        self.std = std;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("input_size", self.input_size),
            ("hidden_size", self.hidden_size),
            ("output_size", self.output_size),
        ] {
            if value == 0 {
                return Err(NetError::invalid_config(name, value, "must be positive"));
            }
        }
        if !self.std.is_finite() {
            return Err(NetError::invalid_config("std", self.std, "must be finite"));
        }
        Ok(())
    }
}

/// How the rows of a minibatch are picked within an epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOrder {
    /// Contiguous slices of the epoch's shuffled index permutation
    #[default]
    Shuffled,

    /// Contiguous slices of the data in its original order. The epoch
    /// permutation is still drawn but does not affect batch composition.
    Sequential,
}

/// Hyperparameters for a `train` run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainHyperparameters {
    /// Initial SGD step size
    pub learning_rate: f64,

    /// Factor applied to the learning rate at every epoch boundary
    pub learning_rate_decay: f64,

    /// L2 regularization strength
    pub reg: f64,

    /// Number of SGD steps
    pub num_iters: usize,

    /// Rows per minibatch
    pub batch_size: usize,

    /// Log progress every 100 iterations
    pub verbose: bool,

    pub batch_order: BatchOrder,
}

impl Default for TrainHyperparameters {
    fn default() -> Self {
        TrainHyperparameters {
            learning_rate: 1e-3,
            learning_rate_decay: 0.95,
            reg: 5e-6,
            num_iters: 100,
            batch_size: 200,
            verbose: false,
            batch_order: BatchOrder::Shuffled,
        }
    }
}

impl TrainHyperparameters {
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(NetError::invalid_config(
                "learning_rate",
                self.learning_rate,
                "must be non-negative and finite",
            ));
        }
        if !self.learning_rate_decay.is_finite() || self.learning_rate_decay < 0.0 {
            return Err(NetError::invalid_config(
                "learning_rate_decay",
                self.learning_rate_decay,
                "must be non-negative and finite",
            ));
        }
        validate_reg(self.reg)?;
        if self.batch_size == 0 {
            return Err(NetError::invalid_config(
                "batch_size",
                self.batch_size,
                "must be positive",
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_reg(reg: f64) -> Result<()> {
    if !reg.is_finite() || reg < 0.0 {
        return Err(NetError::invalid_config(
            "reg",
            reg,
            "must be non-negative and finite",
        ));
    }
    Ok(())
}
