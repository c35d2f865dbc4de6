use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{NetError, Result};
use crate::hyperparameters::BatchOrder;

/// Epoch and minibatch bookkeeping for the training loop.
///
/// One epoch is `max(num_train / batch_size, 1)` iterations. At every epoch
/// start the index permutation is reshuffled and the batch cursor rewinds.
#[derive(Debug, Clone)]
pub struct BatchSampler {
    num_train: usize,
    batch_size: usize,
    iterations_per_epoch: usize,
    order: BatchOrder,
    permutation: Vec<usize>,
    cursor: usize,
}

impl BatchSampler {
    pub fn new(num_train: usize, batch_size: usize, order: BatchOrder) -> Result<Self> {
        if batch_size == 0 {
            return Err(NetError::invalid_config(
                "batch_size",
                batch_size,
                "must be positive",
            ));
        }
        if num_train == 0 {
            return Err(NetError::empty("training data"));
        }

        Ok(BatchSampler {
            num_train,
            batch_size,
            iterations_per_epoch: (num_train / batch_size).max(1),
            order,
            permutation: (0..num_train).collect(),
            cursor: 0,
        })
    }

    pub fn iterations_per_epoch(&self) -> usize {
        self.iterations_per_epoch
    }

    pub fn is_epoch_start(&self, iteration: usize) -> bool {
        iteration % self.iterations_per_epoch == 0
    }

    /// Row indices of the batch for `iteration`. Iterations must be drawn in
    /// order starting from 0.
    pub fn next_batch<R: Rng + ?Sized>(&mut self, iteration: usize, rng: &mut R) -> Vec<usize> {
        if self.is_epoch_start(iteration) {
            self.permutation.shuffle(rng);
            self.cursor = 0;
        }

        let start = self.cursor * self.batch_size;
        let end = ((self.cursor + 1) * self.batch_size).min(self.num_train);
        self.cursor += 1;

        match self.order {
            BatchOrder::Shuffled => self.permutation[start..end].to_vec(),
            BatchOrder::Sequential => (start..end).collect(),
        }
    }
}
