use crate::params::{Gradients, Params};

/// Vanilla stochastic gradient descent
#[derive(Debug, Clone)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    /// `param -= learning_rate * grad` for each of the four parameters, in place
    pub fn step(&self, params: &mut Params, grads: &Gradients) {
        let lr = self.learning_rate;
        params.w1.scaled_add(-lr, &grads.w1);
        params.b1.scaled_add(-lr, &grads.b1);
        params.w2.scaled_add(-lr, &grads.w2);
        params.b2.scaled_add(-lr, &grads.b2);
    }

    pub fn decay(&mut self, factor: f64) {
        self.learning_rate *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_step() {
        let mut params = Params {
            w1: array![[1.0, 2.0]],
            b1: array![0.0, 0.0],
            w2: array![[1.0], [-1.0]],
            b2: array![0.5],
        };
        let grads = Params {
            w1: array![[10.0, -10.0]],
            b1: array![1.0, 0.0],
            w2: array![[0.0], [2.0]],
            b2: array![-5.0],
        };

        Sgd::new(0.5).step(&mut params, &grads);

        assert_eq!(params.w1, array![[-4.0, 7.0]]);
        assert_eq!(params.b1, array![-0.5, 0.0]);
        assert_eq!(params.w2, array![[1.0], [-2.0]]);
        assert_eq!(params.b2, array![3.0]);
    }

    #[test]
    fn test_decay() {
        let mut sgd = Sgd::new(1.0);
        sgd.decay(0.5);
        sgd.decay(0.5);
        assert_eq!(sgd.learning_rate, 0.25);
    }
}
