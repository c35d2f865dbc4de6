use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;

/// Weights and biases of the two fully-connected layers.
///
/// The same record carries gradients, see [`Gradients`].
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// First layer weights, D×H
    pub w1: Array2<f64>,
    /// First layer biases, H
    pub b1: Array1<f64>,
    /// Second layer weights, H×C
    pub w2: Array2<f64>,
    /// Second layer biases, C
    pub b2: Array1<f64>,
}

/// Gradient of the loss with respect to each field of [`Params`]
pub type Gradients = Params;

impl Params {
    /// Weights are `std * N(0, 1)` samples, biases start at zero.
    pub fn init<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        std: f64,
        rng: &mut R,
    ) -> Self {
        let w1 = Array2::from_shape_fn((input_size, hidden_size), |_| {
            std * rng.sample::<f64, _>(StandardNormal)
        });
        let w2 = Array2::from_shape_fn((hidden_size, output_size), |_| {
            std * rng.sample::<f64, _>(StandardNormal)
        });

        Params {
            w1,
            b1: Array1::zeros(hidden_size),
            w2,
            b2: Array1::zeros(output_size),
        }
    }

    pub fn zeros_like(other: &Params) -> Self {
        Params {
            w1: Array2::zeros(other.w1.raw_dim()),
            b1: Array1::zeros(other.b1.raw_dim()),
            w2: Array2::zeros(other.w2.raw_dim()),
            b2: Array1::zeros(other.b2.raw_dim()),
        }
    }

    pub fn input_size(&self) -> usize {
        self.w1.nrows()
    }

    pub fn hidden_size(&self) -> usize {
        self.w1.ncols()
    }

    pub fn output_size(&self) -> usize {
        self.w2.ncols()
    }

    pub fn parameter_count(&self) -> usize {
        self.w1.len() + self.b1.len() + self.w2.len() + self.b2.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_init_shapes() {
        let mut rng = StdRng::seed_from_u64(0);
        let params = Params::init(4, 10, 3, 1e-4, &mut rng);

        assert_eq!(params.w1.dim(), (4, 10));
        assert_eq!(params.b1.len(), 10);
        assert_eq!(params.w2.dim(), (10, 3));
        assert_eq!(params.b2.len(), 3);
        assert_eq!(params.input_size(), 4);
        assert_eq!(params.hidden_size(), 10);
        assert_eq!(params.output_size(), 3);
        // 4*10 + 10 + 10*3 + 3
        assert_eq!(params.parameter_count(), 83);
    }

    #[test]
    fn test_init_biases_zero_and_weights_scaled() {
        let mut rng = StdRng::seed_from_u64(7);
        let std = 1e-3;
        let params = Params::init(20, 30, 5, std, &mut rng);

        assert!(params.b1.iter().all(|&b| b == 0.0));
        assert!(params.b2.iter().all(|&b| b == 0.0));

        // Standard normal samples essentially never exceed 6 sigma
        assert!(params.w1.iter().all(|w| w.abs() < 6.0 * std));
        assert!(params.w2.iter().all(|w| w.abs() < 6.0 * std));
        assert!(params.w1.iter().any(|&w| w != 0.0));

        let n = params.w1.len() as f64;
        let sample_std = (params.w1.mapv(|w| w * w).sum() / n).sqrt();
        assert!(sample_std > 0.5 * std && sample_std < 1.5 * std);
    }

    #[test]
    fn test_init_is_reproducible_with_seed() {
        let a = Params::init(3, 4, 2, 1e-2, &mut StdRng::seed_from_u64(42));
        let b = Params::init(3, 4, 2, 1e-2, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zeros_like() {
        let mut rng = StdRng::seed_from_u64(1);
        let params = Params::init(2, 3, 4, 1.0, &mut rng);
        let zeros = Params::zeros_like(&params);

        assert_eq!(zeros.w1.dim(), params.w1.dim());
        assert_eq!(zeros.w2.dim(), params.w2.dim());
        assert!(zeros.w1.iter().chain(zeros.w2.iter()).all(|&w| w == 0.0));
    }
}
