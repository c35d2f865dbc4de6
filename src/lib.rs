mod activation;
mod error;
mod hyperparameters;
mod loss;
mod model;
mod optimizer;
mod params;
mod sampler;

pub use activation::{log_softmax_rows, relu, relu_mask, softmax_rows};
pub use error::{NetError, Result};
pub use hyperparameters::{BatchOrder, NetConfig, TrainHyperparameters, DEFAULT_STD};
pub use loss::{cross_entropy, l2_penalty, one_hot, validate_batch, validate_labels};
pub use model::{LossOutput, TrainHistory, TwoLayerNet};
pub use optimizer::Sgd;
pub use params::{Gradients, Params};
pub use sampler::BatchSampler;
