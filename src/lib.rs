//! Feedforward neural-network training on tabular classification data.
//!
//! A [`network::Network`] owns a stack of [`layer::Layer`]s and an
//! [`loss::Evaluator`]; each training step runs a full forward pass, seeds
//! backpropagation with the evaluator's gradient, and applies one plain
//! gradient-descent update per layer. [`dataset::Dataset`] loads csv-style
//! tabular data into the float/one-hot matrices the network consumes.

pub mod activation;
pub mod dataset;
pub mod error;
pub mod labels;
pub mod layer;
pub mod learning;
pub mod loss;
pub mod network;
pub mod softmax;


pub mod prelude {
    pub use crate::activation::Activation;
    pub use crate::dataset::{Conversion, Dataset};
    pub use crate::error::Error;
    pub use crate::labels::{to_indices_labels, to_one_hot_labels};
    pub use crate::layer::{Layer, Linear};
    pub use crate::learning::{LearningRate, Rate};
    pub use crate::loss::{Evaluation, Evaluator, SoftmaxCrossEntropy};
    pub use crate::network::Network;
    pub use crate::softmax::softmax;
}
