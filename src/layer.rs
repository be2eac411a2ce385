use std::fmt::Display;

use ndarray::{concatenate, s, Array2, Axis};

use crate::activation::{activate, differentiate, Activation};

/// A network layer: affine transform + pointwise activation, with
/// gradient-based weight updates.
///
/// The backward contract comes in two variants: [`Layer::back_propagate`] for
/// hidden layers, fed the transformed gradient of the layer one step closer
/// to the output, and [`Layer::seed_back_prop`] for the output layer, fed the
/// loss gradient straight from the evaluator.
pub trait Layer {
    /// Forward propagation. Returns `(signals, outputs)`: the pre-activation
    /// affine result and the activated result, both `N x out_dim`. Pure.
    fn forward(&self, inputs: &Array2<f32>) -> (Array2<f32>, Array2<f32>);

    /// Hidden-layer backward step. Corrects the upstream transformed gradient
    /// by the local activation derivative at `signals`, then back-multiplies
    /// through the weights (bias row excluded) for the preceding layer.
    /// Returns `(gradient, transformed_gradient)`.
    fn back_propagate(
        &self,
        signals: &Array2<f32>,
        tgradient: &Array2<f32>,
    ) -> (Array2<f32>, Array2<f32>);

    /// Output-layer backward step: as `back_propagate`, but the incoming
    /// gradient is the evaluator's loss gradient rather than a downstream
    /// layer's transformed gradient.
    fn seed_back_prop(
        &self,
        signals: &Array2<f32>,
        loss_gradient: &Array2<f32>,
    ) -> (Array2<f32>, Array2<f32>);

    /// Gradient descent step: `weights -= lr * augmented(inputs)^T * gradient`.
    /// `inputs` must be the same batch the matching forward pass saw.
    /// The `lr >= 0` precondition is enforced by the network before any layer
    /// is touched, not here.
    fn update_weights(&mut self, inputs: &Array2<f32>, gradient: &Array2<f32>, lr: f32);

    fn in_dim(&self) -> usize;
    fn out_dim(&self) -> usize;
    fn activation(&self) -> Activation;

    ///Every layer owns exactly one weight matrix, `(in_dim + 1) x out_dim`
    /// with the bias in the extra row
    fn weights(&self) -> &Array2<f32>;
}

/// Plain linear layer. The default identity activation makes it a pure affine
/// transform; [`Linear::with_activation`] selects another pointwise pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    pub(crate) weights: Array2<f32>, // (in_dim+1) x out_dim, bias in last row
    in_dim: usize,
    out_dim: usize,
    activation: Activation,
}

impl Linear {
    /// Creates a layer with weights drawn uniformly from
    /// `[-max_weight, max_weight]`, using a generator owned by this call and
    /// seeded with `seed`. Construction is reproducible and independent of
    /// any other layer's construction order.
    pub fn new(in_dim: usize, out_dim: usize, max_weight: f32, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let weights = Array2::from_shape_fn((in_dim + 1, out_dim), |_| {
            (rng.f32() * 2. - 1.) * max_weight
        });

        Self {
            weights,
            in_dim,
            out_dim,
            activation: Activation::Linear,
        }
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    //bias trick: append a constant-1 column so the weight matrix carries
    //both the linear weights and the additive bias
    fn augment_ones(&self, inputs: &Array2<f32>) -> Array2<f32> {
        let ones = Array2::ones((inputs.nrows(), 1));
        concatenate(Axis(1), &[inputs.view(), ones.view()]).unwrap()
    }

    //back-multiply a gradient through the weights, excluding the bias row:
    //the constant-1 column has no preceding layer to receive a gradient
    fn transform_gradient(&self, gradient: &Array2<f32>) -> Array2<f32> {
        let linear_weights = self.weights.slice(s![..-1, ..]);
        gradient.dot(&linear_weights.t())
    }
}

impl Layer for Linear {
    fn forward(&self, inputs: &Array2<f32>) -> (Array2<f32>, Array2<f32>) {
        let signals = self.augment_ones(inputs).dot(&self.weights);
        let outputs = signals.mapv(|z| activate(z, self.activation));
        (signals, outputs)
    }

    fn back_propagate(
        &self,
        signals: &Array2<f32>,
        tgradient: &Array2<f32>,
    ) -> (Array2<f32>, Array2<f32>) {
        let diff_signals = signals.mapv(|z| differentiate(z, self.activation));
        let gradient = diff_signals * tgradient;
        let tgradient = self.transform_gradient(&gradient);
        (gradient, tgradient)
    }

    fn seed_back_prop(
        &self,
        signals: &Array2<f32>,
        loss_gradient: &Array2<f32>,
    ) -> (Array2<f32>, Array2<f32>) {
        //same local-derivative correction; only the origin of the incoming
        //gradient differs
        self.back_propagate(signals, loss_gradient)
    }

    fn update_weights(&mut self, inputs: &Array2<f32>, gradient: &Array2<f32>, lr: f32) {
        let step = self.augment_ones(inputs).t().dot(gradient) * lr;
        self.weights -= &step;
    }

    fn in_dim(&self) -> usize {
        self.in_dim
    }

    fn out_dim(&self) -> usize {
        self.out_dim
    }

    fn activation(&self) -> Activation {
        self.activation
    }

    fn weights(&self) -> &Array2<f32> {
        &self.weights
    }
}

impl Display for Linear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Linear {}x{} ({:?})",
            self.in_dim, self.out_dim, self.activation
        )
    }
}
