use ndarray::{Array1, Array2, Axis, Zip};

use crate::activation::Activation;
use crate::labels::to_indices_labels;
use crate::softmax::softmax;

/// Scalar result of one evaluation: the loss the network trains against and
/// an auxiliary error metric (misclassification rate for classification).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    pub loss: f32,
    pub misclassification: f32,
}

/// Converts final-layer outputs and true labels into an [`Evaluation`] plus
/// the gradient of the loss w.r.t. the output layer's pre-activation signals,
/// which seeds backpropagation through the whole stack.
pub trait Evaluator {
    fn evaluate(
        &self,
        outputs: &Array2<f32>,
        one_hot_labels: &Array2<bool>,
    ) -> (Evaluation, Array2<f32>);

    /// Whether this evaluator's gradient is valid for an output layer with
    /// the given activation. Evaluators with a closed-form gradient derived
    /// for a specific activation must reject everything else rather than
    /// produce silently wrong gradients.
    fn accepts_output_activation(&self, activation: Activation) -> bool;
}

/// Categorical cross-entropy over a row-wise softmax of the outputs.
///
/// The gradient is the closed form `(softmax - one_hot) / N`, which is the
/// derivative w.r.t. the raw signals only when the output layer's activation
/// is the identity; any other pairing is rejected by
/// [`Evaluator::accepts_output_activation`].
///
/// The softmax is unstabilised: outputs large enough to overflow `exp` yield
/// infinite/NaN loss rather than a corrected value.
pub struct SoftmaxCrossEntropy;

impl Evaluator for SoftmaxCrossEntropy {
    fn evaluate(
        &self,
        outputs: &Array2<f32>,
        one_hot_labels: &Array2<bool>,
    ) -> (Evaluation, Array2<f32>) {
        let num_rows = one_hot_labels.nrows() as f32;
        let labels_float = one_hot_labels.mapv(|l| l as u8 as f32);
        let softmaxed = softmax(outputs, Some(Axis(1)));

        //negative mean log-probability of the true class
        let probs = (&softmaxed * &labels_float).sum_axis(Axis(1));
        let cross_entropy = -probs.mapv(f32::ln).sum() / num_rows;

        let predicted = row_argmax(&softmaxed);
        let truth = to_indices_labels(one_hot_labels);
        let wrong = predicted
            .iter()
            .zip(truth.iter())
            .filter(|(p, t)| p != t)
            .count();
        let misclassification = wrong as f32 / num_rows;

        let gradient = (softmaxed - labels_float) / num_rows;

        (
            Evaluation {
                loss: cross_entropy,
                misclassification,
            },
            gradient,
        )
    }

    fn accepts_output_activation(&self, activation: Activation) -> bool {
        activation == Activation::Linear
    }
}

//per-row argmax, ties to the lowest index; rows are independent so this runs
//across worker threads, each row writing only its own slot
fn row_argmax(matrix: &Array2<f32>) -> Array1<i32> {
    let mut result = Array1::zeros(matrix.nrows());
    Zip::from(&mut result)
        .and(matrix.rows())
        .par_for_each(|slot, row| {
            let mut best = 0;
            let mut best_val = f32::NEG_INFINITY;
            for (i, &val) in row.iter().enumerate() {
                if val > best_val {
                    best = i;
                    best_val = val;
                }
            }
            *slot = best as i32;
        });
    result
}
