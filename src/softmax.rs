use ndarray::{Array2, Axis};

/// Softmax over a 2D batch.
///
/// `axis` selects the normalisation direction: `Axis(0)` makes every column
/// sum to 1, `Axis(1)` every row, `None` the whole matrix.
///
/// Exponentiation is plain `exp` with no max-subtraction, so large inputs can
/// overflow to infinity. That matches the loss definition used by
/// [`crate::loss::SoftmaxCrossEntropy`] and is not silently corrected here.
pub fn softmax(input: &Array2<f32>, axis: Option<Axis>) -> Array2<f32> {
    let raised = input.mapv(f32::exp);
    match axis {
        Some(Axis(0)) => {
            let sums = raised.sum_axis(Axis(0));
            raised / &sums
        }
        Some(Axis(1)) => {
            let sums = raised.sum_axis(Axis(1)).insert_axis(Axis(1));
            raised / &sums
        }
        None => {
            let sum = raised.sum();
            raised / sum
        }
        Some(axis) => panic!("softmax: axis {} out of range for 2D input", axis.0),
    }
}
