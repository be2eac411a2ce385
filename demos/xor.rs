use feedfwd::prelude::*;
use ndarray::{arr1, arr2};

// Two-class XOR as a minimal end-to-end run: integer labels converted to
// one-hot through the label codec, one sigmoid hidden layer, fixed rate.
pub fn main() {
    let inputs = arr2(&[[0., 0.], [0., 1.], [1., 0.], [1., 1.]]);
    let labels = to_one_hot_labels(&arr1(&[0, 1, 1, 0]), 2).expect("indices within class range");

    let mut net = Network::new(
        inputs.clone(),
        labels.clone(),
        Box::new(Linear::new(8, 2, 0.5, 2)),
        Box::new(SoftmaxCrossEntropy),
    )
    .expect("identity output layer matches the softmax cross-entropy evaluator");
    net.push_layer(Box::new(
        Linear::new(2, 8, 0.5, 3).with_activation(Activation::Sigmoid),
    ));

    for epoch in 1..=2000 {
        let eval = net.train(0.5).expect("learning rate is non-negative");
        if epoch % 200 == 0 {
            println!(
                "epoch {epoch}: loss {:.4} misclassification {:.2}",
                eval.loss, eval.misclassification
            );
        }
        if eval.misclassification == 0. && eval.loss < 0.05 {
            println!("solved at epoch {epoch}: loss {:.4}", eval.loss);
            break;
        }
    }

    let eval = net.test(&inputs, &labels);
    println!("final misclassification: {:.2}", eval.misclassification);
}
