//Data from UCI Machine Learning Repository [http://archive.ics.uci.edu/ml]. Irvine, CA: University of California, School of Information and Computer Science.

use feedfwd::prelude::*;

// Classification driver: builds a 4 -> 4 -> 3 stack, trains with a decaying
// learning rate until the validation loss stops improving, then reports the
// misclassification rate on held-out test data.
pub fn main() {
    fastrand::seed(1);
    let set = Dataset::builder()
        .read_csv("demos/data/iris.csv")
        .add_input_columns(&[0, 1, 2, 3], Conversion::NormaliseMean)
        .add_target_columns(&[4], Conversion::OneHot)
        .allocate_to_validation_data(0.2)
        .allocate_to_test_data(0.2)
        .build();

    println!(
        "inputs: {:?} targets: {:?}",
        set.input_labels(),
        set.target_labels()
    );

    let hidden = Linear::new(set.input_size(), 4, 1.0, 42);
    let output = Linear::new(4, set.num_classes(), 1.0, 43);

    let mut net = Network::new(
        set.train_inputs().clone(),
        set.train_labels().clone(),
        Box::new(output),
        Box::new(SoftmaxCrossEntropy),
    )
    .expect("identity output layer matches the softmax cross-entropy evaluator");
    net.push_layer(Box::new(hidden));

    let mut lr = LearningRate::new(Rate::InverseDecay {
        rate: 0.1,
        decay: 0.1,
    });

    //stop once the validation loss has failed to improve 3 times
    let mut val_loss = f32::MAX;
    let mut violations = 0;
    let mut epoch = 0;
    while violations < 3 {
        epoch += 1;

        let train_eval = net.train(lr.get()).expect("learning rate is non-negative");
        lr.step();

        let val_eval = net.test(set.validation_inputs(), set.validation_labels());
        if val_eval.loss >= val_loss {
            violations += 1;
        }
        val_loss = val_eval.loss;

        if epoch % 10 == 0 {
            println!(
                "epoch {epoch}: train loss {:.4} val loss {:.4} ({lr})",
                train_eval.loss, val_eval.loss
            );
        }
    }

    let test_eval = net.test(set.test_inputs(), set.test_labels());
    println!(
        "stopped after {epoch} epochs; test misclassification: {:.3}",
        test_eval.misclassification
    );
}
