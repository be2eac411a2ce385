use std::fmt::Display;

use ndarray::Array2;

use crate::error::Error;
use crate::layer::Layer;
use crate::loss::{Evaluation, Evaluator};

//one record per layer, in forward order; produced by the forward pass and
//consumed by the matching backward/update passes within the same call
pub(crate) struct LayerRecord {
    pub(crate) signals: Array2<f32>,
    pub(crate) outputs: Array2<f32>,
}

/// An ordered stack of hidden layers plus one output layer, with an evaluator
/// supplying the loss and the gradient that seeds backpropagation.
///
/// The network takes exclusive ownership of its layers and evaluator. Hidden
/// layers are pushed/popped at the tail between training runs; the stack may
/// be empty, in which case the network degenerates to the output layer alone.
///
///```rust
/// use ndarray::arr2;
/// use feedfwd::prelude::*;
///
/// let inputs = arr2(&[[0.2, 0.8], [0.9, 0.1]]);
/// let labels = arr2(&[[true, false], [false, true]]);
///
/// let mut net = Network::new(
///     inputs,
///     labels,
///     Box::new(Linear::new(2, 2, 1.0, 42)),
///     Box::new(SoftmaxCrossEntropy),
/// )
/// .unwrap();
/// net.push_layer(Box::new(Linear::new(2, 2, 1.0, 7)));
///
/// let first = net.train(0.5).unwrap();
/// for _ in 0..100 {
///     net.train(0.5).unwrap();
/// }
/// assert!(net.loss().unwrap().loss < first.loss);
///```
pub struct Network {
    hidden: Vec<Box<dyn Layer>>,
    output: Box<dyn Layer>,
    evaluator: Box<dyn Evaluator>,
    inputs: Array2<f32>,
    one_hot_labels: Array2<bool>,
    loss: Option<Evaluation>,
}

impl Network {
    /// Creates a network from a default training batch, an output layer and
    /// an evaluator.
    ///
    /// Fails with [`Error::InvalidArgument`] if the evaluator's gradient is
    /// not valid for the output layer's activation function.
    pub fn new(
        inputs: Array2<f32>,
        one_hot_labels: Array2<bool>,
        output: Box<dyn Layer>,
        evaluator: Box<dyn Evaluator>,
    ) -> Result<Self, Error> {
        assert_eq!(
            inputs.nrows(),
            one_hot_labels.nrows(),
            "input and label row counts differ"
        );
        if !evaluator.accepts_output_activation(output.activation()) {
            return Err(Error::InvalidArgument(format!(
                "evaluator does not accept output activation {:?}",
                output.activation()
            )));
        }

        Ok(Self {
            hidden: vec![],
            output,
            evaluator,
            inputs,
            one_hot_labels,
            loss: None,
        })
    }

    /// Appends a hidden layer at the tail of the stack.
    pub fn push_layer(&mut self, layer: Box<dyn Layer>) {
        self.hidden.push(layer);
    }

    /// Removes and returns the tail hidden layer, if any.
    pub fn pop_layer(&mut self) -> Option<Box<dyn Layer>> {
        self.hidden.pop()
    }

    /// Trains on the default batch supplied at construction.
    pub fn train(&mut self, lr: f32) -> Result<Evaluation, Error> {
        let inputs = self.inputs.clone();
        let one_hot_labels = self.one_hot_labels.clone();
        self.train_on(lr, &inputs, &one_hot_labels)
    }

    /// One full training step: forward, evaluate, backward, update.
    ///
    /// Returns the evaluator's result, which is also retained as the
    /// network's last loss. A negative learning rate fails with
    /// [`Error::InvalidArgument`] before any weight is touched.
    pub fn train_on(
        &mut self,
        lr: f32,
        inputs: &Array2<f32>,
        one_hot_labels: &Array2<bool>,
    ) -> Result<Evaluation, Error> {
        let records = self.forward_pass(inputs);
        let final_outputs = &records.last().unwrap().outputs;
        let (evaluation, pre_gradient) = self.evaluator.evaluate(final_outputs, one_hot_labels);

        let gradients = self.backward_pass(&records, &pre_gradient);
        self.update_network(inputs, &records, &gradients, lr)?;

        self.loss = Some(evaluation);
        Ok(evaluation)
    }

    /// Forward + evaluate only. Does not touch weights or the loss retained
    /// from training.
    pub fn test(&self, inputs: &Array2<f32>, one_hot_labels: &Array2<bool>) -> Evaluation {
        let records = self.forward_pass(inputs);
        let final_outputs = &records.last().unwrap().outputs;
        let (evaluation, _) = self.evaluator.evaluate(final_outputs, one_hot_labels);
        evaluation
    }

    /// The evaluation from the most recent training step.
    pub fn loss(&self) -> Option<Evaluation> {
        self.loss
    }

    pub fn hidden_layers(&self) -> &[Box<dyn Layer>] {
        &self.hidden
    }

    pub fn output_layer(&self) -> &dyn Layer {
        self.output.as_ref()
    }

    //runs inputs through every hidden layer then the output layer, threading
    //each layer's outputs into the next; one record per layer, forward order
    pub(crate) fn forward_pass(&self, inputs: &Array2<f32>) -> Vec<LayerRecord> {
        let mut records: Vec<LayerRecord> = Vec::with_capacity(self.hidden.len() + 1);

        for (i, layer) in self.hidden.iter().enumerate() {
            let layer_inputs = if i == 0 { inputs } else { &records[i - 1].outputs };
            let (signals, outputs) = layer.forward(layer_inputs);
            records.push(LayerRecord { signals, outputs });
        }

        let final_inputs = records.last().map_or(inputs, |r| &r.outputs);
        let (signals, outputs) = self.output.forward(final_inputs);
        records.push(LayerRecord { signals, outputs });

        records
    }

    //seeds the output layer with the evaluator's gradient, then walks the
    //hidden layers in reverse threading transformed gradients; the returned
    //vec is reversed back so gradients[i] belongs to the layer at position i
    pub(crate) fn backward_pass(
        &self,
        records: &[LayerRecord],
        pre_gradient: &Array2<f32>,
    ) -> Vec<Array2<f32>> {
        let output_record = records.last().unwrap();
        let (gradient, mut tgradient) =
            self.output.seed_back_prop(&output_record.signals, pre_gradient);

        let mut gradients = vec![gradient];
        for (layer, record) in self
            .hidden
            .iter()
            .zip(&records[..records.len() - 1])
            .rev()
        {
            let (gradient, next_tgradient) = layer.back_propagate(&record.signals, &tgradient);
            tgradient = next_tgradient;
            gradients.push(gradient);
        }

        gradients.reverse();
        gradients
    }

    //applies every layer's update exactly once, hidden layers first in
    //forward order, each with the inputs its forward pass saw
    fn update_network(
        &mut self,
        inputs: &Array2<f32>,
        records: &[LayerRecord],
        gradients: &[Array2<f32>],
        lr: f32,
    ) -> Result<(), Error> {
        if lr < 0. {
            return Err(Error::InvalidArgument(format!(
                "received negative learning rate {lr}"
            )));
        }

        let mut layer_inputs = inputs;
        for (i, layer) in self.hidden.iter_mut().enumerate() {
            layer.update_weights(layer_inputs, &gradients[i], lr);
            layer_inputs = &records[i].outputs;
        }
        self.output
            .update_weights(layer_inputs, gradients.last().unwrap(), lr);

        Ok(())
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut shape: Vec<String> = self.hidden.iter().map(|l| l.in_dim().to_string()).collect();
        shape.push(self.output.in_dim().to_string());
        shape.push(self.output.out_dim().to_string());
        write!(f, "Network [{}]", shape.join(", "))
    }
}
