use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use ndarray::{Array2, Axis};

use feedfwd::prelude::*;

criterion_group!(benches, forward, train_step, evaluate);
criterion_main!(benches);

fn forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward");
    group.throughput(criterion::Throughput::Elements(100));
    group.bench_function("test pass", forward_per_second);
}

fn train_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("train");
    group.throughput(criterion::Throughput::Elements(100));
    group.bench_function("full step", train_per_second);
}

fn evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    group.throughput(criterion::Throughput::Elements(100));
    group.bench_function("softmax cross-entropy", evaluate_per_second);
}

fn batch(classes: usize) -> (Array2<f32>, Array2<bool>) {
    let inputs = Array2::from_shape_fn((100, 10), |(r, c)| ((r + c) % 7) as f32 / 7.0);
    let mut labels = Array2::from_elem((100, classes), false);
    for (row, mut line) in labels.axis_iter_mut(Axis(0)).enumerate() {
        line[row % classes] = true;
    }
    (inputs, labels)
}

fn build_network() -> Network {
    let (inputs, labels) = batch(10);
    let mut net = Network::new(
        inputs,
        labels,
        Box::new(Linear::new(50, 10, 1.0, 2)),
        Box::new(SoftmaxCrossEntropy),
    )
    .unwrap();
    net.push_layer(Box::new(
        Linear::new(10, 100, 1.0, 3).with_activation(Activation::Sigmoid),
    ));
    net.push_layer(Box::new(
        Linear::new(100, 50, 1.0, 4).with_activation(Activation::Sigmoid),
    ));
    net
}

fn forward_per_second(b: &mut Bencher) {
    let net = build_network();
    let (inputs, labels) = batch(10);
    b.iter(|| net.test(&inputs, &labels));
}

fn train_per_second(b: &mut Bencher) {
    let mut net = build_network();
    b.iter(|| net.train(0.01).unwrap());
}

fn evaluate_per_second(b: &mut Bencher) {
    let (outputs, labels) = batch(10);
    b.iter(|| SoftmaxCrossEntropy.evaluate(&outputs, &labels));
}
