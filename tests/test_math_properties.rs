// Numerical properties of softmax, sigmoid and the combined softmax
// cross-entropy gradient, checked over many random vectors.

use approx::assert_abs_diff_eq;
use backprop_nn::math::functions::{sigmoid, softmax};
use backprop_nn::{Loss, SoftmaxCrossEntropyLoss};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_vec(rng: &mut StdRng, len: usize, scale: f64) -> Vec<f64> {
    (0..len).map(|_| rng.gen_range(-scale..scale)).collect()
}

#[test]
fn softmax_sums_to_one_for_random_vectors() {
    let mut rng = StdRng::seed_from_u64(1);
    for len in 1..12 {
        for scale in [1.0, 50.0, 700.0] {
            let p = softmax(&random_vec(&mut rng, len, scale));
            assert_abs_diff_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-6);
            assert!(p.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }
}

#[test]
fn softmax_ignores_constant_shift() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..50 {
        let x = random_vec(&mut rng, 6, 10.0);
        let c = rng.gen_range(-500.0..500.0);
        let shifted: Vec<f64> = x.iter().map(|v| v + c).collect();
        for (a, b) in softmax(&x).iter().zip(softmax(&shifted)) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-6);
        }
    }
}

#[test]
fn sigmoid_extremes_are_finite() {
    assert_abs_diff_eq!(sigmoid(1000.0), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(sigmoid(-1000.0), 0.0, epsilon = 1e-12);
    assert!(!sigmoid(f64::MAX).is_nan());
    assert!(!sigmoid(f64::MIN).is_nan());
}

#[test]
fn combined_gradient_is_exact_difference() {
    let mut rng = StdRng::seed_from_u64(3);
    for len in 2..8 {
        let p = softmax(&random_vec(&mut rng, len, 3.0));
        let class = rng.gen_range(0..len);
        let t: Vec<f64> = (0..len).map(|i| if i == class { 1.0 } else { 0.0 }).collect();

        let grad = SoftmaxCrossEntropyLoss.backward(&p, &t);
        let expected: Vec<f64> = p.iter().zip(&t).map(|(p, t)| p - t).collect();
        assert_eq!(grad, expected);
    }
}

#[test]
fn cross_entropy_is_negative_log_of_true_class() {
    let p = softmax(&[2.0, 0.5, -1.0]);
    let loss = SoftmaxCrossEntropyLoss.forward(&p, &[0.0, 1.0, 0.0]);
    assert_abs_diff_eq!(loss, -p[1].ln(), epsilon = 1e-12);
}
