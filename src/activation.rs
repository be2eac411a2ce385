#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Linear,  // val
    Sigmoid, // 0 to 1
    Relu,    // max(0,val)
    Tanh,    //-1 to 1
}

pub fn activate(val: f32, atype: Activation) -> f32 {
    match atype {
        Activation::Linear => val,
        Activation::Sigmoid => 1. / (1. + (-val).exp()),
        Activation::Relu => val.max(0.),
        Activation::Tanh => val.tanh(),
    }
}

/// Derivative of `activate`, evaluated at the pre-activation `signal`.
/// Must be the exact derivative: a layer's backward pass relies on this pairing.
pub fn differentiate(signal: f32, atype: Activation) -> f32 {
    match atype {
        Activation::Linear => 1.,
        Activation::Sigmoid => {
            let s = 1. / (1. + (-signal).exp());
            s * (1. - s)
        }
        Activation::Relu => {
            if signal > 0. {
                1.
            } else {
                0.
            }
        }
        Activation::Tanh => 1. - signal.tanh().powi(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_pair() {
        //identity pair: activate(x)=x, differentiate(x)=1
        assert_eq!(activate(-5.0, Activation::Linear), -5.0);
        assert_eq!(activate(3.55, Activation::Linear), 3.55);
        assert_eq!(differentiate(-5.0, Activation::Linear), 1.0);
        assert_eq!(differentiate(3.55, Activation::Linear), 1.0);
    }

    #[test]
    fn test_relu() {
        assert_eq!(activate(-1.0, Activation::Relu), 0.0);
        assert_eq!(activate(2.5, Activation::Relu), 2.5);
        assert_eq!(differentiate(-1.0, Activation::Relu), 0.0);
        assert_eq!(differentiate(2.5, Activation::Relu), 1.0);
    }

    #[test]
    fn test_sigmoid() {
        let val = activate(0.0, Activation::Sigmoid);
        assert!((val - 0.5).abs() < 1e-6);
        let val = activate(100.0, Activation::Sigmoid);
        assert!((val - 1.0).abs() < 1e-6);
        //derivative peaks at 0.25 in the middle, vanishes at the tails
        assert!((differentiate(0.0, Activation::Sigmoid) - 0.25).abs() < 1e-6);
        assert!(differentiate(100.0, Activation::Sigmoid).abs() < 1e-6);
    }

    #[test]
    fn test_tanh() {
        let val = activate(0.0, Activation::Tanh);
        assert!((val - 0.0).abs() < 1e-6);
        let val = activate(100.0, Activation::Tanh);
        assert!((val - 1.0).abs() < 1e-6);
        assert!((differentiate(0.0, Activation::Tanh) - 1.0).abs() < 1e-6);
        assert!(differentiate(100.0, Activation::Tanh).abs() < 1e-6);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let eps = 1e-3f32;
        for atype in [Activation::Sigmoid, Activation::Tanh, Activation::Linear] {
            for z in [-2.0f32, -0.5, 0.3, 1.7] {
                let numeric = (activate(z + eps, atype) - activate(z - eps, atype)) / (2. * eps);
                let analytic = differentiate(z, atype);
                assert!(
                    (numeric - analytic).abs() < 1e-2,
                    "{atype:?} at {z}: numeric {numeric} vs analytic {analytic}"
                );
            }
        }
    }
}
