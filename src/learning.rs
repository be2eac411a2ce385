use std::fmt::Display;

/// A learning-rate schedule stepped by the training driver between epochs.
pub struct LearningRate {
    pub rate: Rate,
    pub step: usize,
}

pub enum Rate {
    Constant(f32),
    ///`rate / (1 + step * decay)`
    InverseDecay { rate: f32, decay: f32 },
}

impl From<f32> for LearningRate {
    fn from(rate: f32) -> Self {
        Self::new(Rate::Constant(rate))
    }
}

impl LearningRate {
    pub fn new(rate: Rate) -> Self {
        Self { rate, step: 0 }
    }

    pub fn get(&self) -> f32 {
        match self.rate {
            Rate::Constant(lr) => lr,
            Rate::InverseDecay { rate, decay } => rate / (1. + self.step as f32 * decay),
        }
    }

    pub fn step(&mut self) {
        self.step += 1;
    }
}

impl Display for LearningRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variant_name = match self.rate {
            Rate::Constant(_) => "Constant",
            Rate::InverseDecay { .. } => "InverseDecay",
        };
        write!(f, "{} {}", variant_name, self.get())
    }
}
