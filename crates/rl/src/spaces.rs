/// An axis-aligned box of `f32` values with shared bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpace {
    pub low: f32,
    pub high: f32,
    pub shape: Vec<usize>,
}

impl BoxSpace {
    #[must_use]
    pub fn new(low: f32, high: f32, shape: &[usize]) -> Self {
        Self {
            low,
            high,
            shape: shape.to_vec(),
        }
    }

    /// Number of scalar elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `values` has the right length and every value lies in bounds.
    #[must_use]
    pub fn contains(&self, values: &[f32]) -> bool {
        values.len() == self.len() && values.iter().all(|v| (self.low..=self.high).contains(v))
    }

    /// Uniform sample from the box.
    #[must_use]
    pub fn sample(&self, rng: &fastrand::Rng) -> Vec<f32> {
        (0..self.len())
            .map(|_| self.low + rng.f32() * (self.high - self.low))
            .collect()
    }
}
