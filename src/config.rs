/// Options of an [`OrderedTriangulator`](crate::OrderedTriangulator).
#[derive(Clone, Debug, PartialEq)]
pub struct TriangulatorConfig {
    /// Sort by both sort ids instead of the first one only.
    pub use_two_sort_ids: bool,
    /// Relative shrinkage of circumspheres in the in-sphere test.
    /// A point on a circumsphere is never considered inside it.
    pub epsilon: f64,
    /// Distance from the bounds center to the envelope points, in bounds diagonals.
    pub envelope_scale: f64,
}

impl TriangulatorConfig {
    pub const DEFAULT_EPSILON: f64 = 1.0e-10;
    pub const DEFAULT_ENVELOPE_SCALE: f64 = 2.5;

    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn use_two_sort_ids(mut self, flag: bool) -> Self {
        self.use_two_sort_ids = flag;
        self
    }

    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn envelope_scale(mut self, scale: f64) -> Self {
        self.envelope_scale = scale;
        self
    }
}

impl Default for TriangulatorConfig {
    fn default() -> Self {
        Self {
            use_two_sort_ids: false,
            epsilon: Self::DEFAULT_EPSILON,
            envelope_scale: Self::DEFAULT_ENVELOPE_SCALE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = TriangulatorConfig::default();
        assert!(!config.use_two_sort_ids);
        assert_eq!(config.epsilon, 1.0e-10);
        assert_eq!(config.envelope_scale, 2.5);
    }

    #[test]
    fn test_setters() {
        let config = TriangulatorConfig::new()
            .use_two_sort_ids(true)
            .epsilon(0.0)
            .envelope_scale(4.0);
        assert!(config.use_two_sort_ids);
        assert_eq!(config.epsilon, 0.0);
        assert_eq!(config.envelope_scale, 4.0);
    }
}
