//! Uniform random draws of points and labels from an injected generator.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::common_types::{Label, Point};

/// Generator used by experiments.
pub type ExperimentRng = ChaCha8Rng;

/// Builds the experiment generator; `None` seeds from `rand::random`.
pub fn experiment_rng(seed: Option<u64>) -> ExperimentRng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::seed_from_u64(rand::random()),
    }
}

/// Owns the random source shared by point sampling and noise injection.
#[derive(Debug, Clone)]
pub struct PointSampler<R> {
    rng: R,
}

impl<R: Rng> PointSampler<R> {
    pub fn new(rng: R) -> Self {
        PointSampler { rng }
    }

    /// `count` points with each coordinate uniform on [0, 1).
    pub fn sample_points(&mut self, count: usize) -> Vec<Point> {
        (0..count)
            .map(|_| [self.rng.gen_range(0.0..1.0), self.rng.gen_range(0.0..1.0)])
            .collect()
    }

    /// `count` labels uniform over {0, 1}.
    pub fn sample_labels(&mut self, count: usize) -> Vec<Label> {
        (0..count).map(|_| self.sample_label()).collect()
    }

    pub fn sample_label(&mut self) -> Label {
        Label::from(self.rng.gen_bool(0.5))
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_lie_in_unit_square() {
        let mut sampler = PointSampler::new(experiment_rng(Some(7)));
        let points = sampler.sample_points(500);
        assert_eq!(points.len(), 500);
        for p in points {
            assert!((0.0..=1.0).contains(&p[0]) && (0.0..=1.0).contains(&p[1]), "Point {:?} outside [0,1]^2", p);
        }
    }

    #[test]
    fn test_labels_use_both_classes() {
        let mut sampler = PointSampler::new(experiment_rng(Some(11)));
        let labels = sampler.sample_labels(200);
        assert_eq!(labels.len(), 200);
        assert!(labels.contains(&Label::Zero));
        assert!(labels.contains(&Label::One));
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut sampler = PointSampler::new(experiment_rng(Some(1)));
        assert!(sampler.sample_points(0).is_empty());
        assert!(sampler.sample_labels(0).is_empty());
    }

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = PointSampler::new(experiment_rng(Some(42)));
        let mut b = PointSampler::new(experiment_rng(Some(42)));
        assert_eq!(a.sample_points(10), b.sample_points(10));
        assert_eq!(a.sample_labels(10), b.sample_labels(10));
    }
}
