//! Latin hypercube sampling over the unit cube.
//!
//! Each axis is cut into `n` equal strata and every stratum receives exactly one
//! point, so draws spread across the space instead of clustering.

use rand::seq::SliceRandom;
use rand::Rng;

/// Largest `f64` strictly below 1.0
pub const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct LatinHypercube<const D: usize>;

impl<const D: usize> LatinHypercube<D> {
    pub fn new() -> Self {
        LatinHypercube
    }

    /// Draw `n` points in `[0, 1)^D`
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<[f64; D]> {
        let mut points = vec![[0.0; D]; n];
        if n == 0 {
            return points;
        }

        let width = n as f64;
        for axis in 0..D {
            let mut strata: Vec<usize> = (0..n).collect();
            strata.shuffle(rng);
            for (point, stratum) in points.iter_mut().zip(strata) {
                let jitter: f64 = rng.random();
                point[axis] = ((stratum as f64 + jitter) / width).min(BELOW_ONE);
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn strata_of(points: &[[f64; 2]], axis: usize) -> Vec<usize> {
        let n = points.len() as f64;
        let mut strata: Vec<usize> = points
            .iter()
            .map(|p| (p[axis] * n).floor() as usize)
            .collect();
        strata.sort_unstable();
        strata
    }

    #[test]
    fn test_one_point_per_stratum() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [1, 2, 7, 10, 64] {
            let points = LatinHypercube::<2>::new().sample(n, &mut rng);
            assert_eq!(points.len(), n);
            let expected: Vec<usize> = (0..n).collect();
            assert_eq!(strata_of(&points, 0), expected);
            assert_eq!(strata_of(&points, 1), expected);
        }
    }

    #[test]
    fn test_points_in_unit_square() {
        let mut rng = StdRng::seed_from_u64(99);
        let points = LatinHypercube::<2>::new().sample(500, &mut rng);
        for p in &points {
            assert!((0.0..1.0).contains(&p[0]));
            assert!((0.0..1.0).contains(&p[1]));
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = LatinHypercube::<2>::new().sample(10, &mut StdRng::seed_from_u64(42));
        let b = LatinHypercube::<2>::new().sample(10, &mut StdRng::seed_from_u64(42));
        let c = LatinHypercube::<2>::new().sample(10, &mut StdRng::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_points() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(LatinHypercube::<2>::new().sample(0, &mut rng).is_empty());
    }
}
