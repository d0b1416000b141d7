//! Index arithmetic on octants and directions, and point fixtures for testing.
use itertools::Itertools;
use num::Float;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn cartesian_power<const D: usize>(values: &[i64]) -> Vec<[i64; D]> {
    itertools::repeat_n(values.iter().copied(), D)
        .multi_cartesian_product()
        .map(|v| {
            let mut result = [0; D];
            result.copy_from_slice(&v);
            result
        })
        .collect()
}

/// All `2^D` octants, the sign patterns in `{-1, +1}^D`, ordered by [octant_index].
pub fn octants<const D: usize>() -> Vec<[i64; D]> {
    cartesian_power(&[-1, 1])
}

/// All `3^D - 1` nonzero directions in `{-1, 0, +1}^D`, in lexicographic order with the first
/// axis varying slowest.
pub fn directions<const D: usize>() -> Vec<[i64; D]> {
    cartesian_power(&[-1, 0, 1])
        .into_iter()
        .filter(|d| d.iter().any(|&x| x != 0))
        .collect()
}

/// Position of a child within its parent's block of children.
///
/// Each axis contributes one bit, `-1` maps to `0` and `+1` to `1`, with the first axis the most
/// significant bit.
pub fn octant_index<const D: usize>(octant: &[i64; D]) -> usize {
    octant
        .iter()
        .fold(0, |index, &o| (index << 1) | usize::from(o > 0))
}

/// Check that every entry of an octant is `-1` or `+1`.
pub fn is_octant<const D: usize>(octant: &[i64; D]) -> bool {
    octant.iter().all(|&o| o == -1 || o == 1)
}

/// Check that every entry of a direction is `-1`, `0` or `+1` and that it is not all zero.
pub fn is_direction<const D: usize>(direction: &[i64; D]) -> bool {
    direction.iter().all(|d| (-1..=1).contains(d)) && direction.iter().any(|&d| d != 0)
}

/// Half-width of a box at a given depth, the root has half-width one.
pub fn half_width<T: Float>(depth: u64) -> T {
    let two = T::one() + T::one();
    (0..depth).fold(T::one(), |width, _| width / two)
}

/// Points fixture for testing, uniformly samples each axis from `min` to `max`, or from the root
/// box `[-1, 1)` if no bounds are given.
pub fn points_fixture<const D: usize>(
    npoints: usize,
    min: Option<f64>,
    max: Option<f64>,
    seed: Option<u64>,
) -> Vec<[f64; D]> {
    let mut rng = StdRng::seed_from_u64(seed.unwrap_or(0));

    let between = if let (Some(min), Some(max)) = (min, max) {
        Uniform::from(min..max)
    } else {
        Uniform::from(-1.0_f64..1.0_f64)
    };

    (0..npoints)
        .map(|_| {
            let mut point = [0.0; D];
            for x in point.iter_mut() {
                *x = between.sample(&mut rng);
            }
            point
        })
        .collect()
}

/// Points fixture for testing adaptive refinement, half the points are spread over the root box
/// and the other half are clustered in a small corner `[-1, -0.9)^D`.
pub fn points_fixture_clustered<const D: usize>(npoints: usize, seed: Option<u64>) -> Vec<[f64; D]> {
    let seed = seed.unwrap_or(0);
    let nspread = npoints / 2;

    let mut points = points_fixture(nspread, None, None, Some(seed));
    points.extend(points_fixture(
        npoints - nspread,
        Some(-1.0),
        Some(-0.9),
        Some(seed + 1),
    ));
    points
}

#[cfg(test)]
mod test {
    use super::{
        directions, half_width, is_direction, is_octant, octant_index, octants, points_fixture,
    };

    #[test]
    fn test_octants_follow_index_order() {
        let octants = octants::<3>();
        assert_eq!(octants.len(), 8);
        assert_eq!(octants[0], [-1, -1, -1]);
        assert_eq!(octants[1], [-1, -1, 1]);
        assert_eq!(octants[4], [1, -1, -1]);
        assert_eq!(octants[7], [1, 1, 1]);

        for (i, octant) in octants.iter().enumerate() {
            assert_eq!(octant_index(octant), i);
        }
    }

    #[test]
    fn test_directions() {
        let directions2 = directions::<2>();
        assert_eq!(directions2.len(), 8);
        assert_eq!(directions2[0], [-1, -1]);
        assert_eq!(directions2[3], [0, -1]);
        assert_eq!(directions2[4], [0, 1]);
        assert!(!directions2.contains(&[0, 0]));

        assert_eq!(directions::<3>().len(), 26);
        assert_eq!(directions::<1>(), vec![[-1], [1]]);
    }

    #[test]
    fn test_validation() {
        assert!(is_octant(&[1, -1]));
        assert!(!is_octant(&[1, 0]));
        assert!(is_direction(&[0, -1]));
        assert!(!is_direction(&[0, 0]));
        assert!(!is_direction(&[2, 0]));
    }

    #[test]
    fn test_half_width() {
        assert_eq!(half_width::<f64>(0), 1.0);
        assert_eq!(half_width::<f64>(3), 0.125);
        assert_eq!(half_width::<f32>(1), 0.5);
    }

    #[test]
    fn test_points_fixture() {
        let points = points_fixture::<3>(100, None, None, None);
        assert_eq!(points.len(), 100);
        assert!(points.iter().flatten().all(|x| (-1.0..1.0).contains(x)));

        // Seeded fixtures are reproducible
        assert_eq!(points, points_fixture::<3>(100, None, None, None));
    }
}
