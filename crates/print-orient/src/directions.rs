//! Candidate "up" directions for the orientation search.
//!
//! Candidates are the signed principal axes followed by a Fibonacci-sphere
//! sample and its antipodes. Principal axes come first so that, on exact score
//! ties, axis-aligned orientations win.

use hashbrown::HashSet;
use nalgebra::Vector3;
use std::f64::consts::PI;

use crate::rotation::world_up;

/// Lower bound for the configured number of sphere samples.
pub const MIN_DIRECTION_SAMPLES: usize = 24;
/// Upper bound for the configured number of sphere samples.
pub const MAX_DIRECTION_SAMPLES: usize = 200;

/// Decimal places kept in the deduplication key.
const DEDUP_SCALE: f64 = 1e4;

/// Clamp a requested sphere sample count into the supported range.
#[inline]
pub fn clamp_direction_samples(requested: usize) -> usize {
    requested.clamp(MIN_DIRECTION_SAMPLES, MAX_DIRECTION_SAMPLES)
}

/// Quasi-uniform points on the unit sphere (Fibonacci lattice).
///
/// Point `i` has `y = 1 - 2 i / (n - 1)`, so the sequence runs from the north
/// pole to the south pole.
pub fn fibonacci_sphere(n: usize) -> impl ExactSizeIterator<Item = Vector3<f64>> {
    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    let denom = n.saturating_sub(1).max(1) as f64;

    (0..n).map(move |i| {
        let fi = i as f64;
        let y = 1.0 - (fi / denom) * 2.0;
        let r = (1.0 - y * y).max(0.0).sqrt();
        let theta = fi * golden_angle;
        Vector3::new(theta.cos() * r, y, theta.sin() * r)
    })
}

/// Rounded-coordinate key used to drop near-identical candidates.
#[inline]
fn dedup_key(v: &Vector3<f64>) -> [i64; 3] {
    // `+ 0.0` folds -0.0 into 0.0 before the cast.
    [v.x, v.y, v.z].map(|c| ((c * DEDUP_SCALE).round() + 0.0) as i64)
}

/// Build the deduplicated candidate list.
///
/// Order: `+a0, -a0, +a1, -a1, +a2, -a2`, then `p_i, -p_i` for each sphere
/// point. Every candidate is unit length. If nothing survives (no axes and no
/// samples) the single direction (0, 1, 0) is returned.
pub fn candidate_directions(axes: &[Vector3<f64>], sphere_samples: usize) -> Vec<Vector3<f64>> {
    let mut seen: HashSet<[i64; 3]> = HashSet::with_capacity(axes.len() * 2 + sphere_samples * 2);
    let mut out = Vec::with_capacity(axes.len() * 2 + sphere_samples * 2);

    let mut push = |v: Vector3<f64>| {
        if let Some(unit) = v.try_normalize(1e-9) {
            if seen.insert(dedup_key(&unit)) {
                out.push(unit);
            }
        }
    };

    for axis in axes {
        push(*axis);
        push(-axis);
    }
    for p in fibonacci_sphere(sphere_samples) {
        push(p);
        push(-p);
    }

    if out.is_empty() {
        out.push(world_up());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fibonacci_endpoints_and_unit_length() {
        let pts: Vec<_> = fibonacci_sphere(50).collect();
        assert_eq!(pts.len(), 50);
        assert_relative_eq!(pts[0], Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(pts[49].y, -1.0, epsilon = 1e-12);
        for p in &pts {
            assert_relative_eq!(p.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fibonacci_single_point() {
        let pts: Vec<_> = fibonacci_sphere(1).collect();
        assert_eq!(pts, vec![Vector3::y()]);
    }

    #[test]
    fn test_axes_come_first() {
        let axes = [Vector3::x(), Vector3::z(), Vector3::y()];
        let dirs = candidate_directions(&axes, 24);
        assert_eq!(dirs[0], Vector3::x());
        assert_eq!(dirs[1], -Vector3::x());
        assert_eq!(dirs[2], Vector3::z());
        assert_eq!(dirs[3], -Vector3::z());
        assert_eq!(dirs[4], Vector3::y());
        assert_eq!(dirs[5], -Vector3::y());
    }

    #[test]
    fn test_duplicates_are_removed() {
        // The first and last sphere points are the poles, which duplicate +/-Y.
        let dirs = candidate_directions(&[Vector3::y()], 24);
        let mut keys: Vec<_> = dirs.iter().map(dedup_key).collect();
        let before = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), before);
        assert_eq!(dirs.len(), 2 + 24 * 2 - 2 - 2);
    }

    #[test]
    fn test_empty_input_defaults_to_up() {
        assert_eq!(candidate_directions(&[], 0), vec![Vector3::y()]);
    }

    #[test]
    fn test_all_candidates_unit_length() {
        let axes = [Vector3::new(3.0, 0.0, 4.0)];
        for d in candidate_directions(&axes, 100) {
            assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp_direction_samples(0), MIN_DIRECTION_SAMPLES);
        assert_eq!(clamp_direction_samples(64), 64);
        assert_eq!(clamp_direction_samples(10_000), MAX_DIRECTION_SAMPLES);
    }
}
