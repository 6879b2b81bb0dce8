//! Principal-axis analysis of a vertex cloud.
//!
//! The covariance matrix of the (sampled) vertices is diagonalized with the
//! cyclic Jacobi method. For a symmetric 3x3 matrix a handful of sweeps reach
//! engineering tolerance, and capping the sweep count bounds the worst case.
//! The cap is a tunable heuristic, not a convergence guarantee: results report
//! whether the off-diagonal tolerance was reached.

use nalgebra::{Matrix3, Point3, Vector3};

/// Spread below this fraction of the largest coordinate magnitude counts as
/// zero variance (centroid round-off, not geometry).
const ZERO_SPREAD_RELATIVE: f64 = 1e-12;

/// Parameters for the cyclic Jacobi eigen-solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct JacobiParams {
    /// Maximum number of full sweeps over the off-diagonal pairs. Default: 10
    pub max_sweeps: usize,
    /// Stop once the largest off-diagonal magnitude falls below this. Default: 1e-10
    pub tolerance: f64,
}

impl Default for JacobiParams {
    fn default() -> Self {
        Self {
            max_sweeps: 10,
            tolerance: 1e-10,
        }
    }
}

/// Result of principal-axis analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalAxes {
    /// Orthonormal axes sorted by descending eigenvalue. Empty for a
    /// zero-variance cloud.
    pub axes: Vec<Vector3<f64>>,
    /// Eigenvalues matching `axes`.
    pub eigenvalues: Vec<f64>,
    /// Number of sweeps performed.
    pub sweeps: usize,
    /// Whether the off-diagonal tolerance was reached within the sweep cap.
    pub converged: bool,
}

impl PrincipalAxes {
    fn empty() -> Self {
        Self {
            axes: Vec::new(),
            eigenvalues: Vec::new(),
            sweeps: 0,
            converged: true,
        }
    }

    /// Whether the cloud had no spread to analyze.
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }
}

/// Compute the three principal axes with the default solver parameters.
///
/// Returns an empty list if every point coincides.
pub fn principal_axes(points: &[Point3<f64>]) -> Vec<Vector3<f64>> {
    analyze_principal_axes(points, &JacobiParams::default()).axes
}

/// Compute principal axes, eigenvalues and convergence information.
pub fn analyze_principal_axes(points: &[Point3<f64>], params: &JacobiParams) -> PrincipalAxes {
    let Some(cov) = covariance_matrix(points) else {
        return PrincipalAxes::empty();
    };

    if is_zero_variance(&cov, points) {
        return PrincipalAxes::empty();
    }

    let (eigenvalues, eigenvectors, sweeps, converged) = jacobi_eigen(&cov, params);

    let mut order = [0usize, 1, 2];
    // Stable sort keeps the solver's column order on exact ties.
    order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]));

    let axes = order
        .iter()
        .map(|&i| eigenvectors.column(i).into_owned().normalize())
        .collect();
    let eigenvalues = order.iter().map(|&i| eigenvalues[i]).collect();

    PrincipalAxes {
        axes,
        eigenvalues,
        sweeps,
        converged,
    }
}

/// Population covariance of `points` about their centroid.
pub fn covariance_matrix(points: &[Point3<f64>]) -> Option<Matrix3<f64>> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let centroid: Vector3<f64> = points.iter().map(|p| p.coords).sum::<Vector3<f64>>() / n;

    let mut cov = Matrix3::zeros();
    for p in points {
        let d = p.coords - centroid;
        cov += d * d.transpose();
    }

    Some(cov / n)
}

/// Whether the total variance is indistinguishable from centroid round-off.
///
/// The cutoff scales with the coordinates, so a tiny but real cloud keeps its
/// axes while coincident points far from the origin still count as a point.
fn is_zero_variance(cov: &Matrix3<f64>, points: &[Point3<f64>]) -> bool {
    let scale = points
        .iter()
        .flat_map(|p| p.coords.iter().map(|c| c.abs()))
        .fold(0.0, f64::max);
    let cutoff = ZERO_SPREAD_RELATIVE * scale;
    cov.trace() <= cutoff * cutoff
}

/// Diagonalize a symmetric 3x3 matrix with cyclic Jacobi rotations.
///
/// Returns `(eigenvalues, eigenvectors as columns, sweeps, converged)`.
fn jacobi_eigen(m: &Matrix3<f64>, params: &JacobiParams) -> (Vector3<f64>, Matrix3<f64>, usize, bool) {
    let mut a = *m;
    let mut v = Matrix3::identity();
    let mut sweeps = 0;
    let mut converged = max_off_diagonal(&a) < params.tolerance;

    while !converged && sweeps < params.max_sweeps {
        for (p, q) in [(0, 1), (0, 2), (1, 2)] {
            let apq = a[(p, q)];
            if apq.abs() < f64::MIN_POSITIVE {
                continue;
            }

            let theta = (a[(q, q)] - a[(p, p)]) / (2.0 * apq);
            let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;

            let mut rot = Matrix3::identity();
            rot[(p, p)] = c;
            rot[(q, q)] = c;
            rot[(p, q)] = s;
            rot[(q, p)] = -s;

            a = rot.transpose() * a * rot;
            // Clean up round-off so the annihilated pair stays exactly zero.
            a[(p, q)] = 0.0;
            a[(q, p)] = 0.0;
            v *= rot;
        }

        sweeps += 1;
        converged = max_off_diagonal(&a) < params.tolerance;
    }

    (a.diagonal(), v, sweeps, converged)
}

#[inline]
fn max_off_diagonal(a: &Matrix3<f64>) -> f64 {
    a[(0, 1)].abs().max(a[(0, 2)].abs()).max(a[(1, 2)].abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn box_corners(sx: f64, sy: f64, sz: f64) -> Vec<Point3<f64>> {
        let mut pts = Vec::new();
        for &x in &[0.0, sx] {
            for &y in &[0.0, sy] {
                for &z in &[0.0, sz] {
                    pts.push(Point3::new(x, y, z));
                }
            }
        }
        pts
    }

    #[test]
    fn test_elongated_box_axes() {
        let pts = box_corners(2.0, 10.0, 5.0);
        let result = analyze_principal_axes(&pts, &JacobiParams::default());

        assert_eq!(result.axes.len(), 3);
        assert!(result.converged);
        assert_relative_eq!(result.axes[0].y.abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(result.axes[1].z.abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(result.axes[2].x.abs(), 1.0, epsilon = 1e-9);
        assert!(result.eigenvalues[0] >= result.eigenvalues[1]);
        assert!(result.eigenvalues[1] >= result.eigenvalues[2]);
    }

    #[test]
    fn test_rotated_cloud_is_orthonormal() {
        // A flat slab tilted 30 degrees about Z.
        let rot = nalgebra::Rotation3::from_axis_angle(&Vector3::z_axis(), 30f64.to_radians());
        let pts: Vec<_> = box_corners(20.0, 1.0, 6.0)
            .into_iter()
            .map(|p| rot * p)
            .collect();

        let result = analyze_principal_axes(&pts, &JacobiParams::default());
        assert!(result.converged);

        for (i, a) in result.axes.iter().enumerate() {
            assert_relative_eq!(a.norm(), 1.0, epsilon = 1e-9);
            for b in &result.axes[i + 1..] {
                assert_relative_eq!(a.dot(b), 0.0, epsilon = 1e-9);
            }
        }

        let expected = rot * Vector3::x();
        assert_relative_eq!(result.axes[0].dot(&expected).abs(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_coincident_points_have_no_axes() {
        let pts = vec![Point3::new(1.0, 2.0, 3.0); 5];
        assert!(principal_axes(&pts).is_empty());
        assert!(principal_axes(&[]).is_empty());
    }

    #[test]
    fn test_coincident_points_away_from_origin() {
        // 0.1 is not exact in binary, so the centroid carries round-off.
        let pts = vec![Point3::new(0.1, 1e5 + 0.3, -7.7); 7];
        assert!(principal_axes(&pts).is_empty());
    }

    #[test]
    fn test_micro_scale_cloud_keeps_axes() {
        let pts: Vec<_> = (1..=10)
            .map(|i| Point3::new(f64::from(i) * 1e-7, f64::from(i % 3) * 1e-8, 0.0))
            .collect();
        let axes = principal_axes(&pts);
        assert_eq!(axes.len(), 3);
        assert_relative_eq!(axes[0].x.abs(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_sweep_cap_is_respected() {
        let rot = nalgebra::Rotation3::from_euler_angles(0.3, 0.7, 1.1);
        let pts: Vec<_> = box_corners(9.0, 4.0, 1.0)
            .into_iter()
            .map(|p| rot * p)
            .collect();

        let capped = analyze_principal_axes(
            &pts,
            &JacobiParams {
                max_sweeps: 1,
                tolerance: 0.0,
            },
        );
        assert_eq!(capped.sweeps, 1);
        assert!(!capped.converged);
        assert_eq!(capped.axes.len(), 3);
    }

    #[test]
    fn test_covariance_of_symmetric_pair() {
        let cov = covariance_matrix(&[Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)])
            .unwrap();
        assert_relative_eq!(cov[(0, 0)], 1.0);
        assert_relative_eq!(cov[(1, 1)], 0.0);
    }
}
