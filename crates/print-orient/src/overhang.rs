//! Overhang and bed-contact classification for a candidate rotation.
//!
//! Every triangle of the full mesh is rotated and classified:
//!
//! - **overhang**: faces downward past the threshold angle and sits above the
//!   bed, so it needs support material underneath
//! - **contact**: faces downward and rests on (or within epsilon of) the bed
//! - neither: everything else, including zero-area triangles
//!
//! Support volume is an approximation (`area * height * density_factor`), not
//! an exact swept volume.
//!
//! # Example
//!
//! ```
//! use nalgebra::{Point3, UnitQuaternion};
//! use print_orient::{Mesh, detect_overhangs};
//!
//! // A single triangle facing straight down, 5 units above a bed vertex.
//! let mesh = Mesh::triangle_soup(vec![
//!     Point3::new(0.0, 5.0, 0.0),
//!     Point3::new(1.0, 5.0, 0.0),
//!     Point3::new(0.0, 5.0, 1.0),
//!     Point3::new(0.0, 0.0, 0.0),
//! ]);
//!
//! let result = detect_overhangs(&mesh, &UnitQuaternion::identity(), 45.0);
//! assert_eq!(result.overhang_triangles, vec![0]);
//! ```

use nalgebra::{Point3, UnitQuaternion};

use crate::Mesh;

/// Triangles with less area than this are skipped as degenerate.
const DEGENERATE_AREA: f64 = 1e-12;

/// Parameters for overhang classification and support estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct OverhangParams {
    /// Overhang angle threshold in degrees, measured from straight down.
    /// A face needs support when `dot(normal, down) >= cos(threshold)`. Default: 45
    pub threshold_degrees: f64,
    /// Downward faces whose mean height above the bed is below this count as
    /// bed contact instead of overhang. Default: 0.1
    pub contact_epsilon: f64,
    /// Shape factor applied to `area * height` for the support volume estimate. Default: 0.3
    pub density_factor: f64,
    /// Support material density in g/mm³. Default: 0.00124 (PLA)
    pub material_density: f64,
}

impl Default for OverhangParams {
    fn default() -> Self {
        Self {
            threshold_degrees: 45.0,
            contact_epsilon: 0.1,
            density_factor: 0.3,
            material_density: 0.00124,
        }
    }
}

impl OverhangParams {
    /// Default parameters with a different threshold angle.
    pub fn with_threshold(threshold_degrees: f64) -> Self {
        Self {
            threshold_degrees,
            ..Default::default()
        }
    }

    /// Parameters for resin printing: steeper threshold, denser support.
    pub fn resin() -> Self {
        Self {
            threshold_degrees: 30.0,
            material_density: 0.0011,
            ..Default::default()
        }
    }
}

/// Aggregate classification without per-triangle lists.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct OverhangSummary {
    /// Total area of overhang triangles.
    pub support_area: f64,
    /// Estimated support volume in mm³.
    pub support_volume: f64,
    /// Estimated support mass in grams.
    pub support_weight: f64,
    /// Total area of bed-contact triangles.
    pub contact_area: f64,
    /// Minimum rotated Y (the bed plane). Zero for an empty mesh.
    pub bed_height: f64,
    /// Number of overhang triangles.
    pub overhang_count: usize,
}

/// Full overhang analysis for one rotation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct OverhangResult {
    /// Indices of triangles that need support.
    pub overhang_triangles: Vec<usize>,
    /// Indices of triangles resting on the bed.
    pub contact_triangles: Vec<usize>,
    /// Total area of overhang triangles.
    pub support_area: f64,
    /// Estimated support volume in mm³.
    pub support_volume: f64,
    /// Estimated support mass in grams.
    pub support_weight: f64,
    /// Total area of bed-contact triangles.
    pub contact_area: f64,
    /// Minimum rotated Y (the bed plane).
    pub bed_height: f64,
}

impl OverhangResult {
    /// Whether any triangle needs support.
    pub fn needs_support(&self) -> bool {
        !self.overhang_triangles.is_empty()
    }

    /// Aggregate view of this result.
    pub fn summary(&self) -> OverhangSummary {
        OverhangSummary {
            support_area: self.support_area,
            support_volume: self.support_volume,
            support_weight: self.support_weight,
            contact_area: self.contact_area,
            bed_height: self.bed_height,
            overhang_count: self.overhang_triangles.len(),
        }
    }
}

/// How a single triangle was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriangleClass {
    Overhang,
    Contact,
}

/// Reusable overhang detector.
///
/// Owns the rotated-vertex scratch buffer so repeated evaluations (one per
/// candidate orientation) do not reallocate. The input mesh is never touched.
#[derive(Debug, Clone, Default)]
pub struct OverhangDetector {
    params: OverhangParams,
    rotated: Vec<Point3<f64>>,
}

impl OverhangDetector {
    /// Create a detector with the given parameters.
    pub fn new(params: OverhangParams) -> Self {
        Self {
            params,
            rotated: Vec::new(),
        }
    }

    /// Create a detector with scratch space for `vertex_count` vertices.
    pub fn with_capacity(params: OverhangParams, vertex_count: usize) -> Self {
        Self {
            params,
            rotated: Vec::with_capacity(vertex_count),
        }
    }

    /// The detector parameters.
    pub fn params(&self) -> &OverhangParams {
        &self.params
    }

    /// Classify every triangle and collect index lists.
    pub fn detect(&mut self, mesh: &Mesh, rotation: &UnitQuaternion<f64>) -> OverhangResult {
        let mut overhang_triangles = Vec::new();
        let mut contact_triangles = Vec::new();
        let summary = self.classify(mesh, rotation, |index, class| match class {
            TriangleClass::Overhang => overhang_triangles.push(index),
            TriangleClass::Contact => contact_triangles.push(index),
        });

        OverhangResult {
            overhang_triangles,
            contact_triangles,
            support_area: summary.support_area,
            support_volume: summary.support_volume,
            support_weight: summary.support_weight,
            contact_area: summary.contact_area,
            bed_height: summary.bed_height,
        }
    }

    /// Classify every triangle, keeping only the aggregates.
    ///
    /// This is the allocation-free path used by the orientation search.
    pub fn measure(&mut self, mesh: &Mesh, rotation: &UnitQuaternion<f64>) -> OverhangSummary {
        self.classify(mesh, rotation, |_, _| {})
    }

    fn classify(
        &mut self,
        mesh: &Mesh,
        rotation: &UnitQuaternion<f64>,
        mut on_triangle: impl FnMut(usize, TriangleClass),
    ) -> OverhangSummary {
        let mut summary = OverhangSummary::default();
        if mesh.vertices.is_empty() {
            return summary;
        }

        let rot = rotation.to_rotation_matrix();
        self.rotated.clear();
        self.rotated.extend(mesh.vertices.iter().map(|p| rot * p));

        let bed = self
            .rotated
            .iter()
            .map(|p| p.y)
            .fold(f64::INFINITY, f64::min);
        summary.bed_height = bed;

        let cos_threshold = self.params.threshold_degrees.to_radians().cos();

        for (index, [ia, ib, ic]) in mesh.triangles() {
            let a = self.rotated[ia];
            let b = self.rotated[ib];
            let c = self.rotated[ic];

            let cross = (b - a).cross(&(c - a));
            let double_area = cross.norm();
            let area = double_area * 0.5;
            if area <= DEGENERATE_AREA {
                continue;
            }

            // dot(normal, (0, -1, 0)) with normal = cross / |cross|
            let down_dot = -cross.y / double_area;
            if down_dot < cos_threshold {
                continue;
            }

            let height = (a.y + b.y + c.y) / 3.0 - bed;
            if height < self.params.contact_epsilon {
                summary.contact_area += area;
                on_triangle(index, TriangleClass::Contact);
            } else {
                summary.support_area += area;
                summary.support_volume += area * height.max(0.0) * self.params.density_factor;
                summary.overhang_count += 1;
                on_triangle(index, TriangleClass::Overhang);
            }
        }

        summary.support_weight = summary.support_volume * self.params.material_density;
        summary
    }
}

/// Detect overhangs for a mesh under `rotation` with the given threshold angle.
///
/// Pure function: allocates its own scratch and never mutates `mesh`.
pub fn detect_overhangs(
    mesh: &Mesh,
    rotation: &UnitQuaternion<f64>,
    threshold_degrees: f64,
) -> OverhangResult {
    detect_overhangs_with_params(mesh, rotation, &OverhangParams::with_threshold(threshold_degrees))
}

/// Detect overhangs with explicit parameters.
pub fn detect_overhangs_with_params(
    mesh: &Mesh,
    rotation: &UnitQuaternion<f64>,
    params: &OverhangParams,
) -> OverhangResult {
    OverhangDetector::with_capacity(*params, mesh.vertex_count()).detect(mesh, rotation)
}
